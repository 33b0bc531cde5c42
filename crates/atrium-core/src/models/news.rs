use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::file_reference::{resolve_images, FileReference};
use crate::query::{FieldSpec, ResourceSpec};
use crate::resource::{RequestBody, Resource};
use crate::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i32,
    pub title: String,
    pub date: DateTime<Utc>,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<FileReference>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNewsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<FileReference>>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub date: DateTime<Utc>,
    pub text: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
}

impl RequestBody for CreateNewsRequest {
    type Output = NewNews;

    fn into_input(self) -> Result<NewNews, AppError> {
        Ok(NewNews {
            images: resolve_images(&self.images)?,
            title: self.title,
            date: self.date,
            text: self.text,
        })
    }
}

impl RequestBody for UpdateNewsRequest {
    type Output = NewsChanges;

    fn into_input(self) -> Result<NewsChanges, AppError> {
        Ok(NewsChanges {
            images: self.images.as_deref().map(resolve_images).transpose()?,
            title: self.title,
            date: self.date,
            text: self.text,
        })
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw))),
    }
}

static NEWS_FIELDS: &[FieldSpec] = &[
    FieldSpec::key("id", "/id"),
    FieldSpec::searchable("title", "/title"),
    FieldSpec::sortable("date", "/date"),
    FieldSpec::sortable("text", "/text"),
    FieldSpec::sortable("createdAt", "/createdAt"),
];

static NEWS_SPEC: ResourceSpec = ResourceSpec {
    name: "news",
    display_name: "News",
    default_sort: "date",
    fields: NEWS_FIELDS,
};

impl Resource for News {
    type Create = CreateNewsRequest;
    type Update = UpdateNewsRequest;

    fn spec() -> &'static ResourceSpec {
        &NEWS_SPEC
    }

    fn id(&self) -> i32 {
        self.id
    }
}
