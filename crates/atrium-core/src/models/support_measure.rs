use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::file_reference::{resolve_images, FileReference};
use crate::query::{FieldSpec, ResourceSpec};
use crate::resource::{RequestBody, Resource};
use crate::AppError;

/// Support programme entry grouped under a header
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportMeasure {
    pub id: i32,
    pub header: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupportMeasureRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Header must be at most 255 characters"))]
    pub header: String,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<FileReference>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupportMeasureRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Header must be at most 255 characters"))]
    pub header: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<FileReference>>,
}

#[derive(Debug, Clone)]
pub struct NewSupportMeasure {
    pub header: String,
    pub title: String,
    pub kind: String,
    pub text: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SupportMeasureChanges {
    pub header: Option<String>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
}

impl RequestBody for CreateSupportMeasureRequest {
    type Output = NewSupportMeasure;

    fn into_input(self) -> Result<NewSupportMeasure, AppError> {
        Ok(NewSupportMeasure {
            images: resolve_images(&self.images)?,
            header: self.header,
            title: self.title,
            kind: self.kind,
            text: self.text,
        })
    }
}

impl RequestBody for UpdateSupportMeasureRequest {
    type Output = SupportMeasureChanges;

    fn into_input(self) -> Result<SupportMeasureChanges, AppError> {
        Ok(SupportMeasureChanges {
            images: self.images.as_deref().map(resolve_images).transpose()?,
            header: self.header,
            title: self.title,
            kind: self.kind,
            text: self.text,
        })
    }
}

static SUPPORT_MEASURE_FIELDS: &[FieldSpec] = &[
    FieldSpec::key("id", "/id"),
    FieldSpec::searchable("header", "/header"),
    FieldSpec::searchable("title", "/title"),
    FieldSpec::searchable("type", "/type"),
    FieldSpec::sortable("text", "/text"),
    FieldSpec::sortable("createdAt", "/createdAt"),
];

static SUPPORT_MEASURE_SPEC: ResourceSpec = ResourceSpec {
    name: "supportMeasures",
    display_name: "SupportMeasure",
    default_sort: "createdAt",
    fields: SUPPORT_MEASURE_FIELDS,
};

impl Resource for SupportMeasure {
    type Create = CreateSupportMeasureRequest;
    type Update = UpdateSupportMeasureRequest;

    fn spec() -> &'static ResourceSpec {
        &SUPPORT_MEASURE_SPEC
    }

    fn id(&self) -> i32 {
        self.id
    }
}
