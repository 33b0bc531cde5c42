use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use super::file_reference::{
    deserialize_flexible_id, resolve_document_source, FileReference, OneOrMany,
};
use crate::query::{FieldSpec, ResourceSpec};
use crate::resource::{RequestBody, Resource};
use crate::AppError;

/// Title of the group a document belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub title: String,
}

/// Downloadable document filed under a group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub src: String,
    pub group_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Group")]
    pub group: Option<GroupSummary>,
}

impl<'r> FromRow<'r, PgRow> for Document {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let group_title: Option<String> = row.try_get("group_title")?;
        Ok(Document {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            src: row.try_get("src")?,
            group_id: row.try_get("group_id")?,
            created_at: row.try_get("created_at")?,
            group: group_title.map(|title| GroupSummary { title }),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    pub src: OneOrMany<FileReference>,
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub group_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    pub src: Option<OneOrMany<FileReference>>,
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub group_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub src: String,
    pub group_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub src: Option<String>,
    pub group_id: Option<i32>,
}

impl RequestBody for CreateDocumentRequest {
    type Output = NewDocument;

    fn into_input(self) -> Result<NewDocument, AppError> {
        Ok(NewDocument {
            src: resolve_document_source(&self.src)?,
            title: self.title,
            group_id: self.group_id,
        })
    }
}

impl RequestBody for UpdateDocumentRequest {
    type Output = DocumentChanges;

    fn into_input(self) -> Result<DocumentChanges, AppError> {
        Ok(DocumentChanges {
            src: self.src.as_ref().map(resolve_document_source).transpose()?,
            title: self.title,
            group_id: self.group_id,
        })
    }
}

static DOCUMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::key("id", "/id"),
    FieldSpec::searchable("title", "/title"),
    FieldSpec::sortable("src", "/src"),
    FieldSpec::key("groupId", "/groupId"),
    FieldSpec::sortable("createdAt", "/createdAt"),
    FieldSpec::related("groupTitle", "/Group/title"),
];

static DOCUMENT_SPEC: ResourceSpec = ResourceSpec {
    name: "docs",
    display_name: "Document",
    default_sort: "id",
    fields: DOCUMENT_FIELDS,
};

impl Resource for Document {
    type Create = CreateDocumentRequest;
    type Update = UpdateDocumentRequest;

    fn spec() -> &'static ResourceSpec {
        &DOCUMENT_SPEC
    }

    fn id(&self) -> i32 {
        self.id
    }
}
