use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::file_reference::{resolve_images, FileReference};
use crate::query::{FieldSpec, ResourceSpec};
use crate::resource::{RequestBody, Resource};
use crate::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
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
pub struct UpdateProjectRequest {
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
pub struct NewProject {
    pub title: String,
    pub kind: String,
    pub text: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
}

impl RequestBody for CreateProjectRequest {
    type Output = NewProject;

    fn into_input(self) -> Result<NewProject, AppError> {
        Ok(NewProject {
            images: resolve_images(&self.images)?,
            title: self.title,
            kind: self.kind,
            text: self.text,
        })
    }
}

impl RequestBody for UpdateProjectRequest {
    type Output = ProjectChanges;

    fn into_input(self) -> Result<ProjectChanges, AppError> {
        Ok(ProjectChanges {
            images: self.images.as_deref().map(resolve_images).transpose()?,
            title: self.title,
            kind: self.kind,
            text: self.text,
        })
    }
}

static PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::key("id", "/id"),
    FieldSpec::searchable("title", "/title"),
    FieldSpec::searchable("type", "/type"),
    FieldSpec::sortable("text", "/text"),
    FieldSpec::sortable("createdAt", "/createdAt"),
];

static PROJECT_SPEC: ResourceSpec = ResourceSpec {
    name: "projects",
    display_name: "Project",
    default_sort: "createdAt",
    fields: PROJECT_FIELDS,
};

impl Resource for Project {
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;

    fn spec() -> &'static ResourceSpec {
        &PROJECT_SPEC
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_is_exposed_as_type() {
        let request: CreateProjectRequest = serde_json::from_value(json!({
            "title": "Bridge",
            "type": "infrastructure"
        }))
        .unwrap();
        let input = request.into_input().unwrap();
        assert_eq!(input.kind, "infrastructure");
        assert!(input.images.is_empty());

        let project = Project {
            id: 1,
            title: input.title,
            kind: input.kind,
            text: input.text,
            images: input.images,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["type"], json!("infrastructure"));
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let request: CreateProjectRequest =
            serde_json::from_value(json!({"title": ""})).unwrap();
        assert!(request.validate().is_err());
    }
}
