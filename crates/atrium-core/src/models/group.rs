use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::query::{FieldSpec, ResourceSpec};
use crate::resource::{RequestBody, Resource};
use crate::AppError;

/// Named group that documents are filed under
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct GroupChanges {
    pub title: Option<String>,
}

impl RequestBody for CreateGroupRequest {
    type Output = NewGroup;

    fn into_input(self) -> Result<NewGroup, AppError> {
        Ok(NewGroup { title: self.title })
    }
}

impl RequestBody for UpdateGroupRequest {
    type Output = GroupChanges;

    fn into_input(self) -> Result<GroupChanges, AppError> {
        Ok(GroupChanges { title: self.title })
    }
}

static GROUP_FIELDS: &[FieldSpec] = &[
    FieldSpec::key("id", "/id"),
    FieldSpec::searchable("title", "/title"),
    FieldSpec::sortable("createdAt", "/createdAt"),
];

static GROUP_SPEC: ResourceSpec = ResourceSpec {
    name: "groups",
    display_name: "Group",
    default_sort: "id",
    fields: GROUP_FIELDS,
};

impl Resource for Group {
    type Create = CreateGroupRequest;
    type Update = UpdateGroupRequest;

    fn spec() -> &'static ResourceSpec {
        &GROUP_SPEC
    }

    fn id(&self) -> i32 {
        self.id
    }
}
