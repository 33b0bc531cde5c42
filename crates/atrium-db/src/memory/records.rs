use atrium_core::models::{
    Document, DocumentChanges, Group, GroupChanges, NewDocument, NewGroup, NewNews, NewProject,
    NewSupportMeasure, News, NewsChanges, Project, ProjectChanges, SupportMeasure,
    SupportMeasureChanges,
};
use atrium_core::{CreateInput, Resource, UpdateInput};
use chrono::{DateTime, Utc};

/// Construction and patching of records kept by [`super::MemoryStore`]
pub trait MemoryRecord: Resource {
    fn build(id: i32, input: CreateInput<Self>, created_at: DateTime<Utc>) -> Self;

    fn apply(&mut self, changes: UpdateInput<Self>);
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl MemoryRecord for Group {
    fn build(id: i32, input: NewGroup, created_at: DateTime<Utc>) -> Self {
        Group {
            id,
            title: input.title,
            created_at,
        }
    }

    fn apply(&mut self, changes: GroupChanges) {
        replace(&mut self.title, changes.title);
    }
}

impl MemoryRecord for Document {
    fn build(id: i32, input: NewDocument, created_at: DateTime<Utc>) -> Self {
        Document {
            id,
            title: input.title,
            src: input.src,
            group_id: input.group_id,
            created_at,
            group: None,
        }
    }

    fn apply(&mut self, changes: DocumentChanges) {
        replace(&mut self.title, changes.title);
        replace(&mut self.src, changes.src);
        if changes.group_id.is_some() {
            self.group_id = changes.group_id;
        }
    }
}

impl MemoryRecord for News {
    fn build(id: i32, input: NewNews, created_at: DateTime<Utc>) -> Self {
        News {
            id,
            title: input.title,
            date: input.date,
            text: input.text,
            images: input.images,
            created_at,
        }
    }

    fn apply(&mut self, changes: NewsChanges) {
        replace(&mut self.title, changes.title);
        replace(&mut self.date, changes.date);
        replace(&mut self.text, changes.text);
        replace(&mut self.images, changes.images);
    }
}

impl MemoryRecord for Project {
    fn build(id: i32, input: NewProject, created_at: DateTime<Utc>) -> Self {
        Project {
            id,
            title: input.title,
            kind: input.kind,
            text: input.text,
            images: input.images,
            created_at,
        }
    }

    fn apply(&mut self, changes: ProjectChanges) {
        replace(&mut self.title, changes.title);
        replace(&mut self.kind, changes.kind);
        replace(&mut self.text, changes.text);
        replace(&mut self.images, changes.images);
    }
}

impl MemoryRecord for SupportMeasure {
    fn build(id: i32, input: NewSupportMeasure, created_at: DateTime<Utc>) -> Self {
        SupportMeasure {
            id,
            header: input.header,
            title: input.title,
            kind: input.kind,
            text: input.text,
            images: input.images,
            created_at,
        }
    }

    fn apply(&mut self, changes: SupportMeasureChanges) {
        replace(&mut self.header, changes.header);
        replace(&mut self.title, changes.title);
        replace(&mut self.kind, changes.kind);
        replace(&mut self.text, changes.text);
        replace(&mut self.images, changes.images);
    }
}
