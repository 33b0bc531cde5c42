use atrium_core::models::{
    Document, DocumentChanges, Group, GroupChanges, NewDocument, NewGroup, NewNews, NewProject,
    NewSupportMeasure, News, NewsChanges, Project, ProjectChanges, SupportMeasure,
    SupportMeasureChanges,
};
use sqlx::query_builder::Separated;
use sqlx::Postgres;

use super::{Assignments, PgResource};

impl PgResource for Group {
    const TABLE: &'static str = "groups";
    const SELECT_LIST: &'static str = "id, title, created_at";
    const FROM: &'static str = "groups";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("title", "title"),
        ("createdAt", "created_at"),
    ];
    const INSERT_COLUMNS: &'static str = "title";

    fn bind_insert<'args>(values: &mut Separated<'_, 'args, Postgres, &'static str>, input: NewGroup) {
        values.push_bind(input.title);
    }

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: GroupChanges) {
        set.set("title", changes.title);
    }
}

impl PgResource for Document {
    const TABLE: &'static str = "documents";
    const SELECT_LIST: &'static str =
        "d.id, d.title, d.src, d.group_id, d.created_at, g.title AS group_title";
    const FROM: &'static str = "documents d LEFT JOIN groups g ON g.id = d.group_id";
    const ID_COLUMN: &'static str = "d.id";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "d.id"),
        ("title", "d.title"),
        ("src", "d.src"),
        ("groupId", "d.group_id"),
        ("createdAt", "d.created_at"),
        ("groupTitle", "g.title"),
    ];
    const INSERT_COLUMNS: &'static str = "title, src, group_id";

    fn bind_insert<'args>(
        values: &mut Separated<'_, 'args, Postgres, &'static str>,
        input: NewDocument,
    ) {
        values
            .push_bind(input.title)
            .push_bind(input.src)
            .push_bind(input.group_id);
    }

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: DocumentChanges) {
        set.set("title", changes.title)
            .set("src", changes.src)
            .set("group_id", changes.group_id);
    }
}

impl PgResource for News {
    const TABLE: &'static str = "news";
    const SELECT_LIST: &'static str = "id, title, date, text, images, created_at";
    const FROM: &'static str = "news";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("title", "title"),
        ("date", "date"),
        ("text", "text"),
        ("createdAt", "created_at"),
    ];
    const INSERT_COLUMNS: &'static str = "title, date, text, images";

    fn bind_insert<'args>(values: &mut Separated<'_, 'args, Postgres, &'static str>, input: NewNews) {
        values
            .push_bind(input.title)
            .push_bind(input.date)
            .push_bind(input.text)
            .push_bind(input.images);
    }

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: NewsChanges) {
        set.set("title", changes.title)
            .set("date", changes.date)
            .set("text", changes.text)
            .set("images", changes.images);
    }
}

impl PgResource for Project {
    const TABLE: &'static str = "projects";
    const SELECT_LIST: &'static str = "id, title, kind, text, images, created_at";
    const FROM: &'static str = "projects";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("title", "title"),
        ("type", "kind"),
        ("text", "text"),
        ("createdAt", "created_at"),
    ];
    const INSERT_COLUMNS: &'static str = "title, kind, text, images";

    fn bind_insert<'args>(
        values: &mut Separated<'_, 'args, Postgres, &'static str>,
        input: NewProject,
    ) {
        values
            .push_bind(input.title)
            .push_bind(input.kind)
            .push_bind(input.text)
            .push_bind(input.images);
    }

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: ProjectChanges) {
        set.set("title", changes.title)
            .set("kind", changes.kind)
            .set("text", changes.text)
            .set("images", changes.images);
    }
}

impl PgResource for SupportMeasure {
    const TABLE: &'static str = "support_measures";
    const SELECT_LIST: &'static str = "id, header, title, kind, text, images, created_at";
    const FROM: &'static str = "support_measures";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("header", "header"),
        ("title", "title"),
        ("type", "kind"),
        ("text", "text"),
        ("createdAt", "created_at"),
    ];
    const INSERT_COLUMNS: &'static str = "header, title, kind, text, images";

    fn bind_insert<'args>(
        values: &mut Separated<'_, 'args, Postgres, &'static str>,
        input: NewSupportMeasure,
    ) {
        values
            .push_bind(input.header)
            .push_bind(input.title)
            .push_bind(input.kind)
            .push_bind(input.text)
            .push_bind(input.images);
    }

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: SupportMeasureChanges) {
        set.set("header", changes.header)
            .set("title", changes.title)
            .set("kind", changes.kind)
            .set("text", changes.text)
            .set("images", changes.images);
    }
}
