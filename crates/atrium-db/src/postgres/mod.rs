//! PostgreSQL store
//!
//! One generic [`PgStore`] serves every resource. Each record type describes
//! its table through [`PgResource`]: the select list, the `FROM` clause
//! (including joins), the mapping from API field names to SQL expressions and
//! how its create/update inputs are bound.

mod tables;

use std::marker::PhantomData;

use async_trait::async_trait;
use atrium_core::{
    AppError, CreateInput, Filter, Predicate, Resource, Sort, UpdateInput,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};

use crate::store::ResourceStore;

/// SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Table description of a resource stored in PostgreSQL
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> + Unpin {
    /// Table written by insert, update and delete
    const TABLE: &'static str;
    /// Columns selected for a record, qualified when `FROM` joins
    const SELECT_LIST: &'static str;
    const FROM: &'static str;
    const ID_COLUMN: &'static str;
    /// API field name to SQL expression
    const COLUMNS: &'static [(&'static str, &'static str)];
    /// Column list of an insert, in the order `bind_insert` binds values
    const INSERT_COLUMNS: &'static str;

    fn bind_insert<'args>(
        values: &mut Separated<'_, 'args, Postgres, &'static str>,
        input: CreateInput<Self>,
    );

    fn bind_update<'args>(set: &mut Assignments<'_, 'args>, changes: UpdateInput<Self>);

    fn column(field: &str) -> Result<&'static str, AppError> {
        Self::COLUMNS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "field '{}' has no column in {}",
                    field,
                    Self::TABLE
                ))
            })
    }
}

/// `SET` clause of an update; absent values are skipped
pub struct Assignments<'qb, 'args> {
    builder: &'qb mut QueryBuilder<'args, Postgres>,
    count: usize,
}

impl<'qb, 'args> Assignments<'qb, 'args> {
    fn new(builder: &'qb mut QueryBuilder<'args, Postgres>) -> Self {
        Self { builder, count: 0 }
    }

    pub fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            if self.count > 0 {
                self.builder.push(", ");
            }
            self.builder.push(column).push(" = ").push_bind(value);
            self.count += 1;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_where<R: PgResource>(
    builder: &mut QueryBuilder<'static, Postgres>,
    filter: &Filter,
) -> Result<(), AppError> {
    for (index, condition) in filter.conditions.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        let column = R::column(condition.field.name)?;
        match &condition.predicate {
            Predicate::Contains(needle) => {
                builder
                    .push(column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{}%", escape_like(needle)))
                    .push(" ESCAPE '\\'");
            }
            Predicate::Equals(value) => {
                builder.push(column).push(" = ").push_bind(*value);
            }
            Predicate::AnyOf(values) => {
                builder
                    .push(column)
                    .push(" = ANY(")
                    .push_bind(values.clone())
                    .push(")");
            }
        }
    }
    Ok(())
}

fn count_query<R: PgResource>(filter: &Filter) -> Result<QueryBuilder<'static, Postgres>, AppError> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", R::FROM));
    push_where::<R>(&mut builder, filter)?;
    Ok(builder)
}

fn select_query<R: PgResource>(
    filter: &Filter,
    sort: &Sort,
    skip: i64,
    take: Option<i64>,
) -> Result<QueryBuilder<'static, Postgres>, AppError> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", R::SELECT_LIST, R::FROM));
    push_where::<R>(&mut builder, filter)?;

    let direction = sort.direction.as_sql();
    let column = R::column(sort.field.name)?;
    builder.push(format!(" ORDER BY {} {}", column, direction));
    if column != R::ID_COLUMN {
        builder.push(format!(", {} {}", R::ID_COLUMN, direction));
    }

    if let Some(take) = take {
        builder.push(" LIMIT ").push_bind(take.max(0));
    }
    builder.push(" OFFSET ").push_bind(skip.max(0));
    Ok(builder)
}

fn insert_query<R: PgResource>(input: CreateInput<R>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        R::TABLE,
        R::INSERT_COLUMNS
    ));
    {
        let mut values = builder.separated(", ");
        R::bind_insert(&mut values, input);
    }
    builder.push(") RETURNING id");
    builder
}

/// `None` when the changes carry no field to write.
fn update_query<R: PgResource>(
    id: i32,
    changes: UpdateInput<R>,
) -> Option<QueryBuilder<'static, Postgres>> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
    let has_assignments = {
        let mut set = Assignments::new(&mut builder);
        R::bind_update(&mut set, changes);
        !set.is_empty()
    };
    if !has_assignments {
        return None;
    }
    builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");
    Some(builder)
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::InvalidInput(
                "Referenced record does not exist".to_string(),
            );
        }
    }
    AppError::Database(err)
}

/// PostgreSQL-backed [`ResourceStore`]
pub struct PgStore<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> PgStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<R> Clone for PgStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[async_trait]
impl<R: PgResource> ResourceStore<R> for PgStore<R> {
    #[tracing::instrument(skip(self, filter), fields(db.table = R::TABLE, db.operation = "count"))]
    async fn count(&self, filter: &Filter) -> Result<i64, AppError> {
        let mut query = count_query::<R>(filter)?;
        let total = query.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    #[tracing::instrument(skip(self, filter, sort), fields(db.table = R::TABLE, db.operation = "select"))]
    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: i64,
        take: Option<i64>,
    ) -> Result<Vec<R>, AppError> {
        let mut query = select_query::<R>(filter, sort, skip, take)?;
        let records = query.build_query_as::<R>().fetch_all(&self.pool).await?;
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = R::TABLE, db.operation = "select", db.record_id = %id))]
    async fn find_one(&self, id: i32) -> Result<Option<R>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            R::SELECT_LIST,
            R::FROM,
            R::ID_COLUMN
        );
        let record = sqlx::query_as::<Postgres, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    #[tracing::instrument(skip(self, input), fields(db.table = R::TABLE, db.operation = "insert"))]
    async fn create(&self, input: CreateInput<R>) -> Result<R, AppError> {
        let mut query = insert_query::<R>(input);
        let id = query
            .build_query_scalar::<i32>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        self.find_one(id).await?.ok_or_else(|| {
            AppError::Internal(format!("{} {} vanished after insert", R::TABLE, id))
        })
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = R::TABLE, db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: i32, changes: UpdateInput<R>) -> Result<Option<R>, AppError> {
        let Some(mut query) = update_query::<R>(id, changes) else {
            return self.find_one(id).await;
        };

        let updated = query
            .build_query_scalar::<i32>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        match updated {
            Some(id) => self.find_one(id).await,
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = R::TABLE, db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
