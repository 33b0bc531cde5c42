//! In-process store
//!
//! Keeps records in a map behind an async lock and evaluates filters and
//! sorts over their JSON form, matching the semantics of the SQL store closely
//! enough for tests and local tooling.

mod records;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use atrium_core::models::{Document, Group};
use atrium_core::{
    AppError, CreateInput, Filter, Predicate, Resource, Sort, SortDirection, UpdateInput,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::ResourceStore;

pub use records::MemoryRecord;

/// Joined data and referential checks for records held in memory
#[async_trait]
pub trait Relation<R>: Send + Sync {
    /// Reject a record that references a missing row.
    async fn check(&self, record: &R) -> Result<(), AppError>;

    /// Fill joined fields before the record is filtered or returned.
    async fn hydrate(&self, record: &mut R);
}

/// Resolves the group of each document from a group store
pub struct DocumentGroups {
    groups: Arc<MemoryStore<Group>>,
}

impl DocumentGroups {
    pub fn new(groups: Arc<MemoryStore<Group>>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl Relation<Document> for DocumentGroups {
    async fn check(&self, document: &Document) -> Result<(), AppError> {
        if let Some(group_id) = document.group_id {
            if !self.groups.contains(group_id).await {
                return Err(AppError::InvalidInput(
                    "Referenced record does not exist".to_string(),
                ));
            }
        }
        Ok(())
    }

    async fn hydrate(&self, document: &mut Document) {
        document.group = match document.group_id {
            Some(group_id) => self.groups.title_of(group_id).await.map(|title| {
                atrium_core::models::GroupSummary { title }
            }),
            None => None,
        };
    }
}

impl MemoryStore<Group> {
    async fn title_of(&self, id: i32) -> Option<String> {
        self.records.read().await.get(&id).map(|g| g.title.clone())
    }
}

/// [`ResourceStore`] over an in-memory map
pub struct MemoryStore<R> {
    records: RwLock<BTreeMap<i32, R>>,
    next_id: AtomicI32,
    relation: Option<Arc<dyn Relation<R>>>,
}

impl<R: MemoryRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MemoryRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
            relation: None,
        }
    }

    pub fn with_relation(relation: Arc<dyn Relation<R>>) -> Self {
        Self {
            relation: Some(relation),
            ..Self::new()
        }
    }

    async fn contains(&self, id: i32) -> bool {
        self.records.read().await.contains_key(&id)
    }

    async fn hydrated(&self, mut record: R) -> R {
        if let Some(relation) = &self.relation {
            relation.hydrate(&mut record).await;
        }
        record
    }

    async fn check(&self, record: &R) -> Result<(), AppError> {
        match &self.relation {
            Some(relation) => relation.check(record).await,
            None => Ok(()),
        }
    }

    /// Hydrated records matching `filter`, each paired with its JSON form.
    async fn matching(&self, filter: &Filter) -> Result<Vec<(R, Value)>, AppError> {
        let snapshot: Vec<R> = self.records.read().await.values().cloned().collect();

        let mut matches = Vec::new();
        for record in snapshot {
            let record = self.hydrated(record).await;
            let json = serde_json::to_value(&record)?;
            if matches_filter(&json, filter) {
                matches.push((record, json));
            }
        }
        Ok(matches)
    }
}

fn matches_filter(json: &Value, filter: &Filter) -> bool {
    filter.conditions.iter().all(|condition| {
        let value = json.pointer(condition.field.pointer).unwrap_or(&Value::Null);
        match &condition.predicate {
            Predicate::Contains(needle) => {
                let haystack = match value {
                    Value::String(s) => s.to_lowercase(),
                    Value::Number(n) => n.to_string(),
                    _ => return false,
                };
                haystack.contains(&needle.to_lowercase())
            }
            Predicate::Equals(expected) => value.as_i64() == Some(i64::from(*expected)),
            Predicate::AnyOf(ids) => value
                .as_i64()
                .is_some_and(|v| ids.iter().any(|id| i64::from(*id) == v)),
        }
    })
}

/// Ascending order of two JSON scalars. Null sorts after every value.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn sort_records<R: Resource>(records: &mut [(R, Value)], sort: &Sort) {
    records.sort_by(|(a, a_json), (b, b_json)| {
        let by_field = compare_values(
            a_json.pointer(sort.field.pointer).unwrap_or(&Value::Null),
            b_json.pointer(sort.field.pointer).unwrap_or(&Value::Null),
        );
        let ordering = by_field.then_with(|| a.id().cmp(&b.id()));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[async_trait]
impl<R: MemoryRecord> ResourceStore<R> for MemoryStore<R> {
    async fn count(&self, filter: &Filter) -> Result<i64, AppError> {
        let total = self.matching(filter).await?.len();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: i64,
        take: Option<i64>,
    ) -> Result<Vec<R>, AppError> {
        let mut records = self.matching(filter).await?;
        sort_records(&mut records, sort);

        let skip = usize::try_from(skip).unwrap_or(0);
        let take = match take {
            Some(take) => usize::try_from(take).unwrap_or(0),
            None => usize::MAX,
        };
        Ok(records
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(record, _)| record)
            .collect())
    }

    async fn find_one(&self, id: i32) -> Result<Option<R>, AppError> {
        let record = self.records.read().await.get(&id).cloned();
        match record {
            Some(record) => Ok(Some(self.hydrated(record).await)),
            None => Ok(None),
        }
    }

    async fn create(&self, input: CreateInput<R>) -> Result<R, AppError> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let record = R::build(id, input, Utc::now());
        self.check(&record).await?;

        self.records.write().await.insert(id, record.clone());
        Ok(self.hydrated(record).await)
    }

    async fn update(&self, id: i32, changes: UpdateInput<R>) -> Result<Option<R>, AppError> {
        let Some(mut record) = self.records.read().await.get(&id).cloned() else {
            return Ok(None);
        };
        record.apply(changes);
        self.check(&record).await?;

        let mut records = self.records.write().await;
        // Deleted while the relation was checked.
        let Some(slot) = records.get_mut(&id) else {
            return Ok(None);
        };
        *slot = record.clone();
        drop(records);

        Ok(Some(self.hydrated(record).await))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}
