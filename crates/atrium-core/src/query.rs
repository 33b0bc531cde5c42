//! List query parsing
//!
//! Turns the `range`, `sort`, `filter` and `all` query parameters of a list
//! request into a [`QuerySpec`] checked against a resource's field table.
//! Stores execute the query; the HTTP layer reports the window back through a
//! [`RangeDescriptor`].

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::AppError;

const DEFAULT_RANGE_START: i64 = 0;
const DEFAULT_RANGE_END: i64 = 9;

/// How a field participates in filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match
    Contains,
    /// Integer equality, or membership when given an array
    Integer,
}

/// One API-visible field of a resource
#[derive(Debug)]
pub struct FieldSpec {
    /// Name used in `sort` and `filter` parameters
    pub name: &'static str,
    /// JSON pointer to the value inside a serialized record
    pub pointer: &'static str,
    pub sortable: bool,
    pub filter: Option<FilterKind>,
}

impl FieldSpec {
    pub const fn sortable(name: &'static str, pointer: &'static str) -> Self {
        Self {
            name,
            pointer,
            sortable: true,
            filter: None,
        }
    }

    pub const fn searchable(name: &'static str, pointer: &'static str) -> Self {
        Self {
            name,
            pointer,
            sortable: true,
            filter: Some(FilterKind::Contains),
        }
    }

    pub const fn key(name: &'static str, pointer: &'static str) -> Self {
        Self {
            name,
            pointer,
            sortable: true,
            filter: Some(FilterKind::Integer),
        }
    }

    /// Filter-only field, typically a value from a joined record.
    pub const fn related(name: &'static str, pointer: &'static str) -> Self {
        Self {
            name,
            pointer,
            sortable: false,
            filter: Some(FilterKind::Contains),
        }
    }
}

/// Static description of a resource collection
#[derive(Debug)]
pub struct ResourceSpec {
    /// Collection name used in paths and the `Content-Range` header
    pub name: &'static str,
    /// Singular name used in response messages
    pub display_name: &'static str,
    pub default_sort: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ResourceSpec {
    pub fn field(&'static self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found!", self.display_name))
    }

    pub fn deleted_message(&self) -> String {
        format!("{} deleted!", self.display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::InvalidInput(format!(
                "Invalid sort direction '{}': expected 'asc' or 'desc'",
                other
            ))),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub field: &'static FieldSpec,
    pub direction: SortDirection,
}

impl Sort {
    /// Default ordering of a resource: its default field, descending.
    pub fn default_for(spec: &'static ResourceSpec) -> Result<Self, AppError> {
        let field = spec.field(spec.default_sort).ok_or_else(|| {
            AppError::Internal(format!(
                "default sort field '{}' is not declared for {}",
                spec.default_sort, spec.name
            ))
        })?;
        Ok(Sort {
            field,
            direction: SortDirection::Desc,
        })
    }

    /// Parse a `["field", "direction"]` pair.
    pub fn parse(raw: &str, spec: &'static ResourceSpec) -> Result<Self, AppError> {
        let (name, direction): (String, String) = serde_json::from_str(raw).map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid sort parameter, expected [\"field\", \"asc|desc\"]: {}",
                e
            ))
        })?;

        let field = spec
            .field(&name)
            .filter(|f| f.sortable)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Cannot sort {} by '{}'", spec.name, name))
            })?;

        Ok(Sort {
            field,
            direction: SortDirection::parse(&direction)?,
        })
    }
}

/// Inclusive, zero-based `[start, end]` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            start: DEFAULT_RANGE_START,
            end: DEFAULT_RANGE_END,
        }
    }
}

impl Window {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let (start, end): (i64, i64) = serde_json::from_str(raw).map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid range parameter, expected [start, end]: {}",
                e
            ))
        })?;

        if start < 0 {
            return Err(AppError::InvalidInput(format!(
                "Invalid range parameter: start must not be negative (got {})",
                start
            )));
        }

        Ok(Window { start, end })
    }

    pub fn skip(&self) -> i64 {
        self.start
    }

    /// Number of rows to fetch; an inverted window yields zero.
    pub fn take(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Contains(String),
    Equals(i32),
    AnyOf(Vec<i32>),
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub field: &'static FieldSpec,
    pub predicate: Predicate,
}

/// Conjunction of conditions on recognized fields
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Parse a filter object. Unknown keys and empty values are ignored.
    pub fn parse(raw: &str, spec: &'static ResourceSpec) -> Result<Self, AppError> {
        let object: Map<String, Value> = serde_json::from_str(raw).map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid filter parameter, expected a JSON object: {}",
                e
            ))
        })?;

        let mut conditions = Vec::new();
        for (key, value) in object {
            let Some(field) = spec.field(&key) else {
                continue;
            };
            let Some(kind) = field.filter else {
                continue;
            };
            if let Some(predicate) = predicate_for(&key, kind, value)? {
                conditions.push(Condition { field, predicate });
            }
        }

        Ok(Filter { conditions })
    }
}

fn predicate_for(key: &str, kind: FilterKind, value: Value) -> Result<Option<Predicate>, AppError> {
    let invalid = |expected: &str| {
        AppError::InvalidInput(format!("Invalid filter value for '{}': expected {}", key, expected))
    };

    match (kind, value) {
        (_, Value::Null) => Ok(None),
        (FilterKind::Contains, Value::String(s)) if s.is_empty() => Ok(None),
        (FilterKind::Contains, Value::String(s)) => Ok(Some(Predicate::Contains(s))),
        (FilterKind::Contains, Value::Number(n)) => Ok(Some(Predicate::Contains(n.to_string()))),
        (FilterKind::Contains, _) => Err(invalid("a string")),
        (FilterKind::Integer, Value::String(s)) if s.trim().is_empty() => Ok(None),
        (FilterKind::Integer, Value::Array(items)) => items
            .into_iter()
            .map(|item| integer(&item).ok_or_else(|| invalid("an array of integers")))
            .collect::<Result<Vec<_>, _>>()
            .map(|ids| Some(Predicate::AnyOf(ids))),
        (FilterKind::Integer, value) => integer(&value)
            .map(|n| Some(Predicate::Equals(n)))
            .ok_or_else(|| invalid("an integer")),
    }
}

fn integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Raw list parameters as they arrive in the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub range: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub all: Option<String>,
}

impl ListParams {
    pub fn is_unbounded(&self) -> bool {
        self.all.as_deref() == Some("true")
    }
}

/// Parsed list request
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub filter: Filter,
    pub sort: Sort,
    /// `None` when the caller asked for every matching record
    pub window: Option<Window>,
}

impl QuerySpec {
    pub fn parse(params: &ListParams, spec: &'static ResourceSpec) -> Result<Self, AppError> {
        let filter = match params.filter.as_deref() {
            Some(raw) => Filter::parse(raw, spec)?,
            None => Filter::default(),
        };

        if params.is_unbounded() {
            return Ok(QuerySpec {
                filter,
                sort: Sort::default_for(spec)?,
                window: None,
            });
        }

        let sort = match params.sort.as_deref() {
            Some(raw) => Sort::parse(raw, spec)?,
            None => Sort::default_for(spec)?,
        };
        let window = match params.range.as_deref() {
            Some(raw) => Window::parse(raw)?,
            None => Window::default(),
        };

        Ok(QuerySpec {
            filter,
            sort,
            window: Some(window),
        })
    }
}

/// Pagination metadata reported with a bounded list response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub resource: &'static str,
    pub start: i64,
    pub end: i64,
    /// Count of records matching the filter, independent of the window
    pub total: i64,
}

impl RangeDescriptor {
    pub fn new(resource: &'static str, window: Window, total: i64) -> Self {
        RangeDescriptor {
            resource,
            start: window.start,
            end: window.end,
            total,
        }
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}/{}",
            self.resource, self.start, self.end, self.total
        )
    }
}
