//! Filter and sort composition for document queries.
//!
//! Filters address document fields by dotted path (`location.city`,
//! `profile.image`). Both backends consume the same [`Filter`] tree: the
//! memory backend evaluates it directly against `serde_json` values, the
//! `PostgreSQL` backend translates it to a `WHERE` clause.

use std::cmp::Ordering;

use serde_json::Value;

/// A composable document filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Field equals the given value exactly.
    Eq(String, Value),
    /// String field contains the needle, case-insensitively, anchored
    /// nowhere.
    Contains(String, String),
    /// Numeric field is at least the bound (inclusive).
    Gte(String, f64),
    /// Numeric field is at most the bound (inclusive).
    Lte(String, f64),
    /// All inner filters match.
    And(Vec<Filter>),
}

impl Filter {
    /// Equality on a dotted field path.
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(path.into(), value.into())
    }

    /// Case-insensitive substring match on a string field.
    pub fn contains(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains(path.into(), needle.into())
    }

    /// Inclusive lower bound on a numeric field.
    pub fn gte(path: impl Into<String>, bound: f64) -> Self {
        Self::Gte(path.into(), bound)
    }

    /// Inclusive upper bound on a numeric field.
    pub fn lte(path: impl Into<String>, bound: f64) -> Self {
        Self::Lte(path.into(), bound)
    }

    /// Logical AND of several filters.
    #[must_use]
    pub fn and(filters: Vec<Self>) -> Self {
        Self::And(filters)
    }

    /// Evaluate the filter against a JSON document.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Eq(path, value) => lookup(doc, path) == Some(value),
            Self::Contains(path, needle) => lookup(doc, path)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Self::Gte(path, bound) => lookup(doc, path)
                .and_then(Value::as_f64)
                .is_some_and(|v| v >= *bound),
            Self::Lte(path, bound) => lookup(doc, path)
                .and_then(Value::as_f64)
                .is_some_and(|v| v <= *bound),
            Self::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

/// Sort direction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Errors from parsing a client-supplied sort key.
#[derive(Debug, thiserror::Error)]
pub enum SortKeyError {
    /// The key names no sortable field.
    #[error("unknown sort field '{0}'")]
    UnknownField(String),
}

/// A sort directive on one dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Dotted path of the field to sort on.
    pub path: String,
    /// Direction of the sort.
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on a field path.
    pub fn ascending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a field path.
    pub fn descending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse a client-supplied sort key against an allowlist of fields.
    ///
    /// A leading `-` means descending and is stripped before the field is
    /// resolved; no prefix means ascending.
    ///
    /// # Errors
    ///
    /// Returns [`SortKeyError::UnknownField`] when the stripped key is not
    /// in `allowed`.
    pub fn parse(key: &str, allowed: &[&str]) -> Result<Self, SortKeyError> {
        let (direction, field) = key.strip_prefix('-').map_or(
            (SortDirection::Ascending, key),
            |stripped| (SortDirection::Descending, stripped),
        );

        if !allowed.contains(&field) {
            return Err(SortKeyError::UnknownField(field.to_owned()));
        }

        Ok(Self {
            path: field.to_owned(),
            direction,
        })
    }

    /// Compare two documents under this sort directive.
    ///
    /// Used with a stable sort so that equal keys keep their scan order.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = value_cmp(lookup(a, &self.path), lookup(b, &self.path));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Resolve a dotted field path inside a JSON document.
#[must_use]
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |value, segment| value.get(segment))
}

/// Total order over optional JSON values.
///
/// Missing sorts before null, then booleans, numbers, strings, and
/// everything else. Mixed-type fields stay deterministic rather than
/// panicking.
fn value_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_) | Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
