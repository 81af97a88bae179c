//! Query types for repository reads
//!
//! A [`RecordQuery`] describes which records a listing is looking at: the
//! team scope, zero or more [`FilterCondition`]s and an ordering. The store
//! turns it into whatever its backend needs; the in-memory store evaluates
//! conditions directly against [`Record`] fields.
//!
//! # Example
//!
//! ```rust
//! use crud_listing::repository::{FilterCondition, OrderTerm, Pagination, RecordQuery};
//!
//! let query = RecordQuery::scoped("acme")
//!     .filter(FilterCondition::contains("name", "widget"))
//!     .order_by(OrderTerm::descending("number"));
//!
//! let window = Pagination::new(0, 4);
//! assert_eq!(query.filters.len(), 1);
//! assert_eq!(window.limit, 4);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One ordering key
///
/// Field names come from static tables so ordering terms can be `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTerm {
    pub field: &'static str,
    pub direction: OrderDirection,
}

impl OrderTerm {
    #[must_use]
    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: OrderDirection::Ascending,
        }
    }

    #[must_use]
    pub const fn descending(field: &'static str) -> Self {
        Self {
            field,
            direction: OrderDirection::Descending,
        }
    }

    /// Query-string form: `field` or `-field`
    #[must_use]
    pub fn to_param(&self) -> String {
        match self.direction {
            OrderDirection::Ascending => self.field.to_string(),
            OrderDirection::Descending => format!("-{}", self.field),
        }
    }
}

/// Offset/limit window for a repository read
///
/// Listings get theirs from
/// [`PageWindow::as_pagination`](crate::pagination::PageWindow::as_pagination).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact equality (numeric fields compare numerically)
    Equal,
    /// Case-insensitive substring match on text fields
    Contains,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "exact"),
            Self::Contains => write!(f, "icontains"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    /// Non-integral number; never equal to an integer field
    Float(f64),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

/// Borrowed view of one field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
}

impl FieldValue<'_> {
    /// Ordering used for sorting: text is compared case-insensitively first
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Self::Integer(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Integer(_)) => Ordering::Greater,
        }
    }
}

/// A record the in-memory store can filter and sort
pub trait Record {
    /// Team slug this record belongs to
    fn scope(&self) -> &str;

    /// Stable identifier, used as the final tie breaker when sorting
    fn record_id(&self) -> i64;

    /// Value of a named field, `None` for unknown fields
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// A single filter condition
///
/// # Example
///
/// ```rust
/// use crud_listing::repository::{FilterCondition, FilterOperator};
///
/// let by_name = FilterCondition::contains("name", "wid");
/// assert_eq!(by_name.operator, FilterOperator::Contains);
///
/// let by_number = FilterCondition::eq("number", 3_i64);
/// assert_eq!(by_number.to_string(), "number__exact=3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Case-insensitive substring filter
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, FilterValue::String(needle.into()))
    }

    /// Evaluate this condition against a record
    ///
    /// Unknown fields and mismatched value types never match.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(actual) = record.field(&self.field) else {
            return false;
        };

        match (self.operator, actual, &self.value) {
            (FilterOperator::Equal, FieldValue::Integer(a), FilterValue::Integer(b)) => a == *b,
            (FilterOperator::Equal, FieldValue::Integer(a), FilterValue::Float(b)) => {
                b.fract() == 0.0 && a as f64 == *b
            }
            (FilterOperator::Equal, FieldValue::Text(a), FilterValue::String(b)) => a == b,
            (FilterOperator::Contains, FieldValue::Text(a), FilterValue::String(b)) => {
                a.to_lowercase().contains(&b.to_lowercase())
            }
            _ => false,
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}={}", self.field, self.operator, self.value)
    }
}

/// Everything a listing read needs except the page window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordQuery {
    /// Team slug; records from other teams are never visible
    pub scope: String,
    pub filters: Vec<FilterCondition>,
    /// Ordering keys, most significant first; empty means default ordering
    pub ordering: Vec<OrderTerm>,
}

impl RecordQuery {
    /// Base view of one team's records
    #[must_use]
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, term: OrderTerm) -> Self {
        self.ordering.push(term);
        self
    }

    /// Whether a record is part of this view
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        record.scope() == self.scope && self.filters.iter().all(|c| c.matches(record))
    }

    /// Compare two records by the requested ordering, then by `fallback`,
    /// then by id so that every ordering is total
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R, fallback: &[OrderTerm]) -> Ordering {
        self.ordering
            .iter()
            .chain(fallback)
            .map(|term| {
                let ord = match (a.field(term.field), b.field(term.field)) {
                    (Some(x), Some(y)) => x.compare(&y),
                    _ => Ordering::Equal,
                };
                match term.direction {
                    OrderDirection::Ascending => ord,
                    OrderDirection::Descending => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.record_id().cmp(&b.record_id()))
    }
}
