//! Query-string filtering and sorting for listings
//!
//! Filters are declared in a static table ([`THING_FILTERS`]); each entry
//! names the query parameter, the label shown on the filter form, the
//! record field it applies to and how the raw text is interpreted. The
//! `sort` parameter picks from a second table ([`THING_ORDERING`]).
//!
//! Parsing is lenient. Unknown parameters, empty values and values that do
//! not parse are dropped (and logged at `debug`); they never fail a request.
//!
//! ```rust
//! use std::collections::HashMap;
//! use crud_listing::filters::FilterSet;
//!
//! let params = HashMap::from([
//!     ("name".to_string(), "wid".to_string()),
//!     ("number".to_string(), "oops".to_string()),
//!     ("sort".to_string(), "-number".to_string()),
//!     ("colour".to_string(), "red".to_string()),
//! ]);
//! let filters = FilterSet::from_params(&params);
//!
//! assert_eq!(filters.conditions().len(), 1);
//! assert_eq!(filters.query_string(2), "name=wid&sort=-number&page=2");
//! ```

use std::collections::HashMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::repository::{
    FilterCondition, FilterValue, OrderTerm, Pagination, RecordQuery, Repository,
    RepositoryResult,
};

/// Query parameter selecting the ordering
pub const ORDERING_PARAM: &str = "sort";

/// Query parameter selecting the page
pub const PAGE_PARAM: &str = "page";

/// How a filter interprets its raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring of a text field
    TextContains,
    /// Numeric equality; integral decimals such as `3.0` are accepted
    NumberEquals,
}

/// One row of a filter table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Query parameter name
    pub param: &'static str,
    /// Label on the filter form
    pub label: &'static str,
    /// Record field the condition applies to
    pub field: &'static str,
    pub kind: FilterKind,
}

/// One sortable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingField {
    pub field: &'static str,
    pub label: &'static str,
}

pub static THING_FILTERS: &[FilterField] = &[
    FilterField {
        param: "name",
        label: "Name Contains",
        field: "name",
        kind: FilterKind::TextContains,
    },
    FilterField {
        param: "number",
        label: "Number Is",
        field: "number",
        kind: FilterKind::NumberEquals,
    },
];

pub static THING_ORDERING: &[OrderingField] = &[
    OrderingField {
        field: "name",
        label: "Name",
    },
    OrderingField {
        field: "number",
        label: "Number",
    },
];

impl FilterField {
    /// Turn a raw value into a condition, `None` if it does not parse
    fn parse(&self, raw: &str) -> Option<FilterCondition> {
        match self.kind {
            FilterKind::TextContains => Some(FilterCondition::contains(self.field, raw)),
            FilterKind::NumberEquals => parse_number(raw).map(|v| FilterCondition::eq(self.field, v)),
        }
    }
}

fn parse_number(raw: &str) -> Option<FilterValue> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(FilterValue::Integer(n));
    }
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(FilterValue::Integer(value as i64))
    } else {
        Some(FilterValue::Float(value))
    }
}

/// A filter parameter as echoed back to the filter form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundFilter {
    pub param: &'static str,
    pub label: &'static str,
    /// Trimmed submitted value, empty when the parameter was absent
    pub value: String,
}

/// One option of the sort select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortChoice {
    /// Parameter value, `field` or `-field`
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
struct ActiveFilter {
    field: &'static FilterField,
    raw: String,
    condition: FilterCondition,
}

/// Criteria and ordering parsed from one request
#[derive(Debug, Clone)]
pub struct FilterSet {
    fields: &'static [FilterField],
    ordering_fields: &'static [OrderingField],
    raw: HashMap<&'static str, String>,
    active: Vec<ActiveFilter>,
    ordering: Vec<OrderTerm>,
}

impl FilterSet {
    /// Parse the thing filters from query parameters
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self::with_tables(THING_FILTERS, THING_ORDERING, params)
    }

    /// Parse against arbitrary filter and ordering tables
    #[must_use]
    pub fn with_tables(
        fields: &'static [FilterField],
        ordering_fields: &'static [OrderingField],
        params: &HashMap<String, String>,
    ) -> Self {
        let mut raw = HashMap::new();
        let mut active = Vec::new();

        for field in fields {
            let Some(value) = params.get(field.param).map(|v| v.trim()) else {
                continue;
            };
            raw.insert(field.param, value.to_string());
            if value.is_empty() {
                continue;
            }
            match field.parse(value) {
                Some(condition) => active.push(ActiveFilter {
                    field,
                    raw: value.to_string(),
                    condition,
                }),
                None => tracing::debug!(param = field.param, value, "Ignoring malformed filter value"),
            }
        }

        for name in params.keys() {
            let known = name == ORDERING_PARAM
                || name == PAGE_PARAM
                || fields.iter().any(|f| f.param == name.as_str());
            if !known {
                tracing::debug!(param = %name, "Ignoring unknown filter parameter");
            }
        }

        let ordering = params
            .get(ORDERING_PARAM)
            .map(|v| parse_ordering(ordering_fields, v))
            .unwrap_or_default();

        Self {
            fields,
            ordering_fields,
            raw,
            active,
            ordering,
        }
    }

    /// Parsed filter conditions, in table order
    #[must_use]
    pub fn conditions(&self) -> Vec<FilterCondition> {
        self.active.iter().map(|a| a.condition.clone()).collect()
    }

    /// Requested ordering, empty for the default
    #[must_use]
    pub fn ordering(&self) -> &[OrderTerm] {
        &self.ordering
    }

    /// Whether any filter narrows the listing
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.active.is_empty()
    }

    /// Narrow `base` by the parsed criteria and ordering
    #[must_use]
    pub fn apply<'r, R: Repository>(&self, repo: &'r R, base: RecordQuery) -> FilteredView<'r, R> {
        let query = self
            .active
            .iter()
            .fold(base, |q, a| q.filter(a.condition.clone()));
        let query = self.ordering.iter().fold(query, |q, term| q.order_by(*term));
        FilteredView { repo, query }
    }

    /// Submitted values for every filter in the table, for the filter form
    #[must_use]
    pub fn bound_values(&self) -> Vec<BoundFilter> {
        self.fields
            .iter()
            .map(|f| BoundFilter {
                param: f.param,
                label: f.label,
                value: self.raw.get(f.param).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Options for the sort select, ascending and descending per field
    #[must_use]
    pub fn sort_choices(&self) -> Vec<SortChoice> {
        let current = self.ordering.first();
        self.ordering_fields
            .iter()
            .flat_map(|f| {
                [OrderTerm::ascending(f.field), OrderTerm::descending(f.field)]
                    .into_iter()
                    .map(move |term| (f, term))
            })
            .map(|(f, term)| SortChoice {
                value: term.to_param(),
                label: if term == OrderTerm::ascending(f.field) {
                    f.label.to_string()
                } else {
                    format!("{} (descending)", f.label)
                },
                selected: current == Some(&term),
            })
            .collect()
    }

    /// Query string for `page` that keeps the active filters and ordering
    ///
    /// Only well-formed filter values are carried over. No leading `?`.
    #[must_use]
    pub fn query_string(&self, page: u32) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for active in &self.active {
            serializer.append_pair(active.field.param, &active.raw);
        }
        if !self.ordering.is_empty() {
            let sort: Vec<String> = self.ordering.iter().map(OrderTerm::to_param).collect();
            serializer.append_pair(ORDERING_PARAM, &sort.join(","));
        }
        serializer.append_pair(PAGE_PARAM, &page.to_string());
        serializer.finish()
    }
}

/// Parse `name,-number` against an ordering table
///
/// Unknown fields are dropped, and so is any field after its first mention.
fn parse_ordering(table: &'static [OrderingField], value: &str) -> Vec<OrderTerm> {
    let mut terms: Vec<OrderTerm> = Vec::new();
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, descending) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        let Some(field) = table.iter().find(|f| f.field == name) else {
            tracing::debug!(token, "Ignoring unknown sort field");
            continue;
        };
        if terms.iter().any(|t| t.field == field.field) {
            continue;
        }
        terms.push(if descending {
            OrderTerm::descending(field.field)
        } else {
            OrderTerm::ascending(field.field)
        });
    }
    terms
}

/// A filtered, ordered view over a store
///
/// Nothing is read until [`count`](Self::count) or [`slice`](Self::slice)
/// is awaited.
#[derive(Debug)]
pub struct FilteredView<'r, R> {
    repo: &'r R,
    query: RecordQuery,
}

impl<R: Repository> FilteredView<'_, R> {
    /// Number of records in the view
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn count(&self) -> RepositoryResult<u64> {
        self.repo.count(&self.query).await
    }

    /// One window of the view, in view order
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn slice(&self, pagination: Pagination) -> RepositoryResult<Vec<R::Entity>> {
        self.repo.find_all(&self.query, Some(pagination)).await
    }

    #[must_use]
    pub fn query(&self) -> &RecordQuery {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThingInput;
    use crate::repository::{FilterOperator, MemoryRepository, OrderDirection};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_name_filter_is_contains() {
        let filters = FilterSet::from_params(&params(&[("name", " Wid ")]));
        let conditions = filters.conditions();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].operator, FilterOperator::Contains);
        assert_eq!(conditions[0].value, FilterValue::String("Wid".to_string()));
    }

    #[test]
    fn test_number_filter_parsing() {
        let parsed = |raw: &str| {
            FilterSet::from_params(&params(&[("number", raw)]))
                .conditions()
                .first()
                .map(|c| c.value.clone())
        };
        assert_eq!(parsed("3"), Some(FilterValue::Integer(3)));
        assert_eq!(parsed("3.0"), Some(FilterValue::Integer(3)));
        assert_eq!(parsed("3.5"), Some(FilterValue::Float(3.5)));
        assert_eq!(parsed("three"), None);
        assert_eq!(parsed("NaN"), None);
    }

    #[test]
    fn test_empty_and_unknown_params_are_ignored() {
        let filters = FilterSet::from_params(&params(&[("name", ""), ("colour", "red")]));
        assert!(!filters.is_filtered());
    }

    #[test]
    fn test_ordering_parsing() {
        let filters = FilterSet::from_params(&params(&[("sort", "-number, name,bogus,number")]));
        assert_eq!(
            filters.ordering(),
            &[OrderTerm::descending("number"), OrderTerm::ascending("name")]
        );
        assert_eq!(filters.ordering()[0].direction, OrderDirection::Descending);
    }

    #[test]
    fn test_bound_values_echo_input() {
        let filters = FilterSet::from_params(&params(&[("number", "x")]));
        let bound = filters.bound_values();
        assert_eq!(bound.len(), 2);
        assert_eq!(bound[0].label, "Name Contains");
        assert_eq!(bound[0].value, "");
        assert_eq!(bound[1].label, "Number Is");
        assert_eq!(bound[1].value, "x");
    }

    #[test]
    fn test_sort_choices() {
        let filters = FilterSet::from_params(&params(&[("sort", "-name")]));
        let choices = filters.sort_choices();
        let values: Vec<_> = choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["name", "-name", "number", "-number"]);
        assert_eq!(choices[1].label, "Name (descending)");
        assert!(choices[1].selected);
        assert!(!choices[0].selected);
    }

    #[test]
    fn test_query_string_encodes_values() {
        let filters = FilterSet::from_params(&params(&[("name", "a&b c")]));
        assert_eq!(filters.query_string(1), "name=a%26b+c&page=1");
    }

    #[tokio::test]
    async fn test_apply_counts_and_slices() {
        let repo = MemoryRepository::new();
        for (name, number) in [("red box", 1), ("Red hat", 2), ("blue box", 2)] {
            repo.create("acme", ThingInput::new(name, number)).await.unwrap();
        }

        let filters = FilterSet::from_params(&params(&[("number", "2"), ("sort", "-name")]));
        let view = filters.apply(&repo, RecordQuery::scoped("acme"));
        assert_eq!(view.count().await.unwrap(), 2);

        let items = view.slice(Pagination::new(0, 10)).await.unwrap();
        let names: Vec<_> = items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Red hat", "blue box"]);
    }
}
