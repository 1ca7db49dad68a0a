//! Sieve queries: filter, sort and paginate an in-memory collection
//!
//! Mirrors the `filters`, `sorts`, `page` and `pageSize` query parameters
//! used by the listing endpoints.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{compare, is_nullish};
use super::eval::resolve_field;
use super::filter_set::FilterSet;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a caller can request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Raw query-string parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SieveParams {
    pub filters: Option<String>,
    pub sorts: Option<String>,
    pub page: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

/// One sort key; a leading `-` in the query string sorts descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// Parses `-price,name` into sort keys, skipping blanks.
    pub fn parse(sorts: &str) -> Vec<SortSpec> {
        sorts
            .split(',')
            .map(str::trim)
            .filter_map(|term| {
                let (field, descending) = match term.strip_prefix('-') {
                    Some(field) => (field.trim(), true),
                    None => (term, false),
                };
                (!field.is_empty()).then(|| SortSpec {
                    field: field.to_string(),
                    descending,
                })
            })
            .collect()
    }

    /// Orders two records by this key. Nullish values sort last in either
    /// direction; values that cannot be ordered compare equal.
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let left = resolve_field(a, &self.field);
        let right = resolve_field(b, &self.field);

        match (is_nullish(left), is_nullish(right)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = match (left, right) {
                    (Some(l), Some(r)) => compare(l, r).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                if self.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    }
}

/// A full listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct SieveQuery {
    pub filters: FilterSet,
    pub sorts: Vec<SortSpec>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for SieveQuery {
    fn default() -> Self {
        Self {
            filters: FilterSet::default(),
            sorts: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SieveQuery {
    /// Builds a query from raw parameters. Page numbers below 1 become 1 and
    /// page sizes are clamped to `1..=MAX_PAGE_SIZE`.
    pub fn from_params(params: &SieveParams) -> Self {
        Self {
            filters: params
                .filters
                .as_deref()
                .map(FilterSet::parse)
                .unwrap_or_default(),
            sorts: params
                .sorts
                .as_deref()
                .map(SortSpec::parse)
                .unwrap_or_default(),
            page: params.page.unwrap_or(1).max(1),
            page_size: params
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Filters, sorts (stable, keys applied in order) and slices `records`.
    pub fn apply(&self, records: &[Value]) -> SievePage {
        let mut matched = self.filters.filter(records);

        if !self.sorts.is_empty() {
            matched.sort_by(|a, b| {
                self.sorts
                    .iter()
                    .map(|sort| sort.compare(a, b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let total = matched.len();
        let page_size = self.page_size.max(1);
        let items = matched
            .into_iter()
            .skip(self.page.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        SievePage {
            items,
            total,
            page: self.page,
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SievePage {
    pub items: Vec<Value>,
    /// Matching records before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Gaming Laptop", "price": 1200, "seller": {"rating": 4.1}}),
            json!({"id": 2, "name": "Office Laptop", "price": 450, "seller": {"rating": 4.8}}),
            json!({"id": 3, "name": "Laptop Sleeve", "price": 25}),
            json!({"id": 4, "name": "Desk Lamp", "price": 30, "seller": {"rating": 3.9}}),
            json!({"id": 5, "name": "laptop stand", "price": 45, "seller": {"rating": 4.8}}),
        ]
    }

    fn ids(page: &SievePage) -> Vec<i64> {
        page.items.iter().filter_map(|item| item["id"].as_i64()).collect()
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(
            SortSpec::parse("-price, name,,- "),
            vec![
                SortSpec {
                    field: "price".to_string(),
                    descending: true
                },
                SortSpec {
                    field: "name".to_string(),
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn test_filter_and_sort() {
        let query = SieveQuery {
            filters: FilterSet::parse("name@=*laptop"),
            sorts: SortSpec::parse("-price"),
            ..SieveQuery::default()
        };

        let page = query.apply(&products());
        assert_eq!(ids(&page), vec![1, 2, 5, 3]);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_nullish_sorts_last_both_directions() {
        let records = products();
        for sorts in ["seller.rating", "-seller.rating"] {
            let query = SieveQuery {
                sorts: SortSpec::parse(sorts),
                ..SieveQuery::default()
            };
            let page = query.apply(&records);
            assert_eq!(*ids(&page).last().unwrap(), 3, "sorts {}", sorts);
        }
    }

    #[test]
    fn test_multi_key_sort_is_stable() {
        let query = SieveQuery {
            sorts: SortSpec::parse("-seller.rating,price"),
            ..SieveQuery::default()
        };

        let page = query.apply(&products());
        assert_eq!(ids(&page), vec![5, 2, 1, 4, 3]);
    }

    #[test]
    fn test_pagination() {
        let query = SieveQuery {
            sorts: SortSpec::parse("id"),
            page: 2,
            page_size: 2,
            ..SieveQuery::default()
        };

        let page = query.apply(&products());
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let past_end = SieveQuery { page: 9, ..query }.apply(&products());
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[test]
    fn test_from_params_clamps() {
        let params = SieveParams {
            filters: Some("price>100".to_string()),
            sorts: None,
            page: Some(0),
            page_size: Some(10_000),
        };

        let query = SieveQuery::from_params(&params);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, MAX_PAGE_SIZE);
        assert_eq!(query.filters.conditions().len(), 1);

        let defaults = SieveQuery::from_params(&SieveParams::default());
        assert_eq!(defaults, SieveQuery::default());
    }

    #[test]
    fn test_unknown_operator_yields_empty_page() {
        let query = SieveQuery {
            filters: FilterSet::parse("name~=laptop"),
            ..SieveQuery::default()
        };

        let page = query.apply(&products());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
