//! Query parameters, filtering, sorting and pagination for list endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Query parameters for pagination and filtering
///
/// ```text
/// GET /api/v1/stocks?page=2&limit=10
/// GET /api/v1/orders?filter={"status": "pending"}&sort=grand_total:desc
/// GET /api/v1/stocks?filter={"orderable_quantity>": 0}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Filters as a JSON object; keys may end with `>`, `<`, `>=`, `<=`
    pub filter: Option<String>,

    /// `field`, `field:asc` or `field:desc`
    pub sort: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// Filter, sort and paginate `items`
    pub fn apply<T: Queryable + Serialize>(&self, mut items: Vec<T>) -> PaginatedResponse<T> {
        if let Some(filter) = self.filter_value()
            && let Some(obj) = filter.as_object()
        {
            for (key, value) in obj {
                items.retain(|item| item.matches(key, value));
            }
        }

        if let Some(sort) = &self.sort {
            let (field, descending) = match sort.split_once(':') {
                Some((field, dir)) => (field, dir.eq_ignore_ascii_case("desc")),
                None => (sort.as_str(), false),
            };
            items.sort_by(|a, b| {
                let ord = a.compare(b, field).unwrap_or(Ordering::Equal);
                if descending { ord.reverse() } else { ord }
            });
        }

        let page = self.page();
        let limit = self.limit();
        let total = items.len();
        let data = items
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Entities that can be filtered and sorted by field name
pub trait Queryable {
    /// Whether the entity satisfies one filter entry
    ///
    /// Unknown keys match everything.
    fn matches(&self, key: &str, value: &Value) -> bool;

    /// Compare two entities by `field`; `None` for unknown fields
    fn compare(&self, other: &Self, field: &str) -> Option<Ordering>;
}

/// Compare a numeric field against a filter key that may carry an operator suffix
///
/// Returns `None` when `key` is not about `field`.
pub fn numeric_filter(key: &str, field: &str, actual: f64, value: &Value) -> Option<bool> {
    let op = key.strip_prefix(field)?;
    let expected = value.as_f64()?;
    match op {
        "" => Some(actual == expected),
        ">" => Some(actual > expected),
        "<" => Some(actual < expected),
        ">=" => Some(actual >= expected),
        "<=" => Some(actual <= expected),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub limit: usize,
    /// Total number of items after filters
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct Row {
        name: &'static str,
        qty: u32,
    }

    impl Queryable for Row {
        fn matches(&self, key: &str, value: &Value) -> bool {
            if key == "name" {
                return value.as_str() == Some(self.name);
            }
            numeric_filter(key, "qty", self.qty as f64, value).unwrap_or(true)
        }

        fn compare(&self, other: &Self, field: &str) -> Option<Ordering> {
            match field {
                "qty" => Some(self.qty.cmp(&other.qty)),
                "name" => Some(self.name.cmp(other.name)),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "a", qty: 5 },
            Row { name: "b", qty: 0 },
            Row { name: "c", qty: 12 },
        ]
    }

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_partial_query_keeps_defaults() {
        let params: QueryParams =
            serde_json::from_value(serde_json::json!({ "page": 3 })).unwrap();
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 20);
        assert!(params.filter.is_none());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_apply_filter_and_sort() {
        let params = QueryParams {
            page: 1,
            limit: 20,
            filter: Some(json!({"qty>": 0}).to_string()),
            sort: Some("qty:desc".to_string()),
        };
        let page = params.apply(rows());
        let names: Vec<_> = page.data.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(page.pagination.total, 2);
    }

    #[test]
    fn test_apply_paginates() {
        let params = QueryParams {
            page: 2,
            limit: 2,
            filter: None,
            sort: Some("name".to_string()),
        };
        let page = params.apply(rows());
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "c");
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_numeric_filter_ignores_other_fields() {
        assert_eq!(numeric_filter("price>", "qty", 1.0, &json!(0)), None);
        assert_eq!(numeric_filter("qty>=", "qty", 1.0, &json!(1)), Some(true));
    }
}
