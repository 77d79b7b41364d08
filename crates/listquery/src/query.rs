//! Query executor.
//!
//! Runs the fixed pipeline over a slice:
//!
//! ```text
//! text search → field filters → date range → sort → paginate
//! ```
//!
//! Each stage consumes the previous stage's output. The input is never
//! modified; results hold references into it.

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::filter::{DateRange, FieldFilter, TextSearch};
use crate::ordering::stable_sort_by;
use crate::params::QueryParams;
use crate::record::Record;
use crate::result::{Page, QueryResult};
use crate::value::Value;

/// Runs a query over records that implement [`Record`].
///
/// # Example
///
/// ```
/// use listquery::{query, EngineConfig, QueryParams};
/// use serde_json::json;
///
/// let invoices = vec![
///     json!({"code": "A1", "name": "Alpha"}),
///     json!({"code": "B2", "name": "Beta"}),
///     json!({"code": "A3", "name": "Gamma"}),
/// ];
///
/// let params = QueryParams::new().set("q", "a").set("page", 1).set("limit", 2);
/// let config = EngineConfig::new().searchable(["code"]);
///
/// let result = query(&invoices, &params, &config);
/// assert_eq!(result.total, 2);
/// assert_eq!(result.items[0]["code"], "A1");
/// assert_eq!(result.items[1]["code"], "A3");
/// ```
pub fn query<'a, T: Record>(
    data: &'a [T],
    params: &QueryParams,
    config: &EngineConfig,
) -> QueryResult<&'a T> {
    query_with(data, params, config, T::accessor)
}

/// Like [`query`], but clones the page into an owned result.
pub fn query_cloned<T: Record + Clone>(
    data: &[T],
    params: &QueryParams,
    config: &EngineConfig,
) -> QueryResult<T> {
    query(data, params, config).cloned()
}

/// Runs a query using an explicit accessor function.
///
/// The accessor maps `(record, field name)` to a [`Value`], returning
/// [`Value::Undefined`] for fields the record lacks.
///
/// ```
/// use listquery::{query_with, EngineConfig, Number, QueryParams, Value};
///
/// struct Row { id: u32, parent: Option<u32> }
///
/// fn accessor<'a>(row: &'a Row, field: &str) -> Value<'a> {
///     match field {
///         "id" => Value::Number(Number::from(row.id)),
///         "parent" => row.parent.map_or(Value::Null, |p| Value::Number(Number::from(p))),
///         _ => Value::Undefined,
///     }
/// }
///
/// let rows = vec![
///     Row { id: 1, parent: Some(3) },
///     Row { id: 2, parent: None },
///     Row { id: 3, parent: Some(1) },
/// ];
/// let params = QueryParams::new().set("sort", "parent:desc");
///
/// let ids: Vec<u32> = query_with(&rows, &params, &EngineConfig::new(), accessor)
///     .items
///     .iter()
///     .map(|row| row.id)
///     .collect();
/// assert_eq!(ids, vec![1, 3, 2]);
/// ```
pub fn query_with<'a, T, F>(
    data: &'a [T],
    params: &QueryParams,
    config: &EngineConfig,
    accessor: F,
) -> QueryResult<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    let mut rows: Vec<&'a T> = data.iter().collect();

    if let Some(search) = TextSearch::from_params(params, config) {
        rows.retain(|item| search.matches(*item, &accessor));
        trace!(remaining = rows.len(), "text search applied");
    }

    let filters = FieldFilter::from_params(params);
    if !filters.is_empty() {
        rows.retain(|item| {
            filters
                .iter()
                .all(|filter| filter.matches(&accessor(*item, filter.field)))
        });
        trace!(
            filters = filters.len(),
            remaining = rows.len(),
            "field filters applied"
        );
    }

    if let Some((field, range)) = DateRange::from_params(params, config) {
        rows.retain(|item| range.contains(&accessor(*item, field)));
        trace!(field, remaining = rows.len(), "date range applied");
    }

    if let Some(spec) = params.sort_spec() {
        stable_sort_by(&mut rows, &mut |a: &&'a T, b: &&'a T| {
            spec.compare(&accessor(*a, &spec.field), &accessor(*b, &spec.field))
        });
        trace!(sort = %spec, "rows sorted");
    } else if let Some(raw) = params.get(crate::params::KEY_SORT) {
        trace!(?raw, "ignoring unusable sort parameter");
    }

    let page = Page::from_params(params);
    let total = rows.len();
    let items = page.slice(rows);

    debug!(
        input = data.len(),
        total,
        page = page.page,
        limit = page.limit,
        returned = items.len(),
        "list query executed"
    );

    QueryResult {
        items,
        total,
        page: page.page,
        limit: page.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: u32,
        customer: String,
        status: &'static str,
        placed_on: &'static str,
        amount: Option<f64>,
    }

    impl Record for Order {
        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "id" => Value::Number(Number::from(self.id)),
                "customer" => Value::String(&self.customer),
                "status" => Value::String(self.status),
                "placed_on" => Value::String(self.placed_on),
                "amount" => self.amount.map_or(Value::Null, |a| Value::Number(Number::from(a))),
                _ => Value::Undefined,
            }
        }
    }

    fn order(
        id: u32,
        customer: &str,
        status: &'static str,
        placed_on: &'static str,
        amount: Option<f64>,
    ) -> Order {
        Order {
            id,
            customer: customer.to_string(),
            status,
            placed_on,
            amount,
        }
    }

    fn sample_orders() -> Vec<Order> {
        vec![
            order(1, "Acme Corp", "PAID", "2024-01-05", Some(120.0)),
            order(2, "Globex", "PENDING", "2024-01-12", Some(75.5)),
            order(3, "acme labs", "CANCELLED", "2024-01-20", None),
            order(4, "Initech", "PAID", "2024-02-02", Some(980.0)),
            order(5, "Umbrella", "PENDING", "garbage", Some(75.5)),
        ]
    }

    fn config() -> EngineConfig {
        EngineConfig::new()
            .searchable(["customer", "status"])
            .date_field("placed_on")
    }

    fn ids(result: &QueryResult<&Order>) -> Vec<u32> {
        result.items.iter().map(|o| o.id).collect()
    }

    #[test]
    fn empty_params_return_first_page_in_order() {
        let orders = sample_orders();
        let result = query(&orders, &QueryParams::new(), &config());

        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
        assert_eq!(result.total, 5);
        assert_eq!(result.page, 1);
        assert_eq!(result.limit, 20);
    }

    #[test]
    fn search_then_filter() {
        let orders = sample_orders();
        let params = QueryParams::new().set("q", "ACME").set("status", "paid");
        let result = query(&orders, &params, &config());

        assert_eq!(ids(&result), vec![1]);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn all_sentinel_disables_filter() {
        let orders = sample_orders();
        let params = QueryParams::new().set("status", "ALL");
        assert_eq!(query(&orders, &params, &config()).total, 5);
    }

    #[test]
    fn unknown_filter_field_fails_open() {
        let orders = sample_orders();
        let params = QueryParams::new().set("warehouse", "north");
        assert_eq!(query(&orders, &params, &config()).total, 5);
    }

    #[test]
    fn numeric_filter_from_string() {
        let orders = sample_orders();
        let params = QueryParams::new().set("amount", "75.5");
        assert_eq!(ids(&query(&orders, &params, &config())), vec![2, 5]);
    }

    #[test]
    fn date_range_excludes_unparseable() {
        let orders = sample_orders();
        let params = QueryParams::new().set("date_from", "2024-01-10");
        assert_eq!(ids(&query(&orders, &params, &config())), vec![2, 3, 4]);
    }

    #[test]
    fn date_range_ignored_without_date_field() {
        let orders = sample_orders();
        let params = QueryParams::new().set("date_from", "2024-01-10");
        let config = EngineConfig::new();
        assert_eq!(query(&orders, &params, &config).total, 5);
    }

    #[test]
    fn sort_desc_keeps_nulls_last() {
        let orders = sample_orders();
        let params = QueryParams::new().set("sort", "amount:desc");
        assert_eq!(ids(&query(&orders, &params, &config())), vec![4, 1, 2, 5, 3]);
    }

    #[test]
    fn sort_strings_locale_aware() {
        let orders = sample_orders();
        let params = QueryParams::new().set("sort", "customer");
        assert_eq!(ids(&query(&orders, &params, &config())), vec![1, 3, 2, 4, 5]);
    }

    #[test]
    fn sort_by_missing_field_keeps_order() {
        let orders = sample_orders();
        let params = QueryParams::new().set("sort", "nope:desc");
        assert_eq!(ids(&query(&orders, &params, &config())), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pagination_after_sort() {
        let orders = sample_orders();
        let params = QueryParams::new()
            .set("sort", "id:desc")
            .set("page", 2)
            .set("limit", 2);
        let result = query(&orders, &params, &config());

        assert_eq!(ids(&result), vec![3, 2]);
        assert_eq!(result.total, 5);
        assert_eq!(result.page, 2);
        assert_eq!(result.limit, 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let orders = sample_orders();
        let params = QueryParams::new().set("page", 9).set("limit", 2);
        let result = query(&orders, &params, &config());

        assert!(result.items.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(result.page, 9);
    }

    #[test]
    fn query_cloned_owns_items() {
        let orders = sample_orders();
        let params = QueryParams::new().set("status", "pending");
        let result = query_cloned(&orders, &params, &config());

        assert_eq!(result.items, vec![orders[1].clone(), orders[4].clone()]);
    }

    #[test]
    fn input_is_untouched() {
        let orders = sample_orders();
        let before = orders.clone();
        let params = QueryParams::new().set("sort", "amount").set("q", "a");
        let _ = query(&orders, &params, &config());
        assert_eq!(orders, before);
    }
}
