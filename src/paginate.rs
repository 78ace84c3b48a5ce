//! The orchestrator: one call compiles filters, builds the plan, runs the
//! combined count-and-fetch, and shapes the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::entity::{QueryOptions, QueryableEntity, Row};
use crate::error::Result;
use crate::filter::{compile_filters, Filter, FilterSet, FilterValues};
use crate::naming::lower_first;
use crate::query_builder::dates::{
    date_condition, parse_timestampish, values_are_dates, DATE_INPUT_FORMAT,
};
use crate::query_builder::dispatch::append_condition;
use crate::query_builder::order::build_order;
use crate::query_builder::{PageEnvelope, Pagination, WhereClause};
use crate::relations::{attach_relation_condition, project_relation_attributes, RelationNode};
use crate::shape::{shape_rows, ShapeOptions};

/// Page selection parameters as they arrive on the wire.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default, alias = "numPage")]
    pub page: Option<i64>,
    #[serde(default, alias = "sizePage")]
    pub page_size: Option<i64>,
}

/// One page of shaped rows plus its paging envelope.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub list: Vec<Row>,
    pub paged: PageEnvelope,
}

/// Installs the default sort unless the caller supplied a usable one.
///
/// A missing, null, or empty sort key or direction invalidates the whole
/// description: both parts are replaced together, never mixed with caller
/// leftovers.
pub fn set_default_order(filters: &mut FilterSet, order_by: &str, direction: &str) {
    use crate::query_builder::order::{OrderKey, OrderSpec};

    let usable = filters.order_by.as_ref().is_some_and(|spec| {
        let key_usable = match &spec.order_by {
            Some(OrderKey::Column(name)) => !name.is_empty(),
            Some(OrderKey::Pairs(_)) => true,
            None => false,
        };
        key_usable && spec.direction.as_deref().is_some_and(|d| !d.is_empty())
    });

    if !usable {
        filters.order_by = Some(OrderSpec {
            order_by: Some(OrderKey::Column(order_by.to_string())),
            direction: Some(direction.to_string()),
        });
    }
}

/// Collapses a timestamp range filter on `createdAt`/`updatedAt` into a single
/// display-format date, so detection routes it to a date predicate.
pub fn normalize_timestamp_filter(filter: &mut Filter) {
    if filter.name != "createdAt" && filter.name != "updatedAt" {
        return;
    }
    let FilterValues::Many(values) = &filter.values else {
        return;
    };
    let Some(date) = values.first().and_then(parse_timestampish) else {
        return;
    };
    filter.values = FilterValues::One(Value::String(
        date.format(DATE_INPUT_FORMAT).to_string(),
    ));
}

/// The query engine. Stateless apart from its configuration; one instance
/// serves any number of entities.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: EngineConfig,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs one paginated, filtered, ordered query against an entity.
    ///
    /// Filters are compiled only when both sources are present. Dotted filter
    /// names are attached to the inclusion tree instead of the top-level
    /// predicate; date-shaped values bypass operator dispatch entirely.
    #[instrument(skip_all, fields(entity = entity.entity_name()))]
    pub async fn paginate_and_filter(
        &self,
        entity: &dyn QueryableEntity,
        params: PaginationParams,
        filters: &FilterSet,
        attributes: Vec<String>,
        mut include: Vec<RelationNode>,
        options: &ShapeOptions,
    ) -> Result<QueryResult> {
        let page = params.page.unwrap_or(self.config.default_page);
        let page_size = params.page_size.unwrap_or(self.config.default_page_size);

        let mut where_clause = WhereClause::and(Vec::new());
        if let (Some(table), Some(column)) = (&filters.filters_table, &filters.filters_column) {
            let compiled = compile_filters(table, column);
            debug!(filters = compiled.len(), "compiled filter set");
            for filter in &compiled {
                if filter.name.contains('.') {
                    attach_relation_condition(
                        &mut include,
                        &filter.name,
                        &filter.values,
                        filter.operator,
                    );
                } else if values_are_dates(&filter.values) {
                    // column types are declared under lower-first names even
                    // when the filter arrives capitalized
                    let date_only = entity.is_date_only(&lower_first(&filter.name));
                    where_clause.conditions.push(date_condition(
                        &filter.name,
                        &filter.values,
                        date_only,
                        &self.config.timezone,
                    ));
                } else {
                    append_condition(
                        &filter.name,
                        &filter.values,
                        filter.operator,
                        filter.priority,
                        &mut where_clause.conditions,
                    );
                }
            }
        }

        let mut ordering = filters.clone();
        set_default_order(
            &mut ordering,
            &self.config.default_order_by,
            &self.config.default_order_direction,
        );
        let mut order = Vec::new();
        if let Some(spec) = &ordering.order_by {
            build_order(spec, &include, &mut order);
        }

        let mut projections = Vec::new();
        if options.auto_attributes && !include.is_empty() {
            project_relation_attributes(&include, &mut projections);
        }

        let fetch = entity
            .find_and_count(&QueryOptions {
                pagination: Pagination::from_page(page, page_size),
                where_clause,
                order,
                attributes,
                projections,
                include: include.clone(),
            })
            .await?;

        debug!(count = fetch.count, rows = fetch.rows.len(), "fetched page");

        let shaped = shape_rows(fetch.rows, &include, options);
        let list = if fetch.count > 0 { shaped } else { Vec::new() };

        Ok(QueryResult {
            list,
            paged: PageEnvelope::new(page, page_size, fetch.count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOperator;
    use crate::query_builder::order::{OrderKey, OrderSpec};
    use serde_json::json;

    #[test]
    fn test_default_order_installed_when_absent() {
        let mut filters = FilterSet::default();
        set_default_order(&mut filters, "id", "ASC");
        let spec = filters.order_by.as_ref().unwrap();
        assert_eq!(spec.order_by, Some(OrderKey::Column("id".to_string())));
        assert_eq!(spec.direction.as_deref(), Some("ASC"));
    }

    #[test]
    fn test_partial_spec_is_replaced_whole() {
        // a usable key without a direction does not survive on its own
        let mut filters = FilterSet {
            order_by: Some(OrderSpec {
                order_by: Some(OrderKey::Column("total".to_string())),
                direction: None,
            }),
            ..Default::default()
        };
        set_default_order(&mut filters, "id", "ASC");
        let spec = filters.order_by.as_ref().unwrap();
        assert_eq!(spec.order_by, Some(OrderKey::Column("id".to_string())));
        assert_eq!(spec.direction.as_deref(), Some("ASC"));
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let mut filters = FilterSet {
            order_by: Some(OrderSpec {
                order_by: Some(OrderKey::Column(String::new())),
                direction: Some(String::new()),
            }),
            ..Default::default()
        };
        set_default_order(&mut filters, "id", "ASC");

        let mut order = Vec::new();
        build_order(filters.order_by.as_ref().unwrap(), &[], &mut order);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].to_sql(), "id ASC");
    }

    #[test]
    fn test_usable_spec_is_left_alone() {
        let mut filters = FilterSet {
            order_by: Some(OrderSpec {
                order_by: Some(OrderKey::Column("total".to_string())),
                direction: Some("desc".to_string()),
            }),
            ..Default::default()
        };
        set_default_order(&mut filters, "id", "ASC");
        let spec = filters.order_by.as_ref().unwrap();
        assert_eq!(spec.order_by, Some(OrderKey::Column("total".to_string())));
        assert_eq!(spec.direction.as_deref(), Some("desc"));
    }

    #[test]
    fn test_timestamp_range_collapses_to_display_date() {
        let mut filter = Filter {
            name: "createdAt".to_string(),
            values: FilterValues::Many(vec![
                json!("2024-02-01T10:30:00Z"),
                json!("2024-02-05T10:30:00Z"),
            ]),
            operator: FilterOperator::Equal,
        };
        normalize_timestamp_filter(&mut filter);
        assert_eq!(filter.values, FilterValues::One(json!("01/02/2024")));
    }

    #[test]
    fn test_timestamp_normalization_ignores_other_columns() {
        let mut filter = Filter {
            name: "saleDate".to_string(),
            values: FilterValues::Many(vec![json!("2024-02-01")]),
            operator: FilterOperator::Equal,
        };
        normalize_timestamp_filter(&mut filter);
        assert!(filter.values.is_many());
    }

    #[test]
    fn test_timestamp_normalization_ignores_scalars() {
        let mut filter = Filter {
            name: "createdAt".to_string(),
            values: FilterValues::One(json!("01/02/2024")),
            operator: FilterOperator::Equal,
        };
        normalize_timestamp_filter(&mut filter);
        assert_eq!(filter.values, FilterValues::One(json!("01/02/2024")));
    }

    #[test]
    fn test_pagination_params_accept_wire_aliases() {
        let params: PaginationParams =
            serde_json::from_value(json!({"numPage": 3, "sizePage": 25})).unwrap();
        assert_eq!(params.page, Some(3));
        assert_eq!(params.page_size, Some(25));
    }
}
