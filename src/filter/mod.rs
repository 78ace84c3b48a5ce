//! Filter boundary types and the two-source filter compiler.
//!
//! Callers supply named filters from two independent sources (table-level and
//! column-level). [`compile_filters`] merges them into one canonical list;
//! each compiled filter later produces exactly one predicate fragment.

pub mod compiler;
pub mod operator;

pub use compiler::compile_filters;
pub use operator::FilterOperator;

use serde::Deserialize;
use serde_json::Value;

use crate::query_builder::order::OrderSpec;

/// A single scalar comparison value or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValues {
    Many(Vec<Value>),
    One(Value),
}

impl FilterValues {
    /// Iterates the values, treating a scalar as a one-element sequence.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        match self {
            Self::Many(values) => values.iter(),
            Self::One(value) => std::slice::from_ref(value).iter(),
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.iter().any(|v| v == value)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Many(values) => values.len(),
            Self::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a value, promoting a scalar to a sequence when necessary.
    pub fn push(&mut self, value: Value) {
        match self {
            Self::Many(values) => values.push(value),
            Self::One(existing) => {
                *self = Self::Many(vec![existing.take(), value]);
            }
        }
    }
}

/// A named comparison request against one column or relation-qualified field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub name: String,
    pub values: FilterValues,
    pub operator: FilterOperator,
}

/// A filter tagged with its source priority after compilation.
///
/// Table-sourced filters carry `priority = true`, column-sourced ones `false`.
/// The flag selects the And/Or combinator inside the filter's own predicate
/// group; each group is single-element today, so the toggle is a seam for
/// future multi-predicate grouping rather than an observable behavior change.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub name: String,
    pub values: FilterValues,
    pub operator: FilterOperator,
    pub priority: bool,
}

/// The full filter/order description supplied by the caller.
///
/// Filters are compiled only when both sources are present, matching the
/// upstream contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default)]
    pub filters_table: Option<Vec<Filter>>,
    #[serde(default)]
    pub filters_column: Option<Vec<Filter>>,
    #[serde(default)]
    pub order_by: Option<OrderSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_deserialize_scalar_and_list() {
        let one: FilterValues = serde_json::from_value(json!("alice")).unwrap();
        assert!(!one.is_many());
        assert_eq!(one.len(), 1);

        let many: FilterValues = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert!(many.is_many());
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_push_promotes_scalar() {
        let mut values = FilterValues::One(json!(1));
        values.push(json!(2));
        assert_eq!(values, FilterValues::Many(vec![json!(1), json!(2)]));
    }

    #[test]
    fn test_filter_deserializes_numeric_operator() {
        let filter: Filter =
            serde_json::from_value(json!({"name": "status", "values": ["open"], "operator": 0}))
                .unwrap();
        assert_eq!(filter.operator, FilterOperator::Equal);
    }
}
