//! Operator dispatch: one predicate fragment per compiled filter.
//!
//! Every filter appends exactly one [`Condition`] to the accumulating
//! AND-combined list. Plain comparisons (codes 1 through 4) and the
//! array-column tests (codes 12 and 13) append bare conditions; the remaining
//! operators wrap their fragment in a group whose combinator follows the
//! filter's priority flag (And when table-sourced, Or when column-sourced).

use serde_json::Value;

use super::conditions::{Condition, LogicalOperator, WhereClause};
use crate::filter::{FilterOperator, FilterValues};
use crate::naming::capitalize_first;

/// Builds the predicate fragment for one filter and appends it to `and_list`.
pub fn append_condition(
    field: &str,
    values: &FilterValues,
    operator: FilterOperator,
    priority: bool,
    and_list: &mut Vec<Condition>,
) {
    let combinator = if priority {
        LogicalOperator::And
    } else {
        LogicalOperator::Or
    };

    match operator {
        FilterOperator::Equal => and_list.push(equal_fragment(field, values, combinator)),
        FilterOperator::NotEqual => and_list.push(compare(field, "<>", values)),
        FilterOperator::LessThan => and_list.push(compare(field, "<", values)),
        FilterOperator::LessThanOrEqual => and_list.push(compare(field, "<=", values)),
        FilterOperator::GreaterThan => and_list.push(compare(field, ">", values)),
        FilterOperator::GreaterThanOrEqual => {
            and_list.push(greater_or_equal_fragment(field, values, combinator));
        }
        FilterOperator::Contains => {
            and_list.push(like_fragment(field, values, combinator, "%{}%", false));
        }
        FilterOperator::NotContains => {
            and_list.push(like_fragment(field, values, combinator, "%{}%", true));
        }
        FilterOperator::StartsWith => {
            and_list.push(like_fragment(field, values, combinator, "{}%", false));
        }
        FilterOperator::NotStartsWith => {
            and_list.push(like_fragment(field, values, combinator, "{}%", true));
        }
        FilterOperator::EndsWith => {
            and_list.push(like_fragment(field, values, combinator, "%{}", false));
        }
        FilterOperator::NotEndsWith => {
            and_list.push(like_fragment(field, values, combinator, "%{}", true));
        }
        FilterOperator::ArrayContains => and_list.push(Condition::ArrayContains {
            field: field.to_string(),
            values: to_vec(values),
        }),
        FilterOperator::ArrayOverlap => and_list.push(Condition::ArrayAny {
            field: field.to_string(),
            values: to_vec(values),
        }),
        FilterOperator::SerializedContains => {
            and_list.push(serialized_contains_fragment(field, values));
        }
        FilterOperator::Custom => and_list.push(custom_fragment(values)),
        FilterOperator::Fallback => and_list.push(fallback_fragment(field, values, combinator)),
    }
}

fn group(combinator: LogicalOperator, conditions: Vec<Condition>) -> Condition {
    Condition::Group(Box::new(WhereClause {
        conditions,
        operator: combinator,
    }))
}

/// Renders a value for pattern interpolation; strings keep their content,
/// everything else uses its JSON text.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_vec(values: &FilterValues) -> Vec<Value> {
    values.iter().cloned().collect()
}

/// Single comparison value: a scalar stays as-is, a sequence is carried whole.
fn scalar(values: &FilterValues) -> Value {
    match values {
        FilterValues::One(value) => value.clone(),
        FilterValues::Many(list) => Value::Array(list.clone()),
    }
}

fn compare(field: &str, operator: &str, values: &FilterValues) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        operator: operator.to_string(),
        value: scalar(values),
    }
}

/// Code 0: direct equality, or IN for more than one value.
fn equal_fragment(field: &str, values: &FilterValues, combinator: LogicalOperator) -> Condition {
    let inner = match values {
        FilterValues::Many(list) if list.len() > 1 => Condition::In {
            field: field.to_string(),
            values: list.clone(),
        },
        FilterValues::Many(list) => Condition::Compare {
            field: field.to_string(),
            operator: "=".to_string(),
            value: list.first().cloned().unwrap_or(Value::Null),
        },
        FilterValues::One(value) => Condition::Compare {
            field: field.to_string(),
            operator: "=".to_string(),
            value: value.clone(),
        },
    };
    group(combinator, vec![inner])
}

/// Code 5: `>= ANY` over a sequence; a single value adds the not-null guard.
fn greater_or_equal_fragment(
    field: &str,
    values: &FilterValues,
    combinator: LogicalOperator,
) -> Condition {
    match values {
        FilterValues::Many(list) => group(
            combinator,
            vec![Condition::GteAny {
                field: field.to_string(),
                values: list.clone(),
            }],
        ),
        FilterValues::One(value) => group(
            LogicalOperator::Or,
            vec![group(
                LogicalOperator::And,
                vec![
                    Condition::Compare {
                        field: field.to_string(),
                        operator: ">=".to_string(),
                        value: value.clone(),
                    },
                    Condition::IsNotNull {
                        field: field.to_string(),
                    },
                ],
            )],
        ),
    }
}

/// Codes 6 through 11: one ILIKE per value, OR-joined when there are several.
fn like_fragment(
    field: &str,
    values: &FilterValues,
    combinator: LogicalOperator,
    template: &str,
    negated: bool,
) -> Condition {
    let like = |value: &Value| {
        let pattern = template.replacen("{}", &text(value), 1);
        if negated {
            Condition::NotILike {
                field: field.to_string(),
                pattern,
            }
        } else {
            Condition::ILike {
                field: field.to_string(),
                pattern,
            }
        }
    };

    let inner = match values {
        FilterValues::Many(list) if list.len() > 1 => group(
            LogicalOperator::Or,
            list.iter().map(like).collect(),
        ),
        FilterValues::Many(list) => like(list.first().unwrap_or(&Value::Null)),
        FilterValues::One(value) => like(value),
    };
    group(combinator, vec![inner])
}

/// Code 14: raw substring tests against the column's textual serialization,
/// always OR-combined. The column reference follows the capitalized-identifier
/// convention of the backing schema.
fn serialized_contains_fragment(field: &str, values: &FilterValues) -> Condition {
    let column = capitalize_first(field);
    let raws = values
        .iter()
        .map(|value| Condition::Raw {
            sql: format!(
                "\"{column}\"::text LIKE '%{}%'",
                text(value).replace('\'', "''")
            ),
        })
        .collect();
    group(LogicalOperator::Or, raws)
}

/// Code 15: caller-supplied raw predicate fragments, spliced OR-combined.
fn custom_fragment(values: &FilterValues) -> Condition {
    let raws = values
        .iter()
        .map(|value| Condition::Raw { sql: text(value) })
        .collect();
    group(LogicalOperator::Or, raws)
}

/// Unknown operator codes: substring match, or IN for more than one value.
fn fallback_fragment(field: &str, values: &FilterValues, combinator: LogicalOperator) -> Condition {
    let inner = match values {
        FilterValues::Many(list) if list.len() > 1 => Condition::In {
            field: field.to_string(),
            values: list.clone(),
        },
        FilterValues::Many(list) => Condition::ILike {
            field: field.to_string(),
            pattern: format!("%{}%", text(list.first().unwrap_or(&Value::Null))),
        },
        FilterValues::One(value) => Condition::ILike {
            field: field.to_string(),
            pattern: format!("%{}%", text(value)),
        },
    };
    group(combinator, vec![inner])
}
