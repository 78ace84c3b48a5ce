//! Ordering clause construction, including relation-qualified sort keys.

use serde::Deserialize;

use crate::naming::capitalize_first;
use crate::relations::RelationNode;

/// Sort key: a single column name (possibly dotted) or explicit
/// `[column, direction]` pairs appended verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrderKey {
    Pairs(Vec<(String, String)>),
    Column(String),
}

/// Ordering description supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    #[serde(default)]
    pub order_by: Option<OrderKey>,
    #[serde(default, alias = "direcOrder")]
    pub direction: Option<String>,
}

/// One ORDER BY clause: a plain column or a pre-qualified literal reference.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderClause {
    pub expr: OrderExpr,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderExpr {
    Column(String),
    Literal(String),
}

impl OrderClause {
    pub fn to_sql(&self) -> String {
        match &self.expr {
            OrderExpr::Column(column) => format!("{} {}", column, self.direction),
            OrderExpr::Literal(literal) => format!("{} {}", literal, self.direction),
        }
    }
}

/// Appends ordering clauses for the given description (4.4).
///
/// Requires both a sort key and a direction; otherwise no clause is added and
/// the caller's upstream default applies. Directions are upper-cased.
pub fn build_order(spec: &OrderSpec, include: &[RelationNode], order: &mut Vec<OrderClause>) {
    let (Some(key), Some(direction)) = (&spec.order_by, &spec.direction) else {
        return;
    };
    if direction.is_empty() {
        return;
    }

    match key {
        OrderKey::Column(name) if name.contains('.') => {
            order.push(relation_order(name, direction, include));
        }
        OrderKey::Pairs(pairs) => {
            order.extend(pairs.iter().map(|(column, dir)| OrderClause {
                expr: OrderExpr::Column(column.clone()),
                direction: dir.to_uppercase(),
            }));
        }
        OrderKey::Column(name) => {
            if name.is_empty() {
                return;
            }
            order.push(OrderClause {
                expr: OrderExpr::Column(name.clone()),
                direction: direction.to_uppercase(),
            });
        }
    }
}

/// Resolves a dotted sort key into a qualified literal reference (4.5).
///
/// The last segment is the column; each hop keeps its name when some node in
/// the inclusion tree declares that alias, and otherwise falls back to the
/// capitalized entity-name convention.
fn relation_order(key: &str, direction: &str, include: &[RelationNode]) -> OrderClause {
    let mut segments: Vec<String> = key.split('.').map(str::to_string).collect();
    let column = segments.pop().unwrap_or_default();

    for segment in &mut segments {
        let declared = include.iter().any(|node| node.declares_alias(segment));
        if !declared {
            *segment = capitalize_first(segment);
        }
    }

    let literal = format!(
        "\"{}\".\"{}\"",
        segments.join("->"),
        capitalize_first(&column)
    );
    OrderClause {
        expr: OrderExpr::Literal(literal),
        direction: direction.to_uppercase(),
    }
}
