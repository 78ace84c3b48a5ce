//! The caller-declared inclusion tree and the operations that walk it:
//! relation-scoped predicate attachment and flat attribute projection.
//!
//! The engine owns its copy of the tree for the duration of one call and
//! augments that copy; caller structures are never mutated in place.

use serde::Deserialize;

use crate::filter::{FilterOperator, FilterValues};
use crate::naming::{capitalize_first, lower_first};
use crate::query_builder::conditions::WhereClause;
use crate::query_builder::dispatch::append_condition;

/// An attribute declared on an inclusion node: a plain column name or an
/// `(expression, alias)` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RelationAttribute {
    Aliased(String, String),
    Named(String),
}

impl RelationAttribute {
    /// The name the attribute surfaces under: the alias for pairs, the column
    /// name otherwise.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Aliased(_, alias) => alias,
            Self::Named(name) => name,
        }
    }
}

/// A node in the inclusion tree (§3).
///
/// `table` and `join_on` are consumed only by the store adapter; the engine
/// core needs just the entity name, alias, attributes, and children.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationNode {
    pub entity: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default, alias = "as")]
    pub alias: Option<String>,
    #[serde(default)]
    pub join_on: Option<String>,
    #[serde(default)]
    pub attributes: Vec<RelationAttribute>,
    #[serde(skip)]
    pub where_clause: Option<WhereClause>,
    #[serde(default, alias = "include")]
    pub children: Vec<RelationNode>,
}

impl RelationNode {
    /// The key this relation surfaces under in result rows: the declared
    /// alias, or the entity name with its first letter lowered.
    pub fn relation_key(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| lower_first(&self.entity))
    }

    /// Whether this node or any descendant declares the given alias.
    pub fn declares_alias(&self, name: &str) -> bool {
        self.alias.as_deref() == Some(name)
            || self.children.iter().any(|child| child.declares_alias(name))
    }
}

/// Top-level relation keys, used by flat mode and the export projector.
pub fn relation_keys(nodes: &[RelationNode]) -> Vec<String> {
    nodes.iter().map(RelationNode::relation_key).collect()
}

/// Attaches a relation-path filter to the matching node's own predicate (4.2).
///
/// The second-to-last path segment must match a node's relation key; the last
/// segment is the property filtered on. Every subtree is visited, so a path
/// may land on several nodes carrying the same key. Paths matching no node are
/// silently dropped; completeness of the inclusion tree is the caller's
/// responsibility.
pub fn attach_relation_condition(
    nodes: &mut [RelationNode],
    name: &str,
    values: &FilterValues,
    operator: FilterOperator,
) {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() < 2 {
        return;
    }
    let target = segments[segments.len() - 2];
    let property = segments[segments.len() - 1];

    for node in nodes {
        attach_to_node(node, target, property, values, operator);
    }
}

fn attach_to_node(
    node: &mut RelationNode,
    target: &str,
    property: &str,
    values: &FilterValues,
    operator: FilterOperator,
) {
    if node.relation_key() == target {
        let clause = node
            .where_clause
            .get_or_insert_with(|| WhereClause::and(Vec::new()));
        append_condition(property, values, operator, true, &mut clause.conditions);
    }

    for child in &mut node.children {
        attach_to_node(child, target, property, values, operator);
    }
}

/// A projected column carried into the flat row under a collision-resistant
/// alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub expression: String,
    pub alias: String,
}

impl Projection {
    pub fn to_select_sql(&self) -> String {
        format!("{} AS \"{}\"", self.expression, self.alias)
    }
}

/// Walks the inclusion tree and synthesizes aliased projections (4.6).
///
/// Each attribute of each node becomes `"<relationKey><CapitalizedAttribute>"`
/// referencing the qualified column, with ancestor paths joined by `->` for
/// nested nodes.
pub fn project_relation_attributes(nodes: &[RelationNode], attributes: &mut Vec<Projection>) {
    for node in nodes {
        project_node(node, "", attributes);
    }
}

fn project_node(node: &RelationNode, prefix: &str, attributes: &mut Vec<Projection>) {
    let model_name = node.alias.clone().unwrap_or_else(|| node.entity.clone());

    for attribute in &node.attributes {
        let column = capitalize_first(attribute.display_name());
        let alias = format!("{}{}", node.relation_key(), column);
        let expression = if prefix.is_empty() {
            format!("\"{model_name}\".\"{column}\"")
        } else {
            format!("\"{prefix}->{model_name}\".\"{column}\"")
        };
        attributes.push(Projection { expression, alias });
    }

    let sub_prefix = if prefix.is_empty() {
        model_name
    } else {
        format!("{prefix}->{model_name}")
    };
    for child in &node.children {
        project_node(child, &sub_prefix, attributes);
    }
}
