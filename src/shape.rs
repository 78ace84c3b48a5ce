//! Post-fetch result shaping: the optional caller transform and flat mode.

use std::fmt;

use crate::entity::Row;
use crate::relations::{relation_keys, RelationNode};

/// Caller-supplied row transform applied before flattening.
pub type RowTransform = Box<dyn Fn(Vec<Row>) -> Vec<Row> + Send + Sync>;

/// Shaping options recognized by the orchestrator (§6).
pub struct ShapeOptions {
    /// Synthesize aliased projections for included relation attributes.
    pub auto_attributes: bool,
    /// Applied to the fetched rows before any flattening.
    pub transform: Option<RowTransform>,
    /// Strip top-level relation sub-objects from each row.
    pub flat: bool,
    /// Append relation columns to tabular exports.
    pub auto_include: bool,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            auto_attributes: true,
            transform: None,
            flat: true,
            auto_include: false,
        }
    }
}

impl fmt::Debug for ShapeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeOptions")
            .field("auto_attributes", &self.auto_attributes)
            .field("transform", &self.transform.is_some())
            .field("flat", &self.flat)
            .field("auto_include", &self.auto_include)
            .finish()
    }
}

/// Applies the transform, then strips relation sub-objects in flat mode (4.8).
///
/// The nested objects are only needed to seed attribute projection and the
/// export builder; once flattening is requested they are discarded, leaving
/// scalar and projected-alias fields.
pub fn shape_rows(mut rows: Vec<Row>, include: &[RelationNode], options: &ShapeOptions) -> Vec<Row> {
    if let Some(transform) = &options.transform {
        rows = transform(rows);
    }

    if options.flat && !rows.is_empty() {
        let keys = relation_keys(include);
        for row in &mut rows {
            for key in &keys {
                row.remove(key);
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().unwrap().clone()
    }

    fn author_include() -> Vec<RelationNode> {
        vec![RelationNode {
            entity: "Author".to_string(),
            table: None,
            alias: None,
            join_on: None,
            attributes: Vec::new(),
            where_clause: None,
            children: Vec::new(),
        }]
    }

    #[test]
    fn test_flat_mode_strips_relation_objects() {
        let rows = vec![row(json!({
            "id": 1,
            "authorName": "borges",
            "author": {"name": "borges"}
        }))];
        let shaped = shape_rows(rows, &author_include(), &ShapeOptions::default());
        assert!(shaped[0].get("author").is_none());
        assert_eq!(shaped[0]["authorName"], json!("borges"));
        assert_eq!(shaped[0]["id"], json!(1));
    }

    #[test]
    fn test_flat_mode_disabled_keeps_relations() {
        let rows = vec![row(json!({"id": 1, "author": {"name": "x"}}))];
        let options = ShapeOptions {
            flat: false,
            ..Default::default()
        };
        let shaped = shape_rows(rows, &author_include(), &options);
        assert!(shaped[0].get("author").is_some());
    }

    #[test]
    fn test_transform_runs_before_flattening() {
        let rows = vec![row(json!({"id": 1, "author": {"name": "x"}}))];
        let options = ShapeOptions {
            transform: Some(Box::new(|mut rows: Vec<Row>| {
                for row in &mut rows {
                    row.insert("tagged".to_string(), json!(true));
                }
                rows
            })),
            ..Default::default()
        };
        let shaped = shape_rows(rows, &author_include(), &options);
        assert_eq!(shaped[0]["tagged"], json!(true));
        assert!(shaped[0].get("author").is_none());
    }
}
