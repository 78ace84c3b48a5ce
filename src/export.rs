//! Tabular export projection, independent of pagination (4.9).
//!
//! Derives the flat scalar column set from the first row, translates column
//! names through a header-lookup table, and concatenates relation attribute
//! values into single export cells.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::entity::Row;
use crate::naming::lower_first;
use crate::relations::{relation_keys, RelationNode};
use crate::shape::ShapeOptions;

/// Column header translations keyed by raw column or relation-key name.
pub type HeaderMap = HashMap<String, String>;

const EXPORT_COLUMN_WIDTH: u32 = 20;

/// One export column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    pub header: String,
    pub key: String,
    pub width: u32,
}

/// Flattened tabular export: column descriptors plus per-row records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TabularExport {
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<Row>,
}

/// Builds export columns and rows from fetched rows and the inclusion tree.
///
/// Empty input yields an empty export. Relation columns and cells are added
/// only when `auto_include` is set.
pub fn build_tabular_export(
    headers: &HeaderMap,
    rows: &[Row],
    include: &[RelationNode],
    options: &ShapeOptions,
) -> TabularExport {
    let Some(first) = rows.first() else {
        return TabularExport::default();
    };

    let relation_key_set = relation_keys(include);
    let attribute_keys: Vec<String> = first
        .keys()
        .filter(|key| !relation_key_set.contains(key))
        .cloned()
        .collect();

    TabularExport {
        columns: export_columns(&attribute_keys, include, headers, options),
        rows: export_rows(rows, &attribute_keys, include, options),
    }
}

fn header_for(headers: &HeaderMap, key: &str) -> String {
    headers
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
        .to_uppercase()
}

fn export_columns(
    attribute_keys: &[String],
    include: &[RelationNode],
    headers: &HeaderMap,
    options: &ShapeOptions,
) -> Vec<ExportColumn> {
    let mut columns: Vec<ExportColumn> = attribute_keys
        .iter()
        .map(|key| ExportColumn {
            header: header_for(headers, key),
            key: key.clone(),
            width: EXPORT_COLUMN_WIDTH,
        })
        .collect();

    if options.auto_include {
        for node in include {
            push_relation_columns(node, headers, &mut columns);
        }
    }

    columns
}

fn push_relation_columns(node: &RelationNode, headers: &HeaderMap, columns: &mut Vec<ExportColumn>) {
    let relation_key = node.relation_key();
    if !node.attributes.is_empty() {
        columns.push(ExportColumn {
            header: header_for(headers, &relation_key),
            key: relation_key,
            width: EXPORT_COLUMN_WIDTH,
        });
    }

    for child in &node.children {
        push_relation_columns(child, headers, columns);
    }
}

fn export_rows(
    records: &[Row],
    attribute_keys: &[String],
    include: &[RelationNode],
    options: &ShapeOptions,
) -> Vec<Row> {
    records
        .iter()
        .map(|record| {
            let mut row = Row::new();
            for key in attribute_keys {
                row.insert(key.clone(), record.get(key).cloned().unwrap_or(Value::Null));
            }
            if options.auto_include {
                for node in include {
                    push_relation_cell(record, node, &mut row);
                }
            }
            row
        })
        .collect()
}

fn push_relation_cell(record: &Row, node: &RelationNode, row: &mut Row) {
    // relation data is looked up under the alias or the entity name as-is,
    // while the cell is written under the alias or the lowered entity name
    let lookup_key = node.alias.clone().unwrap_or_else(|| node.entity.clone());

    let Some(Value::Object(relation_data)) = record.get(&lookup_key) else {
        return;
    };

    if !node.attributes.is_empty() {
        let concatenated = node
            .attributes
            .iter()
            .map(|attribute| cell_text(relation_data.get(attribute.display_name())))
            .collect::<Vec<_>>()
            .join(" - ");
        let write_key = node
            .alias
            .clone()
            .unwrap_or_else(|| lower_first(&node.entity));
        row.insert(write_key, Value::String(concatenated));
    }

    for child in &node.children {
        push_relation_cell(relation_data, child, row);
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::RelationAttribute;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().unwrap().clone()
    }

    fn author_node(attributes: Vec<&str>) -> RelationNode {
        RelationNode {
            entity: "Author".to_string(),
            table: None,
            alias: None,
            join_on: None,
            attributes: attributes
                .into_iter()
                .map(|a| RelationAttribute::Named(a.to_string()))
                .collect(),
            where_clause: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_empty_rows_yield_empty_export() {
        let export =
            build_tabular_export(&HeaderMap::new(), &[], &[], &ShapeOptions::default());
        assert!(export.columns.is_empty());
        assert!(export.rows.is_empty());
    }

    #[test]
    fn test_columns_translate_headers_and_fall_back() {
        let mut headers = HeaderMap::new();
        headers.insert("id".to_string(), "Identifier".to_string());
        let rows = vec![row(json!({"id": 1, "total": 7}))];
        let export = build_tabular_export(&headers, &rows, &[], &ShapeOptions::default());

        assert_eq!(
            export.columns,
            vec![
                ExportColumn {
                    header: "IDENTIFIER".to_string(),
                    key: "id".to_string(),
                    width: 20
                },
                ExportColumn {
                    header: "TOTAL".to_string(),
                    key: "total".to_string(),
                    width: 20
                },
            ]
        );
    }

    #[test]
    fn test_relation_keys_excluded_from_scalar_columns() {
        let include = vec![author_node(vec!["name"])];
        let rows = vec![row(json!({"id": 1, "author": {"name": "x"}}))];
        let export =
            build_tabular_export(&HeaderMap::new(), &rows, &include, &ShapeOptions::default());
        assert_eq!(export.columns.len(), 1);
        assert_eq!(export.columns[0].key, "id");
    }

    #[test]
    fn test_relation_cell_concatenates_attributes() {
        let mut node = author_node(vec!["name", "email"]);
        node.alias = Some("author".to_string());
        let options = ShapeOptions {
            auto_include: true,
            ..Default::default()
        };
        let rows = vec![row(json!({
            "id": 1,
            "author": {"name": "borges", "email": "jlb@example.com"}
        }))];
        let export = build_tabular_export(&HeaderMap::new(), &rows, &[node], &options);

        assert_eq!(export.columns.len(), 2);
        assert_eq!(export.columns[1].key, "author");
        assert_eq!(
            export.rows[0]["author"],
            json!("borges - jlb@example.com")
        );
    }

    #[test]
    fn test_nested_relation_cells_recurse() {
        let mut author = author_node(vec!["name"]);
        author.alias = Some("author".to_string());
        author.children.push(RelationNode {
            entity: "Country".to_string(),
            ..author_node(vec!["code"])
        });
        let options = ShapeOptions {
            auto_include: true,
            ..Default::default()
        };
        let rows = vec![row(json!({
            "id": 1,
            "author": {"name": "x", "Country": {"code": "AR"}}
        }))];
        let export = build_tabular_export(&HeaderMap::new(), &rows, &[author], &options);
        assert_eq!(export.rows[0]["author"], json!("x"));
        assert_eq!(export.rows[0]["country"], json!("AR"));
    }

    #[test]
    fn test_null_attribute_renders_empty_cell() {
        let mut node = author_node(vec!["name", "email"]);
        node.alias = Some("author".to_string());
        let options = ShapeOptions {
            auto_include: true,
            ..Default::default()
        };
        let rows = vec![row(json!({"id": 1, "author": {"name": "x", "email": null}}))];
        let export = build_tabular_export(&HeaderMap::new(), &rows, &[node], &options);
        assert_eq!(export.rows[0]["author"], json!("x - "));
    }

    #[test]
    fn test_unaliased_lookup_uses_entity_name_as_is() {
        // without an alias, cell data is looked up under the entity name but
        // written (and excluded from scalar columns) under the lowered key
        let include = vec![author_node(vec!["name"])];
        let options = ShapeOptions {
            auto_include: true,
            ..Default::default()
        };
        let rows = vec![row(json!({"id": 1, "Author": {"name": "x"}}))];
        let export = build_tabular_export(&HeaderMap::new(), &rows, &include, &options);

        assert_eq!(export.rows[0]["author"], json!("x"));
        assert!(export.columns.iter().any(|c| c.key == "Author"));
        assert!(export.columns.iter().any(|c| c.key == "author"));
    }
}
