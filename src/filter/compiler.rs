//! Deduplicates and merges named filters from the two caller-supplied sources.

use std::collections::HashSet;

use super::{CompiledFilter, Filter};

/// Merges table-priority and column-priority filters into one canonical list.
///
/// Each source tracks seen names in its own set, so a table-sourced filter and
/// a column-sourced filter with the same name coexist in the output. When a
/// name repeats within a source, only values not already present are appended
/// to the first entry carrying that name, preserving order of first
/// appearance. Empty inputs yield an empty list.
pub fn compile_filters(table: &[Filter], column: &[Filter]) -> Vec<CompiledFilter> {
    let mut merged = Vec::new();
    let mut seen_table = HashSet::new();
    let mut seen_column = HashSet::new();

    for filter in table {
        add_or_update(filter, &mut merged, &mut seen_table, true);
    }
    for filter in column {
        add_or_update(filter, &mut merged, &mut seen_column, false);
    }

    merged
}

fn add_or_update(
    filter: &Filter,
    merged: &mut Vec<CompiledFilter>,
    seen: &mut HashSet<String>,
    priority: bool,
) {
    if seen.contains(&filter.name) {
        if let Some(existing) = merged.iter_mut().find(|f| f.name == filter.name) {
            for value in filter.values.iter() {
                if !existing.values.contains(value) {
                    existing.values.push(value.clone());
                }
            }
            return;
        }
    } else {
        seen.insert(filter.name.clone());
    }

    merged.push(CompiledFilter {
        name: filter.name.clone(),
        values: filter.values.clone(),
        operator: filter.operator,
        priority,
    });
}
