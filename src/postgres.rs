//! sqlx-backed store adapter: compiles a plan into one COUNT and one fetch
//! query against PostgreSQL.

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::entity::{FetchResult, QueryOptions, QueryableEntity, Row};
use crate::error::{QueryError, Result};
use crate::query_builder::{Join, OrderClause, OrderExpr, QueryBuilder};
use crate::relations::RelationNode;

/// A [`QueryableEntity`] over one PostgreSQL table.
///
/// Included relations become aliased LEFT JOINs following the `Parent->Child`
/// alias convention used by attribute projection and relation ordering. A node
/// carrying an attached predicate is promoted to an INNER JOIN with the
/// qualified fragment appended to its ON clause.
pub struct PgEntity {
    pool: PgPool,
    entity_name: String,
    table: String,
    date_only_columns: HashSet<String>,
}

impl PgEntity {
    pub fn new(pool: PgPool, entity_name: &str, table: &str) -> Self {
        Self {
            pool,
            entity_name: entity_name.to_string(),
            table: table.to_string(),
            date_only_columns: HashSet::new(),
        }
    }

    /// Declares which columns are date-only (no time component).
    pub fn with_date_only_columns(mut self, columns: &[&str]) -> Self {
        self.date_only_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Builds the fetch query for a plan. Separated from [`PgEntity`] so the
/// generated SQL can be inspected without a live pool.
pub fn plan_query(
    entity_name: &str,
    table: &str,
    options: &QueryOptions,
) -> Result<QueryBuilder> {
    let mut builder = QueryBuilder::new(&format!("{table} AS \"{entity_name}\""));

    if options.attributes.is_empty() {
        builder.push_select(format!("\"{entity_name}\".*"));
    } else {
        for attribute in &options.attributes {
            builder.push_select(format!("\"{entity_name}\".\"{attribute}\""));
        }
    }
    for projection in &options.projections {
        builder.push_select(projection.to_select_sql());
    }

    for node in &options.include {
        builder = add_join(builder, node, "")?;
    }

    // joined tables share column names with the base table, so top-level
    // predicates and plain sort columns are scoped to the entity alias
    if !options.where_clause.is_empty() {
        let mut clause = options.where_clause.clone();
        clause.qualify(entity_name);
        builder = builder.where_clause(clause);
    }
    for clause in &options.order {
        builder = builder.order(match &clause.expr {
            OrderExpr::Column(column) => OrderClause {
                expr: OrderExpr::Column(format!("\"{entity_name}\".\"{column}\"")),
                direction: clause.direction.clone(),
            },
            OrderExpr::Literal(_) => clause.clone(),
        });
    }
    Ok(builder.paginate(options.pagination))
}

fn add_join(mut builder: QueryBuilder, node: &RelationNode, prefix: &str) -> Result<QueryBuilder> {
    let model_name = node.alias.clone().unwrap_or_else(|| node.entity.clone());
    let path = if prefix.is_empty() {
        model_name
    } else {
        format!("{prefix}->{model_name}")
    };
    let table = node.table.clone().unwrap_or_else(|| node.entity.clone());
    let on = node.join_on.clone().ok_or_else(|| {
        QueryError::Configuration(format!(
            "relation '{}' has no join_on clause",
            node.entity
        ))
    })?;

    builder = builder.join(match &node.where_clause {
        Some(clause) => {
            let mut qualified = clause.clone();
            qualified.qualify(&path);
            Join::inner(&table, &path, &format!("{on} AND {}", qualified.to_sql()))
        }
        None => Join::left(&table, &path, &on),
    });

    for child in &node.children {
        builder = add_join(builder, child, &path)?;
    }
    Ok(builder)
}

#[async_trait]
impl QueryableEntity for PgEntity {
    fn entity_name(&self) -> &str {
        &self.entity_name
    }

    fn is_date_only(&self, column: &str) -> bool {
        self.date_only_columns.contains(column)
    }

    async fn find_and_count(&self, options: &QueryOptions) -> Result<FetchResult> {
        let builder = plan_query(&self.entity_name, &self.table, options)?;

        let count = builder.count(&self.pool).await?;
        let values = builder.fetch_rows(&self.pool).await?;
        let rows = values
            .into_iter()
            .map(|value| match value {
                Value::Object(map) => Ok(map),
                _ => Err(QueryError::MalformedRow),
            })
            .collect::<Result<Vec<Row>>>()?;

        Ok(FetchResult { count, rows })
    }
}
