use sqlx::PgPool;

use super::{Join, OrderClause, Pagination, WhereClause};

/// Assembles one SELECT statement (and its derived COUNT) from the compiled
/// plan parts: selection, joins, predicates, ordering, pagination.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    order_by: Vec<OrderClause>,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: Vec<String>) -> Self {
        self.select_fields = fields;
        self
    }

    /// Append one select field, replacing the `*` default on first use
    pub fn push_select(&mut self, field: String) {
        if self.select_fields == ["*"] {
            self.select_fields.clear();
        }
        self.select_fields.push(field);
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add an ORDER BY clause
    pub fn order(mut self, clause: OrderClause) -> Self {
        self.order_by.push(clause);
        self
    }

    /// Add pagination (LIMIT/OFFSET)
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let mut sql = String::new();

        sql.push_str("SELECT ");
        sql.push_str(&self.select_fields.join(", "));
        sql.push_str(&format!(" FROM {}", self.base_table));

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let order_parts: Vec<String> =
                self.order_by.iter().map(|clause| clause.to_sql()).collect();
            sql.push_str(&format!(" ORDER BY {}", order_parts.join(", ")));
        }

        if let Some(ref pagination) = self.pagination {
            sql.push_str(&pagination.to_sql());
        }

        sql
    }

    /// Build the matching COUNT query (no ordering, no pagination)
    pub fn build_count_sql(&self) -> String {
        let mut count_builder = self.clone();
        count_builder.select_fields = vec!["COUNT(*)".to_string()];
        count_builder.order_by.clear();
        count_builder.pagination = None;
        count_builder.build_sql()
    }

    /// Execute the fetch query, returning each row as one JSON object
    pub async fn fetch_rows(&self, pool: &PgPool) -> Result<Vec<serde_json::Value>, sqlx::Error> {
        let sql = format!("SELECT to_jsonb(q) FROM ({}) q", self.build_sql());
        sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .fetch_all(pool)
            .await
    }

    /// Execute the count query
    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&self.build_count_sql())
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::conditions::Condition;
    use crate::query_builder::order::OrderExpr;
    use serde_json::json;

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("sales AS \"Sale\"")
            .select(vec!["\"Sale\".\"id\"".to_string(), "\"Sale\".\"total\"".to_string()])
            .where_clause(WhereClause::and(vec![Condition::Compare {
                field: "\"Sale\".\"total\"".to_string(),
                operator: ">".to_string(),
                value: json!(100),
            }]))
            .order(OrderClause {
                expr: OrderExpr::Column("\"Sale\".\"id\"".to_string()),
                direction: "DESC".to_string(),
            })
            .paginate(Pagination::from_page(1, 10));

        let sql = query.build_sql();
        assert_eq!(
            sql,
            "SELECT \"Sale\".\"id\", \"Sale\".\"total\" FROM sales AS \"Sale\" \
             WHERE \"Sale\".\"total\" > 100 ORDER BY \"Sale\".\"id\" DESC LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn test_join_query_building() {
        let query = QueryBuilder::new("books AS \"Book\"").join(Join::left(
            "authors",
            "Author",
            "\"Author\".\"id\" = \"Book\".\"authorId\"",
        ));

        let sql = query.build_sql();
        assert!(sql.contains("LEFT JOIN authors AS \"Author\""));
    }

    #[test]
    fn test_count_sql_strips_order_and_pagination() {
        let query = QueryBuilder::new("sales")
            .order(OrderClause {
                expr: OrderExpr::Column("id".to_string()),
                direction: "ASC".to_string(),
            })
            .paginate(Pagination::from_page(3, 10));

        let sql = query.build_count_sql();
        assert_eq!(sql, "SELECT COUNT(*) FROM sales");
    }

    #[test]
    fn test_push_select_replaces_star_default() {
        let mut query = QueryBuilder::new("sales");
        query.push_select("id".to_string());
        query.push_select("total".to_string());
        assert_eq!(query.build_sql(), "SELECT id, total FROM sales");
    }
}
