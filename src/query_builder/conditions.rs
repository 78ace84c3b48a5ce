use serde_json::Value;

/// A single predicate fragment combinable into the query's WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Plain comparison: `field <op> value`
    Compare {
        field: String,
        operator: String,
        value: Value,
    },
    /// Set membership: `field IN (...)`
    In { field: String, values: Vec<Value> },
    /// Case-insensitive pattern match: `field ILIKE 'pattern'`
    ILike { field: String, pattern: String },
    /// Negated pattern match: `field NOT ILIKE 'pattern'`
    NotILike { field: String, pattern: String },
    /// Set-membership style comparison: `field >= ANY (ARRAY[...])`
    GteAny { field: String, values: Vec<Value> },
    /// Array-typed column containment: `field @> ARRAY[...]`
    ArrayContains { field: String, values: Vec<Value> },
    /// Array-typed column overlap: `field = ANY (ARRAY[...])`
    ArrayAny { field: String, values: Vec<Value> },
    IsNotNull { field: String },
    /// Raw SQL spliced verbatim
    Raw { sql: String },
    /// Nested And/Or group
    Group(Box<WhereClause>),
}

impl Condition {
    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Compare {
                field,
                operator,
                value,
            } => {
                format!("{} {} {}", field, operator, format_value(value))
            }
            Condition::In { field, values } => {
                format!("{field} IN ({})", format_value_list(values))
            }
            Condition::ILike { field, pattern } => {
                format!(
                    "{field} ILIKE {}",
                    format_value(&Value::String(pattern.clone()))
                )
            }
            Condition::NotILike { field, pattern } => {
                format!(
                    "{field} NOT ILIKE {}",
                    format_value(&Value::String(pattern.clone()))
                )
            }
            Condition::GteAny { field, values } => {
                format!("{field} >= ANY (ARRAY[{}])", format_value_list(values))
            }
            Condition::ArrayContains { field, values } => {
                format!("{field} @> ARRAY[{}]", format_value_list(values))
            }
            Condition::ArrayAny { field, values } => {
                format!("{field} = ANY (ARRAY[{}])", format_value_list(values))
            }
            Condition::IsNotNull { field } => {
                format!("{field} IS NOT NULL")
            }
            Condition::Raw { sql } => sql.clone(),
            Condition::Group(clause) => clause.to_sql(),
        }
    }

    /// Scope field references to a join alias, leaving raw fragments alone.
    pub fn qualify(&mut self, prefix: &str) {
        match self {
            Condition::Compare { field, .. }
            | Condition::In { field, .. }
            | Condition::ILike { field, .. }
            | Condition::NotILike { field, .. }
            | Condition::GteAny { field, .. }
            | Condition::ArrayContains { field, .. }
            | Condition::ArrayAny { field, .. }
            | Condition::IsNotNull { field } => {
                *field = format!("\"{prefix}\".\"{field}\"");
            }
            Condition::Raw { .. } => {}
            Condition::Group(clause) => clause.qualify(prefix),
        }
    }
}

/// A WHERE clause combining conditions with one logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    /// Combine conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Scope every contained field reference to a join alias.
    pub fn qualify(&mut self, prefix: &str) {
        for condition in &mut self.conditions {
            condition.qualify(prefix);
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let operator_str = match self.operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(operator_str))
    }
}

/// Format a JSON value for SQL
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        _ => format!("'{}'", value.to_string().replace('\'', "''")),
    }
}

fn format_value_list(values: &[Value]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}
