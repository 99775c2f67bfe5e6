//! Typed filter expressions compiled to parameterized SQL
//!
//! Callers assemble an ordered sequence of predicates and logical
//! connectors; the builder emits each fragment verbatim in that order as a
//! parameterized WHERE clause. The sequence is trusted to be well formed;
//! dangling connectors or unbalanced parentheses are the caller's bug, not
//! validated here.

use crate::entity::SqlValue;

/// Comparison operators available in predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `LIKE`
    Like,
    /// `IN`
    In,
}

impl Operator {
    fn as_sql(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }
}

/// Logical connectors and grouping tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    /// `NOT`
    Not,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `(`
    Open,
    /// `)`
    Close,
}

impl Logical {
    fn as_sql(self) -> &'static str {
        match self {
            Logical::Not => "NOT",
            Logical::And => "AND",
            Logical::Or => "OR",
            Logical::Open => "(",
            Logical::Close => ")",
        }
    }
}

/// One element of a filter sequence
#[derive(Debug, Clone)]
pub enum Condition {
    /// `field op ?` (or `field IN (?, ...)`)
    Predicate {
        /// Column name
        field: String,
        /// Comparison operator
        op: Operator,
        /// Bound values; exactly one except for `IN`
        values: Vec<SqlValue>,
    },
    /// A bare connector or parenthesis
    Connector(Logical),
}

impl Condition {
    /// Single-value predicate
    pub fn pred(field: impl Into<String>, op: Operator, value: impl Into<SqlValue>) -> Self {
        Condition::Predicate {
            field: field.into(),
            op,
            values: vec![value.into()],
        }
    }

    /// Set-membership predicate (`IN`)
    pub fn pred_in(field: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Condition::Predicate {
            field: field.into(),
            op: Operator::In,
            values,
        }
    }
}

/// Sort direction for `ORDER BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A complete filter: conditions plus optional ordering and row limit
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Ordered filter sequence; empty means "all rows"
    pub conditions: Vec<Condition>,
    /// Optional `ORDER BY column dir`
    pub order_by: Option<(String, SortOrder)>,
    /// Optional `LIMIT n`
    pub limit: Option<i64>,
}

impl Query {
    /// Filter with the given condition sequence, no ordering or limit.
    pub fn filter(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            ..Default::default()
        }
    }

    /// Empty filter matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Set `ORDER BY`.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    /// Set `LIMIT`.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compile to the clause text after `FROM table` and the bind list.
    ///
    /// Returns an empty string when there is nothing to append.
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut fragments: Vec<String> = Vec::new();
        let mut binds: Vec<SqlValue> = Vec::new();

        for condition in &self.conditions {
            match condition {
                Condition::Predicate { field, op, values } => {
                    if *op == Operator::In {
                        let placeholders = vec!["?"; values.len()].join(", ");
                        fragments.push(format!("{} IN ({})", field, placeholders));
                    } else {
                        fragments.push(format!("{} {} ?", field, op.as_sql()));
                    }
                    binds.extend(values.iter().cloned());
                }
                Condition::Connector(logical) => {
                    fragments.push(logical.as_sql().to_string());
                }
            }
        }

        let mut sql = String::new();
        if !fragments.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&fragments.join(" "));
        }
        if let Some((field, order)) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {} {}", field, order.as_sql()));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, binds)
    }
}
