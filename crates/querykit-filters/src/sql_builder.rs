//! SQL builder for parameterized SELECT statements.
//!
//! The filter engine only decides *which* predicates apply; this module
//! renders them. Every value coming from a request is bound as a parameter,
//! never spliced into the statement text.
//!
//! ## Features
//!
//! - **Fluent API**: chain method calls to assemble a statement
//! - **Row and group predicates**: AND-combined WHERE and HAVING clauses
//! - **Parameterized pagination**: LIMIT and OFFSET are bound values
//! - **Placeholder styles**: `?` (MySQL/SQLite) or `$n` (PostgreSQL)
//! - **Count wrapping**: total-row queries for paginated responses

use std::fmt;

use crate::error::FilterError;
use crate::filter::Operator;

/// Maximum number of predicates allowed per clause to prevent DoS
const MAX_PREDICATES: usize = 100;

/// Maximum number of JOINs allowed
const MAX_JOINS: usize = 10;

// ============================================================================
// Identifiers
// ============================================================================

/// Validate a table identifier, optionally schema-qualified.
///
/// Only allows alphanumeric characters, underscores and dots.
fn validate_identifier(name: &str) -> Result<(), FilterError> {
    if name.is_empty() {
        return Err(FilterError::invalid_identifier("Empty identifier"));
    }

    if name.split('.').any(str::is_empty)
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(FilterError::invalid_identifier(name));
    }

    Ok(())
}

// ============================================================================
// Values and predicates
// ============================================================================

/// SQL value types for parameterized queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl SqlValue {
    /// Get the value as a string for display/debugging.
    pub fn as_display_str(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
        }
    }

    /// Bind a pagination value as an integer when it is one, as text otherwise.
    fn pagination(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(Self::Integer)
            .unwrap_or_else(|_| Self::Text(raw.to_string()))
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A renderable predicate.
///
/// Field expressions come from the programmer-declared catalog; values come
/// from the request and are always bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field op ?`
    Compare {
        field: String,
        op: Operator,
        value: String,
    },

    /// `field IN (?,?,...)`
    InList { field: String, values: Vec<String> },

    /// `field IS NULL`
    IsNull { field: String },

    /// `field IS NOT NULL`
    IsNotNull { field: String },

    /// A bare bound value, used for LIMIT and OFFSET directives
    Bound(String),

    /// Raw SQL with `?` placeholders
    Raw { sql: String, params: Vec<SqlValue> },
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn in_list(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::InList {
            field: field.into(),
            values,
        }
    }

    pub fn raw(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: sql.into(),
            params,
        }
    }

    /// Left-hand field expression, if the predicate has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Compare { field, .. }
            | Self::InList { field, .. }
            | Self::IsNull { field }
            | Self::IsNotNull { field } => Some(field),
            Self::Bound(_) | Self::Raw { .. } => None,
        }
    }

    /// Values this predicate binds, in placeholder order.
    pub fn bound_values(&self) -> Vec<&str> {
        match self {
            Self::Compare { value, .. } | Self::Bound(value) => vec![value.as_str()],
            Self::InList { values, .. } => values.iter().map(String::as_str).collect(),
            Self::IsNull { .. } | Self::IsNotNull { .. } | Self::Raw { .. } => Vec::new(),
        }
    }

    /// Render with `?` placeholders, pushing bound values onto `params`.
    pub fn to_sql(&self, params: &mut Vec<SqlValue>) -> String {
        match self {
            Self::Compare { field, op, value } => {
                params.push(SqlValue::Text(value.clone()));
                format!("{field} {} ?", op.as_sql())
            }
            Self::InList { field, values } => {
                if values.is_empty() {
                    return "(1=0)".to_string();
                }
                params.extend(values.iter().cloned().map(SqlValue::Text));
                let placeholders = vec!["?"; values.len()].join(",");
                format!("{field} IN ({placeholders})")
            }
            Self::IsNull { field } => format!("{field} IS NULL"),
            Self::IsNotNull { field } => format!("{field} IS NOT NULL"),
            Self::Bound(value) => {
                params.push(SqlValue::Text(value.clone()));
                "?".to_string()
            }
            Self::Raw { sql, params: p } => {
                params.extend(p.iter().cloned());
                format!("({sql})")
            }
        }
    }
}

// ============================================================================
// Sort and placeholders
// ============================================================================

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse `asc`/`desc` in any case; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Placeholder syntax used in the rendered statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    #[default]
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl Placeholder {
    fn apply(self, sql: String) -> String {
        match self {
            Self::Question => sql,
            Self::Dollar => to_dollar_placeholders(&sql),
        }
    }
}

/// Replace `?` with `$n`, leaving quoted literals alone.
fn to_dollar_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut in_quotes = false;
    let mut n = 0;
    for c in sql.chars() {
        match c {
            '\'' => {
                in_quotes = !in_quotes;
                out.push(c);
            }
            '?' if !in_quotes => {
                n += 1;
                out.push('$');
                out.push_str(&n.to_string());
            }
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Select Builder
// ============================================================================

/// Fluent builder for SELECT statements.
///
/// # Example
///
/// ```
/// use querykit_filters::{Operator, Predicate, SelectBuilder};
///
/// let query = SelectBuilder::new(["id", "name"])
///     .from("countries")
///     .where_predicate(Predicate::compare("country.name", Operator::Eq, "Greece"))
///     .limit("10")
///     .build()
///     .unwrap();
///
/// assert_eq!(query.sql, "SELECT id, name FROM countries WHERE country.name = ? LIMIT ?");
/// assert_eq!(query.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    columns: Vec<String>,
    table: Option<String>,
    joins: Vec<String>,
    row_filters: Vec<Predicate>,
    group_filters: Vec<Predicate>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<String>,
    offset: Option<String>,
    placeholder: Placeholder,
}

impl SelectBuilder {
    /// Create a builder selecting the given columns (`*` when empty).
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the FROM table, optionally schema-qualified.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a JOIN clause verbatim, e.g. `LEFT JOIN booking ON booking.country_id = country.id`.
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(clause.into());
        self
    }

    /// Add a row predicate (AND semantics).
    pub fn where_predicate(mut self, predicate: Predicate) -> Self {
        self.row_filters.push(predicate);
        self
    }

    /// Add multiple row predicates (AND semantics).
    pub fn where_predicates(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.row_filters.extend(predicates);
        self
    }

    /// Add a group predicate (AND semantics).
    pub fn having_predicate(mut self, predicate: Predicate) -> Self {
        self.group_filters.push(predicate);
        self
    }

    /// Add multiple group predicates (AND semantics).
    pub fn having_predicates(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.group_filters.extend(predicates);
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Add an ORDER BY term, e.g. an [`OrderBy`](crate::OrderBy) or `"name DESC"`.
    pub fn order_by(mut self, term: impl fmt::Display) -> Self {
        self.order_by.push(term.to_string());
        self
    }

    /// Set the row limit. The value is bound, not interpolated.
    pub fn limit(mut self, value: impl Into<String>) -> Self {
        self.limit = Some(value.into());
        self
    }

    /// Set the row offset. The value is bound, not interpolated.
    pub fn offset(mut self, value: impl Into<String>) -> Self {
        self.offset = Some(value.into());
        self
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn row_filters(&self) -> &[Predicate] {
        &self.row_filters
    }

    pub fn group_filters(&self) -> &[Predicate] {
        &self.group_filters
    }

    pub fn limit_value(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    pub fn offset_value(&self) -> Option<&str> {
        self.offset.as_deref()
    }

    /// Validate the query complexity and identifiers.
    fn validate(&self) -> Result<(), FilterError> {
        let table = self.table.as_deref().ok_or(FilterError::MissingTable)?;
        validate_identifier(table)?;

        if self.row_filters.len() > MAX_PREDICATES {
            return Err(FilterError::too_complex(format!(
                "Too many row predicates: {} (max {})",
                self.row_filters.len(),
                MAX_PREDICATES
            )));
        }

        if self.group_filters.len() > MAX_PREDICATES {
            return Err(FilterError::too_complex(format!(
                "Too many group predicates: {} (max {})",
                self.group_filters.len(),
                MAX_PREDICATES
            )));
        }

        if self.joins.len() > MAX_JOINS {
            return Err(FilterError::too_complex(format!(
                "Too many JOINs: {} (max {})",
                self.joins.len(),
                MAX_JOINS
            )));
        }

        Ok(())
    }

    /// Build the SQL statement and its bound parameters.
    pub fn build(&self) -> Result<BuiltQuery, FilterError> {
        self.validate()?;

        let mut params = Vec::new();
        let mut sql = self.build_select(&mut params);

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(limit) = &self.limit {
            params.push(SqlValue::pagination(limit));
            sql.push_str(" LIMIT ?");
        }

        if let Some(offset) = &self.offset {
            params.push(SqlValue::pagination(offset));
            sql.push_str(" OFFSET ?");
        }

        let query = BuiltQuery {
            sql: self.placeholder.apply(sql),
            params,
        };
        tracing::debug!(
            sql = %query.sql,
            params = ?query.params.iter().map(SqlValue::as_display_str).collect::<Vec<_>>(),
            "built select"
        );
        Ok(query)
    }

    /// Build a total-row query for pagination by wrapping the statement,
    /// without ORDER BY, LIMIT or OFFSET, in a counting subquery.
    pub fn build_count(&self) -> Result<BuiltQuery, FilterError> {
        self.validate()?;

        let mut params = Vec::new();
        let inner = self.build_select(&mut params);
        let sql = format!("SELECT COUNT(*) AS total_rows FROM ({inner}) AS grouped_results");

        Ok(BuiltQuery {
            sql: self.placeholder.apply(sql),
            params,
        })
    }

    fn build_select(&self, params: &mut Vec<SqlValue>) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let table = self.table.as_deref().unwrap_or_default();

        let mut sql = format!("SELECT {columns} FROM {table}");

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        if let Some(where_sql) = Self::build_clause(&self.row_filters, params) {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(having_sql) = Self::build_clause(&self.group_filters, params) {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        sql
    }

    fn build_clause(predicates: &[Predicate], params: &mut Vec<SqlValue>) -> Option<String> {
        if predicates.is_empty() {
            return None;
        }

        let parts: Vec<String> = predicates.iter().map(|p| p.to_sql(params)).collect();
        Some(parts.join(" AND "))
    }
}

/// A built SQL query with parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
