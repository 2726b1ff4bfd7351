/// SQL push-down
///
/// Wraps a caller query so that filtering, sorting and pagination run in the
/// database. Rendering is pure string composition; every client-supplied
/// identifier and literal goes through a [`Quoter`].
use super::option::QueryOption;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier and literal quoting for one SQL dialect
pub trait Quoter: Send + Sync {
    /// Quote a table or column name
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal
    fn quote_literal(&self, literal: &str) -> String;
}

/// PostgreSQL quoting rules
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQuoter;

impl Quoter for PostgresQuoter {
    /// Double quotes, doubling embedded quotes. Input is cut at the first NUL.
    fn quote_identifier(&self, ident: &str) -> String {
        let ident = ident.split('\0').next().unwrap_or_default();
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Single quotes, doubling embedded quotes. A literal holding a backslash
    /// is emitted as an escape string (`E'...'`) with doubled backslashes.
    fn quote_literal(&self, literal: &str) -> String {
        let literal = literal.replace('\'', "''");
        if literal.contains('\\') {
            format!("E'{}'", literal.replace('\\', "\\\\"))
        } else {
            format!("'{}'", literal)
        }
    }
}

/// Shape of the generated statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Alias given to the wrapped base query
    pub subquery_alias: String,
    /// Add a `count(*) OVER()` column carrying the unpaginated row count
    pub total_count: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            subquery_alias: "query".to_string(),
            total_count: true,
        }
    }
}

/// Builds the outer statement around a base query
#[derive(Clone)]
pub struct SqlBuilder {
    config: SqlConfig,
    quoter: Arc<dyn Quoter>,
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new(SqlConfig::default(), PostgresQuoter)
    }
}

impl SqlBuilder {
    pub fn new<Q: Quoter + 'static>(config: SqlConfig, quoter: Q) -> Self {
        Self {
            config,
            quoter: Arc::new(quoter),
        }
    }

    pub fn config(&self) -> &SqlConfig {
        &self.config
    }

    pub fn quoter(&self) -> &dyn Quoter {
        self.quoter.as_ref()
    }

    /// Render
    /// `SELECT *, count(*) OVER() FROM (<base>) AS query [WHERE ...] [ORDER BY ...] LIMIT <n|ALL> OFFSET <n>`.
    pub fn build(&self, base: &str, option: &QueryOption) -> String {
        let mut sql = String::from("SELECT *");
        if self.config.total_count {
            sql.push_str(", count(*) OVER()");
        }
        sql.push_str(&format!(
            " FROM ({}) AS {}",
            base,
            self.quoter.quote_identifier(&self.config.subquery_alias)
        ));

        if let Some(predicates) = option.filters.to_sql(self.quoter()) {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates);
        }

        if option.has_sort() {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                self.quoter.quote_identifier(&option.sort_by),
                option.order.as_sql()
            ));
        }

        let limit = match option.page_limit() {
            Some(limit) => limit.to_string(),
            None => "ALL".to_string(),
        };
        sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, option.offset));

        tracing::trace!(sql = %sql, "built list query");
        sql
    }
}

/// Build the list statement with PostgreSQL quoting and the default shape.
pub fn build_query(base: &str, option: &QueryOption) -> String {
    SqlBuilder::default().build(base, option)
}
