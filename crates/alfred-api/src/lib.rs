//! # Alfred
//!
//! Filtering, sorting and pagination for list endpoints. Client query
//! parameters such as `?filter[name][like]=bat&sortBy=age&orderBy=desc&limit=10`
//! are parsed once into a [`QueryOption`], which can then either run over an
//! in-memory collection or be pushed down into a SQL statement.
//!
//! ## Quick Start
//!
//! ```rust
//! use alfred::{impl_record, Alfred};
//!
//! struct Hero {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl_record!(Hero { name, age });
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let alfred = Alfred::new();
//!     let option = alfred.parse("filter[age][gte]=30&sortBy=name&limit=10");
//!
//!     // In memory
//!     let heroes = vec![
//!         Hero { name: "Bruce".into(), age: 39 },
//!         Hero { name: "Barry".into(), age: 28 },
//!     ];
//!     let page = alfred.apply(heroes, &option)?;
//!     assert_eq!(page.total, 1);
//!
//!     // Pushed down to the database
//!     let sql = alfred.sql("SELECT name, age FROM heroes", &option);
//!     assert!(sql.contains(r#"WHERE "age" >= '30'"#));
//!     Ok(())
//! }
//! ```
//!
//! ## Records
//!
//! The engine reads records through the [`Record`] trait: a static table of
//! field names (with optional filter aliases) and an accessor returning a
//! semantic [`Value`]. [`impl_record!`] derives both from a field list.
//! Filters on fields a record does not declare are ignored for that record.

pub mod logging;

use serde::{Deserialize, Serialize};

// Re-export core types
pub use alfred_core::{impl_record, Error, Result};

// Records and values
pub use alfred_core::{CoercionError, FieldDef, IntoValue, Record, Value, ValueKind};

// Query components
pub use alfred_core::query::{
    build_query, compare_text, compare_values, evaluate, paginate, parse_pairs,
    parse_query_string, sort_records, Executor, Filter, Filters, Operator, Order, Page,
    ParserConfig, PostgresQuoter, QueryOption, QueryParser, Quoter, RecordError, RecordOutcome,
    SqlBuilder, SqlConfig,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlfredConfig {
    /// Query parameter names and limits
    pub parser: ParserConfig,
    /// Shape of generated SQL
    pub sql: SqlConfig,
    /// Abort in-memory evaluation on the first record error
    pub fail_fast: bool,
}

/// The main engine handle.
///
/// Bundles a parser, an in-memory executor and a SQL builder that share one
/// configuration. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Alfred {
    parser: QueryParser,
    executor: Executor,
    builder: SqlBuilder,
}

impl Default for Alfred {
    fn default() -> Self {
        Self::new()
    }
}

impl Alfred {
    /// Engine with the default parameter names and PostgreSQL quoting.
    pub fn new() -> Self {
        Self {
            parser: QueryParser::default(),
            executor: Executor::new(),
            builder: SqlBuilder::default(),
        }
    }

    /// Engine with custom configuration and PostgreSQL quoting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use alfred::{Alfred, AlfredConfig, ParserConfig};
    ///
    /// let config = AlfredConfig {
    ///     parser: ParserConfig::default().with_max_limit(100),
    ///     ..Default::default()
    /// };
    /// let alfred = Alfred::with_config(config)?;
    /// assert_eq!(alfred.parse("limit=5000").limit, 100);
    /// # Ok::<(), alfred::Error>(())
    /// ```
    pub fn with_config(config: AlfredConfig) -> Result<Self> {
        Self::with_quoter(config, PostgresQuoter)
    }

    /// Engine with custom configuration and a caller-provided quoter.
    pub fn with_quoter<Q: Quoter + 'static>(config: AlfredConfig, quoter: Q) -> Result<Self> {
        let parser = QueryParser::new(config.parser)?;
        let executor = if config.fail_fast {
            Executor::new().fail_fast()
        } else {
            Executor::new()
        };
        Ok(Self {
            parser,
            executor,
            builder: SqlBuilder::new(config.sql, quoter),
        })
    }

    /// Parse a raw query string.
    pub fn parse(&self, query: &str) -> QueryOption {
        self.parser.parse_query_string(query)
    }

    /// Parse already-decoded `(key, value)` pairs.
    pub fn parse_pairs<I, K, V>(&self, pairs: I) -> QueryOption
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.parser.parse_pairs(pairs)
    }

    /// Filter, sort and paginate an in-memory collection.
    pub fn apply<R: Record>(&self, records: Vec<R>, option: &QueryOption) -> Result<Page<R>> {
        self.executor.execute(records, option)
    }

    /// Parse `query` and apply it to `records`.
    pub fn list<R: Record>(&self, records: Vec<R>, query: &str) -> Result<Page<R>> {
        let option = self.parse(query);
        self.apply(records, &option)
    }

    /// Wrap `base` into a statement that filters, sorts and paginates it.
    pub fn sql(&self, base: &str, option: &QueryOption) -> String {
        self.builder.build(base, option)
    }
}
