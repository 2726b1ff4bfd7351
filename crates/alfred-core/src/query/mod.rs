/// Query engine module
///
/// Query-parameter parsing, in-memory filtering and sorting, and SQL push-down.
/// In-memory list executor
#[allow(missing_docs)]
pub mod executor;
/// Filter variants
#[allow(missing_docs)]
pub mod filter;
/// Parsed list directive
#[allow(missing_docs)]
pub mod option;
/// Query-string parser
#[allow(missing_docs)]
pub mod parser;
/// In-memory sorter
pub mod sort;
/// SQL push-down
#[allow(missing_docs)]
pub mod sql;

// Re-export main types
pub use executor::{evaluate, paginate, Executor, Page, RecordError, RecordOutcome};
pub use filter::{Filter, Filters, Operator};
pub use option::{Order, QueryOption};
pub use parser::{parse_pairs, parse_query_string, ParserConfig, QueryParser};
pub use sort::{compare_text, compare_values, sort_records};
pub use sql::{build_query, PostgresQuoter, Quoter, SqlBuilder, SqlConfig};
