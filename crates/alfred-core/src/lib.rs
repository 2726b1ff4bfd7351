//! # Alfred Core
//!
//! Core types and implementations for the Alfred list-query engine: a typed
//! filter/sort/pagination directive parsed from query parameters, evaluated
//! against in-memory records or pushed down into SQL.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
pub mod record;
#[allow(missing_docs)]
pub mod value;

pub use error::{CoercionError, Error, Result};
pub use query::{
    build_query, parse_pairs, parse_query_string, sort_records, Executor, Filter, Filters,
    Operator, Order, Page, ParserConfig, PostgresQuoter, QueryOption, QueryParser, Quoter,
    RecordError, RecordOutcome, SqlBuilder, SqlConfig,
};
pub use record::{FieldDef, Record};
pub use value::{IntoValue, Value, ValueKind};
