//! Error types for Alfred.

use crate::query::Operator;
use crate::value::ValueKind;
use thiserror::Error;

/// The main error type for Alfred operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A filter value could not be coerced to the type of the field it targets.
    #[error("filter: field '{param}' : {source}")]
    ParamType {
        /// Filter parameter (field name or alias) as given by the client
        param: String,
        /// Underlying coercion failure
        #[source]
        source: CoercionError,
    },

    /// The operator cannot be applied to a field of this kind.
    #[error("filter: unsupported field type ({field} as {kind}) for operator '{operator}'")]
    UnsupportedFieldType {
        /// Declared field name
        field: String,
        /// Runtime kind of the field value
        kind: ValueKind,
        /// Operator that was attempted
        operator: Operator,
    },

    /// Records handed to the engine do not have a uniform shape.
    #[error("structural error: {0}")]
    Structural(String),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns the client-supplied parameter responsible for the error, if any.
    pub fn param(&self) -> Option<&str> {
        match self {
            Error::ParamType { param, .. } => Some(param),
            Error::UnsupportedFieldType { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Failure to coerce a textual filter value into a typed one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Not a base-10 signed integer
    #[error(transparent)]
    Integer(#[from] std::num::ParseIntError),

    /// Not a floating point number
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    /// Not one of the canonical boolean spellings
    #[error("invalid boolean '{0}'")]
    Boolean(String),

    /// Not an RFC 3339 timestamp
    #[error("{0} : supported format RFC3339")]
    Timestamp(#[from] chrono::ParseError),
}

/// A specialized `Result` type for Alfred operations.
pub type Result<T> = std::result::Result<T, Error>;
