//! Error types for the query-definition engine and SQL compiler

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Schema errors
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Unknown relation '{relation}' on table '{table}'")]
    UnknownRelation { table: String, relation: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    // Construction-time validation errors
    #[error("AND/OR requires at least one operand")]
    EmptyLogicalOperands,

    #[error("union() requires at least 2 queries")]
    UnionTooFewMembers,

    #[error("include() is not available on a view: {0}")]
    IncludeOnView(String),

    #[error("Alias '{0}' is already joined in this statement")]
    DuplicateJoin(String),

    #[error("limit() requires ORDER BY")]
    LimitWithoutOrderBy,

    #[error("Aggregating over a DISTINCT or grouped query requires wrap() first")]
    AggregateOverGrouped,

    #[error("Unexpected parameter '{parameter}' for procedure '{procedure}'")]
    UnexpectedParameter {
        procedure: String,
        parameter: String,
    },

    // Compilation-time capability errors
    #[error("{construct} is not supported by the {dialect} dialect")]
    UnsupportedByDialect {
        construct: String,
        dialect: crate::compiler::Dialect,
    },

    // Context errors
    #[error("Invalid context state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    // Executor errors pass through unchanged
    #[error("Executor error: {0}")]
    Executor(String),
}
