//! A typed query-definition engine and multi-dialect SQL compiler
//!
//! This crate builds an immutable intermediate representation of relational
//! queries and schema operations, then renders it into SQL text for MySQL,
//! SQL Server, or Postgres. Construction is synchronous and side-effect
//! free; all I/O goes through an injected [`Executor`].
//!
//! - [`schema`]: immutable table/view/procedure descriptors with lazy,
//!   cycle-safe cross references
//! - [`expression`]: comparison/logical/aggregate expression nodes
//! - [`query`]: the serializable definition tree and result metadata
//! - [`builder`]: the fluent, immutable-update [`Queryable`] API
//! - [`context`]: the session state machine dispatching to the executor
//! - [`compiler`]: dialect-specific SQL rendering

pub mod builder;
pub mod compiler;
pub mod context;
pub mod error;
pub mod expression;
pub mod query;
pub mod schema;
pub mod value;

pub use builder::{AliasCounter, Queryable};
pub use compiler::{Compiler, Dialect};
pub use context::{DbContext, Executor, Row, Status};
pub use error::{Error, Result};
pub use expression::Expression;
pub use query::{QueryDef, ResultMeta, SelectDef};
pub use schema::{Column, ColumnType, ObjectName, Relation, Schema, Table, TableRef};
pub use value::Value;
