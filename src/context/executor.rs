//! The injected executor collaborator
//!
//! All I/O lives behind this trait: physical connections, transaction
//! control, and statement execution. The core never retries, pools, or
//! reinterprets executor failures; it assumes the executor serializes
//! operations on one logical connection.

use crate::error::Result;
use crate::query::{QueryDef, ResultMeta};
use crate::value::Value;
use async_trait::async_trait;
use indexmap::IndexMap;

/// One result row: output column key to value.
pub type Row = IndexMap<String, Value>;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Opens the physical connection.
    async fn connect(&self) -> Result<()>;

    /// Closes the physical connection.
    async fn close(&self) -> Result<()>;

    async fn begin_transaction(&self) -> Result<()>;

    async fn commit_transaction(&self) -> Result<()>;

    async fn rollback_transaction(&self) -> Result<()>;

    /// Executes a batch of definitions, returning one row set per
    /// definition. Executors that compile internally receive the raw IR;
    /// others pre-render it with [`Compiler`](crate::compiler::Compiler).
    async fn execute_defs(
        &self,
        defs: &[QueryDef],
        metas: Option<&[ResultMeta]>,
    ) -> Result<Vec<Vec<Row>>>;
}
