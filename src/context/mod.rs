//! The session-scoped database context
//!
//! Holds the alias counter, the connection/transaction state machine, and
//! the dispatch path to the injected executor. State transitions:
//!
//! ```text
//! ready -> connect -> transact -> connect -> ready      (connect)
//! ready -> connect -> ready                             (connect_without_transaction)
//! connect -> transact -> connect                        (trans)
//! ```
//!
//! `trans` does not nest: calling it while already in `transact` fails
//! fast with a state-conflict error.

mod executor;

pub use executor::{Executor, Row};

use crate::builder::{AliasCounter, Queryable};
use crate::compiler::{Compiler, Dialect};
use crate::error::{Error, Result};
use crate::query::{QueryDef, ResultMeta};
use crate::schema::Schema;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Connection/transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Connect,
    Transact,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Connect => "connect",
            Status::Transact => "transact",
        }
    }
}

/// The session façade: produces root queryables, compiles definitions for
/// its dialect, and drives the executor through connect/transaction
/// lifecycles. Independent contexts share no mutable state.
pub struct DbContext {
    schema: Arc<Schema>,
    dialect: Dialect,
    executor: Arc<dyn Executor>,
    status: Mutex<Status>,
    aliases: Arc<AliasCounter>,
}

impl DbContext {
    pub fn new(schema: Arc<Schema>, dialect: Dialect, executor: Arc<dyn Executor>) -> Self {
        Self {
            schema,
            dialect,
            executor,
            status: Mutex::new(Status::Ready),
            aliases: Arc::new(AliasCounter::new()),
        }
    }

    pub fn status(&self) -> Status {
        *self.status.lock()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the next root alias, `T<n>`. The counter is reset only on
    /// connection entry, never by query construction.
    pub fn next_alias(&self) -> String {
        self.aliases.next()
    }

    /// A fresh root queryable over a declared table.
    pub fn query(&self, table: &str) -> Result<Queryable> {
        let descriptor = self.schema.table(table)?;
        Ok(Queryable::from_table(
            descriptor,
            self.schema.object_name(table),
            self.aliases.clone(),
        ))
    }

    /// A fresh root queryable over a declared view.
    pub fn query_view(&self, view: &str) -> Result<Queryable> {
        let descriptor = self.schema.view(view)?;
        Ok(Queryable::from_view(
            descriptor,
            self.schema.object_name(view),
            self.aliases.clone(),
        ))
    }

    /// Renders a definition as SQL for this context's dialect.
    pub fn build(&self, def: &QueryDef) -> Result<String> {
        Compiler::new(self.dialect).compile(def)
    }

    /// Forwards a batch of definitions to the executor, one result row set
    /// per definition.
    pub async fn execute_defs(
        &self,
        defs: &[QueryDef],
        metas: Option<&[ResultMeta]>,
    ) -> Result<Vec<Vec<Row>>> {
        debug!(count = defs.len(), "dispatching definitions to executor");
        self.executor.execute_defs(defs, metas).await
    }

    /// Opens a connection, begins a transaction, runs `f`, commits, and
    /// closes. On failure inside `f` the transaction is rolled back, the
    /// connection closed, and the original error rethrown unchanged.
    pub async fn connect<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.transition(Status::Ready, Status::Connect)?;
        if let Err(e) = self.executor.connect().await {
            self.set_status(Status::Ready);
            return Err(e);
        }
        self.aliases.reset();

        if let Err(e) = self.executor.begin_transaction().await {
            self.close_quietly().await;
            self.set_status(Status::Ready);
            return Err(e);
        }
        self.set_status(Status::Transact);

        match f().await {
            Ok(value) => {
                if let Err(e) = self.executor.commit_transaction().await {
                    self.close_quietly().await;
                    self.set_status(Status::Ready);
                    return Err(e);
                }
                self.set_status(Status::Connect);
                let closed = self.executor.close().await;
                self.set_status(Status::Ready);
                closed?;
                Ok(value)
            }
            Err(original) => {
                self.rollback_quietly().await;
                self.close_quietly().await;
                self.set_status(Status::Ready);
                Err(original)
            }
        }
    }

    /// Opens a connection and runs `f` with no transaction around it.
    /// Errors from `f` propagate unchanged after the connection is closed.
    pub async fn connect_without_transaction<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.transition(Status::Ready, Status::Connect)?;
        if let Err(e) = self.executor.connect().await {
            self.set_status(Status::Ready);
            return Err(e);
        }
        self.aliases.reset();

        let result = f().await;
        self.close_quietly().await;
        self.set_status(Status::Ready);
        result
    }

    /// Runs `f` inside a transaction on the already-open connection. Valid
    /// only in the `connect` state; nested calls fail fast.
    pub async fn trans<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.transition(Status::Connect, Status::Transact)?;
        if let Err(e) = self.executor.begin_transaction().await {
            self.set_status(Status::Connect);
            return Err(e);
        }

        match f().await {
            Ok(value) => {
                let committed = self.executor.commit_transaction().await;
                self.set_status(Status::Connect);
                committed?;
                Ok(value)
            }
            Err(original) => {
                self.rollback_quietly().await;
                self.set_status(Status::Connect);
                Err(original)
            }
        }
    }

    fn transition(&self, from: Status, to: Status) -> Result<()> {
        let mut status = self.status.lock();
        if *status != from {
            return Err(Error::InvalidState {
                expected: from.name(),
                found: status.name(),
            });
        }
        debug!(from = from.name(), to = to.name(), "context transition");
        *status = to;
        Ok(())
    }

    fn set_status(&self, to: Status) {
        let mut status = self.status.lock();
        debug!(from = status.name(), to = to.name(), "context transition");
        *status = to;
    }

    /// Rollback around a failing scope must not mask the original error.
    async fn rollback_quietly(&self) {
        if let Err(e) = self.executor.rollback_transaction().await {
            warn!(error = %e, "rollback failed");
        }
    }

    async fn close_quietly(&self) {
        if let Err(e) = self.executor.close().await {
            warn!(error = %e, "close failed");
        }
    }
}
