//! Relation descriptors and lazy table references
//!
//! Tables reference each other cyclically (A holds a foreign key into B,
//! B's descriptor lists A as a foreign-key target), so relations hold a
//! deferred resolver rather than the target descriptor itself. The resolver
//! runs at most once; the result is memoized.

use super::table::Table;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A memoized lazy handle to a table descriptor.
///
/// The declaration function is expected to memoize the descriptor itself
/// (a `static OnceLock` inside the function body), so resolving the same
/// table through different handles yields the same `Arc`.
#[derive(Clone)]
pub struct TableRef {
    inner: Arc<TableRefInner>,
}

struct TableRefInner {
    init: fn() -> Arc<Table>,
    cell: OnceLock<Arc<Table>>,
}

impl TableRef {
    pub fn new(init: fn() -> Arc<Table>) -> Self {
        Self {
            inner: Arc::new(TableRefInner {
                init,
                cell: OnceLock::new(),
            }),
        }
    }

    /// Resolves the target descriptor, evaluating the declaration function
    /// on first use only.
    pub fn resolve(&self) -> Arc<Table> {
        self.inner.cell.get_or_init(self.inner.init).clone()
    }
}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.cell.get() {
            Some(table) => write!(f, "TableRef({})", table.name),
            None => write!(f, "TableRef(<unresolved>)"),
        }
    }
}

/// A relation between two tables.
#[derive(Debug, Clone)]
pub enum Relation {
    /// The owning side: this table holds the foreign-key columns.
    ForeignKey {
        /// FK column names on the owning table, in declared order. Paired
        /// positionally with the target table's primary-key columns.
        columns: Vec<String>,
        /// The referenced table.
        target: TableRef,
    },
    /// The owned side: some other table holds a foreign key into this one.
    ForeignKeyTarget {
        /// The owning table.
        source: TableRef,
        /// The name of the `ForeignKey` relation on the owning table that
        /// this relation mirrors.
        foreign_key: String,
    },
}

impl Relation {
    /// Whether traversing this relation yields at most one row per parent
    /// row (FK side) or many (FK-target side).
    pub fn is_single(&self) -> bool {
        matches!(self, Relation::ForeignKey { .. })
    }
}
