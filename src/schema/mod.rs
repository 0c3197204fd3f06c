//! Schema model: immutable descriptors for tables, views, and procedures
//!
//! Descriptors are pure data. They are declared once, shared behind `Arc`,
//! and never mutated; cyclic table references are broken with lazy,
//! memoized [`TableRef`] handles.

mod column;
mod relation;
mod table;

pub use column::{Column, ColumnType};
pub use relation::{Relation, TableRef};
pub use table::{Index, ObjectName, Procedure, Table, View};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// A schema declaration: the set of tables, views, and procedures reachable
/// from one database context, plus the database/schema qualifiers stamped
/// onto every object identity.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub database: Option<String>,
    pub schema: Option<String>,
    tables: IndexMap<String, TableRef>,
    views: IndexMap<String, Arc<View>>,
    procedures: IndexMap<String, Arc<Procedure>>,
}

impl Schema {
    pub fn new(database: Option<&str>, schema: Option<&str>) -> Self {
        Self {
            database: database.map(String::from),
            schema: schema.map(String::from),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, name: impl Into<String>, table: TableRef) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.views.insert(view.name.clone(), Arc::new(view));
        self
    }

    pub fn with_procedure(mut self, procedure: Procedure) -> Self {
        self.procedures
            .insert(procedure.name.clone(), Arc::new(procedure));
        self
    }

    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .get(name)
            .map(TableRef::resolve)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    pub fn view(&self, name: &str) -> Result<Arc<View>> {
        self.views
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    pub fn procedure(&self, name: &str) -> Result<Arc<Procedure>> {
        self.procedures
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    /// Stamps this schema's qualifiers onto an object name.
    pub fn object_name(&self, name: impl Into<String>) -> ObjectName {
        ObjectName {
            database: self.database.clone(),
            schema: self.schema.clone(),
            name: name.into(),
        }
    }
}
