//! Table, view, and procedure descriptors

use super::column::Column;
use super::relation::Relation;
use crate::error::{Error, Result};
use crate::query::SelectDef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of a database object as it appears in rendered SQL and in
/// serialized definitions. Which segments a dialect actually renders is the
/// compiler's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            database: None,
            schema: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db) = &self.database {
            write!(f, "{}.", db)?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A secondary index over one or more columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Indexed column names in declared order. The order is significant:
    /// it drives the synthesized index name.
    pub columns: Vec<String>,
}

/// An immutable table descriptor.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    /// Ordered column map, keyed by column name.
    pub columns: IndexMap<String, Column>,
    /// Primary-key column names. May be empty.
    pub primary_key: Vec<String>,
    /// Relations keyed by relation name.
    pub relations: IndexMap<String, Relation>,
    pub indexes: Vec<Index>,
}

impl Table {
    /// Creates a table descriptor from an ordered column list.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidSchema("table name cannot be empty".into()));
        }
        let mut map = IndexMap::with_capacity(columns.len());
        for column in columns {
            if column.name.is_empty() {
                return Err(Error::InvalidSchema(format!(
                    "table '{}' has a column with an empty name",
                    name
                )));
            }
            if map.insert(column.name.clone(), column).is_some() {
                return Err(Error::InvalidSchema(format!(
                    "table '{}' declares a duplicate column",
                    name
                )));
            }
        }
        Ok(Self {
            name,
            columns: map,
            primary_key: Vec::new(),
            relations: IndexMap::new(),
            indexes: Vec::new(),
        })
    }

    /// Declares the primary-key columns. Every name must exist in the
    /// column map.
    pub fn with_primary_key<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            self.require_column(column)?;
        }
        self.primary_key = columns;
        Ok(self)
    }

    /// Declares a relation. Foreign-key columns on the owning side must
    /// exist in the column map; the target descriptor is validated lazily
    /// when the relation is traversed.
    pub fn with_relation(mut self, key: impl Into<String>, relation: Relation) -> Result<Self> {
        if let Relation::ForeignKey { columns, .. } = &relation {
            for column in columns {
                self.require_column(column)?;
            }
        }
        self.relations.insert(key.into(), relation);
        Ok(self)
    }

    /// Declares a secondary index over the given columns.
    pub fn with_index<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            self.require_column(column)?;
        }
        self.indexes.push(Index { columns });
        Ok(self)
    }

    /// Returns the relation with the given key, if declared.
    pub fn relation(&self, key: &str) -> Option<&Relation> {
        self.relations.get(key)
    }

    /// Returns the column with the given name, if declared.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    fn require_column(&self, name: &str) -> Result<()> {
        if !self.columns.contains_key(name) {
            return Err(Error::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        Ok(())
    }
}

/// A view descriptor: a name bound to a source query definition. Views
/// carry no relation metadata, so `include` is rejected on view-rooted
/// queryables.
#[derive(Debug, Clone)]
pub struct View {
    pub name: String,
    pub def: SelectDef,
}

impl View {
    pub fn new(name: impl Into<String>, def: SelectDef) -> Self {
        Self {
            name: name.into(),
            def,
        }
    }
}

/// A stored-procedure descriptor: ordered parameter and return column maps.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub params: IndexMap<String, Column>,
    pub returns: IndexMap<String, Column>,
}

impl Procedure {
    pub fn new(name: impl Into<String>, params: Vec<Column>, returns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(|c| (c.name.clone(), c)).collect(),
            returns: returns.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    /// Checks a set of supplied argument names against the declared
    /// parameters. Unknown names are rejected before any SQL is produced.
    pub fn validate_args<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for name in names {
            if !self.params.contains_key(name) {
                return Err(Error::UnexpectedParameter {
                    procedure: self.name.clone(),
                    parameter: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
