//! The dialect compiler
//!
//! Renders a query definition tree into SQL text for one target dialect.
//! All dialect-specific lexical and structural differences (identifier
//! quoting, null-safe equality, pagination, lateral-join syntax, object
//! qualification, DDL verbs) live here; the IR itself is dialect-neutral.
//!
//! Literal values are embedded directly into the text per dialect quoting
//! rules; there are no bind-parameter placeholders. Callers compiling
//! user-supplied values must pre-validate accordingly.

mod ddl;
mod expr;
mod select;

use crate::error::Result;
use crate::query::QueryDef;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    /// Backtick-quoting; `database.table` qualification.
    MySql,
    /// Bracket-quoting; `database.schema.table` qualification.
    SqlServer,
    /// Double-quote-quoting; `schema.table` qualification.
    Postgres,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
            Dialect::Postgres => "postgres",
        };
        write!(f, "{}", name)
    }
}

/// Compiles query definitions for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    dialect: Dialect,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Renders one definition. Capability errors (a construct with no
    /// representation in this dialect) surface here, not at construction.
    pub fn compile(&self, def: &QueryDef) -> Result<String> {
        let sql = match def {
            QueryDef::Select(select) => self.select(select)?,
            QueryDef::Union { selects } => self.union(selects)?,
            QueryDef::RecursiveCte {
                name,
                anchor,
                recursive,
            } => self.recursive_cte(name, anchor, recursive)?,

            QueryDef::CreateTable {
                table,
                columns,
                primary_key,
            } => self.create_table(table, columns, primary_key)?,
            QueryDef::AddColumn { table, column } => self.add_column(table, column)?,
            QueryDef::DropColumn { table, column } => self.drop_column(table, column),
            QueryDef::ModifyColumn { table, column } => self.modify_column(table, column)?,
            QueryDef::RenameColumn { table, from, to } => self.rename_column(table, from, to),
            QueryDef::DropPk { table } => self.drop_pk(table),
            QueryDef::AddPk { table, columns } => self.add_pk(table, columns),
            QueryDef::AddFk {
                table,
                relation,
                columns,
                target_table,
                target_columns,
            } => self.add_fk(table, relation, columns, target_table, target_columns),
            QueryDef::DropFk { table, relation } => self.drop_fk(table, relation),
            QueryDef::AddIdx { table, columns } => self.add_idx(table, columns),
            QueryDef::DropIdx { table, columns } => self.drop_idx(table, columns),
            QueryDef::RenameTable { from, to } => self.rename_table(from, to),
            QueryDef::DropTable { table } => format!("DROP TABLE {}", self.object_name(table)),
            QueryDef::Truncate { table } => {
                format!("TRUNCATE TABLE {}", self.object_name(table))
            }
            QueryDef::SwitchFk { table, enabled } => self.switch_fk(table, *enabled),
            QueryDef::CreateView { view, def } => self.create_view(view, def)?,
            QueryDef::DropView { view } => format!("DROP VIEW {}", self.object_name(view)),
            QueryDef::CreateProc { proc, params, def } => {
                self.create_proc(proc, params, def)?
            }
            QueryDef::DropProc { proc } => self.drop_proc(proc),
            QueryDef::ClearSchema { schema } => self.clear_schema(schema),
            QueryDef::SchemaExists { schema } => self.schema_exists(schema),
        };
        debug!(dialect = %self.dialect, sql = %sql, "compiled definition");
        Ok(sql)
    }
}
