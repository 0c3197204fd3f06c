//! The query definition node: the closed union over every statement kind
//!
//! The compiler matches every variant per dialect; adding a kind here is a
//! compile error in the compiler until each dialect handles it.

use super::select::SelectDef;
use crate::error::{Error, Result};
use crate::schema::{Column, ObjectName};
use serde::{Deserialize, Serialize};

/// One relational statement: a SELECT, a composition of SELECTs, or a
/// DDL/DML operation described as a flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QueryDef {
    Select(SelectDef),

    /// UNION of two or more shape-compatible selects.
    Union { selects: Vec<SelectDef> },

    /// Recursive CTE: anchor UNION ALL recursive member, selected from the
    /// named CTE.
    #[serde(rename_all = "camelCase")]
    RecursiveCte {
        name: String,
        anchor: SelectDef,
        recursive: SelectDef,
    },

    #[serde(rename_all = "camelCase")]
    CreateTable {
        table: ObjectName,
        columns: Vec<Column>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        primary_key: Vec<String>,
    },
    AddColumn {
        table: ObjectName,
        column: Column,
    },
    DropColumn {
        table: ObjectName,
        column: String,
    },
    ModifyColumn {
        table: ObjectName,
        column: Column,
    },
    RenameColumn {
        table: ObjectName,
        from: String,
        to: String,
    },
    DropPk {
        table: ObjectName,
    },
    AddPk {
        table: ObjectName,
        columns: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddFk {
        table: ObjectName,
        relation: String,
        columns: Vec<String>,
        target_table: ObjectName,
        target_columns: Vec<String>,
    },
    DropFk {
        table: ObjectName,
        relation: String,
    },
    AddIdx {
        table: ObjectName,
        columns: Vec<String>,
    },
    DropIdx {
        table: ObjectName,
        columns: Vec<String>,
    },
    RenameTable {
        from: ObjectName,
        to: String,
    },
    DropTable {
        table: ObjectName,
    },
    Truncate {
        table: ObjectName,
    },
    /// Toggle foreign-key enforcement around bulk loads.
    SwitchFk {
        table: ObjectName,
        enabled: bool,
    },
    CreateView {
        view: ObjectName,
        def: SelectDef,
    },
    DropView {
        view: ObjectName,
    },
    CreateProc {
        proc: ObjectName,
        params: Vec<Column>,
        def: SelectDef,
    },
    DropProc {
        proc: ObjectName,
    },
    ClearSchema {
        schema: ObjectName,
    },
    SchemaExists {
        schema: ObjectName,
    },
}

impl QueryDef {
    /// Combines two or more selects into a UNION definition.
    pub fn union(selects: Vec<SelectDef>) -> Result<Self> {
        if selects.len() < 2 {
            return Err(Error::UnionTooFewMembers);
        }
        Ok(QueryDef::Union { selects })
    }

    /// Wraps an anchor and a recursive member into a recursive CTE. Both
    /// members are unioned, so the same arity rule applies.
    pub fn recursive_cte(
        name: impl Into<String>,
        anchor: SelectDef,
        recursive: SelectDef,
    ) -> Self {
        QueryDef::RecursiveCte {
            name: name.into(),
            anchor,
            recursive,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(
            self,
            QueryDef::Select(_) | QueryDef::Union { .. } | QueryDef::RecursiveCte { .. }
        )
    }

    pub fn is_ddl(&self) -> bool {
        !self.is_select()
    }
}
