//! DDL rendering: one template per operation kind per dialect
//!
//! Constraint and index names are synthesized deterministically:
//! `FK_<Table>_<relationKey>` and `IDX_<Table>_<col1>_<col2>...`.

use super::{Compiler, Dialect};
use crate::error::Result;
use crate::query::SelectDef;
use crate::schema::{Column, ColumnType, ObjectName};

pub(crate) fn fk_name(table: &ObjectName, relation: &str) -> String {
    format!("FK_{}_{}", table.name, relation)
}

pub(crate) fn idx_name(table: &ObjectName, columns: &[String]) -> String {
    format!("IDX_{}_{}", table.name, columns.join("_"))
}

impl Compiler {
    pub(crate) fn create_table(
        &self,
        table: &ObjectName,
        columns: &[Column],
        primary_key: &[String],
    ) -> Result<String> {
        let mut parts: Vec<String> = columns.iter().map(|c| self.column_def(c)).collect();
        if !primary_key.is_empty() {
            let key_list = self.column_list(primary_key);
            parts.push(match self.dialect {
                Dialect::MySql => format!("PRIMARY KEY ({})", key_list),
                _ => format!(
                    "CONSTRAINT {} PRIMARY KEY ({})",
                    self.ident(&format!("PK_{}", table.name)),
                    key_list
                ),
            });
        }
        Ok(format!(
            "CREATE TABLE {} ({})",
            self.object_name(table),
            parts.join(", ")
        ))
    }

    pub(crate) fn add_column(&self, table: &ObjectName, column: &Column) -> Result<String> {
        let keyword = match self.dialect {
            Dialect::SqlServer => "ADD",
            _ => "ADD COLUMN",
        };
        Ok(format!(
            "ALTER TABLE {} {} {}",
            self.object_name(table),
            keyword,
            self.column_def(column)
        ))
    }

    pub(crate) fn drop_column(&self, table: &ObjectName, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.object_name(table),
            self.ident(column)
        )
    }

    pub(crate) fn modify_column(&self, table: &ObjectName, column: &Column) -> Result<String> {
        let table_name = self.object_name(table);
        Ok(match self.dialect {
            Dialect::MySql => format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                table_name,
                self.column_def(column)
            ),
            Dialect::SqlServer => format!(
                "ALTER TABLE {} ALTER COLUMN {} {} {}",
                table_name,
                self.ident(&column.name),
                self.column_type(&column.data_type),
                if column.nullable { "NULL" } else { "NOT NULL" }
            ),
            Dialect::Postgres => {
                let name = self.ident(&column.name);
                let nullability = if column.nullable {
                    format!("ALTER COLUMN {} DROP NOT NULL", name)
                } else {
                    format!("ALTER COLUMN {} SET NOT NULL", name)
                };
                format!(
                    "ALTER TABLE {} ALTER COLUMN {} TYPE {}, {}",
                    table_name,
                    name,
                    self.column_type(&column.data_type),
                    nullability
                )
            }
        })
    }

    pub(crate) fn rename_column(&self, table: &ObjectName, from: &str, to: &str) -> String {
        match self.dialect {
            Dialect::SqlServer => format!(
                "EXEC sp_rename '{}.{}', '{}', 'COLUMN'",
                self.object_name(table),
                from,
                to
            ),
            _ => format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.object_name(table),
                self.ident(from),
                self.ident(to)
            ),
        }
    }

    pub(crate) fn drop_pk(&self, table: &ObjectName) -> String {
        match self.dialect {
            Dialect::MySql => format!("ALTER TABLE {} DROP PRIMARY KEY", self.object_name(table)),
            _ => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.object_name(table),
                self.ident(&format!("PK_{}", table.name))
            ),
        }
    }

    pub(crate) fn add_pk(&self, table: &ObjectName, columns: &[String]) -> String {
        let key_list = self.column_list(columns);
        match self.dialect {
            Dialect::MySql => format!(
                "ALTER TABLE {} ADD PRIMARY KEY ({})",
                self.object_name(table),
                key_list
            ),
            _ => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                self.object_name(table),
                self.ident(&format!("PK_{}", table.name)),
                key_list
            ),
        }
    }

    pub(crate) fn add_fk(
        &self,
        table: &ObjectName,
        relation: &str,
        columns: &[String],
        target_table: &ObjectName,
        target_columns: &[String],
    ) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.object_name(table),
            self.ident(&fk_name(table, relation)),
            self.column_list(columns),
            self.object_name(target_table),
            self.column_list(target_columns)
        )
    }

    pub(crate) fn drop_fk(&self, table: &ObjectName, relation: &str) -> String {
        let constraint = self.ident(&fk_name(table, relation));
        match self.dialect {
            Dialect::MySql => format!(
                "ALTER TABLE {} DROP FOREIGN KEY {}",
                self.object_name(table),
                constraint
            ),
            _ => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.object_name(table),
                constraint
            ),
        }
    }

    pub(crate) fn add_idx(&self, table: &ObjectName, columns: &[String]) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            self.ident(&idx_name(table, columns)),
            self.object_name(table),
            self.column_list(columns)
        )
    }

    pub(crate) fn drop_idx(&self, table: &ObjectName, columns: &[String]) -> String {
        let index = self.ident(&idx_name(table, columns));
        match self.dialect {
            // Postgres indexes are schema-scoped objects of their own.
            Dialect::Postgres => match &table.schema {
                Some(schema) => format!("DROP INDEX {}.{}", self.ident(schema), index),
                None => format!("DROP INDEX {}", index),
            },
            _ => format!("DROP INDEX {} ON {}", index, self.object_name(table)),
        }
    }

    pub(crate) fn rename_table(&self, from: &ObjectName, to: &str) -> String {
        match self.dialect {
            Dialect::MySql => format!(
                "RENAME TABLE {} TO {}",
                self.object_name(from),
                self.ident(to)
            ),
            Dialect::SqlServer => format!("EXEC sp_rename '{}', '{}'", self.object_name(from), to),
            Dialect::Postgres => format!(
                "ALTER TABLE {} RENAME TO {}",
                self.object_name(from),
                self.ident(to)
            ),
        }
    }

    pub(crate) fn switch_fk(&self, table: &ObjectName, enabled: bool) -> String {
        match self.dialect {
            Dialect::MySql => format!(
                "SET FOREIGN_KEY_CHECKS = {}",
                if enabled { 1 } else { 0 }
            ),
            Dialect::SqlServer => {
                if enabled {
                    format!(
                        "ALTER TABLE {} WITH CHECK CHECK CONSTRAINT ALL",
                        self.object_name(table)
                    )
                } else {
                    format!(
                        "ALTER TABLE {} NOCHECK CONSTRAINT ALL",
                        self.object_name(table)
                    )
                }
            }
            Dialect::Postgres => format!(
                "ALTER TABLE {} {} TRIGGER ALL",
                self.object_name(table),
                if enabled { "ENABLE" } else { "DISABLE" }
            ),
        }
    }

    pub(crate) fn create_view(&self, view: &ObjectName, def: &SelectDef) -> Result<String> {
        let verb = match self.dialect {
            Dialect::SqlServer => "CREATE OR ALTER VIEW",
            _ => "CREATE OR REPLACE VIEW",
        };
        Ok(format!(
            "{} {} AS {}",
            verb,
            self.object_name(view),
            self.select(def)?
        ))
    }

    pub(crate) fn create_proc(
        &self,
        proc: &ObjectName,
        params: &[Column],
        def: &SelectDef,
    ) -> Result<String> {
        let body = self.select(def)?;
        Ok(match self.dialect {
            Dialect::MySql => {
                let params = params
                    .iter()
                    .map(|p| format!("IN {} {}", self.ident(&p.name), self.column_type(&p.data_type)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "CREATE PROCEDURE {} ({}) BEGIN {}; END",
                    self.object_name(proc),
                    params,
                    body
                )
            }
            Dialect::SqlServer => {
                let params = params
                    .iter()
                    .map(|p| format!("@{} {}", p.name, self.column_type(&p.data_type)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "CREATE OR ALTER PROCEDURE {} {} AS BEGIN {} END",
                    self.object_name(proc),
                    params,
                    body
                )
            }
            Dialect::Postgres => {
                let params = params
                    .iter()
                    .map(|p| format!("{} {}", self.ident(&p.name), self.column_type(&p.data_type)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "CREATE OR REPLACE FUNCTION {} ({}) RETURNS SETOF RECORD AS $$ {} $$ LANGUAGE SQL",
                    self.object_name(proc),
                    params,
                    body
                )
            }
        })
    }

    pub(crate) fn drop_proc(&self, proc: &ObjectName) -> String {
        match self.dialect {
            Dialect::Postgres => format!("DROP FUNCTION {}", self.object_name(proc)),
            _ => format!("DROP PROCEDURE {}", self.object_name(proc)),
        }
    }

    pub(crate) fn clear_schema(&self, schema: &ObjectName) -> String {
        match self.dialect {
            Dialect::MySql => format!("DROP DATABASE IF EXISTS {}", self.ident(&schema.name)),
            Dialect::SqlServer => format!("DROP SCHEMA IF EXISTS {}", self.ident(&schema.name)),
            Dialect::Postgres => {
                format!("DROP SCHEMA IF EXISTS {} CASCADE", self.ident(&schema.name))
            }
        }
    }

    pub(crate) fn schema_exists(&self, schema: &ObjectName) -> String {
        format!(
            "SELECT schema_name FROM information_schema.schemata WHERE schema_name = {}",
            self.literal(&crate::value::Value::Str(schema.name.clone()))
        )
    }

    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One column definition inside CREATE TABLE / ADD COLUMN.
    pub(crate) fn column_def(&self, column: &Column) -> String {
        let mut def = format!(
            "{} {}",
            self.ident(&column.name),
            self.column_type(&column.data_type)
        );
        def.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            def.push_str(&format!(" DEFAULT {}", self.literal(default)));
        }
        if column.auto_increment {
            def.push_str(match self.dialect {
                Dialect::MySql => " AUTO_INCREMENT",
                Dialect::SqlServer => " IDENTITY(1,1)",
                Dialect::Postgres => " GENERATED BY DEFAULT AS IDENTITY",
            });
        }
        def
    }

    /// The dialect's SQL name for a column type tag.
    pub(crate) fn column_type(&self, ty: &ColumnType) -> String {
        match self.dialect {
            Dialect::MySql => match ty {
                ColumnType::TinyInt => "TINYINT".into(),
                ColumnType::SmallInt => "SMALLINT".into(),
                ColumnType::Int => "INT".into(),
                ColumnType::BigInt => "BIGINT".into(),
                ColumnType::Float => "FLOAT".into(),
                ColumnType::Double => "DOUBLE".into(),
                ColumnType::Decimal { precision, scale } => {
                    format!("DECIMAL({}, {})", precision, scale)
                }
                ColumnType::Char { length } => format!("CHAR({})", length),
                ColumnType::Varchar { length } => format!("VARCHAR({})", length),
                ColumnType::Text => "TEXT".into(),
                ColumnType::Bool => "BOOLEAN".into(),
                ColumnType::Date => "DATE".into(),
                ColumnType::Time => "TIME".into(),
                ColumnType::DateTime => "DATETIME".into(),
                ColumnType::Uuid => "CHAR(36)".into(),
                ColumnType::Blob => "BLOB".into(),
            },
            Dialect::SqlServer => match ty {
                ColumnType::TinyInt => "TINYINT".into(),
                ColumnType::SmallInt => "SMALLINT".into(),
                ColumnType::Int => "INT".into(),
                ColumnType::BigInt => "BIGINT".into(),
                ColumnType::Float => "REAL".into(),
                ColumnType::Double => "FLOAT".into(),
                ColumnType::Decimal { precision, scale } => {
                    format!("DECIMAL({}, {})", precision, scale)
                }
                ColumnType::Char { length } => format!("NCHAR({})", length),
                ColumnType::Varchar { length } => format!("NVARCHAR({})", length),
                ColumnType::Text => "NVARCHAR(MAX)".into(),
                ColumnType::Bool => "BIT".into(),
                ColumnType::Date => "DATE".into(),
                ColumnType::Time => "TIME".into(),
                ColumnType::DateTime => "DATETIME2".into(),
                ColumnType::Uuid => "UNIQUEIDENTIFIER".into(),
                ColumnType::Blob => "VARBINARY(MAX)".into(),
            },
            Dialect::Postgres => match ty {
                ColumnType::TinyInt | ColumnType::SmallInt => "SMALLINT".into(),
                ColumnType::Int => "INTEGER".into(),
                ColumnType::BigInt => "BIGINT".into(),
                ColumnType::Float => "REAL".into(),
                ColumnType::Double => "DOUBLE PRECISION".into(),
                ColumnType::Decimal { precision, scale } => {
                    format!("NUMERIC({}, {})", precision, scale)
                }
                ColumnType::Char { length } => format!("CHAR({})", length),
                ColumnType::Varchar { length } => format!("VARCHAR({})", length),
                ColumnType::Text => "TEXT".into(),
                ColumnType::Bool => "BOOLEAN".into(),
                ColumnType::Date => "DATE".into(),
                ColumnType::Time => "TIME".into(),
                ColumnType::DateTime => "TIMESTAMP".into(),
                ColumnType::Uuid => "UUID".into(),
                ColumnType::Blob => "BYTEA".into(),
            },
        }
    }
}
