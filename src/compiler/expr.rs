//! Lexical rendering: identifiers, literals, and expression nodes

use super::{Compiler, Dialect};
use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::schema::ObjectName;
use crate::value::Value;

impl Compiler {
    /// Quotes one identifier. Dotted child aliases are a single identifier;
    /// the dot is not a separator here.
    pub(crate) fn ident(&self, name: &str) -> String {
        match self.dialect {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            Dialect::SqlServer => format!("[{}]", name.replace(']', "]]")),
            Dialect::Postgres => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Qualifies an object name with the segments this dialect knows:
    /// mysql `database.name`, sqlserver `database.schema.name`, postgres
    /// `schema.name`.
    pub(crate) fn object_name(&self, object: &ObjectName) -> String {
        let mut segments = Vec::with_capacity(3);
        match self.dialect {
            Dialect::MySql => {
                if let Some(db) = &object.database {
                    segments.push(self.ident(db));
                }
            }
            Dialect::SqlServer => {
                if let Some(db) = &object.database {
                    segments.push(self.ident(db));
                }
                if let Some(schema) = &object.schema {
                    segments.push(self.ident(schema));
                }
            }
            Dialect::Postgres => {
                if let Some(schema) = &object.schema {
                    segments.push(self.ident(schema));
                }
            }
        }
        segments.push(self.ident(&object.name));
        segments.join(".")
    }

    /// Embeds a literal into the statement text.
    pub(crate) fn literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => match self.dialect {
                Dialect::SqlServer => if *b { "1" } else { "0" }.to_string(),
                _ => if *b { "TRUE" } else { "FALSE" }.to_string(),
            },
            Value::I64(i) => i.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Str(s) => self.string_literal(s),
            Value::Date(d) => format!("'{}'", d),
            Value::Time(t) => format!("'{}'", t),
            Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Uuid(u) => format!("'{}'", u),
        }
    }

    fn string_literal(&self, s: &str) -> String {
        let escaped = s.replace('\'', "''");
        match self.dialect {
            Dialect::SqlServer => format!("N'{}'", escaped),
            _ => format!("'{}'", escaped),
        }
    }

    /// Renders an expression in a plain (WHERE/SELECT) position.
    pub(crate) fn expr(&self, expr: &Expression) -> Result<String> {
        self.expr_inner(expr, false)
    }

    /// Renders an expression in an ON-clause position, where equality of
    /// two columns uses the dialect's null-safe idiom.
    pub(crate) fn on_condition(&self, expr: &Expression) -> Result<String> {
        self.expr_inner(expr, true)
    }

    fn expr_inner(&self, expr: &Expression, null_safe: bool) -> Result<String> {
        Ok(match expr {
            Expression::Column { path } => self.column_path(path),
            Expression::Value { value } => self.literal(value),
            Expression::Count => "COUNT(*)".to_string(),

            Expression::Eq { source, target } => {
                if null_safe && source.is_column() && target.is_column() {
                    self.null_safe_eq(
                        &self.expr_inner(source, false)?,
                        &self.expr_inner(target, false)?,
                    )
                } else {
                    self.binary(source, "=", target)?
                }
            }
            Expression::NotEq { source, target } => self.binary(source, "<>", target)?,
            Expression::Gt { source, target } => self.binary(source, ">", target)?,
            Expression::GtEq { source, target } => self.binary(source, ">=", target)?,
            Expression::Lt { source, target } => self.binary(source, "<", target)?,
            Expression::LtEq { source, target } => self.binary(source, "<=", target)?,

            Expression::Regexp { source, target } => match self.dialect {
                Dialect::MySql => {
                    format!(
                        "{} REGEXP {}",
                        self.expr_inner(source, false)?,
                        self.expr_inner(target, false)?
                    )
                }
                Dialect::Postgres => {
                    format!(
                        "{} ~ {}",
                        self.expr_inner(source, false)?,
                        self.expr_inner(target, false)?
                    )
                }
                Dialect::SqlServer => {
                    return Err(Error::UnsupportedByDialect {
                        construct: "regexp".to_string(),
                        dialect: self.dialect,
                    })
                }
            },

            Expression::Null { source } => {
                format!("{} IS NULL", self.expr_inner(source, false)?)
            }
            Expression::NotNull { source } => {
                format!("{} IS NOT NULL", self.expr_inner(source, false)?)
            }
            Expression::Not { source } => {
                format!("NOT ({})", self.expr_inner(source, false)?)
            }

            Expression::InQuery { source, query } => {
                format!(
                    "{} IN ({})",
                    self.expr_inner(source, false)?,
                    self.select(query)?
                )
            }

            Expression::And { operands } => self.junction(operands, " AND ", null_safe)?,
            Expression::Or { operands } => self.junction(operands, " OR ", null_safe)?,
        })
    }

    fn binary(&self, source: &Expression, op: &str, target: &Expression) -> Result<String> {
        Ok(format!(
            "{} {} {}",
            self.expr_inner(source, false)?,
            op,
            self.expr_inner(target, false)?
        ))
    }

    fn junction(&self, operands: &[Expression], sep: &str, null_safe: bool) -> Result<String> {
        let parts = operands
            .iter()
            .map(|e| self.expr_inner(e, null_safe))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", parts.join(sep)))
    }

    fn column_path(&self, path: &[String]) -> String {
        path.iter()
            .map(|segment| self.ident(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Null-safe equality of two rendered column references.
    pub(crate) fn null_safe_eq(&self, a: &str, b: &str) -> String {
        match self.dialect {
            Dialect::MySql => format!("{} <=> {}", a, b),
            Dialect::SqlServer => {
                format!("(({a} IS NULL AND {b} IS NULL) OR {a} = {b})", a = a, b = b)
            }
            Dialect::Postgres => format!("{} IS NOT DISTINCT FROM {}", a, b),
        }
    }
}
