//! Expression nodes and constructor helpers
//!
//! Expressions reference columns by path (alias segments plus column name;
//! a dotted child alias is a single segment) or carry literal values.
//! They are immutable value objects owned by the query definition tree
//! that references them.

use crate::error::{Error, Result};
use crate::query::SelectDef;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// An expression node in a query definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    /// A column reference: one or more alias segments plus the column name.
    Column { path: Vec<String> },
    /// A literal value, embedded into the rendered SQL by the compiler.
    Value { value: Value },
    /// COUNT(*).
    Count,

    Eq {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    NotEq {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    Gt {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    GtEq {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    Lt {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    LtEq {
        source: Box<Expression>,
        target: Box<Expression>,
    },
    /// Regular-expression match. Not every dialect can render this; the
    /// compiler rejects it where unsupported.
    Regexp {
        source: Box<Expression>,
        target: Box<Expression>,
    },

    Null {
        source: Box<Expression>,
    },
    NotNull {
        source: Box<Expression>,
    },
    Not {
        source: Box<Expression>,
    },

    /// `source IN (SELECT ...)`.
    InQuery {
        source: Box<Expression>,
        query: Box<SelectDef>,
    },

    And {
        operands: Vec<Expression>,
    },
    Or {
        operands: Vec<Expression>,
    },
}

impl Expression {
    /// Whether this is a plain column reference. Join ON conditions render
    /// column-to-column equality with the dialect's null-safe operator.
    pub fn is_column(&self) -> bool {
        matches!(self, Expression::Column { .. })
    }
}

/// A column reference from explicit path segments.
pub fn col<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Expression {
    Expression::Column {
        path: path.into_iter().map(Into::into).collect(),
    }
}

/// A literal value.
pub fn val(value: impl Into<Value>) -> Expression {
    Expression::Value {
        value: value.into(),
    }
}

/// COUNT(*).
pub fn count() -> Expression {
    Expression::Count
}

pub fn eq(source: Expression, target: Expression) -> Expression {
    Expression::Eq {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn not_eq(source: Expression, target: Expression) -> Expression {
    Expression::NotEq {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn gt(source: Expression, target: Expression) -> Expression {
    Expression::Gt {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn gt_eq(source: Expression, target: Expression) -> Expression {
    Expression::GtEq {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn lt(source: Expression, target: Expression) -> Expression {
    Expression::Lt {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn lt_eq(source: Expression, target: Expression) -> Expression {
    Expression::LtEq {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn regexp(source: Expression, target: Expression) -> Expression {
    Expression::Regexp {
        source: Box::new(source),
        target: Box::new(target),
    }
}

pub fn is_null(source: Expression) -> Expression {
    Expression::Null {
        source: Box::new(source),
    }
}

pub fn is_not_null(source: Expression) -> Expression {
    Expression::NotNull {
        source: Box::new(source),
    }
}

pub fn not(source: Expression) -> Expression {
    Expression::Not {
        source: Box::new(source),
    }
}

pub fn in_query(source: Expression, query: SelectDef) -> Expression {
    Expression::InQuery {
        source: Box::new(source),
        query: Box::new(query),
    }
}

/// Conjunction of one or more operands. An empty operand list is a
/// construction-time error, not an empty SQL fragment.
pub fn and(operands: Vec<Expression>) -> Result<Expression> {
    if operands.is_empty() {
        return Err(Error::EmptyLogicalOperands);
    }
    Ok(Expression::And { operands })
}

/// Disjunction of one or more operands. An empty operand list is a
/// construction-time error.
pub fn or(operands: Vec<Expression>) -> Result<Expression> {
    if operands.is_empty() {
        return Err(Error::EmptyLogicalOperands);
    }
    Ok(Expression::Or { operands })
}
