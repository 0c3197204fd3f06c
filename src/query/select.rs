//! SELECT-kind query definition nodes
//!
//! The select node is the recursive heart of the IR: joins are themselves
//! select nodes carrying an `isSingle` marker, and a wrapped (derived-table)
//! query nests a whole select node in its FROM position.

use crate::expression::Expression;
use crate::schema::ObjectName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sort direction for ORDER BY items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// One ORDER BY item: an expression plus a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expression,
    #[serde(default, skip_serializing_if = "is_default_direction")]
    pub direction: Direction,
}

fn is_default_direction(d: &Direction) -> bool {
    *d == Direction::Ascending
}

/// Pagination bounds: skip `offset` rows, return at most `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}

/// The FROM position of a select node: a named object (table or view) or a
/// wrapped derived table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FromSource {
    Named(ObjectName),
    Derived(Box<SelectDef>),
}

/// A join node: a nested select definition plus hydration metadata. The
/// nested node's `where` list is the join's ON-condition list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDef {
    #[serde(flatten)]
    pub select: SelectDef,
    /// Whether the relation yields at most one row per parent row.
    pub is_single: bool,
}

/// One SELECT statement (or join body, or derived table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDef {
    /// The alias this node is known by in the statement. Root aliases are
    /// `T<n>`; child aliases are `<parent>.<relationKey>` with the dot
    /// inside one quoted identifier.
    #[serde(rename = "as")]
    pub alias: String,
    pub from: FromSource,
    /// Ordered projection: output key (dot-separated for nested paths) to
    /// expression. `None` projects every reachable column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<IndexMap<String, Expression>>,
    /// Filter expressions, implicitly AND-ed.
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub distinct: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SelectDef {
    /// A bare select over a named object.
    pub fn new(alias: impl Into<String>, from: ObjectName) -> Self {
        Self {
            alias: alias.into(),
            from: FromSource::Named(from),
            select: None,
            filter: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            top: None,
            limit: None,
            distinct: false,
        }
    }

    /// A select over a wrapped derived table.
    pub fn derived(alias: impl Into<String>, inner: SelectDef) -> Self {
        Self {
            from: FromSource::Derived(Box::new(inner)),
            ..Self::new(alias, ObjectName::bare(""))
        }
    }

    /// Whether a join with this body can be flattened into a plain outer
    /// join. Anything beyond ON conditions and nested flat joins forces a
    /// correlated derived table (LATERAL / APPLY).
    pub fn needs_lateral(&self) -> bool {
        self.select.is_some()
            || !self.order_by.is_empty()
            || self.top.is_some()
            || self.limit.is_some()
            || self.distinct
            || !self.group_by.is_empty()
    }

    /// Finds a join node by alias, searching nested joins recursively.
    pub fn find_join(&self, alias: &str) -> Option<&JoinDef> {
        for join in &self.joins {
            if join.select.alias == alias {
                return Some(join);
            }
            if let Some(found) = join.select.find_join(alias) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable counterpart of [`find_join`](Self::find_join).
    pub fn find_join_mut(&mut self, alias: &str) -> Option<&mut JoinDef> {
        for join in &mut self.joins {
            if join.select.alias == alias {
                return Some(join);
            }
            if let Some(found) = join.select.find_join_mut(alias) {
                return Some(found);
            }
        }
        None
    }
}
