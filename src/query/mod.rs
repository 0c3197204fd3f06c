//! Query definition IR
//!
//! A recursive, serializable tree describing one SELECT, one DDL/DML
//! operation, or a composition thereof. Nodes are immutable value objects;
//! builders construct fresh trees instead of mutating shared state.

mod def;
mod meta;
mod select;

pub use def::QueryDef;
pub use meta::{RelationMeta, ResultMeta};
pub use select::{Direction, FromSource, JoinDef, Limit, OrderByItem, SelectDef};
