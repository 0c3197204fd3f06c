//! Result metadata for client-side row hydration
//!
//! Derived from a finished query definition, never stored in it, and never
//! part of SQL generation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Hydration metadata for one joined relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationMeta {
    /// Object (at most one row per parent) vs. array at hydration time.
    pub is_single: bool,
}

/// Metadata describing the shape of one definition's result rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// Output column key (dot-separated for nested paths) to semantic type
    /// name ("number", "string", "boolean", "date", ...).
    pub columns: IndexMap<String, String>,
    /// Relation key (dot-separated relative path) to hydration metadata.
    pub relations: IndexMap<String, RelationMeta>,
}
