//! Relation-path traversal for `include`
//!
//! Walks a dot-separated relation path from the root table, adding one join
//! node per segment. The foreign-key side of a relation joins single
//! against the target's primary key; the foreign-key-target side joins
//! multi against the owning table's FK columns. Segments whose alias is
//! already present in the tree are reused, so overlapping paths never
//! duplicate joins.

use super::{Queryable, Source};
use crate::error::{Error, Result};
use crate::expression::{col, eq, Expression};
use crate::query::{JoinDef, SelectDef};
use crate::schema::{ObjectName, Relation, Table};
use std::sync::Arc;

impl Queryable {
    /// Eagerly loads a relation path, e.g. `"posts.comments"`.
    pub fn include(&self, path: &str) -> Result<Self> {
        let mut current_table = match &self.source {
            Source::Table(t) => t.clone(),
            Source::View(v) => return Err(Error::IncludeOnView(v.name.clone())),
        };
        let mut next = self.clone();
        let mut current_alias = next.def.alias.clone();

        for segment in path.split('.') {
            let child_alias = format!("{}.{}", current_alias, segment);

            if next.def.find_join(&child_alias).is_some() {
                // Already traversed by an earlier, overlapping include.
                current_table = next
                    .scope
                    .get(&child_alias)
                    .cloned()
                    .ok_or_else(|| Error::UnknownRelation {
                        table: current_table.name.clone(),
                        relation: segment.to_string(),
                    })?;
                current_alias = child_alias;
                continue;
            }

            let relation =
                current_table
                    .relation(segment)
                    .ok_or_else(|| Error::UnknownRelation {
                        table: current_table.name.clone(),
                        relation: segment.to_string(),
                    })?;

            let (child_table, conditions, is_single) = match relation {
                Relation::ForeignKey { columns, target } => {
                    let target = target.resolve();
                    let conditions = pair_columns(
                        &child_alias,
                        &target.primary_key,
                        &current_alias,
                        columns,
                        &target,
                    )?;
                    (target, conditions, true)
                }
                Relation::ForeignKeyTarget {
                    source,
                    foreign_key,
                } => {
                    let owner = source.resolve();
                    let fk_columns = match owner.relation(foreign_key) {
                        Some(Relation::ForeignKey { columns, .. }) => columns.clone(),
                        _ => {
                            return Err(Error::InvalidSchema(format!(
                                "relation '{}' on '{}' mirrors missing foreign key '{}' on '{}'",
                                segment, current_table.name, foreign_key, owner.name
                            )))
                        }
                    };
                    let conditions = pair_columns(
                        &child_alias,
                        &fk_columns,
                        &current_alias,
                        &current_table.primary_key,
                        &owner,
                    )?;
                    (owner, conditions, false)
                }
            };

            let object = ObjectName {
                database: next.database.clone(),
                schema: next.schema.clone(),
                name: child_table.name.clone(),
            };
            let mut child_def = SelectDef::new(child_alias.clone(), object);
            child_def.filter = conditions;
            let join = JoinDef {
                select: child_def,
                is_single,
            };

            if current_alias == next.def.alias {
                next.def.joins.push(join);
            } else {
                match next.def.find_join_mut(&current_alias) {
                    Some(parent) => parent.select.joins.push(join),
                    None => {
                        return Err(Error::InvalidSchema(format!(
                            "missing join node for alias '{}'",
                            current_alias
                        )))
                    }
                }
            }

            next.scope.insert(child_alias.clone(), child_table.clone());
            current_table = child_table;
            current_alias = child_alias;
        }

        Ok(next)
    }
}

/// ON conditions pairing `child_alias.child_columns[i]` with
/// `parent_alias.parent_columns[i]`.
fn pair_columns(
    child_alias: &str,
    child_columns: &[String],
    parent_alias: &str,
    parent_columns: &[String],
    child_table: &Arc<Table>,
) -> Result<Vec<Expression>> {
    if child_columns.len() != parent_columns.len() || child_columns.is_empty() {
        return Err(Error::InvalidSchema(format!(
            "foreign key into '{}' pairs {} columns with {}",
            child_table.name,
            parent_columns.len(),
            child_columns.len()
        )));
    }
    Ok(child_columns
        .iter()
        .zip(parent_columns)
        .map(|(child, parent)| {
            eq(
                col([child_alias, child.as_str()]),
                col([parent_alias, parent.as_str()]),
            )
        })
        .collect())
}
