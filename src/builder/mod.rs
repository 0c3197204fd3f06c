//! The fluent, immutable-update query builder
//!
//! Every chain method clones the underlying definition and returns a new
//! `Queryable`; the receiver is never mutated, so query chains can be
//! branched and reused safely.

mod include;

use crate::error::{Error, Result};
use crate::expression::{self, Expression};
use crate::query::{
    Direction, JoinDef, Limit, OrderByItem, QueryDef, RelationMeta, ResultMeta, SelectDef,
};
use crate::schema::{ObjectName, Relation, Table, View};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Monotonic root-alias allocator. One per database context; reset only on
/// connection entry, so alias sequences are deterministic per session.
#[derive(Debug, Default)]
pub struct AliasCounter {
    counter: AtomicU32,
}

impl AliasCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next root alias, `T1`, `T2`, ...
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("T{}", n)
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }
}

/// What the builder is rooted at. Views carry no relation metadata, so
/// relation traversal is rejected on view-rooted builders.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    Table(Arc<Table>),
    View(Arc<View>),
}

/// A query under construction.
///
/// Cloning is cheap (descriptors are shared behind `Arc`); chain methods
/// clone, update the copy, and return it.
#[derive(Debug, Clone)]
pub struct Queryable {
    pub(crate) source: Source,
    pub(crate) def: SelectDef,
    /// Alias to table descriptor, for every table reachable in this
    /// statement. Used for relation traversal and result metadata.
    pub(crate) scope: IndexMap<String, Arc<Table>>,
    pub(crate) database: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) aliases: Arc<AliasCounter>,
}

impl Queryable {
    /// A root queryable over a table, with a freshly allocated alias.
    pub fn from_table(
        table: Arc<Table>,
        object: ObjectName,
        aliases: Arc<AliasCounter>,
    ) -> Self {
        let alias = aliases.next();
        let mut scope = IndexMap::new();
        scope.insert(alias.clone(), table.clone());
        Self {
            source: Source::Table(table),
            def: SelectDef::new(alias, object.clone()),
            scope,
            database: object.database,
            schema: object.schema,
            aliases,
        }
    }

    /// A root queryable over a view, with a freshly allocated alias.
    pub fn from_view(view: Arc<View>, object: ObjectName, aliases: Arc<AliasCounter>) -> Self {
        let alias = aliases.next();
        Self {
            source: Source::View(view),
            def: SelectDef::new(alias, object.clone()),
            scope: IndexMap::new(),
            database: object.database,
            schema: object.schema,
            aliases,
        }
    }

    /// The alias this builder's root select node is known by.
    pub fn alias(&self) -> &str {
        &self.def.alias
    }

    /// A column reference rooted at this builder's alias.
    pub fn col(&self, name: impl Into<String>) -> Expression {
        expression::col([self.def.alias.clone(), name.into()])
    }

    /// Appends filter expressions; the list is implicitly AND-ed.
    pub fn filter(&self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        let mut next = self.clone();
        next.def.filter.extend(exprs);
        next
    }

    /// Adds projection entries. Keys may be dot-separated output paths.
    pub fn select<K: Into<String>>(
        &self,
        items: impl IntoIterator<Item = (K, Expression)>,
    ) -> Self {
        let mut next = self.clone();
        let map = next.def.select.get_or_insert_with(IndexMap::new);
        for (key, expr) in items {
            map.insert(key.into(), expr);
        }
        next
    }

    pub fn group_by(&self, exprs: impl IntoIterator<Item = Expression>) -> Self {
        let mut next = self.clone();
        next.def.group_by.extend(exprs);
        next
    }

    pub fn order_by(&self, expr: Expression, direction: Direction) -> Self {
        let mut next = self.clone();
        next.def.order_by.push(OrderByItem { expr, direction });
        next
    }

    pub fn top(&self, count: u64) -> Self {
        let mut next = self.clone();
        next.def.top = Some(count);
        next
    }

    pub fn distinct(&self) -> Self {
        let mut next = self.clone();
        next.def.distinct = true;
        next
    }

    /// Pagination. Rejected without a deterministic ordering: paginating an
    /// unordered result is a correctness hazard, not a convenience.
    pub fn limit(&self, offset: u64, count: u64) -> Result<Self> {
        if self.def.order_by.is_empty() {
            return Err(Error::LimitWithoutOrderBy);
        }
        let mut next = self.clone();
        next.def.limit = Some(Limit { offset, count });
        Ok(next)
    }

    /// Wraps the current query as a derived table under a fresh root alias,
    /// so further clauses apply to its projected rows.
    pub fn wrap(&self) -> Self {
        let alias = self.aliases.next();
        let mut next = self.clone();
        next.def = SelectDef::derived(alias, self.def.clone());
        next
    }

    /// Joins a named relation; the child builder's filters become the
    /// join's ON conditions. Yields an array at hydration time.
    pub fn join(
        &self,
        key: &str,
        build: impl FnOnce(Queryable) -> Queryable,
    ) -> Result<Self> {
        self.join_impl(key, false, build)
    }

    /// Like [`join`](Self::join), but the relation yields at most one row
    /// per parent row. A child with its own ordering, pagination, or
    /// projection is rendered as a correlated derived table.
    pub fn join_single(
        &self,
        key: &str,
        build: impl FnOnce(Queryable) -> Queryable,
    ) -> Result<Self> {
        self.join_impl(key, true, build)
    }

    fn join_impl(
        &self,
        key: &str,
        is_single: bool,
        build: impl FnOnce(Queryable) -> Queryable,
    ) -> Result<Self> {
        let table = self.relation_target(key)?;
        let child_alias = format!("{}.{}", self.def.alias, key);
        // Aliases are unique within a statement; a second join on the same
        // relation would shadow the first.
        if self.def.find_join(&child_alias).is_some() {
            return Err(Error::DuplicateJoin(child_alias));
        }
        let object = ObjectName {
            database: self.database.clone(),
            schema: self.schema.clone(),
            name: table.name.clone(),
        };
        let mut scope = self.scope.clone();
        scope.insert(child_alias.clone(), table.clone());
        let child = Queryable {
            source: Source::Table(table),
            def: SelectDef::new(child_alias, object),
            scope,
            database: self.database.clone(),
            schema: self.schema.clone(),
            aliases: self.aliases.clone(),
        };
        let child = build(child);

        let mut next = self.clone();
        next.scope = child.scope.clone();
        next.def.joins.push(JoinDef {
            select: child.def,
            is_single,
        });
        Ok(next)
    }

    /// Resolves the table a relation points at, regardless of which side
    /// owns the foreign key.
    fn relation_target(&self, key: &str) -> Result<Arc<Table>> {
        let table = match &self.source {
            Source::Table(t) => t,
            Source::View(v) => {
                return Err(Error::UnknownRelation {
                    table: v.name.clone(),
                    relation: key.to_string(),
                })
            }
        };
        match table.relation(key) {
            Some(Relation::ForeignKey { target, .. }) => Ok(target.resolve()),
            Some(Relation::ForeignKeyTarget { source, .. }) => Ok(source.resolve()),
            None => Err(Error::UnknownRelation {
                table: table.name.clone(),
                relation: key.to_string(),
            }),
        }
    }

    /// Combines this query with at least one other into a UNION definition.
    pub fn union(&self, others: impl IntoIterator<Item = Queryable>) -> Result<QueryDef> {
        let mut selects = vec![self.def.clone()];
        selects.extend(others.into_iter().map(|q| q.def));
        QueryDef::union(selects)
    }

    /// Replaces the projection with COUNT(*). Counting a DISTINCT or
    /// grouped projection in place would double-apply the grouping
    /// semantics; wrap() the query first.
    pub fn count(&self) -> Result<Self> {
        if self.def.distinct || !self.def.group_by.is_empty() {
            return Err(Error::AggregateOverGrouped);
        }
        let mut next = self.clone();
        let mut map = IndexMap::new();
        map.insert("count".to_string(), expression::count());
        next.def.select = Some(map);
        Ok(next)
    }

    /// The finished select definition.
    pub fn select_def(&self) -> SelectDef {
        self.def.clone()
    }

    /// The finished definition as a statement node.
    pub fn query_def(&self) -> QueryDef {
        QueryDef::Select(self.def.clone())
    }

    /// Derives hydration metadata from the finished definition.
    pub fn result_meta(&self) -> ResultMeta {
        let mut meta = ResultMeta::default();

        // A wrapping node with no projection of its own passes the inner
        // shape through; one with its own projection (count over a wrapped
        // DISTINCT, say) defines the result shape itself.
        let mut def = &self.def;
        while def.select.is_none() {
            match &def.from {
                crate::query::FromSource::Derived(inner) => def = inner.as_ref(),
                crate::query::FromSource::Named(_) => break,
            }
        }

        match &def.select {
            Some(items) => {
                for (key, expr) in items {
                    meta.columns
                        .insert(key.clone(), self.semantic_type(expr).to_string());
                }
            }
            None => {
                if let Source::Table(table) = &self.source {
                    for (name, column) in &table.columns {
                        meta.columns
                            .insert(name.clone(), column.data_type.semantic_type().to_string());
                    }
                }
            }
        }

        collect_relations(def, &def.alias, &mut meta.relations);
        meta
    }

    fn semantic_type(&self, expr: &Expression) -> &'static str {
        match expr {
            Expression::Column { path } => {
                let (name, alias) = match path.split_last() {
                    Some((name, rest)) if !rest.is_empty() => (name.as_str(), rest.join(".")),
                    _ => return "unknown",
                };
                self.scope
                    .get(&alias)
                    .and_then(|t| t.column(name))
                    .map(|c| c.data_type.semantic_type())
                    .unwrap_or("unknown")
            }
            Expression::Value { value } => match value {
                Value::Null => "unknown",
                other => other.semantic_type(),
            },
            Expression::Count => "number",
            _ => "boolean",
        }
    }
}

/// Records `{relationKey: {isSingle}}` for every join, keyed by the
/// dot-separated path relative to the root alias.
fn collect_relations(
    def: &SelectDef,
    root_alias: &str,
    out: &mut IndexMap<String, RelationMeta>,
) {
    for join in &def.joins {
        let key = join
            .select
            .alias
            .strip_prefix(&format!("{}.", root_alias))
            .unwrap_or(&join.select.alias)
            .to_string();
        out.insert(
            key,
            RelationMeta {
                is_single: join.is_single,
            },
        );
        collect_relations(&join.select, root_alias, out);
    }
}
