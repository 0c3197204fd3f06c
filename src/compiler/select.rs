//! SELECT rendering: projection, joins, pagination, composition
//!
//! The join-strategy decision lives here: a join whose body carries its own
//! projection, ordering, or pagination cannot be flattened into an ON
//! clause and is rendered as a correlated derived table (LATERAL / APPLY);
//! anything else becomes a flat outer join.

use super::{Compiler, Dialect};
use crate::error::Result;
use crate::query::{Direction, FromSource, JoinDef, OrderByItem, SelectDef};

impl Compiler {
    pub(crate) fn select(&self, def: &SelectDef) -> Result<String> {
        let mut sql = String::from("SELECT ");
        if def.distinct {
            sql.push_str("DISTINCT ");
        }
        // TOP only stands in for LIMIT-less pagination on SQL Server.
        if self.dialect == Dialect::SqlServer {
            if let (Some(top), None) = (def.top, def.limit) {
                sql.push_str(&format!("TOP {} ", top));
            }
        }
        sql.push_str(&self.projection(def)?);

        sql.push_str(" FROM ");
        match &def.from {
            FromSource::Named(object) => {
                sql.push_str(&self.object_name(object));
            }
            FromSource::Derived(inner) => {
                sql.push_str(&format!("({})", self.select(inner)?));
            }
        }
        sql.push_str(&format!(" AS {}", self.ident(&def.alias)));

        self.render_joins(&mut sql, &def.joins)?;

        if !def.filter.is_empty() {
            let conditions = def
                .filter
                .iter()
                .map(|e| self.expr(e))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }

        if !def.group_by.is_empty() {
            let exprs = def
                .group_by
                .iter()
                .map(|e| self.expr(e))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(&format!(" GROUP BY {}", exprs.join(", ")));
        }

        if !def.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by(&def.order_by)?));
        }

        sql.push_str(&self.pagination(def));
        Ok(sql)
    }

    /// UNION of shape-compatible selects. Each member is parenthesized so
    /// member-level ORDER BY / pagination stays scoped to that member.
    pub(crate) fn union(&self, selects: &[SelectDef]) -> Result<String> {
        let parts = selects
            .iter()
            .map(|s| Ok(format!("({})", self.select(s)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(" UNION "))
    }

    /// `WITH [RECURSIVE] name AS (anchor UNION ALL recursive) SELECT ...`.
    /// SQL Server spells recursion without the keyword.
    pub(crate) fn recursive_cte(
        &self,
        name: &str,
        anchor: &SelectDef,
        recursive: &SelectDef,
    ) -> Result<String> {
        let keyword = match self.dialect {
            Dialect::SqlServer => "WITH",
            _ => "WITH RECURSIVE",
        };
        Ok(format!(
            "{} {} AS ({} UNION ALL {}) SELECT * FROM {}",
            keyword,
            self.ident(name),
            self.select(anchor)?,
            self.select(recursive)?,
            self.ident(name)
        ))
    }

    fn projection(&self, def: &SelectDef) -> Result<String> {
        match &def.select {
            Some(items) => {
                let rendered = items
                    .iter()
                    .map(|(key, expr)| {
                        Ok(format!("{} AS {}", self.expr(expr)?, self.ident(key)))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(rendered.join(", "))
            }
            None => {
                let mut targets = Vec::new();
                collect_star_targets(def, &mut targets);
                Ok(targets
                    .iter()
                    .map(|alias| format!("{}.*", self.ident(alias)))
                    .collect::<Vec<_>>()
                    .join(", "))
            }
        }
    }

    fn render_joins(&self, sql: &mut String, joins: &[JoinDef]) -> Result<()> {
        for join in joins {
            if join.select.needs_lateral() {
                sql.push_str(&self.lateral_join(join)?);
            } else {
                sql.push_str(&self.flat_join(join)?);
                // Nested flat joins stay at statement level; their ON
                // clauses may reference any earlier alias.
                self.render_joins(sql, &join.select.joins)?;
            }
        }
        Ok(())
    }

    fn flat_join(&self, join: &JoinDef) -> Result<String> {
        let def = &join.select;
        let source = match &def.from {
            FromSource::Named(object) => self.object_name(object),
            FromSource::Derived(inner) => format!("({})", self.select(inner)?),
        };
        let on = if def.filter.is_empty() {
            self.always_true().to_string()
        } else {
            def.filter
                .iter()
                .map(|e| self.on_condition(e))
                .collect::<Result<Vec<_>>>()?
                .join(" AND ")
        };
        Ok(format!(
            " LEFT OUTER JOIN {} AS {} ON {}",
            source,
            self.ident(&def.alias),
            on
        ))
    }

    /// A correlated derived table carrying the join's own WHERE / ORDER BY
    /// / pagination / projection. The body is a complete select; its filter
    /// list stays a WHERE clause and may reference the preceding aliases.
    fn lateral_join(&self, join: &JoinDef) -> Result<String> {
        let body = self.select(&join.select)?;
        let alias = self.ident(&join.select.alias);
        Ok(match self.dialect {
            Dialect::MySql => {
                format!(" LEFT OUTER JOIN LATERAL ({}) AS {} ON TRUE", body, alias)
            }
            Dialect::SqlServer => format!(" OUTER APPLY ({}) AS {}", body, alias),
            Dialect::Postgres => {
                format!(" LEFT JOIN LATERAL ({}) AS {} ON TRUE", body, alias)
            }
        })
    }

    fn order_by(&self, items: &[OrderByItem]) -> Result<String> {
        let rendered = items
            .iter()
            .map(|item| {
                let direction = match item.direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                };
                Ok(format!("{} {}", self.expr(&item.expr)?, direction))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    fn pagination(&self, def: &SelectDef) -> String {
        match self.dialect {
            Dialect::MySql => match (def.limit, def.top) {
                (Some(limit), _) => format!(" LIMIT {}, {}", limit.offset, limit.count),
                (None, Some(top)) => format!(" LIMIT {}", top),
                (None, None) => String::new(),
            },
            Dialect::Postgres => match (def.limit, def.top) {
                (Some(limit), _) => format!(" LIMIT {} OFFSET {}", limit.count, limit.offset),
                (None, Some(top)) => format!(" LIMIT {}", top),
                (None, None) => String::new(),
            },
            // TOP is rendered in the projection; only bounded offsets
            // appear here.
            Dialect::SqlServer => match def.limit {
                Some(limit) => format!(
                    " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                    limit.offset, limit.count
                ),
                None => String::new(),
            },
        }
    }

    fn always_true(&self) -> &'static str {
        match self.dialect {
            Dialect::SqlServer => "1 = 1",
            _ => "TRUE",
        }
    }
}

/// Aliases whose columns a bare (projection-less) select exposes: the root,
/// every flat join recursively, and each lateral join's derived table.
fn collect_star_targets(def: &SelectDef, out: &mut Vec<String>) {
    out.push(def.alias.clone());
    for join in &def.joins {
        if join.select.needs_lateral() {
            out.push(join.select.alias.clone());
        } else {
            collect_star_targets(&join.select, out);
        }
    }
}
