//! Shared test fixtures: a small cyclic schema and a recording executor

#![allow(dead_code)]

use async_trait::async_trait;
use orm_common::context::{Executor, Row};
use orm_common::error::{Error, Result};
use orm_common::query::{QueryDef, ResultMeta};
use orm_common::schema::{Column, ColumnType, Relation, Schema, Table, TableRef};
use orm_common::{DbContext, Dialect};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

pub fn user_table() -> Arc<Table> {
    static CELL: OnceLock<Arc<Table>> = OnceLock::new();
    CELL.get_or_init(|| {
        Arc::new(
            Table::new(
                "User",
                vec![
                    Column::new("id", ColumnType::Int).auto_increment(),
                    Column::new("name", ColumnType::Varchar { length: 50 }),
                    Column::new("email", ColumnType::Varchar { length: 100 }).nullable(),
                ],
            )
            .unwrap()
            .with_primary_key(["id"])
            .unwrap()
            .with_relation(
                "posts",
                Relation::ForeignKeyTarget {
                    source: TableRef::new(post_table),
                    foreign_key: "user".to_string(),
                },
            )
            .unwrap()
            .with_index(["name", "email"])
            .unwrap(),
        )
    })
    .clone()
}

pub fn post_table() -> Arc<Table> {
    static CELL: OnceLock<Arc<Table>> = OnceLock::new();
    CELL.get_or_init(|| {
        Arc::new(
            Table::new(
                "Post",
                vec![
                    Column::new("id", ColumnType::Int).auto_increment(),
                    Column::new("userId", ColumnType::Int),
                    Column::new("title", ColumnType::Varchar { length: 200 }),
                    Column::new("createdAt", ColumnType::DateTime).nullable(),
                ],
            )
            .unwrap()
            .with_primary_key(["id"])
            .unwrap()
            .with_relation(
                "user",
                Relation::ForeignKey {
                    columns: vec!["userId".to_string()],
                    target: TableRef::new(user_table),
                },
            )
            .unwrap()
            .with_relation(
                "comments",
                Relation::ForeignKeyTarget {
                    source: TableRef::new(comment_table),
                    foreign_key: "post".to_string(),
                },
            )
            .unwrap(),
        )
    })
    .clone()
}

pub fn comment_table() -> Arc<Table> {
    static CELL: OnceLock<Arc<Table>> = OnceLock::new();
    CELL.get_or_init(|| {
        Arc::new(
            Table::new(
                "Comment",
                vec![
                    Column::new("id", ColumnType::Int).auto_increment(),
                    Column::new("postId", ColumnType::Int),
                    Column::new("body", ColumnType::Text),
                ],
            )
            .unwrap()
            .with_primary_key(["id"])
            .unwrap()
            .with_relation(
                "post",
                Relation::ForeignKey {
                    columns: vec!["postId".to_string()],
                    target: TableRef::new(post_table),
                },
            )
            .unwrap(),
        )
    })
    .clone()
}

pub fn test_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(Some("TestDb"), Some("TestSchema"))
            .with_table("User", TableRef::new(user_table))
            .with_table("Post", TableRef::new(post_table))
            .with_table("Comment", TableRef::new(comment_table)),
    )
}

/// Recording executor: logs every call, optionally failing one method by
/// name.
#[derive(Default)]
pub struct MockExecutor {
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_on: Mutex<Option<&'static str>>,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_on(&self, method: &'static str) {
        *self.fail_on.lock() = Some(method);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.calls.lock().push(method);
        if *self.fail_on.lock() == Some(method) {
            return Err(Error::Executor(format!("{} failed", method)));
        }
        Ok(())
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn connect(&self) -> Result<()> {
        self.record("connect")
    }

    async fn close(&self) -> Result<()> {
        self.record("close")
    }

    async fn begin_transaction(&self) -> Result<()> {
        self.record("begin")
    }

    async fn commit_transaction(&self) -> Result<()> {
        self.record("commit")
    }

    async fn rollback_transaction(&self) -> Result<()> {
        self.record("rollback")
    }

    async fn execute_defs(
        &self,
        defs: &[QueryDef],
        _metas: Option<&[ResultMeta]>,
    ) -> Result<Vec<Vec<Row>>> {
        self.record("execute")?;
        Ok(vec![Vec::new(); defs.len()])
    }
}

pub fn context(dialect: Dialect) -> (DbContext, Arc<MockExecutor>) {
    let executor = MockExecutor::new();
    let ctx = DbContext::new(test_schema(), dialect, executor.clone());
    (ctx, executor)
}

pub fn mysql_context() -> (DbContext, Arc<MockExecutor>) {
    context(Dialect::MySql)
}
