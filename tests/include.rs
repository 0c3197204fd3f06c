//! Relation-path traversal: join synthesis, dedup, rejection

mod common;

use common::mysql_context;
use orm_common::error::Error;
use orm_common::expression::{col, eq};
use orm_common::query::SelectDef;
use orm_common::schema::View;
use orm_common::{Queryable, Schema, TableRef};
use std::sync::Arc;

#[test]
fn include_fk_target_joins_multi_on_owning_columns() {
    let (ctx, _) = mysql_context();
    let q = ctx.query("User").unwrap().include("posts").unwrap();

    let def = q.select_def();
    assert_eq!(def.joins.len(), 1);
    let join = &def.joins[0];
    assert_eq!(join.select.alias, "T1.posts");
    assert!(!join.is_single);
    assert_eq!(
        join.select.filter,
        vec![eq(col(["T1.posts", "userId"]), col(["T1", "id"]))]
    );
}

#[test]
fn include_fk_joins_single_on_target_pk() {
    let (ctx, _) = mysql_context();
    let q = ctx.query("Post").unwrap().include("user").unwrap();

    let join = &q.select_def().joins[0];
    assert_eq!(join.select.alias, "T1.user");
    assert!(join.is_single);
    assert_eq!(
        join.select.filter,
        vec![eq(col(["T1.user", "id"]), col(["T1", "userId"]))]
    );
}

#[test]
fn nested_paths_nest_join_nodes() {
    let (ctx, _) = mysql_context();
    let q = ctx.query("User").unwrap().include("posts.comments").unwrap();

    let def = q.select_def();
    assert_eq!(def.joins.len(), 1);
    let posts = &def.joins[0];
    assert_eq!(posts.select.alias, "T1.posts");
    assert_eq!(posts.select.joins.len(), 1);
    let comments = &posts.select.joins[0];
    assert_eq!(comments.select.alias, "T1.posts.comments");
    assert_eq!(
        comments.select.filter,
        vec![eq(
            col(["T1.posts.comments", "postId"]),
            col(["T1.posts", "id"])
        )]
    );
}

#[test]
fn overlapping_paths_are_deduplicated_by_alias() {
    let (ctx, _) = mysql_context();
    let q = ctx
        .query("User")
        .unwrap()
        .include("posts")
        .unwrap()
        .include("posts.comments")
        .unwrap();

    let def = q.select_def();
    assert_eq!(count_joins(&def), 2);
    assert_eq!(def.joins.len(), 1);
    assert_eq!(def.joins[0].select.alias, "T1.posts");
    assert_eq!(def.joins[0].select.joins[0].select.alias, "T1.posts.comments");
}

#[test]
fn repeated_include_is_idempotent() {
    let (ctx, _) = mysql_context();
    let q = ctx
        .query("User")
        .unwrap()
        .include("posts")
        .unwrap()
        .include("posts")
        .unwrap();

    assert_eq!(count_joins(&q.select_def()), 1);
}

#[test]
fn unknown_relation_is_rejected() {
    let (ctx, _) = mysql_context();
    assert_eq!(
        ctx.query("User").unwrap().include("likes").unwrap_err(),
        Error::UnknownRelation {
            table: "User".to_string(),
            relation: "likes".to_string(),
        }
    );
}

#[test]
fn include_on_a_view_is_rejected() {
    let view_def = {
        let (ctx, _) = mysql_context();
        ctx.query("User").unwrap().select_def()
    };
    let schema = Arc::new(
        Schema::new(Some("TestDb"), Some("TestSchema"))
            .with_table("User", TableRef::new(common::user_table))
            .with_view(View::new("ActiveUsers", view_def)),
    );
    let aliases = Arc::new(orm_common::AliasCounter::new());
    let q = Queryable::from_view(
        schema.view("ActiveUsers").unwrap(),
        schema.object_name("ActiveUsers"),
        aliases,
    );

    assert_eq!(
        q.include("posts").unwrap_err(),
        Error::IncludeOnView("ActiveUsers".to_string())
    );
}

fn count_joins(def: &SelectDef) -> usize {
    def.joins
        .iter()
        .map(|j| 1 + count_joins(&j.select))
        .sum()
}
