//! Chain methods never mutate the receiver

mod common;

use common::mysql_context;
use orm_common::expression::{col, eq, val};
use orm_common::query::Direction;

#[test]
fn filter_leaves_the_original_untouched() {
    let (ctx, _) = mysql_context();
    let original = ctx.query("User").unwrap();
    let before = original.select_def();

    let filtered = original.filter([eq(original.col("id"), val(1))]);

    assert_eq!(original.select_def(), before);
    assert_eq!(filtered.select_def().filter.len(), 1);
}

#[test]
fn branched_chains_are_independent() {
    let (ctx, _) = mysql_context();
    let base = ctx.query("Post").unwrap().order_by(
        col(["T1", "createdAt"]),
        Direction::Descending,
    );

    let paged = base.limit(0, 10).unwrap();
    let topped = base.top(3);

    assert_eq!(base.select_def().limit, None);
    assert_eq!(base.select_def().top, None);
    assert!(paged.select_def().limit.is_some());
    assert_eq!(topped.select_def().top, Some(3));
}

#[test]
fn include_does_not_mutate_the_receiver() {
    let (ctx, _) = mysql_context();
    let original = ctx.query("User").unwrap();

    let included = original.include("posts").unwrap();

    assert!(original.select_def().joins.is_empty());
    assert_eq!(included.select_def().joins.len(), 1);
}

#[test]
fn wrap_leaves_the_inner_query_reusable() {
    let (ctx, _) = mysql_context();
    let inner = ctx.query("User").unwrap().distinct();
    let wrapped = inner.wrap();

    assert!(inner.select_def().distinct);
    assert_ne!(wrapped.alias(), inner.alias());
}
