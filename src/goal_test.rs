//! Tests for the `Goal` façade.

use serde_json::json;

use crate::error::GoalError;
use crate::goal::Goal;

#[tokio::test]
async fn always_is_satisfied_and_never_is_not() {
  assert!(Goal::<()>::always().seek(&()).await.unwrap());
  assert!(!Goal::<()>::never().seek(&()).await.unwrap());
}

#[tokio::test]
async fn the_default_check_is_truthiness_of_the_snapshot() {
  let empty = Goal::new(|_: ()| async { Ok(json!("")) });
  assert!(!empty.check(&()).await.unwrap());
  let text = Goal::new(|_: ()| async { Ok(json!("up")) });
  assert!(text.check(&()).await.unwrap());
}

#[tokio::test]
async fn with_check_replaces_the_predicate() {
  let goal = Goal::new(|_: ()| async { Ok(json!(3)) })
    .with_check(|_, snapshot| snapshot.as_i64() == Some(4));
  assert!(!goal.check(&()).await.unwrap());
}

#[tokio::test]
async fn check_swallows_state_absence() {
  let goal = Goal::new(|_: ()| async { Err(GoalError::state_not_found("unreadable")) });
  assert!(!goal.check(&()).await.unwrap());
}

#[tokio::test]
async fn check_propagates_other_probe_failures() {
  let goal = Goal::new(|_: ()| async { Err(GoalError::message("socket down")) })
    .described(|_| "api reachable".to_string());
  let error = goal.check(&()).await.unwrap_err();
  assert_eq!(error.to_string(), "api reachable: socket down");
}

#[tokio::test]
async fn read_exposes_the_aggregated_tuple_snapshot() {
  let both = Goal::all(vec![
    Goal::new(|_: ()| async { Ok(json!(10)) }),
    Goal::new(|_: ()| async { Ok(json!("hello")) }),
  ]);
  assert_eq!(both.read(&()).await.unwrap(), json!([10, "hello"]));
  assert!(both.check(&()).await.unwrap());
}

#[tokio::test]
async fn the_aggregated_check_needs_every_child() {
  let picky = Goal::new(|_: ()| async { Ok(json!(10)) })
    .with_check(|_, snapshot| snapshot.as_i64() == Some(99));
  let both = Goal::all(vec![Goal::always(), picky]);
  assert!(!both.check(&()).await.unwrap());
}

#[tokio::test]
async fn record_goals_aggregate_by_key() {
  let named = Goal::record(vec![
    ("num", Goal::new(|_: ()| async { Ok(json!(10)) })),
    ("text", Goal::new(|_: ()| async { Ok(json!("hello")) })),
  ]);
  assert_eq!(
    named.read(&()).await.unwrap(),
    json!({"num": 10, "text": "hello"})
  );
  assert!(named.check(&()).await.unwrap());
  assert!(named.seek(&()).await.unwrap());
}

#[tokio::test]
async fn goals_share_subgraphs() {
  let shared = Goal::new(|_: ()| async { Ok(json!(true)) });
  let both = Goal::and(vec![shared.clone(), shared]);
  assert!(both.seek(&()).await.unwrap());
}

#[test]
fn node_accessor_exposes_the_graph() {
  let goal = Goal::<()>::always();
  assert!(!goal.node().is_actionable());
}
