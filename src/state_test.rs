//! Tests for `State` readers and their composition.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::error::GoalError;
use crate::state::State;

#[tokio::test]
async fn single_reader_reads_from_context() {
  let state = State::new(|base: i64| async move { Ok(json!(base + 1)) });
  assert_eq!(state.read(41).await.unwrap(), json!(42));
}

#[tokio::test]
async fn value_reader_is_constant() {
  let state: State<()> = State::value(json!("fixed"));
  assert_eq!(state.read(()).await.unwrap(), json!("fixed"));
  assert_eq!(state.read(()).await.unwrap(), json!("fixed"));
}

#[tokio::test]
async fn tuple_aggregates_in_authoring_order() {
  let state = State::tuple(vec![
    State::new(|_: ()| async { Ok(json!(10)) }),
    State::new(|_: ()| async { Ok(json!("hello")) }),
  ]);
  assert_eq!(state.read(()).await.unwrap(), json!([10, "hello"]));
}

#[tokio::test]
async fn record_aggregates_by_key() {
  let state = State::record(vec![
    ("num".to_string(), State::new(|_: ()| async { Ok(json!(10)) })),
    (
      "text".to_string(),
      State::new(|_: ()| async { Ok(json!("hello")) }),
    ),
  ]);
  assert_eq!(
    state.read(()).await.unwrap(),
    json!({"num": 10, "text": "hello"})
  );
}

#[tokio::test]
async fn tuple_fails_with_first_error_in_authoring_order() {
  let state = State::tuple(vec![
    State::new(|_: ()| async { Err(GoalError::message("first")) }),
    State::new(|_: ()| async { Err(GoalError::message("second")) }),
  ]);
  let error = state.read(()).await.unwrap_err();
  assert!(error.to_string().contains("first"), "got: {error}");
}

#[tokio::test]
async fn tuple_propagates_state_not_found() {
  let state = State::tuple(vec![
    State::new(|_: ()| async { Err(GoalError::state_not_found("missing")) }),
    State::new(|_: ()| async { Ok(json!(true)) }),
  ]);
  assert!(state.read(()).await.unwrap_err().is_state_not_found());
}

#[tokio::test]
async fn tuple_runs_every_child_even_when_one_fails() {
  let count = Arc::new(AtomicUsize::new(0));
  let spy = count.clone();
  let state = State::tuple(vec![
    State::new(|_: ()| async { Err(GoalError::message("boom")) }),
    State::new(move |_: ()| {
      let spy = spy.clone();
      async move {
        spy.fetch_add(1, Ordering::SeqCst);
        Ok(json!(true))
      }
    }),
  ]);
  assert!(state.read(()).await.is_err());
  assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn record_fails_with_first_error_in_authoring_order() {
  let state = State::record(vec![
    ("ok".to_string(), State::new(|_: ()| async { Ok(json!(1)) })),
    (
      "bad".to_string(),
      State::new(|_: ()| async { Err(GoalError::message("broken")) }),
    ),
  ]);
  let error = state.read(()).await.unwrap_err();
  assert!(error.to_string().contains("broken"), "got: {error}");
}

#[tokio::test]
async fn map_rebases_onto_another_context() {
  #[derive(Clone)]
  struct Outer {
    inner: i64,
  }
  let state = State::new(|base: i64| async move { Ok(json!(base * 2)) });
  let mapped = state.map(Arc::new(|outer: &Outer| outer.inner));
  assert_eq!(mapped.read(Outer { inner: 21 }).await.unwrap(), json!(42));
}
