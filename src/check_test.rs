//! Tests for `Check` predicates and their composition.

use std::sync::Arc;

use serde_json::json;

use crate::check::{Check, truthy};

#[test]
fn truthy_follows_snapshot_shape() {
  assert!(!truthy(&json!(null)));
  assert!(!truthy(&json!(false)));
  assert!(truthy(&json!(true)));
  assert!(!truthy(&json!(0)));
  assert!(truthy(&json!(7)));
  assert!(!truthy(&json!("")));
  assert!(truthy(&json!("x")));
  assert!(truthy(&json!([])));
  assert!(truthy(&json!({})));
}

#[test]
fn new_check_sees_context_and_snapshot() {
  let check = Check::new(|threshold: &i64, snapshot| {
    snapshot.as_i64().map(|n| n > *threshold).unwrap_or(false)
  });
  assert!(check.eval(&10, &json!(11)));
  assert!(!check.eval(&10, &json!(9)));
}

#[test]
fn all_requires_every_aligned_slot() {
  let check: Check<()> = Check::all(vec![Check::truthy(), Check::truthy()]);
  assert!(check.eval(&(), &json!([true, 1])));
  assert!(!check.eval(&(), &json!([true, 0])));
  assert!(!check.eval(&(), &json!([true])));
  assert!(!check.eval(&(), &json!("not an array")));
}

#[test]
fn any_requires_one_aligned_slot() {
  let check: Check<()> = Check::any(vec![Check::truthy(), Check::truthy()]);
  assert!(check.eval(&(), &json!([false, 1])));
  assert!(!check.eval(&(), &json!([false, null])));
  assert!(!check.eval(&(), &json!([])));
  assert!(!check.eval(&(), &json!(42)));
}

#[test]
fn all_record_reads_slots_by_key() {
  let check: Check<()> = Check::all_record(vec![
    ("a".to_string(), Check::truthy()),
    ("b".to_string(), Check::truthy()),
  ]);
  assert!(check.eval(&(), &json!({"a": true, "b": "yes"})));
  assert!(!check.eval(&(), &json!({"a": true, "b": false})));
  // An absent key checks against null.
  assert!(!check.eval(&(), &json!({"a": true})));
  assert!(!check.eval(&(), &json!([true, true])));
}

#[test]
fn any_record_reads_slots_by_key() {
  let check: Check<()> = Check::any_record(vec![
    ("a".to_string(), Check::truthy()),
    ("b".to_string(), Check::truthy()),
  ]);
  assert!(check.eval(&(), &json!({"a": false, "b": 1})));
  assert!(!check.eval(&(), &json!({"a": false})));
}

#[test]
fn map_rebases_onto_another_context() {
  #[derive(Clone)]
  struct Outer {
    limit: i64,
  }
  let check = Check::new(|limit: &i64, snapshot| snapshot.as_i64() == Some(*limit));
  let mapped = check.map(Arc::new(|outer: &Outer| outer.limit));
  assert!(mapped.eval(&Outer { limit: 3 }, &json!(3)));
  assert!(!mapped.eval(&Outer { limit: 3 }, &json!(4)));
}
