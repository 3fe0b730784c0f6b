//! Pure predicates over (context, snapshot).

use crate::state::{ContextMap, Snapshot};
use serde_json::Value;
use std::sync::Arc;

type CheckFn<C> = dyn Fn(&C, &Snapshot) -> bool + Send + Sync;

/// A pure, synchronous predicate deciding whether a snapshot satisfies a goal.
///
/// Composites align structurally with the composite snapshot they are paired
/// with: positional checks read array slots, keyed checks read object entries.
/// A snapshot of the wrong shape simply fails the composite.
pub struct Check<C>(Arc<CheckFn<C>>);

impl<C> Clone for Check<C> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<C: 'static> Check<C> {
  pub fn new<F>(check: F) -> Self
  where
    F: Fn(&C, &Snapshot) -> bool + Send + Sync + 'static,
  {
    Self(Arc::new(check))
  }

  /// The default predicate: truthiness of the snapshot. Null and false fail,
  /// as do zero and the empty string; everything else passes.
  pub fn truthy() -> Self {
    Self::new(|_ctx, snapshot| truthy(snapshot))
  }

  /// True iff every child passes on its aligned array slot.
  pub fn all(children: Vec<Check<C>>) -> Self {
    Self::new(move |ctx, snapshot| match snapshot {
      Value::Array(slots) => children
        .iter()
        .enumerate()
        .all(|(i, check)| slots.get(i).is_some_and(|slot| check.eval(ctx, slot))),
      _ => false,
    })
  }

  /// True iff at least one child passes on its aligned array slot.
  pub fn any(children: Vec<Check<C>>) -> Self {
    Self::new(move |ctx, snapshot| match snapshot {
      Value::Array(slots) => children
        .iter()
        .enumerate()
        .any(|(i, check)| slots.get(i).is_some_and(|slot| check.eval(ctx, slot))),
      _ => false,
    })
  }

  /// Keyed form of [Check::all]; an absent key checks against null.
  pub fn all_record(children: Vec<(String, Check<C>)>) -> Self {
    Self::new(move |ctx, snapshot| match snapshot {
      Value::Object(entries) => children
        .iter()
        .all(|(key, check)| check.eval(ctx, entries.get(key).unwrap_or(&Value::Null))),
      _ => false,
    })
  }

  /// Keyed form of [Check::any]; an absent key checks against null.
  pub fn any_record(children: Vec<(String, Check<C>)>) -> Self {
    Self::new(move |ctx, snapshot| match snapshot {
      Value::Object(entries) => children
        .iter()
        .any(|(key, check)| check.eval(ctx, entries.get(key).unwrap_or(&Value::Null))),
      _ => false,
    })
  }

  /// Apply the predicate.
  pub fn eval(&self, ctx: &C, snapshot: &Snapshot) -> bool {
    (self.0)(ctx, snapshot)
  }

  /// Re-base this predicate onto another context type.
  pub fn map<C2: 'static>(&self, f: ContextMap<C2, C>) -> Check<C2> {
    let inner = self.0.clone();
    Check(Arc::new(move |ctx: &C2, snapshot: &Snapshot| {
      inner(&f(ctx), snapshot)
    }))
  }
}

/// Truthiness of a snapshot value.
pub fn truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}
