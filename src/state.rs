//! Snapshot readers: typed views of the world, composable by position or key.

use crate::error::GoalResult;
use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Snapshot currency produced by readers: a JSON-shaped view of the world.
pub type Snapshot = Value;

/// Re-bases a value authored against context `C` onto context `C2`.
pub type ContextMap<C2, C> = Arc<dyn Fn(&C2) -> C + Send + Sync>;

type ReadFn<C> = dyn Fn(C) -> BoxFuture<'static, GoalResult<Snapshot>> + Send + Sync;

/// An asynchronous reader producing a snapshot of the world for a context.
///
/// Cheap to clone; clones share the underlying reader.
pub struct State<C>(Arc<ReadFn<C>>);

impl<C> Clone for State<C> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<C: Clone + Send + Sync + 'static> State<C> {
  /// Wrap an async closure as a reader.
  pub fn new<F, Fut>(read: F) -> Self
  where
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GoalResult<Snapshot>> + Send + 'static,
  {
    Self(Arc::new(move |ctx| Box::pin(read(ctx))))
  }

  /// A reader that always yields the given snapshot.
  pub fn value(value: Snapshot) -> Self {
    Self::new(move |_ctx| {
      let value = value.clone();
      async move { Ok(value) }
    })
  }

  /// Run all readers concurrently; the composite snapshot is the array of
  /// child snapshots in authoring order. Every child is awaited; if any
  /// failed, the composite fails with the first error in authoring order.
  pub fn tuple(children: Vec<State<C>>) -> Self {
    Self::new(move |ctx: C| {
      let children = children.clone();
      async move {
        let reads = children.iter().map(|child| child.read(ctx.clone()));
        let results = future::join_all(reads).await;
        let mut slots = Vec::with_capacity(results.len());
        for result in results {
          slots.push(result?);
        }
        Ok(Value::Array(slots))
      }
    })
  }

  /// Keyed form of [State::tuple]: the composite snapshot is an object with
  /// one entry per child, keys preserved.
  pub fn record(children: Vec<(String, State<C>)>) -> Self {
    Self::new(move |ctx: C| {
      let children = children.clone();
      async move {
        let reads = children.iter().map(|(_, child)| child.read(ctx.clone()));
        let results = future::join_all(reads).await;
        let mut entries = serde_json::Map::with_capacity(children.len());
        for ((key, _), result) in children.iter().zip(results) {
          entries.insert(key.clone(), result?);
        }
        Ok(Value::Object(entries))
      }
    })
  }

  /// Read a snapshot of the world for the given context.
  pub async fn read(&self, ctx: C) -> GoalResult<Snapshot> {
    (self.0)(ctx).await
  }

  /// Re-base this reader onto another context type.
  pub fn map<C2>(&self, f: ContextMap<C2, C>) -> State<C2>
  where
    C2: Clone + Send + Sync + 'static,
  {
    let inner = self.0.clone();
    State(Arc::new(move |ctx: C2| inner(f(&ctx))))
  }
}
