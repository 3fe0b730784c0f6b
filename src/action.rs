//! Remediation actions: effectful mutators invoked when a goal's check fails.

use crate::error::GoalResult;
use crate::state::{ContextMap, Snapshot};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

type RunFn<C> = dyn Fn(C, Option<Snapshot>) -> BoxFuture<'static, GoalResult<()>> + Send + Sync;

/// An effectful mutator that drives the world toward a goal.
///
/// The snapshot argument is `None` when the world was unreadable at invocation
/// time. The return value carries only success or failure; actions are not
/// composed by the engine.
pub struct Action<C>(Arc<RunFn<C>>);

impl<C> Clone for Action<C> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<C: Clone + Send + Sync + 'static> Action<C> {
  /// Wrap an async closure as an action.
  pub fn new<F, Fut>(run: F) -> Self
  where
    F: Fn(C, Option<Snapshot>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GoalResult<()>> + Send + 'static,
  {
    Self(Arc::new(move |ctx, snapshot| Box::pin(run(ctx, snapshot))))
  }

  /// Run the action against the world.
  pub async fn run(&self, ctx: C, snapshot: Option<Snapshot>) -> GoalResult<()> {
    (self.0)(ctx, snapshot).await
  }

  /// Re-base this action onto another context type.
  pub fn map<C2>(&self, f: ContextMap<C2, C>) -> Action<C2>
  where
    C2: Clone + Send + Sync + 'static,
  {
    let inner = self.0.clone();
    Action(Arc::new(move |ctx: C2, snapshot| inner(f(&ctx), snapshot)))
  }
}
