//! User-facing goal handles: builders, combinators, and the seek entry point.

use crate::action::Action;
use crate::check::Check;
use crate::error::GoalResult;
use crate::logger::{Logger, NopLogger};
use crate::node::{Node, Operator};
use crate::seek;
use crate::state::{ContextMap, Snapshot, State};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// A declared system condition: probe-able, seekable, composable.
///
/// A goal owns one graph node by shared reference; every combinator returns a
/// new goal and the wrapped sub-graph may be shared between parents. Cloning
/// is cheap.
pub struct Goal<C> {
  node: Arc<Node<C>>,
}

impl<C> Clone for Goal<C> {
  fn clone(&self) -> Self {
    Self {
      node: self.node.clone(),
    }
  }
}

impl<C: Clone + Send + Sync + 'static> Goal<C> {
  /// Build a goal from an async state reader. The default check passes when
  /// the snapshot is truthy.
  pub fn new<F, Fut>(state: F) -> Self
  where
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GoalResult<Snapshot>> + Send + 'static,
  {
    Self::from_state(State::new(state))
  }

  /// Build a goal from an existing reader, with the truthy default check.
  pub fn from_state(state: State<C>) -> Self {
    Self::from_node(Node::testable(state, Check::truthy()))
  }

  pub(crate) fn from_node(node: Node<C>) -> Self {
    Self {
      node: Arc::new(node),
    }
  }

  /// Unconditionally satisfied.
  pub fn always() -> Self {
    Self::from_state(State::value(Value::Bool(true))).described(|_| "always".to_string())
  }

  /// Unconditionally unsatisfied.
  pub fn never() -> Self {
    Self::from_state(State::value(Value::Bool(false))).described(|_| "never".to_string())
  }

  /// Replace the check applied to this goal's snapshot.
  pub fn with_check<F>(&self, check: F) -> Self
  where
    F: Fn(&C, &Snapshot) -> bool + Send + Sync + 'static,
  {
    Self::from_node(self.node.with_check(Check::new(check)))
  }

  /// Attach a remediation action, run when the check fails. On an operation
  /// goal this discards the operator and keeps the aggregated state/check.
  pub fn with_action<F, Fut>(&self, action: F) -> Self
  where
    F: Fn(C, Option<Snapshot>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GoalResult<()>> + Send + 'static,
  {
    Self::from_node(self.node.with_action(Action::new(action)))
  }

  /// Require another goal to hold before this goal's action may run.
  pub fn requires(&self, pre: &Goal<C>) -> Self {
    Self::from_node(self.node.with_requires(pre.node.clone()))
  }

  /// Attach a label formatter used in log lines.
  pub fn described<F>(&self, describe: F) -> Self
  where
    F: Fn(&C) -> String + Send + Sync + 'static,
  {
    Self::from_node(self.node.with_describe(Arc::new(describe)))
  }

  /// Sequential conjunction: children seek left to right, stopping at the
  /// first failure; a child error aborts.
  pub fn and(goals: Vec<Goal<C>>) -> Self {
    Self::operation(Operator::And, goals)
  }

  /// Sequential disjunction: children seek left to right, stopping at the
  /// first success. A child that fails (even with an error) means "not yet
  /// true, try the next".
  pub fn or(goals: Vec<Goal<C>>) -> Self {
    Self::operation(Operator::Or, goals)
  }

  /// Parallel conjunction: every child seeks concurrently and is awaited;
  /// one failure fails the whole, one child error aborts the whole.
  pub fn all(goals: Vec<Goal<C>>) -> Self {
    Self::operation(Operator::All, goals)
  }

  /// Parallel disjunction: every child seeks concurrently and is awaited;
  /// one success suffices and child errors are absorbed.
  pub fn any(goals: Vec<Goal<C>>) -> Self {
    Self::operation(Operator::Any, goals)
  }

  fn operation(op: Operator, goals: Vec<Goal<C>>) -> Self {
    Self::from_node(Node::operation(
      op,
      goals.into_iter().map(|goal| goal.node).collect(),
    ))
  }

  /// Keyed aggregation: every named child must hold, and the aggregated
  /// snapshot is an object keyed by the given names. Children seek
  /// concurrently as in [Goal::all].
  pub fn record<S: Into<String>>(goals: Vec<(S, Goal<C>)>) -> Self {
    Self::from_node(Node::operation_record(
      Operator::All,
      goals
        .into_iter()
        .map(|(key, goal)| (key.into(), goal.node))
        .collect(),
    ))
  }

  /// Re-base this goal (and its whole sub-graph) onto another context type,
  /// so a goal authored against `C` can be embedded in a graph whose context
  /// is `C2`.
  pub fn map<C2, F>(&self, f: F) -> Goal<C2>
  where
    C2: Clone + Send + Sync + 'static,
    F: Fn(&C2) -> C + Send + Sync + 'static,
  {
    let f: ContextMap<C2, C> = Arc::new(f);
    Goal {
      node: Arc::new(self.node.map(f)),
    }
  }

  /// Read this goal's (possibly aggregated) snapshot.
  pub async fn read(&self, ctx: &C) -> GoalResult<Snapshot> {
    self.node.state.read(ctx.clone()).await
  }

  /// Probe once: read the snapshot and apply the check. A missing state is a
  /// plain `false`; any other probe failure is an error.
  pub async fn check(&self, ctx: &C) -> GoalResult<bool> {
    seek::probe(&self.node, ctx, &self.node.label(ctx)).await
  }

  /// Drive the world toward this goal: probe, backtrack to pre-conditions,
  /// remediate at most once per node, re-verify.
  ///
  /// `Ok(true)` means the goal holds; `Ok(false)` means it could not be
  /// reached in this attempt. Re-invoking on a world that already satisfies
  /// the goal returns `Ok(true)` without side effects.
  pub async fn seek(&self, ctx: &C) -> GoalResult<bool> {
    self.seek_with(ctx, &NopLogger).await
  }

  /// Like [Goal::seek], reporting per-node progress lines to the given
  /// logger.
  pub async fn seek_with(&self, ctx: &C, log: &dyn Logger) -> GoalResult<bool> {
    seek::seek(&self.node, ctx, log).await
  }

  /// The underlying graph node (shared).
  pub fn node(&self) -> &Node<C> {
    &self.node
  }
}
