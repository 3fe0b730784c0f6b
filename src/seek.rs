//! The recursive evaluator: probe, backtrack to pre-conditions, act at most
//! once, re-verify.

use crate::error::GoalResult;
use crate::logger::Logger;
use crate::node::{Node, NodeKind, Operator};
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Drive the world toward the goal rooted at `node`.
///
/// Returns `Ok(true)` when the goal holds (possibly after remediation) and
/// `Ok(false)` when it could not be reached in this attempt; both are normal
/// outcomes. An error means an unexpected probe or action failure and aborts
/// the subtree being evaluated.
pub(crate) fn seek<'a, C>(
  node: &'a Node<C>,
  ctx: &'a C,
  log: &'a dyn Logger,
) -> BoxFuture<'a, GoalResult<bool>>
where
  C: Clone + Send + Sync + 'static,
{
  Box::pin(async move {
    if let NodeKind::Operation { op, children, .. } = &node.kind {
      return seek_operation(*op, children, ctx, log).await;
    }

    let label = node.label(ctx);
    log.info(&format!("{label}: checking…"));
    if probe(node, ctx, &label).await? {
      log.info(&format!("{label}: ready!"));
      return Ok(true);
    }

    let NodeKind::Actionable { action } = &node.kind else {
      log.info(&format!("{label}: failed!"));
      return Ok(false);
    };
    log.info(&format!("{label}: not ready"));

    if let Some(requires) = &node.requires {
      log.info(&format!("{label}: seeking preconditions…"));
      if !seek(requires, ctx, log).await? {
        log.info(&format!("{label}: failed!"));
        return Ok(false);
      }
      log.info(&format!("{label}: preconditions met!"));
    }

    log.info(&format!("{label}: running the action…"));
    // The pre-conditions may have changed the world; a failing re-read hands
    // the action an empty snapshot instead of aborting.
    let snapshot = node.state.read(ctx.clone()).await.ok();
    action
      .run(ctx.clone(), snapshot)
      .await
      .map_err(|error| error.tagged(&label))?;

    if probe(node, ctx, &label).await? {
      log.info(&format!("{label}: ready!"));
      Ok(true)
    } else {
      log.info(&format!("{label}: failed!"));
      Ok(false)
    }
  })
}

/// Evaluate an operation's children by the operator's rule. No probe or
/// action runs at this level.
#[instrument(level = "trace", skip(children, ctx, log), fields(children = children.len()))]
async fn seek_operation<C>(
  op: Operator,
  children: &[Arc<Node<C>>],
  ctx: &C,
  log: &dyn Logger,
) -> GoalResult<bool>
where
  C: Clone + Send + Sync + 'static,
{
  match op {
    Operator::And => {
      for child in children {
        if !seek(child, ctx, log).await? {
          return Ok(false);
        }
      }
      Ok(true)
    }
    Operator::Or => {
      for child in children {
        match seek(child, ctx, log).await {
          Ok(true) => return Ok(true),
          Ok(false) => {}
          Err(error) => {
            debug!(%error, "or-child failed; trying the next alternative");
          }
        }
      }
      Ok(false)
    }
    Operator::All => {
      let results = future::join_all(children.iter().map(|child| seek(child, ctx, log))).await;
      let mut holds = true;
      for result in results {
        holds &= result?;
      }
      Ok(holds)
    }
    Operator::Any => {
      let results = future::join_all(children.iter().map(|child| seek(child, ctx, log))).await;
      let mut holds = false;
      for result in results {
        match result {
          Ok(true) => holds = true,
          Ok(false) => {}
          Err(error) => {
            debug!(%error, "any-child failed; absorbed");
          }
        }
      }
      Ok(holds)
    }
  }
}

/// Read the node's state and apply its check. A missing-state signal is a
/// failed probe, not a fault; any other read failure propagates.
#[instrument(level = "trace", skip(node, ctx))]
pub(crate) async fn probe<C>(node: &Node<C>, ctx: &C, label: &str) -> GoalResult<bool>
where
  C: Clone + Send + Sync + 'static,
{
  match node.state.read(ctx.clone()).await {
    Ok(snapshot) => Ok(node.check.eval(ctx, &snapshot)),
    Err(error) if error.is_state_not_found() => {
      trace!(label, "state not found; probe fails");
      Ok(false)
    }
    Err(error) => Err(error.tagged(label)),
  }
}
