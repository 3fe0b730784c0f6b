//! The goal graph datatype: a tagged sum of testable, actionable, and
//! operation nodes sharing a state/check prefix.

use crate::action::Action;
use crate::check::Check;
use crate::state::{ContextMap, State};
use std::sync::Arc;

/// Label formatter attached to a node for log lines.
pub type Describe<C> = Arc<dyn Fn(&C) -> String + Send + Sync>;

/// Operator of an operation node. Two axes: sequential (`And`/`Or`) versus
/// parallel (`All`/`Any`), conjunctive (`And`/`All`) versus disjunctive
/// (`Or`/`Any`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
  And,
  Or,
  All,
  Any,
}

/// Variant-specific payload of a [Node].
pub enum NodeKind<C> {
  /// A bare assertion with no remediation.
  Testable,
  /// An assertion with a remediation action.
  Actionable { action: Action<C> },
  /// A combinator over child nodes. `keys` is set for record-shaped
  /// aggregation and names each child's slot in the aggregated snapshot.
  Operation {
    op: Operator,
    children: Vec<Arc<Node<C>>>,
    keys: Option<Vec<String>>,
  },
}

impl<C> Clone for NodeKind<C> {
  fn clone(&self) -> Self {
    match self {
      Self::Testable => Self::Testable,
      Self::Actionable { action } => Self::Actionable {
        action: action.clone(),
      },
      Self::Operation { op, children, keys } => Self::Operation {
        op: *op,
        children: children.clone(),
        keys: keys.clone(),
      },
    }
  }
}

/// One node of a goal graph.
///
/// Nodes are immutable values: combinators build new nodes, never mutate, and
/// sub-graphs are shared behind `Arc` (a node can appear under several
/// parents). Every node carries a state reader and a check; the variant adds
/// remediation or combination on top.
pub struct Node<C> {
  pub(crate) state: State<C>,
  pub(crate) check: Check<C>,
  pub(crate) requires: Option<Arc<Node<C>>>,
  pub(crate) describe: Option<Describe<C>>,
  pub(crate) kind: NodeKind<C>,
}

impl<C> Clone for Node<C> {
  fn clone(&self) -> Self {
    Self {
      state: self.state.clone(),
      check: self.check.clone(),
      requires: self.requires.clone(),
      describe: self.describe.clone(),
      kind: self.kind.clone(),
    }
  }
}

impl<C: Clone + Send + Sync + 'static> Node<C> {
  /// A leaf assertion: read the state, apply the check.
  pub fn testable(state: State<C>, check: Check<C>) -> Self {
    Self {
      state,
      check,
      requires: None,
      describe: None,
      kind: NodeKind::Testable,
    }
  }

  /// Combine children under an operator.
  ///
  /// The aggregated state reads every child's state into an array in
  /// authoring order; the aggregated check is the conjunction (`And`/`All`)
  /// or disjunction (`Or`/`Any`) of the children's checks over aligned slots.
  /// The engine evaluates the children directly; the aggregate exists for
  /// external inspection and for embedding the operation where a leaf
  /// interface is required.
  ///
  /// Panics if `children` is empty.
  pub fn operation(op: Operator, children: Vec<Arc<Node<C>>>) -> Self {
    assert!(!children.is_empty(), "operation requires at least one child");
    let state = State::tuple(children.iter().map(|child| child.state.clone()).collect());
    let checks: Vec<Check<C>> = children.iter().map(|child| child.check.clone()).collect();
    let check = match op {
      Operator::And | Operator::All => Check::all(checks),
      Operator::Or | Operator::Any => Check::any(checks),
    };
    Self {
      state,
      check,
      requires: None,
      describe: None,
      kind: NodeKind::Operation {
        op,
        children,
        keys: None,
      },
    }
  }

  /// Keyed form of [Node::operation]: the aggregated snapshot is an object
  /// with one entry per child, keys preserved.
  ///
  /// Panics if `children` is empty.
  pub fn operation_record(op: Operator, children: Vec<(String, Arc<Node<C>>)>) -> Self {
    assert!(!children.is_empty(), "operation requires at least one child");
    let state = State::record(
      children
        .iter()
        .map(|(key, child)| (key.clone(), child.state.clone()))
        .collect(),
    );
    let checks: Vec<(String, Check<C>)> = children
      .iter()
      .map(|(key, child)| (key.clone(), child.check.clone()))
      .collect();
    let check = match op {
      Operator::And | Operator::All => Check::all_record(checks),
      Operator::Or | Operator::Any => Check::any_record(checks),
    };
    let keys = Some(children.iter().map(|(key, _)| key.clone()).collect());
    let children = children.into_iter().map(|(_, child)| child).collect();
    Self {
      state,
      check,
      requires: None,
      describe: None,
      kind: NodeKind::Operation { op, children, keys },
    }
  }

  /// Replace the check applied to this node's snapshot.
  pub fn with_check(&self, check: Check<C>) -> Self {
    let mut node = self.clone();
    node.check = check;
    node
  }

  /// Attach (or replace) the remediation action.
  ///
  /// On an operation node this discards the operator: the result is an
  /// actionable leaf over the operation's aggregated state and check.
  pub fn with_action(&self, action: Action<C>) -> Self {
    let mut node = self.clone();
    node.kind = NodeKind::Actionable { action };
    node
  }

  /// Attach (or replace) the pre-condition sub-node, consulted by the engine
  /// before the action runs.
  ///
  /// On an operation node this discards the operator, leaving a leaf over the
  /// aggregated state and check (actionable once an action is attached).
  pub fn with_requires(&self, requires: Arc<Node<C>>) -> Self {
    let mut node = self.clone();
    if matches!(node.kind, NodeKind::Operation { .. }) {
      node.kind = NodeKind::Testable;
    }
    node.requires = Some(requires);
    node
  }

  /// Attach a label formatter used in log lines.
  pub fn with_describe(&self, describe: Describe<C>) -> Self {
    let mut node = self.clone();
    node.describe = Some(describe);
    node
  }

  /// The label used in log lines: the description applied to the context, or
  /// "anonymous goal".
  pub fn label(&self, ctx: &C) -> String {
    match &self.describe {
      Some(describe) => describe(ctx),
      None => "anonymous goal".to_string(),
    }
  }

  /// The operator, when this node is an operation.
  pub fn operator(&self) -> Option<Operator> {
    match &self.kind {
      NodeKind::Operation { op, .. } => Some(*op),
      _ => None,
    }
  }

  /// True when this node carries a remediation action.
  pub fn is_actionable(&self) -> bool {
    matches!(self.kind, NodeKind::Actionable { .. })
  }

  /// Structurally re-base this node (and its whole sub-graph) onto another
  /// context type. Variant tags are preserved; children and the
  /// pre-condition are re-mapped recursively.
  pub fn map<C2>(&self, f: ContextMap<C2, C>) -> Node<C2>
  where
    C2: Clone + Send + Sync + 'static,
  {
    let kind = match &self.kind {
      NodeKind::Testable => NodeKind::Testable,
      NodeKind::Actionable { action } => NodeKind::Actionable {
        action: action.map(f.clone()),
      },
      NodeKind::Operation { op, children, keys } => NodeKind::Operation {
        op: *op,
        children: children
          .iter()
          .map(|child| Arc::new(child.map(f.clone())))
          .collect(),
        keys: keys.clone(),
      },
    };
    Node {
      state: self.state.map(f.clone()),
      check: self.check.map(f.clone()),
      requires: self
        .requires
        .as_ref()
        .map(|requires| Arc::new(requires.map(f.clone()))),
      describe: self.describe.as_ref().map(|describe| {
        let describe = describe.clone();
        let f = f.clone();
        Arc::new(move |ctx: &C2| describe(&f(ctx))) as Describe<C2>
      }),
      kind,
    }
  }
}
