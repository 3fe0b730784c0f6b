//! Error type for probes, actions, and the seek engine.

use thiserror::Error;

/// Boxed source error carried by [GoalError].
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type GoalResult<T> = std::result::Result<T, GoalError>;

/// Errors surfaced by probes, actions, and the seek engine.
///
/// The two variants are dispatched on very differently: [GoalError::StateNotFound]
/// is the benign "the world has no readable snapshot right now" signal, which the
/// engine demotes to a failed check; everything else travels as
/// [GoalError::Failed] and aborts the subtree being evaluated.
#[derive(Debug, Error)]
pub enum GoalError {
  /// The world currently presents no snapshot to read.
  #[error("state not found: {message}")]
  StateNotFound {
    message: String,
    #[source]
    cause: Option<Cause>,
  },

  /// Unexpected failure from a probe or action. `goal` is filled in with the
  /// failing node's label once the engine knows one.
  #[error("{}: {}", .goal.as_deref().unwrap_or("anonymous goal"), .source)]
  Failed {
    goal: Option<String>,
    #[source]
    source: Cause,
  },
}

/// Free-form failure raised by probe or action bodies.
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl GoalError {
  /// Signal that the world currently presents no snapshot to read.
  pub fn state_not_found(message: impl Into<String>) -> Self {
    Self::StateNotFound {
      message: message.into(),
      cause: None,
    }
  }

  /// Like [GoalError::state_not_found], keeping the underlying read error.
  pub fn state_not_found_with(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
    Self::StateNotFound {
      message: message.into(),
      cause: Some(cause.into()),
    }
  }

  /// Wrap an arbitrary probe or action failure.
  pub fn failed(source: impl Into<Cause>) -> Self {
    Self::Failed {
      goal: None,
      source: source.into(),
    }
  }

  /// A failure described only by a message.
  pub fn message(message: impl Into<String>) -> Self {
    Self::failed(Message(message.into()))
  }

  /// Returns true for the state-absence signal.
  pub fn is_state_not_found(&self) -> bool {
    matches!(self, Self::StateNotFound { .. })
  }

  /// Fills in the failing goal's label unless one was already recorded.
  pub(crate) fn tagged(self, label: &str) -> Self {
    match self {
      Self::Failed { goal: None, source } => Self::Failed {
        goal: Some(label.to_string()),
        source,
      },
      other => other,
    }
  }
}

impl From<std::io::Error> for GoalError {
  fn from(error: std::io::Error) -> Self {
    Self::failed(error)
  }
}
