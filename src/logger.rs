//! Log sink for the engine's per-goal progress lines.
//!
//! The engine reports one line per event (`checking…`, `ready!`, …) through an
//! injected [Logger]. The library default is [NopLogger]; hosts that want the
//! lines wire in [TraceLogger] or their own sink.

use std::sync::Mutex;

/// Receives one line per engine event.
pub trait Logger: Send + Sync {
  fn info(&self, message: &str);
}

/// Discards every line. The library default.
pub struct NopLogger;

impl Logger for NopLogger {
  fn info(&self, _message: &str) {}
}

/// Forwards lines to `tracing::info!`.
pub struct TraceLogger;

impl Logger for TraceLogger {
  fn info(&self, message: &str) {
    tracing::info!("{message}");
  }
}

/// Records lines in memory, in arrival order. For tests and embedding hosts.
#[derive(Default)]
pub struct BufferLogger {
  lines: Mutex<Vec<String>>,
}

impl BufferLogger {
  pub fn new() -> Self {
    Self::default()
  }

  /// The lines recorded so far.
  pub fn lines(&self) -> Vec<String> {
    self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
  }
}

impl Logger for BufferLogger {
  fn info(&self, message: &str) {
    if let Ok(mut lines) = self.lines.lock() {
      lines.push(message.to_string());
    }
  }
}
