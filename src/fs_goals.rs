//! Filesystem goals: the canonical edge-agent remediations.
//!
//! These are thin layers over the goal API; hosts with richer worlds
//! (container daemons, HTTP endpoints) build their own the same way.

use crate::error::{GoalError, GoalResult};
use crate::goal::Goal;
use crate::state::Snapshot;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Context for [file_exists]: the file to ensure.
#[derive(Debug, Clone)]
pub struct FileCtx {
  pub path: PathBuf,
}

/// Context for [file_has_line]: the file and the exact line it must contain.
#[derive(Debug, Clone)]
pub struct LineCtx {
  pub path: PathBuf,
  pub line: String,
}

/// The file at `ctx.path` exists; the remediation creates it empty (and any
/// missing parent directories).
pub fn file_exists() -> Goal<FileCtx> {
  Goal::new(|ctx: FileCtx| async move {
    let exists = tokio::fs::try_exists(&ctx.path).await?;
    Ok(Value::Bool(exists))
  })
  .with_action(|ctx: FileCtx, _snapshot| async move {
    if let Some(parent) = ctx.path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&ctx.path, b"").await?;
    Ok(())
  })
  .described(|ctx| format!("file {} exists", ctx.path.display()))
}

/// The file at `ctx.path` contains `ctx.line` as an exact line.
///
/// The probe signals a missing state when the file does not exist. The
/// remediation rewrites the file with the line appended exactly once,
/// stripping duplicates. The file existing is a pre-condition, reached
/// through [file_exists] re-based from this context.
pub fn file_has_line() -> Goal<LineCtx> {
  Goal::new(read_lines_state)
    .with_check(|ctx: &LineCtx, snapshot: &Snapshot| match snapshot {
      Value::String(text) => text.lines().any(|line| line == ctx.line),
      _ => false,
    })
    .with_action(|ctx: LineCtx, snapshot| async move {
      let text = match snapshot {
        Some(Value::String(text)) => text,
        _ => String::new(),
      };
      let mut lines: Vec<&str> = text.lines().filter(|line| *line != ctx.line).collect();
      lines.push(&ctx.line);
      let mut body = lines.join("\n");
      body.push('\n');
      tokio::fs::write(&ctx.path, body).await?;
      Ok(())
    })
    .requires(&file_exists().map(|ctx: &LineCtx| FileCtx {
      path: ctx.path.clone(),
    }))
    .described(|ctx| format!("{} has line {:?}", ctx.path.display(), ctx.line))
}

async fn read_lines_state(ctx: LineCtx) -> GoalResult<Snapshot> {
  match tokio::fs::read_to_string(&ctx.path).await {
    Ok(text) => Ok(Value::String(text)),
    Err(error) if error.kind() == ErrorKind::NotFound => Err(GoalError::state_not_found_with(
      format!("no file at {}", ctx.path.display()),
      error,
    )),
    Err(error) => Err(error.into()),
  }
}
