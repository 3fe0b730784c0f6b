//! CLI: drive a config-line goal to completion.
//!
//! Usage: `ensure_line <file> <line>`
//! Example: ensure_line /etc/agent.conf loglevel=info
//!
//! Exits 0 when the goal is reached, 1 otherwise. Progress lines are emitted
//! at INFO level; set RUST_LOG=goalseek=trace for engine internals.

use clap::Parser;
use goalseek::fs_goals::{self, LineCtx};
use goalseek::TraceLogger;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Ensure a file contains an exact line, creating the file if needed.
#[derive(Parser, Debug)]
#[command(name = "ensure_line")]
struct Args {
  /// Path of the file to reconcile
  #[arg(value_name = "file")]
  file: PathBuf,

  /// Exact line the file must contain
  #[arg(value_name = "line")]
  line: String,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  let ctx = LineCtx {
    path: args.file,
    line: args.line,
  };

  match fs_goals::file_has_line().seek_with(&ctx, &TraceLogger).await {
    Ok(true) => {
      info!(path = %ctx.path.display(), "goal reached");
    }
    Ok(false) => {
      eprintln!("Goal not reached: {}", ctx.path.display());
      process::exit(1);
    }
    Err(e) => {
      eprintln!("Error seeking goal: {}", e);
      process::exit(1);
    }
  }
}
