use std::path::PathBuf;

use clap::Parser;

/// Console client for the shared bands collection.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bandhub", version, about)]
pub struct Cli {
  /// Authority address (`host:port`), overrides `[client].server_addr`.
  #[arg(long)]
  pub server: Option<String>,

  /// Use an in-process authority instead of connecting to a server.
  #[arg(long)]
  pub offline: bool,

  /// Run one script non-interactively and exit.
  #[arg(long, value_name = "PATH")]
  pub script: Option<PathBuf>,

  /// Per-request timeout in milliseconds.
  #[arg(long, value_name = "MS")]
  pub timeout_ms: Option<u64>,

  /// Log level when `RUST_LOG` is not set (trace, debug, info, warn, error).
  #[arg(long, value_name = "LEVEL")]
  pub log_level: Option<String>,
}
