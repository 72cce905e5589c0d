mod batch;
mod cli;
mod config;
mod console;
mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use bandhub_core::ports::Transport;
use bandhub_core::script::ScriptRunner;
use bandhub_core::services::{BandClient, Dispatcher, RefreshPoller};
use bandhub_fs::FsScriptSource;
use bandhub_storage::MemoryAuthority;
use clap::Parser;
use tracing::info;

use crate::cli::Cli;
use crate::config::{ClientConfig, LogConfig};
use crate::console::Console;
use crate::infrastructure::{logging, tcp_transport::TcpTransport};

pub fn run() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // --- Configuration ---
  // File first, then command-line overrides.
  let mut config = ClientConfig::load().context("loading [client] configuration")?;
  config.apply_overrides(&cli);
  let log = LogConfig::load().context("loading [log] configuration")?;

  logging::init(cli.log_level.as_deref().unwrap_or(&log.level));

  // --- Runtime ---
  // Workers only; the console loop stays on the main thread.
  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .thread_name("bandhub-worker")
    .build()
    .context("starting the async runtime")?;

  // --- Transport ---
  let transport: Arc<dyn Transport> = if config.offline {
    info!("offline mode: using an in-process authority");
    Arc::new(MemoryAuthority::new())
  } else {
    info!(addr = %config.server_addr, "using remote authority");
    Arc::new(TcpTransport::new(config.server_addr.clone()))
  };
  let client = BandClient::new(transport).with_timeout(config.request_timeout());

  // --- Scripts ---
  let scripts = ScriptRunner::new(Arc::new(FsScriptSource::from_current_dir().context("reading working directory")?));

  match cli.script {
    Some(path) => batch::run_script(&runtime, &client, &scripts, &path, config.offline),
    None => {
      let (dispatcher, events) = Dispatcher::new(client, runtime.handle().clone());
      let poller = RefreshPoller::new(config.refresh_interval(), runtime.handle().clone());
      Console::new(dispatcher, events, scripts, poller).run()
    }
  }
}
