use std::time::Duration;

use bandhub_config::{ConfigBackend, ConfigError, TomlConfigBackend, config_backend};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// `[client]` section of `bandhub.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
  /// Authority address, `host:port`.
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  #[serde(default = "default_request_timeout_ms")]
  pub request_timeout_ms: u64,

  /// Refresh period of the data view while it is visible.
  #[serde(default = "default_refresh_interval_ms")]
  pub refresh_interval_ms: u64,

  /// Talk to an in-process authority instead of the network.
  #[serde(default)]
  pub offline: bool,
}

fn default_server_addr() -> String {
  "127.0.0.1:5555".into()
}

fn default_request_timeout_ms() -> u64 {
  5_000
}

fn default_refresh_interval_ms() -> u64 {
  3_000
}

impl Default for ClientConfig {
  fn default() -> Self {
    ClientConfig {
      server_addr: default_server_addr(),
      request_timeout_ms: default_request_timeout_ms(),
      refresh_interval_ms: default_refresh_interval_ms(),
      offline: false,
    }
  }
}

impl ClientConfig {
  const SECTION: &'static str = "client";

  /// Loads the section (defaults when absent) and writes it back so the file
  /// always lists every key.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default(Self::SECTION)?;
    backend.save_section(Self::SECTION, &cfg)?;
    Ok(cfg)
  }

  /// Command-line flags win over the file, but are not persisted.
  pub fn apply_overrides(&mut self, cli: &Cli) {
    if let Some(server) = &cli.server {
      self.server_addr = server.clone();
    }
    if let Some(timeout) = cli.timeout_ms {
      self.request_timeout_ms = timeout;
    }
    if cli.offline {
      self.offline = true;
    }
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }

  pub fn refresh_interval(&self) -> Duration {
    Duration::from_millis(self.refresh_interval_ms)
  }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
  #[serde(default = "default_level")]
  pub level: String,
}

fn default_level() -> String {
  "info".into()
}

impl Default for LogConfig {
  fn default() -> Self {
    LogConfig { level: default_level() }
  }
}

impl LogConfig {
  const SECTION: &'static str = "log";

  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default(Self::SECTION)?;
    backend.save_section(Self::SECTION, &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bandhub_config::BandhubPaths;
  use tempfile::tempdir;

  #[test]
  fn first_load_writes_the_defaults() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(BandhubPaths::rooted(tmp.path()).unwrap());

    let cfg = ClientConfig::load_from(&backend).unwrap();
    let log = LogConfig::load_from(&backend).unwrap();

    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(log.level, "info");
    let text = std::fs::read_to_string(backend.paths().config_file()).unwrap();
    assert!(text.contains("refresh_interval_ms = 3000"));
    assert!(text.contains("[log]"));
  }

  #[test]
  fn missing_keys_fall_back_to_defaults() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(BandhubPaths::rooted(tmp.path()).unwrap());
    std::fs::write(backend.paths().config_file(), "[client]\nserver_addr = \"10.0.0.1:7000\"\n").unwrap();

    let cfg = ClientConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.server_addr, "10.0.0.1:7000");
    assert_eq!(cfg.request_timeout_ms, 5_000);
  }

  #[test]
  fn cli_overrides_the_file() {
    let mut cfg = ClientConfig::default();
    let cli = Cli { server: Some("example:1".into()), offline: true, timeout_ms: Some(10), ..Cli::default() };

    cfg.apply_overrides(&cli);

    assert_eq!(cfg.server_addr, "example:1");
    assert!(cfg.offline);
    assert_eq!(cfg.request_timeout(), Duration::from_millis(10));
  }
}
