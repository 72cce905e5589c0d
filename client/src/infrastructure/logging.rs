use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so it never mixes with console output.
///
/// `RUST_LOG` wins; otherwise `level` is used, and anything unrecognised means `info`.
pub fn init(level: &str) {
  let fallback = normalize_level(level);
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(fallback))
    .unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).try_init();
}

fn normalize_level(level: &str) -> &'static str {
  match level.trim().to_ascii_lowercase().as_str() {
    "trace" => "trace",
    "debug" => "debug",
    "info" => "info",
    "warn" | "warning" => "warn",
    "error" => "error",
    "off" => "off",
    _ => "info",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_levels_mean_info() {
    assert_eq!(normalize_level(" DEBUG "), "debug");
    assert_eq!(normalize_level("warning"), "warn");
    assert_eq!(normalize_level("loud"), "info");
  }
}
