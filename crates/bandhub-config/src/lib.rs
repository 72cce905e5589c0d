mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{BASE_DIR_ENV, BandhubPaths, ConfigError};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<BandhubPaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Rutas del proceso (portable vía `BANDHUB_BASE_DIR` o las del sistema).
///
/// Se detectan la primera vez; si falla, la siguiente llamada vuelve a intentarlo.
pub fn paths() -> Result<&'static BandhubPaths, ConfigError> {
  PATHS.get_or_try_init(BandhubPaths::new)
}

/// Backend TOML compartido sobre [`paths`].
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| Ok(TomlConfigBackend::new(paths()?.clone())))
}
