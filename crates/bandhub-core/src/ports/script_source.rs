use serde::{Deserialize, Serialize};
use std::fmt;

/// Identidad de un script; dos referencias al mismo script deben resolverse
/// al mismo `ScriptId` para que la detección de ciclos funcione.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptId(String);

impl ScriptId {
  pub fn new(id: impl Into<String>) -> Self {
    ScriptId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ScriptId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptSourceError {
  #[error("script not found: {0}")]
  NotFound(ScriptId),

  #[error("io error reading {id}: {message}")]
  Io { id: ScriptId, message: String },
}

/// Port que abstrae de dónde salen los scripts.
///
/// Implementaciones:
/// - sistema de ficheros (`bandhub-fs`)
/// - mapa en memoria (tests)
pub trait ScriptSource: Send + Sync {
  /// Convierte una referencia escrita en un script en su identidad.
  ///
  /// `parent` es el script que contiene la referencia, si lo hay, para poder
  /// resolver rutas relativas.
  fn resolve(&self, parent: Option<&ScriptId>, reference: &str) -> ScriptId;

  /// Lee todas las líneas del script, en orden.
  fn read_lines(&self, id: &ScriptId) -> Result<Vec<String>, ScriptSourceError>;
}
