use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bandhub_core::ports::{ScriptId, ScriptSource, ScriptSourceError};
use tracing::debug;

/// Scripts leídos del sistema de ficheros.
///
/// Las rutas relativas se resuelven contra `base_dir` (el directorio de
/// trabajo en la consola). La identidad de un script es su ruta canónica, de
/// modo que `a.txt`, `./a.txt` y la ruta absoluta son el mismo script.
#[derive(Debug, Clone)]
pub struct FsScriptSource {
  base_dir: PathBuf,
}

impl FsScriptSource {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self { base_dir: base_dir.into() }
  }

  /// Usa el directorio de trabajo actual como base.
  pub fn from_current_dir() -> std::io::Result<Self> {
    Ok(Self::new(std::env::current_dir()?))
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  fn locate(&self, reference: &str) -> PathBuf {
    let path = Path::new(reference.trim());
    if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
  }
}

impl ScriptSource for FsScriptSource {
  fn resolve(&self, _parent: Option<&ScriptId>, reference: &str) -> ScriptId {
    let path = self.locate(reference);
    // Un fichero inexistente no se puede canonicalizar; conserva la ruta
    // absoluta para que `read_lines` informe de que falta.
    let path = fs::canonicalize(&path).unwrap_or(path);
    ScriptId::new(path.to_string_lossy())
  }

  fn read_lines(&self, id: &ScriptId) -> Result<Vec<String>, ScriptSourceError> {
    debug!(script = %id, "reading script");
    match fs::read_to_string(id.as_str()) {
      Ok(text) => Ok(text.lines().map(str::to_string).collect()),
      Err(e) if e.kind() == ErrorKind::NotFound => Err(ScriptSourceError::NotFound(id.clone())),
      Err(e) => Err(ScriptSourceError::Io { id: id.clone(), message: e.to_string() }),
    }
  }
}
