//! Ejecución de scripts de comandos.
//!
//! Un script es texto plano con un comando por línea. Las líneas en blanco y
//! las que empiezan por `#` se ignoran; `execute_script <ruta>` incluye otro
//! script. Antes de ejecutar nada se recorre el grafo de inclusiones
//! ([`scan::check_recursion`]) y se aborta si hay un ciclo.

pub mod engine;
pub mod memory;
pub mod scan;

use thiserror::Error;

use crate::ports::script_source::{ScriptId, ScriptSourceError};
use crate::protocol::Command;

pub use engine::{LineOutcome, LineResult, ScriptReport, ScriptRunner};
pub use memory::InMemoryScripts;
pub use scan::{MissingScript, ScanReport, check_recursion};

#[derive(Debug, Error)]
pub enum ScriptError {
  /// `chain` empieza en el script raíz y termina en el que se repite.
  #[error("script recursion detected: {}", format_chain(.chain))]
  Recursion { chain: Vec<ScriptId> },

  #[error(transparent)]
  Source(#[from] ScriptSourceError),

  #[error("scripts can only be run by an authenticated user")]
  NotAuthenticated,
}

fn format_chain(chain: &[ScriptId]) -> String {
  chain.iter().map(ScriptId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// Una línea con contenido: el primer token es el comando, el resto argumentos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
  pub name: String,
  pub args: Vec<String>,
}

impl ScriptLine {
  /// `None` para líneas en blanco y comentarios.
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let name = tokens.next()?.to_string();
    let args = tokens.map(str::to_string).collect();
    Some(Self { name, args })
  }

  /// Comando de la línea; los nombres desconocidos se convierten en `help`.
  pub fn command(&self) -> Command {
    Command::resolve(&self.name)
  }

  pub fn arg(&self, index: usize) -> Option<&str> {
    self.args.get(index).map(String::as_str)
  }

  /// Todo lo que sigue al comando, útil para rutas con espacios.
  pub fn rest(&self) -> Option<String> {
    if self.args.is_empty() { None } else { Some(self.args.join(" ")) }
  }
}
