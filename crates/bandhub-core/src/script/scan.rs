use std::collections::HashSet;

use tracing::{debug, warn};

use super::{ScriptError, ScriptLine};
use crate::ports::script_source::{ScriptId, ScriptSource};
use crate::protocol::Command;

/// Script incluido que no se pudo leer; su rama se trata como ausente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingScript {
  pub id: ScriptId,
  pub referenced_from: ScriptId,
  pub reason: String,
}

/// Resultado de un recorrido sin ciclos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
  /// Scripts abiertos, en orden de visita (un script incluido desde dos ramas aparece dos veces).
  pub visited: Vec<ScriptId>,
  pub missing: Vec<MissingScript>,
}

// =============================================================================
// Estado interno
// =============================================================================

enum Frame {
  /// Script referenciado que aún no se ha leído.
  Pending { id: ScriptId, parent: Option<ScriptId> },
  /// Script leído del que quedan inclusiones por visitar.
  Open { id: ScriptId, includes: std::vec::IntoIter<ScriptId> },
}

/// Recorre en profundidad `root` y todo lo que incluye con `execute_script`.
///
/// Mantiene el conjunto de scripts del camino actual: se inserta al abrir un
/// script y se retira al terminar su subárbol, de modo que un mismo script
/// puede aparecer en ramas hermanas pero no dentro de sí mismo.
///
/// No ejecuta nada. Un script incluido que falta se anota en
/// [`ScanReport::missing`]; si falta la raíz se devuelve el error.
pub fn check_recursion<S: ScriptSource + ?Sized>(source: &S, root: &ScriptId) -> Result<ScanReport, ScriptError> {
  let mut stack = Vec::with_capacity(8);
  stack.push(Frame::Pending { id: root.clone(), parent: None });

  let mut on_path: HashSet<ScriptId> = HashSet::new();
  let mut path: Vec<ScriptId> = Vec::new();
  let mut report = ScanReport::default();

  while let Some(frame) = stack.pop() {
    match frame {
      Frame::Pending { id, parent } => {
        if on_path.contains(&id) {
          let mut chain = path.clone();
          chain.push(id);
          warn!(chain = ?chain, "script recursion detected");
          return Err(ScriptError::Recursion { chain });
        }

        let lines = match (source.read_lines(&id), parent) {
          (Ok(lines), _) => lines,
          (Err(e), None) => return Err(e.into()),
          (Err(e), Some(parent)) => {
            warn!(script = %id, from = %parent, error = %e, "included script unavailable, skipping branch");
            report.missing.push(MissingScript { id, referenced_from: parent, reason: e.to_string() });
            continue;
          }
        };

        let includes: Vec<ScriptId> = lines
          .iter()
          .filter_map(|raw| ScriptLine::parse(raw))
          .filter(|line| line.command() == Command::ExecuteScript)
          .filter_map(|line| line.rest())
          .map(|reference| source.resolve(Some(&id), &reference))
          .collect();

        debug!(script = %id, includes = includes.len(), "scanned script");
        on_path.insert(id.clone());
        path.push(id.clone());
        report.visited.push(id.clone());
        stack.push(Frame::Open { id, includes: includes.into_iter() });
      }

      Frame::Open { id, mut includes } => match includes.next() {
        Some(child) => {
          let parent = id.clone();
          stack.push(Frame::Open { id, includes });
          stack.push(Frame::Pending { id: child, parent: Some(parent) });
        }
        None => {
          // Subárbol completo: el script sale del camino.
          on_path.remove(&id);
          path.pop();
        }
      },
    }
  }

  Ok(report)
}
