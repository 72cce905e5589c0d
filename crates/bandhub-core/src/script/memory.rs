use std::collections::HashMap;

use crate::ports::script_source::{ScriptId, ScriptSource, ScriptSourceError};

/// Scripts guardados en memoria, indexados por nombre.
///
/// Las referencias se resuelven tal cual (sin rutas relativas).
#[derive(Debug, Clone, Default)]
pub struct InMemoryScripts {
  scripts: HashMap<ScriptId, Vec<String>>,
}

impl InMemoryScripts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_script(mut self, name: &str, text: &str) -> Self {
    self.insert(name, text);
    self
  }

  pub fn insert(&mut self, name: &str, text: &str) {
    self.scripts.insert(ScriptId::new(name), text.lines().map(str::to_string).collect());
  }
}

impl ScriptSource for InMemoryScripts {
  fn resolve(&self, _parent: Option<&ScriptId>, reference: &str) -> ScriptId {
    ScriptId::new(reference.trim())
  }

  fn read_lines(&self, id: &ScriptId) -> Result<Vec<String>, ScriptSourceError> {
    self.scripts.get(id).cloned().ok_or_else(|| ScriptSourceError::NotFound(id.clone()))
  }
}
