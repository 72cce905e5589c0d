use tracing::debug;

use crate::domain::{Band, BandId};
use crate::protocol::{Command, Response};

/// Qué debe hacer la interfaz tras aplicar una respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
  Unchanged,
  /// La caché se sustituyó por un snapshot nuevo.
  Replaced { count: usize },
  /// Un comando modificó la colección: hay que pedir un `show`.
  NeedsRefresh,
  /// La autoridad rechazó una edición optimista; se restauraron `count`
  /// bandas y conviene pedir un `show`.
  Reverted { count: usize },
}

/// Caché local de la colección.
///
/// Sólo la toca el hilo de la interfaz; los workers le pasan respuestas y
/// nunca escriben en ella directamente. Cada snapshot la sustituye entera.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
  bands: Vec<Band>,
  visible: bool,
  /// Copias previas de las bandas con una edición optimista sin confirmar.
  pending: Vec<Band>,
}

impl ViewState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn bands(&self) -> &[Band] {
    &self.bands
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  /// Devuelve `true` si el estado cambió.
  pub fn set_visible(&mut self, visible: bool) -> bool {
    let changed = self.visible != visible;
    self.visible = visible;
    changed
  }

  pub fn replace(&mut self, bands: Vec<Band>) {
    debug!(count = bands.len(), "view snapshot replaced");
    self.bands = bands;
    self.pending.clear();
  }

  pub fn get(&self, id: BandId) -> Option<&Band> {
    self.bands.iter().find(|b| b.id == id)
  }

  /// Copia de trabajo para editar; la caché no cambia hasta que llegue la respuesta.
  pub fn begin_edit(&self, id: BandId) -> Option<Band> {
    self.get(id).cloned()
  }

  /// Muestra una edición ya enviada antes de que la autoridad confirme.
  ///
  /// El siguiente snapshot manda, así que un refresco puede deshacerla.
  pub fn apply_optimistic(&mut self, edited: Band) -> bool {
    let Some(slot) = self.bands.iter_mut().find(|b| b.id == edited.id) else {
      return false;
    };
    if !self.pending.iter().any(|b| b.id == edited.id) {
      self.pending.push(slot.clone());
    }
    *slot = edited;
    true
  }

  pub fn has_pending_edits(&self) -> bool {
    !self.pending.is_empty()
  }

  /// Deshace todas las ediciones optimistas sin confirmar. Devuelve cuántas.
  pub fn revert_pending(&mut self) -> usize {
    let mut restored = 0;
    for previous in self.pending.drain(..) {
      if let Some(slot) = self.bands.iter_mut().find(|b| b.id == previous.id) {
        *slot = previous;
        restored += 1;
      }
    }
    if restored > 0 {
      debug!(restored, "optimistic edits reverted");
    }
    restored
  }

  pub fn apply_response(&mut self, command: Command, response: &Response) -> ViewUpdate {
    if let Some(bands) = response.bands() {
      self.replace(bands.to_vec());
      return ViewUpdate::Replaced { count: self.bands.len() };
    }
    if command.mutates() && response.is_success() {
      return ViewUpdate::NeedsRefresh;
    }
    if command == Command::UpdateId && self.has_pending_edits() {
      return ViewUpdate::Reverted { count: self.revert_pending() };
    }
    ViewUpdate::Unchanged
  }
}
