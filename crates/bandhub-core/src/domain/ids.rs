use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de una banda dentro de la colección compartida.
///
/// Lo asigna siempre la autoridad. Un borrador que todavía no ha pasado por
/// ella lleva [`BandId::UNASSIGNED`] (cero), que nunca es un id válido.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandId(i64);

impl BandId {
  /// Valor que llevan los borradores antes de que la autoridad les asigne id.
  pub const UNASSIGNED: BandId = BandId(0);

  pub fn new(value: i64) -> Self {
    BandId(value)
  }

  /// Devuelve el valor numérico interno.
  pub fn value(&self) -> i64 {
    self.0
  }

  /// `true` si el id es positivo, es decir, si lo asignó la autoridad.
  pub fn is_assigned(&self) -> bool {
    self.0 > 0
  }
}

impl From<i64> for BandId {
  fn from(value: i64) -> Self {
    BandId(value)
  }
}

impl From<BandId> for i64 {
  fn from(id: BandId) -> Self {
    id.0
  }
}

impl fmt::Display for BandId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}
