use crate::domain::band::Band;
use crate::domain::ids::BandId;

/// Secuencia monótona de identificadores, propiedad de la autoridad.
///
/// El número sólo se entrega cuando la banda valida; una banda rechazada
/// vuelve a quedar con [`BandId::UNASSIGNED`], así que nunca hay dos bandas
/// con el mismo id.
#[derive(Debug, Clone)]
pub struct IdSequence {
  next: i64,
}

impl IdSequence {
  pub fn new() -> Self {
    Self { next: 1 }
  }

  /// Continúa una secuencia existente; nunca empieza por debajo de 1.
  pub fn starting_at(next: i64) -> Self {
    Self { next: next.max(1) }
  }

  /// Id que recibirá la próxima banda válida.
  pub fn peek(&self) -> BandId {
    BandId::new(self.next)
  }

  /// Asigna el siguiente id a `band` si valida.
  ///
  /// Devuelve `None` (y deja la banda sin id) cuando la validación falla.
  pub fn assign(&mut self, band: &mut Band) -> Option<BandId> {
    band.id = BandId::new(self.next);
    if band.validate() {
      self.next += 1;
      Some(band.id)
    } else {
      band.id = BandId::UNASSIGNED;
      None
    }
  }
}

impl Default for IdSequence {
  fn default() -> Self {
    Self::new()
  }
}
