use serde::{Deserialize, Serialize};
use std::fmt;

/// Posición de una banda en el plano del gráfico.
///
/// Es un objeto valor: al clonar una [`Band`](crate::domain::Band) para
/// editarla se copia entero, nunca se comparte con la copia en caché.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub x: f32,
  /// Nunca mayor que [`Coordinates::MAX_Y`].
  pub y: i64,
}

impl Coordinates {
  /// Cota superior del eje `y`.
  pub const MAX_Y: i64 = 968;

  pub fn new(x: f32, y: i64) -> Self {
    Self { x, y }
  }

  pub fn is_within_bounds(&self) -> bool {
    self.y <= Self::MAX_Y
  }
}

impl fmt::Display for Coordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{};{}", self.x, self.y)
  }
}
