use serde::{Deserialize, Serialize};
use std::fmt;

/// Sello discográfico de una banda. Siempre presente.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
  pub name: String,
  /// Número de bandas firmadas por el sello.
  pub bands: i32,
  /// Ventas del sello; estrictamente positivas cuando llegan del builder.
  pub sales: i64,
}

impl Label {
  pub fn new(name: impl Into<String>, bands: i32, sales: i64) -> Self {
    Self { name: name.into(), bands, sales }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} (bands: {}, sales: {})", self.name, self.bands, self.sales)
  }
}
