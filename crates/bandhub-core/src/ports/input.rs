use std::collections::VecDeque;

use thiserror::Error;

/// Motivo por el que se rechazó una línea de entrada.
///
/// Nunca sale del builder: se comunica al [`LineReader`] y se vuelve a pedir.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputProblem {
  #[error("the value must be a whole number")]
  NotInteger,

  #[error("the value must be a decimal number")]
  NotDecimal,

  #[error("the number is too large")]
  TooLarge,

  #[error("the value must not be greater than {max}")]
  AboveMaximum { max: i64 },

  #[error("the value must be greater than 0")]
  NotPositive,

  #[error("the value must not be blank")]
  Blank,

  #[error("the month must be between 0 and 11")]
  MonthOutOfRange,

  #[error("the year must be between 1 and 9999")]
  YearOutOfRange,

  #[error("invalid day for this month")]
  InvalidDay,

  #[error("unknown genre `{0}`")]
  UnknownGenre(String),

  #[error("the passwords do not match")]
  PasswordMismatch,
}

/// Único fallo que el builder devuelve a quien lo llama: se acabó la entrada.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  #[error("input ended while reading `{field}`")]
  Exhausted { field: String },
}

/// Fuente de líneas para el builder: la consola o las líneas de un script.
pub trait LineReader {
  /// Pide el valor de `field` y devuelve la línea leída, sin el salto de línea.
  ///
  /// `None` significa que la entrada terminó.
  fn read_line(&mut self, field: &str) -> Option<String>;

  /// Notifica que la última línea para `field` fue rechazada.
  fn report(&mut self, _field: &str, _problem: &InputProblem) {}
}

/// Cola de líneas ya conocidas (las restantes de un script, o las de un test).
#[derive(Debug, Clone, Default)]
pub struct QueuedLines {
  lines: VecDeque<String>,
  consumed: usize,
  rejections: Vec<(String, InputProblem)>,
}

impl QueuedLines {
  pub fn new<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { lines: lines.into_iter().map(Into::into).collect(), consumed: 0, rejections: Vec::new() }
  }

  /// Siguiente línea sin pasar por un campo (lo usa el motor de scripts).
  pub fn next_raw(&mut self) -> Option<String> {
    let line = self.lines.pop_front()?;
    self.consumed += 1;
    Some(line)
  }

  /// Número de líneas consumidas hasta ahora (1-based para la última).
  pub fn position(&self) -> usize {
    self.consumed
  }

  pub fn remaining(&self) -> usize {
    self.lines.len()
  }

  /// Rechazos acumulados, en orden.
  pub fn rejections(&self) -> &[(String, InputProblem)] {
    &self.rejections
  }
}

impl LineReader for QueuedLines {
  fn read_line(&mut self, _field: &str) -> Option<String> {
    self.next_raw()
  }

  fn report(&mut self, field: &str, problem: &InputProblem) {
    self.rejections.push((field.to_string(), problem.clone()));
  }
}
