use chrono::NaiveDate;
use tracing::debug;

use crate::domain::MusicGenre;
use crate::ports::input::{BuildError, InputProblem, LineReader};

/// Nivel de confianza de la entrada.
///
/// Se fija una vez por contexto de ejecución (la consola es `Interactive`,
/// un script es `Batch`) y no cambia a mitad de un script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  /// Entrada humana: un valor fuera de rango se rechaza y se vuelve a pedir.
  Interactive,
  /// Entrada de fichero: un valor por encima del máximo se recorta al máximo.
  Batch,
}

/// Lee valores primitivos de uno en uno, reintentando sin límite.
///
/// Un valor mal formado nunca llega a quien llama: se notifica al
/// [`LineReader`] y se pide otra línea. El único error posible es que la
/// entrada se agote ([`BuildError::Exhausted`]).
pub struct FieldBuilder<'a, R: LineReader + ?Sized> {
  input: &'a mut R,
  mode: InputMode,
}

impl<'a, R: LineReader + ?Sized> FieldBuilder<'a, R> {
  pub fn new(input: &'a mut R, mode: InputMode) -> Self {
    Self { input, mode }
  }

  pub fn mode(&self) -> InputMode {
    self.mode
  }

  /// Bucle común: leer, intentar convertir, notificar y repetir.
  fn ask<T>(&mut self, field: &str, mut parse: impl FnMut(&str) -> Result<T, InputProblem>) -> Result<T, BuildError> {
    loop {
      let Some(line) = self.input.read_line(field) else {
        return Err(BuildError::Exhausted { field: field.to_string() });
      };

      match parse(&line) {
        Ok(value) => return Ok(value),
        Err(problem) => {
          debug!(field, %problem, "input rejected");
          self.input.report(field, &problem);
        }
      }
    }
  }

  pub fn build_int(&mut self, field: &str) -> Result<i32, BuildError> {
    self.ask(field, parse_int)
  }

  /// Entero opcional: una línea en blanco significa "ausente".
  pub fn build_optional_int(&mut self, field: &str) -> Result<Option<i32>, BuildError> {
    self.ask(field, |text| if text.trim().is_empty() { Ok(None) } else { parse_int(text).map(Some) })
  }

  /// Entero opcional que, si está presente, debe ser `> 0`.
  pub fn build_optional_positive_int(&mut self, field: &str) -> Result<Option<i32>, BuildError> {
    self.ask(field, |text| {
      if text.trim().is_empty() {
        return Ok(None);
      }
      let value = parse_int(text)?;
      if value > 0 { Ok(Some(value)) } else { Err(InputProblem::NotPositive) }
    })
  }

  pub fn build_login(&mut self) -> Result<String, BuildError> {
    self.build_required_text("login")
  }

  pub fn build_password(&mut self) -> Result<String, BuildError> {
    self.build_required_text("password")
  }

  /// Índice de mes en `[0, 11]`.
  pub fn build_month(&mut self, field: &str) -> Result<u32, BuildError> {
    self.ask(field, |text| {
      let month = parse_int(text)?;
      if (0..=11).contains(&month) { Ok(month as u32) } else { Err(InputProblem::MonthOutOfRange) }
    })
  }

  /// Año opcional en `[1, 9999]`; en blanco significa "sin fecha".
  pub fn build_optional_year(&mut self, field: &str) -> Result<Option<i32>, BuildError> {
    self.ask(field, |text| {
      if text.trim().is_empty() {
        return Ok(None);
      }
      let year = parse_int(text)?;
      if (1..=9999).contains(&year) { Ok(Some(year)) } else { Err(InputProblem::YearOutOfRange) }
    })
  }

  /// Día válido para `month` (índice 0-based) de `year`.
  ///
  /// Un día que el calendario desbordaría al mes siguiente (31 de abril,
  /// 29 de febrero en año no bisiesto) se rechaza.
  pub fn build_day(&mut self, field: &str, month: u32, year: i32) -> Result<u32, BuildError> {
    self.ask(field, |text| {
      let day = parse_int(text)?;
      let Ok(day) = u32::try_from(day) else {
        return Err(InputProblem::InvalidDay);
      };
      match NaiveDate::from_ymd_opt(year, month + 1, day) {
        Some(_) => Ok(day),
        None => Err(InputProblem::InvalidDay),
      }
    })
  }

  /// Decimal finito. Un valor que desborda a infinito es "demasiado grande",
  /// distinto de un error de formato.
  pub fn build_float(&mut self, field: &str) -> Result<f32, BuildError> {
    self.ask(field, parse_float)
  }

  /// Entero largo con cota superior `max`.
  ///
  /// En modo interactivo un valor mayor se rechaza; en modo batch se recorta
  /// a `max` sin avisar.
  pub fn build_bounded_long(&mut self, field: &str, max: i64) -> Result<i64, BuildError> {
    let mode = self.mode;
    self.ask(field, |text| {
      let value = parse_long(text)?;
      match (value > max, mode) {
        (false, _) => Ok(value),
        (true, InputMode::Batch) => Ok(max),
        (true, InputMode::Interactive) => Err(InputProblem::AboveMaximum { max }),
      }
    })
  }

  /// Entero largo estrictamente positivo (ventas).
  pub fn build_sales(&mut self, field: &str) -> Result<i64, BuildError> {
    self.ask(field, |text| {
      let value = parse_long(text)?;
      if value > 0 { Ok(value) } else { Err(InputProblem::NotPositive) }
    })
  }

  /// Texto libre; en blanco devuelve `None` (campo ausente), no un error.
  pub fn build_text(&mut self, field: &str) -> Result<Option<String>, BuildError> {
    self.ask(field, |text| {
      let text = text.trim();
      Ok(if text.is_empty() { None } else { Some(text.to_string()) })
    })
  }

  /// Texto que no puede quedar en blanco.
  pub fn build_required_text(&mut self, field: &str) -> Result<String, BuildError> {
    self.ask(field, |text| {
      let text = text.trim();
      if text.is_empty() { Err(InputProblem::Blank) } else { Ok(text.to_string()) }
    })
  }

  /// Género opcional; en blanco es ausente, un nombre desconocido se vuelve a pedir.
  pub fn build_genre(&mut self, field: &str) -> Result<Option<MusicGenre>, BuildError> {
    self.ask(field, |text| {
      let text = text.trim();
      if text.is_empty() {
        return Ok(None);
      }
      text.parse::<MusicGenre>().map(Some).map_err(|e| InputProblem::UnknownGenre(e.input))
    })
  }
}

fn parse_int(text: &str) -> Result<i32, InputProblem> {
  text.trim().parse().map_err(|_| InputProblem::NotInteger)
}

fn parse_long(text: &str) -> Result<i64, InputProblem> {
  text.trim().parse().map_err(|_| InputProblem::NotInteger)
}

fn parse_float(text: &str) -> Result<f32, InputProblem> {
  let value: f32 = text.trim().parse().map_err(|_| InputProblem::NotDecimal)?;
  if value.is_infinite() {
    return Err(InputProblem::TooLarge);
  }
  if value.is_nan() {
    return Err(InputProblem::NotDecimal);
  }
  Ok(value)
}
