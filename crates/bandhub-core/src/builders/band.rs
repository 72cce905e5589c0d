use chrono::NaiveDate;

use super::field::{FieldBuilder, InputMode};
use crate::domain::{Band, Coordinates, Label};
use crate::ports::input::{BuildError, LineReader};

/// Construye una [`Band`] pidiendo sus campos en orden fijo.
///
/// Un script que use `add` o `update_id` debe aportar exactamente una línea
/// por campo en este orden (más las de reintento si alguna es inválida):
///
/// 1. nombre (no vacío)
/// 2. x (decimal finito)
/// 3. y (entero largo, máximo [`Coordinates::MAX_Y`])
/// 4. integrantes (en blanco = ausente)
/// 5. año de fundación (en blanco = sin fecha; si hay año, siguen mes 0-11 y día)
/// 6. género (en blanco = ausente)
/// 7. nombre del sello (no vacío)
/// 8. bandas del sello
/// 9. ventas del sello (`> 0`)
#[derive(Debug, Clone)]
pub struct BandBuilder {
  owner: String,
}

impl BandBuilder {
  pub fn new(owner: impl Into<String>) -> Self {
    Self { owner: owner.into() }
  }

  pub fn build<R: LineReader + ?Sized>(&self, input: &mut R, mode: InputMode) -> Result<Band, BuildError> {
    let mut fields = FieldBuilder::new(input, mode);

    let name = fields.build_required_text("name")?;
    let x = fields.build_float("x")?;
    let y = fields.build_bounded_long("y", Coordinates::MAX_Y)?;
    let participants = fields.build_optional_positive_int("participants")?;
    let establishment_date = build_date(&mut fields)?;
    let genre = fields.build_genre("genre")?;
    let label_name = fields.build_required_text("label name")?;
    let label_bands = fields.build_int("label bands")?;
    let label_sales = fields.build_sales("label sales")?;

    let mut band = Band::draft(name, Coordinates::new(x, y), Label::new(label_name, label_bands, label_sales), &self.owner);
    band.number_of_participants = participants;
    band.establishment_date = establishment_date;
    band.genre = genre;
    Ok(band)
  }
}

fn build_date<R: LineReader + ?Sized>(fields: &mut FieldBuilder<'_, R>) -> Result<Option<NaiveDate>, BuildError> {
  let Some(year) = fields.build_optional_year("establishment year")? else {
    return Ok(None);
  };
  let month = fields.build_month("establishment month")?;
  let day = fields.build_day("establishment day", month, year)?;
  Ok(NaiveDate::from_ymd_opt(year, month + 1, day))
}
