//! Modelo de tabla para la capa de presentación: columnas, filtro, orden y
//! edición de celdas.

use std::cmp::Ordering;
use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::builders::{FieldBuilder, InputMode};
use crate::domain::{Band, Coordinates, User};
use crate::ports::input::{BuildError, InputProblem, QueuedLines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
  Id,
  Name,
  X,
  Y,
  Participants,
  CreationDate,
  Genre,
  LabelName,
  LabelBands,
  LabelSales,
}

impl Column {
  pub const ALL: [Column; 10] = [
    Column::Id,
    Column::Name,
    Column::X,
    Column::Y,
    Column::Participants,
    Column::CreationDate,
    Column::Genre,
    Column::LabelName,
    Column::LabelBands,
    Column::LabelSales,
  ];

  pub fn header(&self) -> &'static str {
    match self {
      Column::Id => "Id",
      Column::Name => "Name",
      Column::X => "X",
      Column::Y => "Y",
      Column::Participants => "Participants",
      Column::CreationDate => "CreationDate",
      Column::Genre => "Genre",
      Column::LabelName => "LabelName",
      Column::LabelBands => "LabelBands",
      Column::LabelSales => "LabelSales",
    }
  }

  /// El id y la fecha de creación los fija la autoridad.
  pub fn is_editable(&self) -> bool {
    !matches!(self, Column::Id | Column::CreationDate)
  }
}

impl fmt::Display for Column {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.header())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
  type Err = UnknownColumn;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace(['-', ' ', '_'], "");
    Column::ALL
      .into_iter()
      .find(|c| c.header().to_lowercase() == normalized)
      .ok_or_else(|| UnknownColumn(s.to_string()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
  #[error("column {0} cannot be edited")]
  ReadOnly(Column),

  #[error("only the owner can edit this band")]
  NotOwner,

  #[error("invalid value for {column}: {problem}")]
  Invalid { column: Column, problem: InputProblem },
}

/// Sólo el dueño puede editar. Es una ayuda de interfaz: quien decide es la autoridad.
pub fn can_edit(user: Option<&User>, band: &Band) -> bool {
  user.is_some_and(|u| band.is_owned_by(u.login()))
}

pub fn cell_text(band: &Band, column: Column) -> String {
  match column {
    Column::Id => band.id.to_string(),
    Column::Name => band.name.clone(),
    Column::X => band.coordinates.x.to_string(),
    Column::Y => band.coordinates.y.to_string(),
    Column::Participants => band.number_of_participants.map(|n| n.to_string()).unwrap_or_default(),
    Column::CreationDate => band.creation_date.format("%Y-%m-%d %H:%M:%S").to_string(),
    Column::Genre => band.genre.map(|g| g.to_string()).unwrap_or_default(),
    Column::LabelName => band.label.name.clone(),
    Column::LabelBands => band.label.bands.to_string(),
    Column::LabelSales => band.label.sales.to_string(),
  }
}

/// Devuelve una copia de `band` con la celda cambiada.
///
/// Se aplican las mismas reglas que al introducir el campo a mano; si el
/// texto no es válido el original no cambia.
pub fn edit_cell(band: &Band, column: Column, text: &str) -> Result<Band, EditError> {
  if !column.is_editable() {
    return Err(EditError::ReadOnly(column));
  }

  let invalid = |problem| EditError::Invalid { column, problem };
  let mut edited = band.clone();
  match column {
    Column::Name => edited.name = parse_cell(text, |f| f.build_required_text("name")).map_err(invalid)?,
    Column::X => edited.coordinates.x = parse_cell(text, |f| f.build_float("x")).map_err(invalid)?,
    Column::Y => {
      edited.coordinates.y = parse_cell(text, |f| f.build_bounded_long("y", Coordinates::MAX_Y)).map_err(invalid)?
    }
    Column::Participants => {
      edited.number_of_participants =
        parse_cell(text, |f| f.build_optional_positive_int("participants")).map_err(invalid)?
    }
    Column::Genre => edited.genre = parse_cell(text, |f| f.build_genre("genre")).map_err(invalid)?,
    Column::LabelName => edited.label.name = parse_cell(text, |f| f.build_required_text("label name")).map_err(invalid)?,
    Column::LabelBands => edited.label.bands = parse_cell(text, |f| f.build_int("label bands")).map_err(invalid)?,
    Column::LabelSales => edited.label.sales = parse_cell(text, |f| f.build_sales("label sales")).map_err(invalid)?,
    Column::Id | Column::CreationDate => return Err(EditError::ReadOnly(column)),
  }
  Ok(edited)
}

/// Como [`edit_cell`], pero comprueba antes que `user` sea el dueño.
pub fn edit_owned_cell(user: Option<&User>, band: &Band, column: Column, text: &str) -> Result<Band, EditError> {
  if !can_edit(user, band) {
    return Err(EditError::NotOwner);
  }
  edit_cell(band, column, text)
}

/// Un único intento con el builder interactivo: el primer rechazo es el error.
fn parse_cell<T>(
  text: &str,
  read: impl FnOnce(&mut FieldBuilder<'_, QueuedLines>) -> Result<T, BuildError>,
) -> Result<T, InputProblem> {
  let mut input = QueuedLines::new([text]);
  let outcome = read(&mut FieldBuilder::new(&mut input, InputMode::Interactive));
  outcome.map_err(|_| input.rejections().first().map(|(_, problem)| problem.clone()).unwrap_or(InputProblem::Blank))
}

/// Bandas cuya alguna celda contiene `query`, sin distinguir mayúsculas.
pub fn filter<'a>(bands: &'a [Band], query: &str) -> Vec<&'a Band> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return bands.iter().collect();
  }
  bands
    .iter()
    .filter(|band| Column::ALL.iter().any(|c| cell_text(band, *c).to_lowercase().contains(&needle)))
    .collect()
}

/// Orden ascendente y estable por `column`; los valores ausentes van primero.
pub fn sort_by(rows: &mut [&Band], column: Column) {
  rows.sort_by(|a, b| compare(a, b, column));
}

fn compare(a: &Band, b: &Band, column: Column) -> Ordering {
  match column {
    Column::Id => a.id.cmp(&b.id),
    Column::Name => a.name.cmp(&b.name),
    Column::X => a.coordinates.x.total_cmp(&b.coordinates.x),
    Column::Y => a.coordinates.y.cmp(&b.coordinates.y),
    Column::Participants => a.number_of_participants.cmp(&b.number_of_participants),
    Column::CreationDate => a.creation_date.cmp(&b.creation_date),
    Column::Genre => a.genre.cmp(&b.genre),
    Column::LabelName => a.label.name.cmp(&b.label.name),
    Column::LabelBands => a.label.bands.cmp(&b.label.bands),
    Column::LabelSales => a.label.sales.cmp(&b.label.sales),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{BandId, Label, MusicGenre};

  fn band(id: i64, name: &str, owner: &str) -> Band {
    let mut b = Band::draft(name, Coordinates::new(id as f32, id * 10), Label::new("Sub Pop", 2, 50), owner);
    b.id = BandId::new(id);
    b
  }

  #[test]
  fn only_the_owner_can_edit() {
    let b = band(1, "Mudhoney", "mark");
    assert!(can_edit(Some(&User::new("mark", "pw")), &b));
    assert!(!can_edit(Some(&User::new("kurt", "pw")), &b));
    assert!(!can_edit(None, &b));
    assert_eq!(edit_owned_cell(None, &b, Column::Name, "x"), Err(EditError::NotOwner));
  }

  #[test]
  fn edit_returns_a_changed_copy() {
    let original = band(1, "Mudhoney", "mark");
    let edited = edit_cell(&original, Column::Genre, "hip hop").unwrap();

    assert_eq!(edited.genre, Some(MusicGenre::HipHop));
    assert_eq!(original.genre, None);
    assert_eq!(edited.id, original.id);
  }

  #[test]
  fn invalid_text_reports_the_problem() {
    let original = band(1, "Mudhoney", "mark");

    assert_eq!(
      edit_cell(&original, Column::Y, "5000"),
      Err(EditError::Invalid { column: Column::Y, problem: InputProblem::AboveMaximum { max: 968 } })
    );
    assert_eq!(
      edit_cell(&original, Column::LabelSales, "0"),
      Err(EditError::Invalid { column: Column::LabelSales, problem: InputProblem::NotPositive })
    );
    assert_eq!(edit_cell(&original, Column::Id, "9"), Err(EditError::ReadOnly(Column::Id)));
  }

  #[test]
  fn blank_participants_clears_the_value() {
    let original = band(1, "Mudhoney", "mark").with_participants(4);
    assert_eq!(edit_cell(&original, Column::Participants, "").unwrap().number_of_participants, None);
  }

  #[test]
  fn filter_is_case_insensitive_over_every_column() {
    let bands = vec![band(1, "Mudhoney", "mark"), band(2, "Soundgarden", "chris")];

    assert_eq!(filter(&bands, "SOUND").len(), 1);
    assert_eq!(filter(&bands, "sub pop").len(), 2);
    assert_eq!(filter(&bands, "").len(), 2);
  }

  #[test]
  fn sort_is_stable_and_ascending() {
    let bands = vec![band(3, "b", "x"), band(1, "a", "x"), band(2, "b", "x")];
    let mut rows: Vec<&Band> = bands.iter().collect();

    sort_by(&mut rows, Column::Name);
    let ids: Vec<i64> = rows.iter().map(|b| b.id.value()).collect();
    assert_eq!(ids, vec![1, 3, 2]);
  }

  #[test]
  fn columns_parse_by_header() {
    assert_eq!("label sales".parse::<Column>(), Ok(Column::LabelSales));
    assert_eq!("creation_date".parse::<Column>(), Ok(Column::CreationDate));
    assert!("owner".parse::<Column>().is_err());
  }
}
