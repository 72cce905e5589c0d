use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::coordinates::Coordinates;
use crate::domain::genre::MusicGenre;
use crate::domain::ids::BandId;
use crate::domain::label::Label;

/// Banda musical: el registro principal de la colección compartida.
///
/// Cualquier cliente puede leer todas las bandas, pero sólo su dueño
/// (`owner`) puede modificarlas o borrarlas. Esa regla la impone la
/// autoridad; el cliente sólo evita ofrecer la edición a quien no es dueño.
///
/// `coordinates` y `label` son obligatorios por tipo y no se validan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
  /// Asignado por la autoridad; [`BandId::UNASSIGNED`] en un borrador.
  pub id: BandId,
  /// Nombre de la banda. No puede estar vacío.
  pub name: String,
  pub coordinates: Coordinates,
  /// Número de integrantes; si está presente debe ser `> 0`.
  pub number_of_participants: Option<i32>,
  /// Fecha de fundación, si se conoce.
  pub establishment_date: Option<NaiveDate>,
  /// Momento de creación. Sólo cambia mediante un `update_id` explícito.
  pub creation_date: NaiveDateTime,
  pub genre: Option<MusicGenre>,
  pub label: Label,
  /// Login del usuario que creó la banda.
  pub owner: String,
}

impl Band {
  /// Crea un borrador sin id, fechado ahora.
  pub fn draft(name: impl Into<String>, coordinates: Coordinates, label: Label, owner: impl Into<String>) -> Self {
    Self {
      id: BandId::UNASSIGNED,
      name: name.into(),
      coordinates,
      number_of_participants: None,
      establishment_date: None,
      creation_date: Local::now().naive_local(),
      genre: None,
      label,
      owner: owner.into(),
    }
  }

  pub fn with_participants(mut self, participants: i32) -> Self {
    self.number_of_participants = Some(participants);
    self
  }

  pub fn with_establishment_date(mut self, date: NaiveDate) -> Self {
    self.establishment_date = Some(date);
    self
  }

  pub fn with_genre(mut self, genre: MusicGenre) -> Self {
    self.genre = Some(genre);
    self
  }

  /// Validación completa: un id asignado más [`Band::validate_fields`].
  ///
  /// Es consultiva: no retira un id que ya se haya asignado.
  pub fn validate(&self) -> bool {
    self.id.is_assigned() && self.validate_fields()
  }

  /// Reglas que dependen sólo de los datos introducidos por el usuario.
  ///
  /// Es lo que comprueba el builder antes de enviar un borrador, ya que el id
  /// todavía no existe.
  pub fn validate_fields(&self) -> bool {
    if self.name.is_empty() {
      return false;
    }
    if matches!(self.number_of_participants, Some(n) if n <= 0) {
      return false;
    }
    true
  }

  pub fn is_owned_by(&self, login: &str) -> bool {
    self.owner == login
  }

  /// Nombre del dueño para mostrar; las bandas sin dueño aparecen como `unknown`.
  pub fn owner_display(&self) -> &str {
    if self.owner.is_empty() { "unknown" } else { &self.owner }
  }

  /// Copia los campos editables de `other`, conservando `id` y `owner`.
  ///
  /// Es la semántica de `update_id`: todo lo demás se reemplaza, incluida
  /// la fecha de creación.
  pub fn replace_fields(&mut self, other: &Band) {
    self.name = other.name.clone();
    self.coordinates = other.coordinates;
    self.number_of_participants = other.number_of_participants;
    self.establishment_date = other.establishment_date;
    self.creation_date = other.creation_date;
    self.genre = other.genre;
    self.label = other.label.clone();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Band {
    Band::draft("Kino", Coordinates::new(1.5, 10), Label::new("Melodiya", 3, 1000), "viktor")
  }

  #[test]
  fn draft_has_no_id_and_fails_full_validation() {
    let band = sample();

    assert_eq!(band.id, BandId::UNASSIGNED);
    assert!(band.validate_fields());
    assert!(!band.validate());
  }

  #[test]
  fn validate_requires_positive_id() {
    let mut band = sample();
    band.id = BandId::new(7);
    assert!(band.validate());

    band.id = BandId::new(-3);
    assert!(!band.validate());
  }

  #[test]
  fn empty_name_is_invalid() {
    let mut band = sample();
    band.name.clear();
    assert!(!band.validate_fields());
  }

  #[test]
  fn participants_must_be_positive_when_present() {
    assert!(sample().with_participants(4).validate_fields());
    assert!(!sample().with_participants(0).validate_fields());
    assert!(!sample().with_participants(-1).validate_fields());
  }

  #[test]
  fn replace_fields_keeps_id_and_owner() {
    let mut stored = sample();
    stored.id = BandId::new(11);

    let mut edited = Band::draft("Aquarium", Coordinates::new(0.0, 1), Label::new("Antrop", 1, 5), "intruder");
    edited.id = BandId::new(99);
    stored.replace_fields(&edited);

    assert_eq!(stored.id, BandId::new(11));
    assert_eq!(stored.owner, "viktor");
    assert_eq!(stored.name, "Aquarium");
    assert_eq!(stored.label.name, "Antrop");
  }

  #[test]
  fn editing_a_clone_leaves_the_original_untouched() {
    let original = sample();
    let mut copy = original.clone();
    copy.coordinates.y = 500;
    copy.label.sales = 1;

    assert_eq!(original.coordinates.y, 10);
    assert_eq!(original.label.sales, 1000);
  }

  #[test]
  fn missing_owner_displays_as_unknown() {
    let mut band = sample();
    band.owner.clear();
    assert_eq!(band.owner_display(), "unknown");
  }
}
