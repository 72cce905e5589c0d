use serde::{Deserialize, Serialize};

use super::{Command, PayloadKind, ProtocolError};
use crate::domain::{Band, BandId, User};

/// Datos que acompañan a un comando.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
  None,
  Band(Band),
  /// Identificador o posición, según el comando.
  Id(i64),
  Update { band: Band, id: BandId },
}

impl Payload {
  pub fn kind(&self) -> PayloadKind {
    match self {
      Payload::None => PayloadKind::None,
      Payload::Band(_) => PayloadKind::Band,
      Payload::Id(_) => PayloadKind::Id,
      Payload::Update { .. } => PayloadKind::BandAndId,
    }
  }
}

/// Una petición a la autoridad: comando, credencial y payload opcional.
///
/// No hay sesión: la credencial se reenvía en cada petición. Los
/// constructores garantizan que el payload tiene la forma que espera el
/// comando.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
  pub command: Command,
  pub user: User,
  pub payload: Payload,
}

impl Request {
  /// Construye una petición comprobando la forma del payload.
  pub fn build(command: Command, user: User, payload: Payload) -> Result<Self, ProtocolError> {
    let expected = command.payload_kind();
    let actual = payload.kind();
    if expected != actual {
      return Err(ProtocolError::PayloadMismatch { command, expected, actual });
    }
    Ok(Self { command, user, payload })
  }

  /// Petición sin payload (`show`, `clear`, `login`…).
  pub fn simple(command: Command, user: User) -> Result<Self, ProtocolError> {
    Self::build(command, user, Payload::None)
  }

  pub fn login(user: User) -> Self {
    Self { command: Command::Login, user, payload: Payload::None }
  }

  pub fn register(user: User) -> Self {
    Self { command: Command::Register, user, payload: Payload::None }
  }

  pub fn show(user: User) -> Self {
    Self { command: Command::Show, user, payload: Payload::None }
  }

  pub fn add(user: User, band: Band) -> Self {
    Self { command: Command::Add, user, payload: Payload::Band(band) }
  }

  pub fn remove_by_id(user: User, id: BandId) -> Self {
    Self { command: Command::RemoveById, user, payload: Payload::Id(id.value()) }
  }

  pub fn remove_at(user: User, index: i64) -> Self {
    Self { command: Command::RemoveAt, user, payload: Payload::Id(index) }
  }

  pub fn update_id(user: User, id: BandId, band: Band) -> Self {
    Self { command: Command::UpdateId, user, payload: Payload::Update { band, id } }
  }

  /// Vuelve a comprobar la forma del payload (útil tras deserializar).
  pub fn check_shape(&self) -> Result<(), ProtocolError> {
    let expected = self.command.payload_kind();
    let actual = self.payload.kind();
    if expected == actual {
      Ok(())
    } else {
      Err(ProtocolError::PayloadMismatch { command: self.command, expected, actual })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Coordinates, Label};

  fn user() -> User {
    User::new("kurt", "pw")
  }

  fn band() -> Band {
    Band::draft("Nirvana", Coordinates::new(1.0, 2), Label::new("Sub Pop", 10, 100), "kurt")
  }

  #[test]
  fn simple_rejects_commands_that_need_a_payload() {
    let err = Request::simple(Command::RemoveById, user()).unwrap_err();
    assert_eq!(
      err,
      ProtocolError::PayloadMismatch {
        command: Command::RemoveById,
        expected: PayloadKind::Id,
        actual: PayloadKind::None
      }
    );
    assert!(Request::simple(Command::Show, user()).is_ok());
  }

  #[test]
  fn typed_constructors_produce_well_shaped_requests() {
    let requests = [
      Request::add(user(), band()),
      Request::remove_by_id(user(), BandId::new(3)),
      Request::remove_at(user(), 0),
      Request::update_id(user(), BandId::new(3), band()),
      Request::login(user()),
      Request::register(user()),
      Request::show(user()),
    ];

    for request in requests {
      assert!(request.check_shape().is_ok(), "{:?}", request.command);
    }
  }

  #[test]
  fn update_carries_both_band_and_id() {
    let request = Request::update_id(user(), BandId::new(5), band());
    match request.payload {
      Payload::Update { band, id } => {
        assert_eq!(id, BandId::new(5));
        assert_eq!(band.name, "Nirvana");
      }
      other => panic!("unexpected payload {other:?}"),
    }
  }

  #[test]
  fn request_survives_json_round_trip() {
    let request = Request::update_id(user(), BandId::new(5), band());
    let json = serde_json::to_string(&request).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(back, request);
  }
}
