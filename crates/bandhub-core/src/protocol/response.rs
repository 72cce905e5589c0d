use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Band, BandId};

/// Mensaje por defecto cuando la autoridad no fija otro.
pub const DEFAULT_RESULT: &str = "Success";

/// Motivo por el que la autoridad rechazó la credencial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoginError {
  UnknownUser,
  WrongPassword,
  AlreadyRegistered,
  NotAuthenticated,
}

impl fmt::Display for LoginError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      LoginError::UnknownUser => "unknown user",
      LoginError::WrongPassword => "wrong password",
      LoginError::AlreadyRegistered => "user already registered",
      LoginError::NotAuthenticated => "not authenticated",
    };
    f.write_str(text)
  }
}

/// Forma del resultado. Quien llama debe distinguirla antes de fiarse de nada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBody {
  /// Sólo texto (`info`, `help`, agrupaciones…).
  Message,
  /// La credencial no es válida; no ha cambiado nada.
  LoginFailed { error: LoginError },
  /// La credencial es válida pero el registro pertenece a otro usuario.
  Unauthorized,
  /// Resultado de una operación con éxito o fracaso explícito.
  Outcome { success: bool },
  /// Copia completa de la colección.
  Snapshot { bands: Vec<Band> },
  /// Ids afectados por la operación.
  IdList { ids: Vec<BandId> },
}

/// Respuesta de la autoridad: siempre un mensaje más una forma concreta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
  pub message: String,
  pub body: ResponseBody,
}

impl Response {
  pub fn message(message: impl Into<String>) -> Self {
    Self { message: message.into(), body: ResponseBody::Message }
  }

  pub fn login_failed(error: LoginError) -> Self {
    Self { message: error.to_string(), body: ResponseBody::LoginFailed { error } }
  }

  pub fn unauthorized(message: impl Into<String>) -> Self {
    Self { message: message.into(), body: ResponseBody::Unauthorized }
  }

  pub fn outcome(success: bool, message: impl Into<String>) -> Self {
    Self { message: message.into(), body: ResponseBody::Outcome { success } }
  }

  pub fn snapshot(bands: Vec<Band>) -> Self {
    Self { message: DEFAULT_RESULT.to_string(), body: ResponseBody::Snapshot { bands } }
  }

  pub fn ids(message: impl Into<String>, ids: Vec<BandId>) -> Self {
    Self { message: message.into(), body: ResponseBody::IdList { ids } }
  }

  pub fn login_error(&self) -> Option<LoginError> {
    match self.body {
      ResponseBody::LoginFailed { error } => Some(error),
      _ => None,
    }
  }

  /// `false` para credenciales rechazadas, accesos no autorizados y
  /// operaciones que la autoridad marcó como fallidas.
  pub fn is_success(&self) -> bool {
    match self.body {
      ResponseBody::LoginFailed { .. } | ResponseBody::Unauthorized => false,
      ResponseBody::Outcome { success } => success,
      ResponseBody::Message | ResponseBody::Snapshot { .. } | ResponseBody::IdList { .. } => true,
    }
  }

  pub fn bands(&self) -> Option<&[Band]> {
    match &self.body {
      ResponseBody::Snapshot { bands } => Some(bands),
      _ => None,
    }
  }

  pub fn into_bands(self) -> Option<Vec<Band>> {
    match self.body {
      ResponseBody::Snapshot { bands } => Some(bands),
      _ => None,
    }
  }
}

impl Default for Response {
  fn default() -> Self {
    Self::message(DEFAULT_RESULT)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_message_is_generic_success() {
    assert_eq!(Response::default().message, DEFAULT_RESULT);
    assert_eq!(Response::snapshot(Vec::new()).message, DEFAULT_RESULT);
  }

  #[test]
  fn only_login_failures_expose_a_login_error() {
    assert_eq!(Response::login_failed(LoginError::WrongPassword).login_error(), Some(LoginError::WrongPassword));
    assert_eq!(Response::unauthorized("nope").login_error(), None);
    assert_eq!(Response::outcome(false, "no").login_error(), None);
  }

  #[test]
  fn success_depends_on_the_shape() {
    assert!(Response::outcome(true, "ok").is_success());
    assert!(!Response::outcome(false, "no").is_success());
    assert!(!Response::unauthorized("not yours").is_success());
    assert!(!Response::login_failed(LoginError::UnknownUser).is_success());
    assert!(Response::ids("removed", vec![BandId::new(1)]).is_success());
  }
}
