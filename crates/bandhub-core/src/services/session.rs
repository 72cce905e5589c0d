use tracing::info;

use crate::domain::User;
use crate::protocol::{LoginError, Response};

/// Usuario autenticado del cliente, si lo hay.
///
/// Sólo cambia tras una respuesta de `login`/`register` sin error de
/// credenciales.
#[derive(Debug, Clone, Default)]
pub struct Session {
  user: Option<User>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current_user(&self) -> Option<&User> {
    self.user.as_ref()
  }

  pub fn is_authenticated(&self) -> bool {
    self.user.is_some()
  }

  /// Aplica la respuesta a un intento de login o registro.
  ///
  /// Con un error de credenciales la sesión queda como estaba.
  pub fn apply_login(&mut self, user: User, response: &Response) -> Result<(), LoginError> {
    if let Some(error) = response.login_error() {
      info!(login = %user, %error, "login rejected");
      return Err(error);
    }
    info!(login = %user, "logged in");
    self.user = Some(user);
    Ok(())
  }

  pub fn logout(&mut self) -> Option<User> {
    self.user.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failed_login_keeps_the_previous_state() {
    let mut session = Session::new();
    let result = session.apply_login(User::new("a", "bad"), &Response::login_failed(LoginError::WrongPassword));

    assert_eq!(result, Err(LoginError::WrongPassword));
    assert!(session.current_user().is_none());
  }

  #[test]
  fn successful_login_sets_the_user() {
    let mut session = Session::new();
    session.apply_login(User::new("a", "pw"), &Response::default()).unwrap();

    assert_eq!(session.current_user().map(User::login), Some("a"));
    assert!(session.logout().is_some());
    assert!(!session.is_authenticated());
  }
}
