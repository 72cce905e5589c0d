use std::collections::HashMap;

use bandhub_core::domain::User;
use bandhub_core::protocol::LoginError;

/// Usuarios registrados: login → contraseña.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
  passwords: HashMap<String, String>,
}

impl UserStore {
  pub fn register(&mut self, user: &User) -> Result<(), LoginError> {
    if !user.is_well_formed() {
      return Err(LoginError::NotAuthenticated);
    }
    if self.passwords.contains_key(user.login()) {
      return Err(LoginError::AlreadyRegistered);
    }
    self.passwords.insert(user.login().to_string(), user.password().to_string());
    Ok(())
  }

  pub fn authenticate(&self, user: &User) -> Result<(), LoginError> {
    match self.passwords.get(user.login()) {
      None => Err(LoginError::UnknownUser),
      Some(stored) if stored != user.password() => Err(LoginError::WrongPassword),
      Some(_) => Ok(()),
    }
  }

  pub fn len(&self) -> usize {
    self.passwords.len()
  }

  pub fn is_empty(&self) -> bool {
    self.passwords.is_empty()
  }
}
