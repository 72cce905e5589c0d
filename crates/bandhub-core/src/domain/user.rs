use serde::{Deserialize, Serialize};
use std::fmt;

/// Credencial que acompaña a cada petición.
///
/// La contraseña viaja con la petición pero nunca se muestra: `Debug` la
/// oculta y `Display` sólo imprime el login, así que es seguro pasar un
/// `User` a `tracing`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  login: String,
  password: String,
}

impl User {
  pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
    Self { login: login.into(), password: password.into() }
  }

  pub fn login(&self) -> &str {
    &self.login
  }

  pub fn password(&self) -> &str {
    &self.password
  }

  /// Ni el login ni la contraseña pueden estar en blanco.
  pub fn is_well_formed(&self) -> bool {
    !self.login.trim().is_empty() && !self.password.trim().is_empty()
  }
}

impl fmt::Debug for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("User").field("login", &self.login).field("password", &"<redacted>").finish()
  }
}

impl fmt::Display for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.login)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn debug_and_display_never_print_the_password() {
    let user = User::new("ozzy", "s3cret-pass");

    assert!(!format!("{user:?}").contains("s3cret-pass"));
    assert_eq!(user.to_string(), "ozzy");
  }

  #[test]
  fn blank_fields_are_not_well_formed() {
    assert!(User::new("ozzy", "pw").is_well_formed());
    assert!(!User::new("  ", "pw").is_well_formed());
    assert!(!User::new("ozzy", "").is_well_formed());
  }
}
