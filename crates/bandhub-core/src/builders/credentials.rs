use super::field::{FieldBuilder, InputMode};
use crate::domain::User;
use crate::ports::input::{BuildError, InputProblem, LineReader};

/// Pide login y contraseña para `login` y `register`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialsBuilder;

impl CredentialsBuilder {
  pub fn build<R: LineReader + ?Sized>(&self, input: &mut R) -> Result<User, BuildError> {
    let mut fields = FieldBuilder::new(input, InputMode::Interactive);
    let login = fields.build_login()?;
    let password = fields.build_password()?;
    Ok(User::new(login, password))
  }

  /// Como [`CredentialsBuilder::build`], pero pide la contraseña dos veces y
  /// repite ambas hasta que coincidan.
  pub fn build_registration<R: LineReader + ?Sized>(&self, input: &mut R) -> Result<User, BuildError> {
    let login = FieldBuilder::new(&mut *input, InputMode::Interactive).build_login()?;

    loop {
      let password = FieldBuilder::new(&mut *input, InputMode::Interactive).build_password()?;
      let confirmation = FieldBuilder::new(&mut *input, InputMode::Interactive).build_required_text("confirm password")?;
      if password == confirmation {
        return Ok(User::new(login, password));
      }
      input.report("confirm password", &InputProblem::PasswordMismatch);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::input::QueuedLines;

  #[test]
  fn login_skips_blank_lines() {
    let mut input = QueuedLines::new(["", "kurt", " ", "secret"]);
    let user = CredentialsBuilder.build(&mut input).unwrap();

    assert_eq!(user.login(), "kurt");
    assert_eq!(user.password(), "secret");
  }

  #[test]
  fn registration_repeats_until_passwords_match() {
    let mut input = QueuedLines::new(["kurt", "one", "two", "three", "three"]);
    let user = CredentialsBuilder.build_registration(&mut input).unwrap();

    assert_eq!(user.password(), "three");
    assert_eq!(input.rejections(), &[("confirm password".to_string(), InputProblem::PasswordMismatch)]);
  }
}
