use std::path::Path;

use anyhow::{Context, bail};
use bandhub_core::builders::CredentialsBuilder;
use bandhub_core::domain::User;
use bandhub_core::ports::Transport;
use bandhub_core::protocol::{LoginError, Request};
use bandhub_core::script::ScriptRunner;
use bandhub_core::services::{BandClient, Session};
use bandhub_fs::FsScriptSource;
use tokio::runtime::Runtime;
use tracing::info;

use crate::console::input::StdinLines;
use crate::console::render;

/// `--script`: log in from stdin, run one script, print the report.
///
/// With `register_first` (offline mode) the credentials are registered
/// before logging in, since a fresh in-process authority knows no users.
pub fn run_script(
  runtime: &Runtime,
  client: &BandClient<dyn Transport>,
  scripts: &ScriptRunner<FsScriptSource>,
  path: &Path,
  register_first: bool,
) -> anyhow::Result<()> {
  let mut input = StdinLines::new();
  let user = CredentialsBuilder.build(&mut input).context("reading credentials")?;

  let session = runtime.block_on(open_session(client, user, register_first))?;

  let root = scripts.resolve(&path.to_string_lossy());
  info!(script = %root, "running script non-interactively");
  let report = runtime.block_on(scripts.run(client, session.current_user(), &root))?;
  print!("{}", render::report(&report));
  Ok(())
}

async fn open_session<T: Transport + ?Sized>(
  client: &BandClient<T>,
  user: User,
  register_first: bool,
) -> anyhow::Result<Session> {
  if register_first {
    let response = client.execute(Request::register(user.clone())).await.context("registering")?;
    match response.login_error() {
      None => info!(login = %user, "registered with the offline authority"),
      Some(LoginError::AlreadyRegistered) => {}
      Some(e) => bail!("registration failed: {e}"),
    }
  }

  let response = client.execute(Request::login(user.clone())).await.context("logging in")?;
  let mut session = Session::new();
  if let Err(e) = session.apply_login(user, &response) {
    bail!("login failed: {e}");
  }
  Ok(session)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use bandhub_storage::MemoryAuthority;
  use tempfile::tempdir;

  fn offline_client() -> (Arc<MemoryAuthority>, BandClient<dyn Transport>) {
    let authority = Arc::new(MemoryAuthority::new());
    let transport: Arc<dyn Transport> = authority.clone();
    (authority, BandClient::new(transport))
  }

  #[tokio::test]
  async fn offline_script_registers_and_runs() {
    let (authority, client) = offline_client();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("seed.txt"), "add\nWire\n1\n2\n\n\n\nHarvest\n3\n100\nshow\n").unwrap();
    let scripts = ScriptRunner::new(Arc::new(FsScriptSource::new(dir.path())));

    let session = open_session(&client, User::new("alice", "pw"), true).await.unwrap();
    let report = scripts.run(&client, session.current_user(), &scripts.resolve("seed.txt")).await.unwrap();

    assert_eq!(report.failures().count(), 0);
    let bands = authority.snapshot().unwrap();
    assert_eq!(bands.len(), 1);
    assert_eq!(bands[0].owner, "alice");
  }

  #[tokio::test]
  async fn offline_session_accepts_an_existing_user() {
    let (authority, client) = offline_client();
    authority.register_user(&User::new("alice", "pw")).unwrap();

    let session = open_session(&client, User::new("alice", "pw"), true).await.unwrap();

    assert_eq!(session.current_user().map(|u| u.login()), Some("alice"));
  }

  #[tokio::test]
  async fn login_only_needs_a_known_user() {
    let (_authority, client) = offline_client();

    let err = open_session(&client, User::new("alice", "pw"), false).await.unwrap_err();

    assert!(err.to_string().contains("unknown user"));
  }
}
