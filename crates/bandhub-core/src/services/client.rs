use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Band, User};
use crate::errors::ClientError;
use crate::ports::transport::Transport;
use crate::protocol::{Request, Response};

/// Envía peticiones a la autoridad con un tiempo máximo de espera.
///
/// Cada llamada produce exactamente un `Response` o un [`ClientError`]; no
/// hay reintentos automáticos.
pub struct BandClient<T: ?Sized> {
  transport: Arc<T>,
  timeout: Duration,
}

impl<T: ?Sized> Clone for BandClient<T> {
  fn clone(&self) -> Self {
    Self { transport: Arc::clone(&self.transport), timeout: self.timeout }
  }
}

impl<T: Transport + ?Sized> BandClient<T> {
  pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

  pub fn new(transport: Arc<T>) -> Self {
    Self { transport, timeout: Self::DEFAULT_TIMEOUT }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  pub async fn execute(&self, request: Request) -> Result<Response, ClientError> {
    let command = request.command;
    debug!(%command, user = %request.user, "sending request");

    match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
      Ok(Ok(response)) => {
        debug!(%command, success = response.is_success(), "response received");
        Ok(response)
      }
      Ok(Err(e)) => {
        warn!(%command, error = %e, "transport failure");
        Err(e.into())
      }
      Err(_) => {
        warn!(%command, timeout = ?self.timeout, "request timed out");
        Err(ClientError::Timeout(self.timeout))
      }
    }
  }

  /// Pide la colección completa (`show`).
  pub async fn fetch_snapshot(&self, user: &User) -> Result<Vec<Band>, ClientError> {
    let response = self.execute(Request::show(user.clone())).await?;
    if response.login_error().is_some() {
      return Err(ClientError::NotAuthenticated);
    }
    let message = response.message.clone();
    response.into_bands().ok_or(ClientError::UnexpectedResponse(message))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::transport::TransportError;
  use crate::protocol::LoginError;
  use async_trait::async_trait;

  struct Fixed(Response);

  #[async_trait]
  impl Transport for Fixed {
    async fn send(&self, _request: Request) -> Result<Response, TransportError> {
      Ok(self.0.clone())
    }
  }

  struct Down;

  #[async_trait]
  impl Transport for Down {
    async fn send(&self, _request: Request) -> Result<Response, TransportError> {
      Err(TransportError::Connection("refused".into()))
    }
  }

  struct Silent;

  #[async_trait]
  impl Transport for Silent {
    async fn send(&self, _request: Request) -> Result<Response, TransportError> {
      tokio::time::sleep(Duration::from_secs(3600)).await;
      Ok(Response::default())
    }
  }

  fn user() -> User {
    User::new("kim", "pw")
  }

  #[tokio::test]
  async fn snapshot_is_unwrapped() {
    let client = BandClient::new(Arc::new(Fixed(Response::snapshot(vec![]))));
    assert!(client.fetch_snapshot(&user()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn rejected_credential_is_not_authenticated() {
    let client = BandClient::new(Arc::new(Fixed(Response::login_failed(LoginError::NotAuthenticated))));
    assert!(matches!(client.fetch_snapshot(&user()).await, Err(ClientError::NotAuthenticated)));
  }

  #[tokio::test]
  async fn transport_failure_is_a_connectivity_error() {
    let client = BandClient::new(Arc::new(Down));
    let err = client.execute(Request::show(user())).await.unwrap_err();
    assert!(err.is_connectivity());
  }

  #[tokio::test(start_paused = true)]
  async fn silent_authority_times_out() {
    let client = BandClient::new(Arc::new(Silent)).with_timeout(Duration::from_millis(200));
    let err = client.execute(Request::show(user())).await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(200)));
    assert!(err.is_connectivity());
  }
}
