use std::time::Duration;

use thiserror::Error;

use crate::ports::transport::TransportError;

/// Fallos que puede observar quien emite una petición.
///
/// Cada `Request` termina o bien en un `Response` inspeccionable o bien en
/// uno de estos errores; nunca se descarta nada en silencio.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("transport error: {0}")]
  Transport(#[from] TransportError),

  #[error("no response from the authority after {0:?}")]
  Timeout(Duration),

  #[error("no authenticated user")]
  NotAuthenticated,

  #[error("unexpected response: {0}")]
  UnexpectedResponse(String),
}

impl ClientError {
  /// `true` para los fallos de conectividad (transporte caído o timeout).
  ///
  /// Nunca se reintentan automáticamente: el usuario vuelve a lanzar el comando.
  pub fn is_connectivity(&self) -> bool {
    matches!(self, ClientError::Transport(_) | ClientError::Timeout(_))
  }
}
