use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  #[error("connection failed: {0}")]
  Connection(String),

  #[error("connection closed by the authority")]
  Closed,

  #[error("malformed response: {0}")]
  Malformed(String),
}

/// Port hacia la autoridad.
///
/// Contrato: por cada `Request` enviado llega exactamente un `Response`, en
/// orden, o un [`TransportError`]. No hay streaming ni cancelación: una vez
/// enviada, la petición termina en éxito o en fallo.
///
/// Implementaciones:
/// - TCP con JSON por líneas (aplicación de consola)
/// - autoridad en memoria (tests y modo offline)
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
  async fn send(&self, request: Request) -> Result<Response, TransportError> {
    (**self).send(request).await
  }
}
