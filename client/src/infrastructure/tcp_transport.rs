use async_trait::async_trait;
use bandhub_core::ports::{Transport, TransportError};
use bandhub_core::protocol::{Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::trace;

/// `Transport` over TCP: one connection per request, one JSON document per line.
///
/// The authority answers each request line with exactly one response line.
#[derive(Debug, Clone)]
pub struct TcpTransport {
  addr: String,
}

impl TcpTransport {
  pub fn new(addr: impl Into<String>) -> Self {
    Self { addr: addr.into() }
  }

  pub fn addr(&self) -> &str {
    &self.addr
  }
}

fn connection(e: std::io::Error) -> TransportError {
  TransportError::Connection(e.to_string())
}

#[async_trait]
impl Transport for TcpTransport {
  async fn send(&self, request: Request) -> Result<Response, TransportError> {
    let mut frame = serde_json::to_string(&request).map_err(|e| TransportError::Malformed(e.to_string()))?;
    frame.push('\n');

    let stream = TcpStream::connect(&self.addr).await.map_err(connection)?;
    let (reader, mut writer) = stream.into_split();
    writer.write_all(frame.as_bytes()).await.map_err(connection)?;
    writer.flush().await.map_err(connection)?;
    trace!(addr = %self.addr, bytes = frame.len(), "request written");

    let mut line = String::new();
    let read = BufReader::new(reader).read_line(&mut line).await.map_err(connection)?;
    if read == 0 {
      return Err(TransportError::Closed);
    }

    serde_json::from_str(line.trim_end()).map_err(|e| TransportError::Malformed(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bandhub_core::domain::User;
  use tokio::net::TcpListener;

  async fn serve_once<F>(reply: F) -> String
  where
    F: FnOnce(String) -> Option<String> + Send + 'static,
  {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
      let (stream, _) = listener.accept().await.unwrap();
      let (reader, mut writer) = stream.into_split();
      let mut line = String::new();
      BufReader::new(reader).read_line(&mut line).await.unwrap();
      if let Some(answer) = reply(line) {
        writer.write_all(answer.as_bytes()).await.unwrap();
      }
    });
    addr
  }

  #[tokio::test]
  async fn one_line_out_one_line_back() {
    let addr = serve_once(|line| {
      let request: Request = serde_json::from_str(line.trim_end()).unwrap();
      let response = Response::message(request.command.name());
      Some(format!("{}\n", serde_json::to_string(&response).unwrap()))
    })
    .await;

    let response = TcpTransport::new(addr).send(Request::show(User::new("a", "b"))).await.unwrap();
    assert_eq!(response.message, "show");
  }

  #[tokio::test]
  async fn hang_up_without_answer_is_closed() {
    let addr = serve_once(|_| None).await;
    let err = TcpTransport::new(addr).send(Request::show(User::new("a", "b"))).await.unwrap_err();
    assert!(matches!(err, TransportError::Closed));
  }

  #[tokio::test]
  async fn garbage_is_malformed() {
    let addr = serve_once(|_| Some("not json\n".into())).await;
    let err = TcpTransport::new(addr).send(Request::show(User::new("a", "b"))).await.unwrap_err();
    assert!(matches!(err, TransportError::Malformed(_)));
  }
}
