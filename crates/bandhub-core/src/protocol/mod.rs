pub mod command;
pub mod request;
pub mod response;

pub use command::{Command, PayloadKind};
pub use request::{Payload, Request};
pub use response::{DEFAULT_RESULT, LoginError, Response, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
  #[error("unknown command: {0}")]
  UnknownCommand(String),

  #[error("command `{command}` expects a {expected} payload, got {actual}")]
  PayloadMismatch { command: Command, expected: PayloadKind, actual: PayloadKind },
}
