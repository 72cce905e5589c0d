pub mod builders;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod protocol;
pub mod script;
pub mod services;

pub use errors::ClientError;
