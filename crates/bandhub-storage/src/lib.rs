//! Autoridad en memoria.
//!
//! Implementa la semántica de comandos de la autoridad sobre un `Vec<Band>`
//! protegido por un `Mutex`. Se usa en los tests y en el modo `--offline` de
//! la consola.

mod authority;
mod handlers;
mod users;

pub use authority::{AuthorityError, MemoryAuthority};
pub use users::UserStore;
