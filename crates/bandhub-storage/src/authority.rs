use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use bandhub_core::domain::{Band, BandId, IdSequence, User};
use bandhub_core::ports::{Transport, TransportError};
use bandhub_core::protocol::{Command, LoginError, Request, Response};

use crate::handlers;
use crate::users::UserStore;

#[derive(Debug, Error)]
pub enum AuthorityError {
  #[error("authority state poisoned by a panicked request")]
  Poisoned,

  #[error("user `{0}` could not be registered")]
  Registration(String),
}

pub(crate) struct AuthorityState {
  pub(crate) bands: Vec<Band>,
  pub(crate) users: UserStore,
  pub(crate) ids: IdSequence,
  pub(crate) created_at: NaiveDateTime,
}

/// Autoridad completa en memoria.
///
/// Es la única dueña de la secuencia de ids y el único punto donde se
/// comprueba la propiedad de las bandas.
pub struct MemoryAuthority {
  state: Mutex<AuthorityState>,
}

impl Default for MemoryAuthority {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryAuthority {
  pub fn new() -> Self {
    Self {
      state: Mutex::new(AuthorityState {
        bands: Vec::new(),
        users: UserStore::default(),
        ids: IdSequence::new(),
        created_at: Local::now().naive_local(),
      }),
    }
  }

  fn lock(&self) -> Result<MutexGuard<'_, AuthorityState>, AuthorityError> {
    self.state.lock().map_err(|_| AuthorityError::Poisoned)
  }

  pub fn register_user(&self, user: &User) -> Result<(), AuthorityError> {
    self.lock()?.users.register(user).map_err(|_| AuthorityError::Registration(user.login().to_string()))
  }

  /// Añade bandas ya construidas como si las hubiera enviado su dueño.
  ///
  /// Devuelve los ids asignados; las inválidas se descartan.
  pub fn seed(&self, bands: impl IntoIterator<Item = Band>) -> Result<Vec<BandId>, AuthorityError> {
    let mut state = self.lock()?;
    let mut assigned = Vec::new();
    for mut band in bands {
      if let Some(id) = state.ids.assign(&mut band) {
        state.bands.push(band);
        assigned.push(id);
      }
    }
    Ok(assigned)
  }

  /// Copia de la colección en su orden actual.
  pub fn snapshot(&self) -> Result<Vec<Band>, AuthorityError> {
    Ok(self.lock()?.bands.clone())
  }

  pub fn handle(&self, request: Request) -> Result<Response, AuthorityError> {
    let mut state = self.lock()?;
    let Request { command, user, payload } = request;
    debug!(%command, user = %user, "authority request");

    match command {
      Command::Register => {
        return Ok(match state.users.register(&user) {
          Ok(()) => {
            info!(login = %user, "user registered");
            Response::message(format!("user {user} registered"))
          }
          Err(e) => Response::login_failed(e),
        });
      }
      Command::Login => {
        return Ok(match state.users.authenticate(&user) {
          Ok(()) => Response::message(format!("welcome, {user}")),
          Err(e) => Response::login_failed(e),
        });
      }
      _ => {}
    }

    if state.users.authenticate(&user).is_err() {
      return Ok(Response::login_failed(LoginError::NotAuthenticated));
    }

    let request = match Request::build(command, user, payload) {
      Ok(request) => request,
      Err(e) => return Ok(Response::outcome(false, e.to_string())),
    };
    Ok(handlers::dispatch(&mut state, request))
  }
}

#[async_trait]
impl Transport for MemoryAuthority {
  async fn send(&self, request: Request) -> Result<Response, TransportError> {
    self.handle(request).map_err(|e| TransportError::Connection(e.to_string()))
  }
}
