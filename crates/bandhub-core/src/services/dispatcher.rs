use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::ClientError;
use crate::ports::script_source::{ScriptId, ScriptSource};
use crate::ports::transport::Transport;
use crate::protocol::{Command, Request, Response};
use crate::script::{ScriptError, ScriptReport, ScriptRunner};
use crate::services::client::BandClient;

/// Identificador de un trabajo enviado a los workers.
pub type Ticket = Uuid;

/// Mensajes que recibe el hilo dueño de la interfaz.
///
/// Todo llega por un único canal: resultados de los workers, ticks de
/// refresco y líneas de entrada del usuario.
#[derive(Debug)]
pub enum ClientEvent {
  Completed { ticket: Ticket, command: Command, result: Result<Response, ClientError> },
  ScriptFinished { ticket: Ticket, script: ScriptId, result: Result<ScriptReport, ScriptError> },
  RefreshTick,
  Input(String),
  InputClosed,
}

/// Lanza cada petición en un worker del runtime y devuelve el resultado por
/// el canal de eventos.
///
/// Los workers nunca tocan el estado de la vista: sólo envían eventos. No hay
/// orden garantizado entre dos peticiones ni forma de cancelarlas.
pub struct Dispatcher<T: ?Sized> {
  client: BandClient<T>,
  runtime: Handle,
  events: UnboundedSender<ClientEvent>,
}

impl<T: Transport + ?Sized + 'static> Dispatcher<T> {
  pub fn new(client: BandClient<T>, runtime: Handle) -> (Self, UnboundedReceiver<ClientEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    (Self { client, runtime, events }, rx)
  }

  pub fn client(&self) -> &BandClient<T> {
    &self.client
  }

  /// Emisor para otros productores (refresco, lector de stdin).
  pub fn sender(&self) -> UnboundedSender<ClientEvent> {
    self.events.clone()
  }

  pub fn submit(&self, request: Request) -> Ticket {
    let ticket = Uuid::new_v4();
    let command = request.command;
    let client = self.client.clone();
    let events = self.events.clone();

    debug!(%ticket, %command, "dispatching request");
    self.runtime.spawn(async move {
      let result = client.execute(request).await;
      deliver(&events, ClientEvent::Completed { ticket, command, result });
    });
    ticket
  }

  pub fn submit_script<S: ScriptSource + ?Sized + 'static>(
    &self,
    runner: ScriptRunner<S>,
    user: Option<User>,
    script: ScriptId,
  ) -> Ticket {
    let ticket = Uuid::new_v4();
    let client = self.client.clone();
    let events = self.events.clone();

    debug!(%ticket, %script, "dispatching script");
    self.runtime.spawn(async move {
      let result = runner.run(&client, user.as_ref(), &script).await;
      deliver(&events, ClientEvent::ScriptFinished { ticket, script, result });
    });
    ticket
  }
}

fn deliver(events: &UnboundedSender<ClientEvent>, event: ClientEvent) {
  if events.send(event).is_err() {
    debug!("event receiver dropped, discarding result");
  }
}
