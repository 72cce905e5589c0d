use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::dispatcher::ClientEvent;

/// Emite [`ClientEvent::RefreshTick`] a intervalo fijo mientras la vista está visible.
///
/// Cada tick debe traducirse en un `show` cuyo snapshot sustituye la caché
/// local entera, aunque eso deshaga una edición optimista en vuelo.
pub struct RefreshPoller {
  interval: Duration,
  runtime: Handle,
  task: Option<JoinHandle<()>>,
}

impl RefreshPoller {
  pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

  /// Un intervalo nulo no es un periodo válido y se sustituye por [`Self::DEFAULT_INTERVAL`].
  pub fn new(interval: Duration, runtime: Handle) -> Self {
    let interval = if interval.is_zero() {
      warn!(default = ?Self::DEFAULT_INTERVAL, "zero refresh interval, using the default");
      Self::DEFAULT_INTERVAL
    } else {
      interval
    };
    Self { interval, runtime, task: None }
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub fn is_running(&self) -> bool {
    self.task.as_ref().is_some_and(|task| !task.is_finished())
  }

  /// Arranca el sondeo. Devuelve `false` si ya estaba en marcha.
  pub fn start(&mut self, events: UnboundedSender<ClientEvent>) -> bool {
    if self.is_running() {
      return false;
    }

    let period = self.interval;
    debug!(?period, "refresh poller started");
    self.task = Some(self.runtime.spawn(async move {
      let mut ticker = tokio::time::interval(period);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
      // El primer tick es inmediato; la vista ya se cargó al mostrarse.
      ticker.tick().await;
      loop {
        ticker.tick().await;
        if events.send(ClientEvent::RefreshTick).is_err() {
          break;
        }
      }
    }));
    true
  }

  /// Detiene el sondeo. Devuelve `false` si no estaba en marcha.
  pub fn stop(&mut self) -> bool {
    match self.task.take() {
      Some(task) => {
        task.abort();
        debug!("refresh poller stopped");
        true
      }
      None => false,
    }
  }
}

impl Drop for RefreshPoller {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}
