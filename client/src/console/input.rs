use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Write};

use bandhub_core::ports::{InputProblem, LineReader};
use bandhub_core::services::ClientEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Reads field values from the console event channel.
///
/// Worker completions that arrive while the user is typing are parked in
/// `deferred` and handled by the console loop afterwards, in order.
pub struct ConsoleInput<'a> {
  events: &'a mut UnboundedReceiver<ClientEvent>,
  deferred: &'a mut VecDeque<ClientEvent>,
}

impl<'a> ConsoleInput<'a> {
  pub fn new(events: &'a mut UnboundedReceiver<ClientEvent>, deferred: &'a mut VecDeque<ClientEvent>) -> Self {
    Self { events, deferred }
  }
}

impl LineReader for ConsoleInput<'_> {
  fn read_line(&mut self, field: &str) -> Option<String> {
    prompt(field);
    loop {
      match self.events.blocking_recv()? {
        ClientEvent::Input(line) => return Some(line),
        ClientEvent::InputClosed => {
          self.deferred.push_back(ClientEvent::InputClosed);
          return None;
        }
        other => self.deferred.push_back(other),
      }
    }
  }

  fn report(&mut self, _field: &str, problem: &InputProblem) {
    println!("  ! {problem}");
  }
}

/// Blocking stdin reader for the non-interactive `--script` run.
pub struct StdinLines {
  lines: io::Lines<StdinLock<'static>>,
}

impl StdinLines {
  pub fn new() -> Self {
    Self { lines: io::stdin().lock().lines() }
  }
}

impl Default for StdinLines {
  fn default() -> Self {
    Self::new()
  }
}

impl LineReader for StdinLines {
  fn read_line(&mut self, field: &str) -> Option<String> {
    prompt(field);
    self.lines.next()?.ok()
  }

  fn report(&mut self, _field: &str, problem: &InputProblem) {
    println!("  ! {problem}");
  }
}

fn prompt(field: &str) {
  print!("{field}: ");
  let _ = io::stdout().flush();
}
