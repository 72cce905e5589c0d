//! Interactive console: the UI-owning loop.
//!
//! Everything that touches the view cache or the session runs here, on the
//! main thread. Network work is handed to the [`Dispatcher`] and comes back as
//! [`ClientEvent`]s on the same channel as the user's input lines.

pub mod input;
pub mod render;

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{self, BufRead, Write};

use anyhow::Context;
use bandhub_core::builders::{BandBuilder, CredentialsBuilder, InputMode};
use bandhub_core::domain::{BandId, User};
use bandhub_core::ports::{ScriptId, Transport};
use bandhub_core::protocol::{Command, Request, Response, ResponseBody};
use bandhub_core::script::{ScriptError, ScriptLine, ScriptReport, ScriptRunner};
use bandhub_core::services::table::{self, Column};
use bandhub_core::services::{ClientEvent, Dispatcher, RefreshPoller, Session, Ticket, ViewState, ViewUpdate};
use bandhub_core::ClientError;
use bandhub_fs::FsScriptSource;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use self::input::ConsoleInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
  Continue,
  Exit,
}

pub struct Console {
  dispatcher: Dispatcher<dyn Transport>,
  events: UnboundedReceiver<ClientEvent>,
  deferred: VecDeque<ClientEvent>,
  scripts: ScriptRunner<FsScriptSource>,
  poller: RefreshPoller,
  session: Session,
  view: ViewState,
  filter: String,
  sort: Option<Column>,
  /// Credentials waiting for their login/register answer.
  logins: HashMap<Ticket, User>,
  /// Background `show` requests whose snapshot should not be printed.
  quiet: HashSet<Ticket>,
}

impl Console {
  pub fn new(
    dispatcher: Dispatcher<dyn Transport>,
    events: UnboundedReceiver<ClientEvent>,
    scripts: ScriptRunner<FsScriptSource>,
    poller: RefreshPoller,
  ) -> Self {
    Self {
      dispatcher,
      events,
      deferred: VecDeque::new(),
      scripts,
      poller,
      session: Session::new(),
      view: ViewState::new(),
      filter: String::new(),
      sort: None,
      logins: HashMap::new(),
      quiet: HashSet::new(),
    }
  }

  /// Runs until `exit` or end of input. Must not be called from inside the runtime.
  pub fn run(mut self) -> anyhow::Result<()> {
    self.spawn_stdin_reader().context("starting the stdin reader")?;
    println!("bandhub console. `login` or `register` to start, `help` for commands.");
    prompt();

    while let Some(event) = self.next_event() {
      match event {
        ClientEvent::Input(line) => {
          if self.handle_line(&line) == Flow::Exit {
            break;
          }
          prompt();
        }
        ClientEvent::InputClosed => break,
        ClientEvent::Completed { ticket, command, result } => self.on_completed(ticket, command, result),
        ClientEvent::ScriptFinished { script, result, .. } => self.on_script_finished(&script, result),
        ClientEvent::RefreshTick => {
          if self.view.is_visible() {
            self.refresh(true);
          }
        }
      }
    }

    self.poller.stop();
    Ok(())
  }

  fn next_event(&mut self) -> Option<ClientEvent> {
    self.deferred.pop_front().or_else(|| self.events.blocking_recv())
  }

  fn spawn_stdin_reader(&self) -> io::Result<()> {
    let tx = self.dispatcher.sender();
    std::thread::Builder::new().name("bandhub-stdin".into()).spawn(move || {
      for line in io::stdin().lock().lines() {
        match line {
          Ok(line) => {
            if tx.send(ClientEvent::Input(line)).is_err() {
              return;
            }
          }
          Err(e) => {
            warn!(error = %e, "stdin read failed");
            break;
          }
        }
      }
      let _ = tx.send(ClientEvent::InputClosed);
    })?;
    Ok(())
  }

  // ---------------------------------------------------------------------------
  // Input
  // ---------------------------------------------------------------------------

  fn handle_line(&mut self, line: &str) -> Flow {
    let Some(parsed) = ScriptLine::parse(line) else {
      return Flow::Continue;
    };

    match parsed.name.to_lowercase().as_str() {
      "exit" | "quit" => return Flow::Exit,
      "logout" => match self.session.logout() {
        Some(user) => {
          self.hide_view();
          println!("{user} logged out");
        }
        None => println!("not logged in"),
      },
      "view" => self.show_view(),
      "hide" => self.hide_view(),
      "filter" => {
        self.filter = parsed.rest().unwrap_or_default();
        self.print_table();
      }
      "sort" => match parsed.rest().map(|c| c.parse::<Column>()) {
        Some(Ok(column)) => {
          self.sort = Some(column);
          self.print_table();
        }
        Some(Err(e)) => println!("{e}"),
        None => println!("usage: sort <column>"),
      },
      "edit" => self.edit(&parsed),
      _ => self.run_command(&parsed),
    }
    Flow::Continue
  }

  fn run_command(&mut self, parsed: &ScriptLine) {
    let command = parsed.command();

    if matches!(command, Command::Login | Command::Register) {
      self.authenticate(command);
      return;
    }

    let Some(user) = self.session.current_user().cloned() else {
      if command == Command::Help {
        print!("{}", render::help());
      } else {
        println!("log in first (`login` or `register`)");
      }
      return;
    };

    let request = match command {
      Command::Add => {
        let mut input = ConsoleInput::new(&mut self.events, &mut self.deferred);
        match BandBuilder::new(user.login()).build(&mut input, InputMode::Interactive) {
          Ok(band) => Request::add(user, band),
          Err(e) => return println!("{e}"),
        }
      }
      Command::UpdateId => {
        let Some(id) = numeric_arg(parsed) else {
          return println!("usage: update_id <id>");
        };
        let mut input = ConsoleInput::new(&mut self.events, &mut self.deferred);
        match BandBuilder::new(user.login()).build(&mut input, InputMode::Interactive) {
          Ok(band) => Request::update_id(user, BandId::new(id), band),
          Err(e) => return println!("{e}"),
        }
      }
      Command::RemoveById => match numeric_arg(parsed) {
        Some(id) => Request::remove_by_id(user, BandId::new(id)),
        None => return println!("usage: remove_by_id <id>"),
      },
      Command::RemoveAt => match numeric_arg(parsed) {
        Some(index) => Request::remove_at(user, index),
        None => return println!("usage: remove_at <index>"),
      },
      Command::ExecuteScript => {
        match parsed.rest() {
          Some(path) => {
            let root = self.scripts.resolve(&path);
            self.dispatcher.submit_script(self.scripts.clone(), Some(user), root);
          }
          None => println!("usage: execute_script <path>"),
        }
        return;
      }
      other => match Request::simple(other, user) {
        Ok(request) => request,
        Err(e) => return println!("{e}"),
      },
    };

    self.dispatcher.submit(request);
  }

  fn authenticate(&mut self, command: Command) {
    let mut input = ConsoleInput::new(&mut self.events, &mut self.deferred);
    let built = match command {
      Command::Register => CredentialsBuilder.build_registration(&mut input),
      _ => CredentialsBuilder.build(&mut input),
    };
    let user = match built {
      Ok(user) => user,
      Err(e) => return println!("{e}"),
    };

    let request = match command {
      Command::Register => Request::register(user.clone()),
      _ => Request::login(user.clone()),
    };
    let ticket = self.dispatcher.submit(request);
    self.logins.insert(ticket, user);
  }

  /// `edit <id> <column> <value...>`: optimistic local change plus an `update_id`.
  fn edit(&mut self, parsed: &ScriptLine) {
    let (Some(id), Some(column)) = (numeric_arg(parsed), parsed.arg(1)) else {
      return println!("usage: edit <id> <column> <value>");
    };
    let column = match column.parse::<Column>() {
      Ok(column) => column,
      Err(e) => return println!("{e}"),
    };
    let value = parsed.args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();

    let Some(band) = self.view.begin_edit(BandId::new(id)) else {
      return println!("band {id} is not in the view, run `view` first");
    };
    let Some(user) = self.session.current_user().cloned() else {
      return println!("log in first (`login` or `register`)");
    };

    match table::edit_owned_cell(Some(&user), &band, column, &value) {
      Ok(edited) => {
        self.view.apply_optimistic(edited.clone());
        self.dispatcher.submit(Request::update_id(user, edited.id, edited));
      }
      Err(e) => println!("{e}"),
    }
  }

  // ---------------------------------------------------------------------------
  // View
  // ---------------------------------------------------------------------------

  fn show_view(&mut self) {
    if self.session.current_user().is_none() {
      return println!("log in first (`login` or `register`)");
    }
    if self.view.set_visible(true) {
      self.poller.start(self.dispatcher.sender());
    }
    self.refresh(false);
  }

  fn hide_view(&mut self) {
    if self.view.set_visible(false) {
      self.poller.stop();
    }
  }

  fn refresh(&mut self, quiet: bool) {
    let Some(user) = self.session.current_user().cloned() else {
      return;
    };
    let ticket = self.dispatcher.submit(Request::show(user));
    if quiet {
      self.quiet.insert(ticket);
    }
  }

  fn print_table(&self) {
    let mut rows = table::filter(self.view.bands(), &self.filter);
    if let Some(column) = self.sort {
      table::sort_by(&mut rows, column);
    }
    print!("{}", render::table(&rows));
  }

  // ---------------------------------------------------------------------------
  // Completions
  // ---------------------------------------------------------------------------

  fn on_completed(&mut self, ticket: Ticket, command: Command, result: Result<Response, ClientError>) {
    let quiet = self.quiet.remove(&ticket);
    let pending_login = self.logins.remove(&ticket);

    let response = match result {
      Ok(response) => response,
      Err(e) => {
        if command == Command::UpdateId && self.view.revert_pending() > 0 {
          debug!(%ticket, "update failed in transit, optimistic edit reverted");
        }
        if e.is_connectivity() {
          return println!("connection problem: {e}; try again");
        }
        return println!("error: {e}");
      }
    };

    if let Some(user) = pending_login {
      match self.session.apply_login(user, &response) {
        Ok(()) => println!("{}", response.message),
        Err(error) => println!("{command} failed: {error}"),
      }
      return;
    }

    let update = self.view.apply_response(command, &response);
    if let Some(error) = response.login_error() {
      return println!("authentication failed: {error}");
    }

    match update {
      ViewUpdate::Replaced { count } => {
        debug!(%ticket, count, "view replaced");
        if !quiet {
          self.print_table();
        }
      }
      ViewUpdate::NeedsRefresh => {
        println!("{}", response.message);
        self.refresh(true);
      }
      ViewUpdate::Reverted { count } => {
        debug!(%ticket, count, "optimistic edit rejected");
        match response.body {
          ResponseBody::Unauthorized => println!("not allowed: {}", response.message),
          _ => println!("failed: {}", response.message),
        }
        self.refresh(true);
      }
      ViewUpdate::Unchanged => match response.body {
        ResponseBody::Unauthorized => println!("not allowed: {}", response.message),
        ResponseBody::Outcome { success: false } => println!("failed: {}", response.message),
        _ => println!("{}", response.message),
      },
    }
  }

  fn on_script_finished(&mut self, script: &ScriptId, result: Result<ScriptReport, ScriptError>) {
    match result {
      Ok(report) => {
        print!("{}", render::report(&report));
        if report.mutated() {
          self.refresh(true);
        }
      }
      Err(e) => println!("script {script} aborted: {e}"),
    }
  }
}

fn numeric_arg(parsed: &ScriptLine) -> Option<i64> {
  parsed.arg(0).and_then(|arg| arg.parse().ok())
}

fn prompt() {
  print!("> ");
  let _ = io::stdout().flush();
}
