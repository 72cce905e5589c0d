use std::sync::Arc;

use tracing::{debug, info, warn};

use super::scan::{ScanReport, check_recursion};
use super::{ScriptError, ScriptLine};
use crate::builders::{BandBuilder, InputMode};
use crate::domain::{BandId, User};
use crate::ports::input::QueuedLines;
use crate::ports::script_source::{ScriptId, ScriptSource};
use crate::ports::transport::Transport;
use crate::protocol::{Command, Request, Response};
use crate::services::BandClient;

/// Qué pasó con una línea ejecutada.
#[derive(Debug, Clone, PartialEq)]
pub enum LineResult {
  /// La autoridad respondió (con éxito o no: mirar el `Response`).
  Completed(Response),
  /// Se entró en un script incluido.
  Entered(ScriptId),
  /// La línea no se pudo enviar o la autoridad no respondió.
  Failed(String),
  /// Línea reconocida pero no ejecutable dentro de un script.
  Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
  pub script: ScriptId,
  /// Número de línea (1-based) del comando dentro de `script`.
  pub line: usize,
  pub command: Command,
  pub result: LineResult,
}

/// Resumen de una ejecución completa.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptReport {
  pub root: ScriptId,
  pub scan: ScanReport,
  pub outcomes: Vec<LineOutcome>,
}

impl ScriptReport {
  pub fn failures(&self) -> impl Iterator<Item = &LineOutcome> {
    self.outcomes.iter().filter(|o| match &o.result {
      LineResult::Failed(_) => true,
      LineResult::Completed(response) => !response.is_success(),
      LineResult::Entered(_) | LineResult::Skipped(_) => false,
    })
  }

  /// `true` si algún comando que modifica la colección terminó con éxito.
  pub fn mutated(&self) -> bool {
    self
      .outcomes
      .iter()
      .any(|o| o.command.mutates() && matches!(&o.result, LineResult::Completed(r) if r.is_success()))
  }
}

/// Acción decidida para una línea, antes de tocar la red.
enum Step {
  Send(Request),
  Enter(ScriptId),
  Done(LineResult),
}

/// Ejecuta scripts contra la autoridad.
///
/// Primero comprueba que no hay ciclos (sin efectos), luego exige un usuario
/// autenticado y ejecuta línea a línea. Un fallo en una línea se anota y se
/// sigue con la siguiente.
pub struct ScriptRunner<S: ?Sized> {
  source: Arc<S>,
}

impl<S: ?Sized> Clone for ScriptRunner<S> {
  fn clone(&self) -> Self {
    Self { source: Arc::clone(&self.source) }
  }
}

impl<S: ScriptSource + ?Sized> ScriptRunner<S> {
  pub fn new(source: Arc<S>) -> Self {
    Self { source }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  /// Resuelve una referencia escrita por el usuario (sin script padre).
  pub fn resolve(&self, reference: &str) -> ScriptId {
    self.source.resolve(None, reference)
  }

  pub async fn run<T: Transport + ?Sized>(
    &self,
    client: &BandClient<T>,
    user: Option<&User>,
    root: &ScriptId,
  ) -> Result<ScriptReport, ScriptError> {
    let scan = check_recursion(&*self.source, root)?;
    let user = user.ok_or(ScriptError::NotAuthenticated)?;

    info!(script = %root, user = %user, "running script");
    let mut frames: Vec<(ScriptId, QueuedLines)> = vec![(root.clone(), QueuedLines::new(self.source.read_lines(root)?))];
    let mut outcomes = Vec::new();

    while let Some((script, lines)) = frames.last_mut() {
      let Some(raw) = lines.next_raw() else {
        debug!(script = %script, "script finished");
        frames.pop();
        continue;
      };
      let Some(parsed) = ScriptLine::parse(&raw) else {
        continue;
      };

      let script = script.clone();
      let line = lines.position();
      let command = parsed.command();
      let step = self.plan(&parsed, command, lines, &script, user);

      let result = match step {
        Step::Send(request) => match client.execute(request).await {
          Ok(response) => LineResult::Completed(response),
          Err(e) => LineResult::Failed(e.to_string()),
        },
        Step::Enter(nested) => self.enter(&mut frames, nested),
        Step::Done(result) => result,
      };

      if let LineResult::Failed(reason) = &result {
        warn!(script = %script, line, %command, %reason, "script line failed");
      }
      outcomes.push(LineOutcome { script, line, command, result });
    }

    Ok(ScriptReport { root: root.clone(), scan, outcomes })
  }

  fn plan(&self, line: &ScriptLine, command: Command, lines: &mut QueuedLines, script: &ScriptId, user: &User) -> Step {
    match command {
      Command::Add => match BandBuilder::new(user.login()).build(lines, InputMode::Batch) {
        Ok(band) => Step::Send(Request::add(user.clone(), band)),
        Err(e) => Step::Done(LineResult::Failed(e.to_string())),
      },
      Command::UpdateId => {
        // Las líneas de la banda se consumen aunque el id sea inválido, para
        // no interpretarlas como comandos.
        let band = BandBuilder::new(user.login()).build(lines, InputMode::Batch);
        match (parse_number(line), band) {
          (Ok(id), Ok(band)) => Step::Send(Request::update_id(user.clone(), BandId::new(id), band)),
          (Err(reason), _) => Step::Done(LineResult::Failed(reason)),
          (_, Err(e)) => Step::Done(LineResult::Failed(e.to_string())),
        }
      }
      Command::RemoveById => match parse_number(line) {
        Ok(id) => Step::Send(Request::remove_by_id(user.clone(), BandId::new(id))),
        Err(reason) => Step::Done(LineResult::Failed(reason)),
      },
      Command::RemoveAt => match parse_number(line) {
        Ok(index) => Step::Send(Request::remove_at(user.clone(), index)),
        Err(reason) => Step::Done(LineResult::Failed(reason)),
      },
      Command::ExecuteScript => match line.rest() {
        Some(reference) => Step::Enter(self.source.resolve(Some(script), &reference)),
        None => Step::Done(LineResult::Failed("execute_script needs a script path".into())),
      },
      Command::Login | Command::Register => {
        Step::Done(LineResult::Skipped(format!("`{command}` is not available inside scripts")))
      }
      other => match Request::simple(other, user.clone()) {
        Ok(request) => Step::Send(request),
        Err(e) => Step::Done(LineResult::Failed(e.to_string())),
      },
    }
  }

  fn enter(&self, frames: &mut Vec<(ScriptId, QueuedLines)>, nested: ScriptId) -> LineResult {
    // El escaneo previo ya descartó ciclos; esto cubre un fichero que cambió después.
    if frames.iter().any(|(id, _)| *id == nested) {
      return LineResult::Failed(format!("script recursion detected at {nested}"));
    }
    match self.source.read_lines(&nested) {
      Ok(lines) => {
        frames.push((nested.clone(), QueuedLines::new(lines)));
        LineResult::Entered(nested)
      }
      Err(e) => LineResult::Failed(e.to_string()),
    }
  }
}

fn parse_number(line: &ScriptLine) -> Result<i64, String> {
  let arg = line.arg(0).ok_or_else(|| format!("`{}` needs a numeric argument", line.name))?;
  arg.parse().map_err(|_| format!("`{arg}` is not a whole number"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::transport::TransportError;
  use crate::protocol::Payload;
  use crate::script::InMemoryScripts;
  use async_trait::async_trait;
  use std::sync::Mutex;

  /// Autoridad falsa que responde éxito y recuerda lo recibido.
  #[derive(Default)]
  struct Recorder {
    seen: Mutex<Vec<Request>>,
  }

  impl Recorder {
    fn commands(&self) -> Vec<Command> {
      self.seen.lock().unwrap().iter().map(|r| r.command).collect()
    }
  }

  #[async_trait]
  impl Transport for Recorder {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
      let response = match request.command {
        Command::Add => Response::outcome(true, "added"),
        _ => Response::default(),
      };
      self.seen.lock().unwrap().push(request);
      Ok(response)
    }
  }

  fn setup(scripts: InMemoryScripts) -> (ScriptRunner<InMemoryScripts>, Arc<Recorder>, BandClient<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let client = BandClient::new(Arc::clone(&recorder));
    (ScriptRunner::new(Arc::new(scripts)), recorder, client)
  }

  fn user() -> User {
    User::new("joan", "pw")
  }

  #[tokio::test]
  async fn cycle_aborts_before_anything_is_sent() {
    let scripts = InMemoryScripts::new().with_script("a", "show\nclear\nexecute_script b").with_script("b", "execute_script a");
    let (runner, recorder, client) = setup(scripts);

    let err = runner.run(&client, Some(&user()), &ScriptId::new("a")).await.unwrap_err();

    assert!(matches!(err, ScriptError::Recursion { .. }));
    assert!(recorder.commands().is_empty());
  }

  #[tokio::test]
  async fn no_user_is_rejected_up_front() {
    let (runner, recorder, client) = setup(InMemoryScripts::new().with_script("a", "show"));

    let err = runner.run(&client, None, &ScriptId::new("a")).await.unwrap_err();

    assert!(matches!(err, ScriptError::NotAuthenticated));
    assert!(recorder.commands().is_empty());
  }

  #[tokio::test]
  async fn add_consumes_band_lines_in_batch_mode() {
    let script = "# seed\n\nadd\nKino\n1.5\n2000\n\n\n\nMelodiya\n3\n1000\nshow\n";
    let (runner, recorder, client) = setup(InMemoryScripts::new().with_script("a", script));

    let report = runner.run(&client, Some(&user()), &ScriptId::new("a")).await.unwrap();

    assert_eq!(recorder.commands(), vec![Command::Add, Command::Show]);
    let seen = recorder.seen.lock().unwrap();
    let Payload::Band(band) = &seen[0].payload else { panic!("add without band") };
    assert_eq!(band.coordinates.y, 968);
    assert_eq!(band.owner, "joan");
    assert_eq!(seen[0].user.login(), "joan");
    assert!(report.mutated());
    assert_eq!(report.outcomes[0].line, 3);
  }

  #[tokio::test]
  async fn sibling_scripts_both_run() {
    let scripts = InMemoryScripts::new()
      .with_script("a", "execute_script b\nexecute_script c")
      .with_script("b", "info")
      .with_script("c", "show");
    let (runner, recorder, client) = setup(scripts);

    runner.run(&client, Some(&user()), &ScriptId::new("a")).await.unwrap();

    assert_eq!(recorder.commands(), vec![Command::Info, Command::Show]);
  }

  #[tokio::test]
  async fn failures_do_not_stop_the_script() {
    let script = "remove_by_id nope\nexecute_script ghost\nlogin\nfrobnicate\nremove_at 0\n";
    let (runner, recorder, client) = setup(InMemoryScripts::new().with_script("a", script));

    let report = runner.run(&client, Some(&user()), &ScriptId::new("a")).await.unwrap();

    assert_eq!(recorder.commands(), vec![Command::Help, Command::RemoveAt]);
    assert_eq!(report.failures().count(), 2);
    assert!(matches!(report.outcomes[2].result, LineResult::Skipped(_)));
    assert_eq!(report.scan.missing.len(), 1);
  }

  #[tokio::test]
  async fn update_id_carries_the_id_and_the_band() {
    let script = "update_id 7\nRenamed\n0\n0\n\n\n\nLabel\n1\n1\n";
    let (runner, recorder, client) = setup(InMemoryScripts::new().with_script("a", script));

    runner.run(&client, Some(&user()), &ScriptId::new("a")).await.unwrap();

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let Payload::Update { band, id } = &seen[0].payload else { panic!("update without payload") };
    assert_eq!(*id, BandId::new(7));
    assert_eq!(band.name, "Renamed");
  }
}
