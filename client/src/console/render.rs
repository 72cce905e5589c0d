use bandhub_core::domain::Band;
use bandhub_core::protocol::Command;
use bandhub_core::script::{LineResult, ScriptReport};
use bandhub_core::services::Column;
use bandhub_core::services::table::cell_text;

const OWNER_HEADER: &str = "Owner";

/// Local commands understood by the console on top of the catalog.
const LOCAL_COMMANDS: [(&str, &str); 7] = [
  ("view", "show the collection table and keep it refreshed"),
  ("hide", "stop refreshing the collection table"),
  ("filter <text>", "only show rows containing <text> (empty clears)"),
  ("sort <column>", "sort rows ascending by <column>"),
  ("edit <id> <column> <value>", "change one cell of a band you own"),
  ("logout", "forget the current credentials"),
  ("exit", "leave the console"),
];

/// Plain-text table, one padded column per field plus the owner.
pub fn table(rows: &[&Band]) -> String {
  let mut headers: Vec<&str> = Column::ALL.iter().map(Column::header).collect();
  headers.push(OWNER_HEADER);

  let cells: Vec<Vec<String>> = rows
    .iter()
    .map(|band| {
      let mut row: Vec<String> = Column::ALL.iter().map(|c| cell_text(band, *c)).collect();
      row.push(band.owner_display().to_string());
      row
    })
    .collect();

  let widths: Vec<usize> = headers
    .iter()
    .enumerate()
    .map(|(i, h)| cells.iter().map(|r| r[i].chars().count()).chain([h.len()]).max().unwrap_or(0))
    .collect();

  let mut out = String::new();
  push_row(&mut out, headers.iter().map(|h| h.to_string()), &widths);
  for row in cells {
    push_row(&mut out, row.into_iter(), &widths);
  }
  if rows.is_empty() {
    out.push_str("(no bands)\n");
  }
  out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
  let line: Vec<String> = cells.zip(widths.iter().copied()).map(|(cell, w)| format!("{cell:<w$}")).collect();
  out.push_str(line.join(" | ").trim_end());
  out.push('\n');
}

pub fn help() -> String {
  let mut out = String::from("commands:\n");
  for command in Command::ALL {
    out.push_str(&format!("  {}\n", command.description()));
  }
  for (usage, text) in LOCAL_COMMANDS {
    out.push_str(&format!("  {usage}: {text}\n"));
  }
  out
}

pub fn report(report: &ScriptReport) -> String {
  let mut out = format!("script {}\n", report.root);
  for missing in &report.scan.missing {
    out.push_str(&format!("  missing {} (from {}): {}\n", missing.id, missing.referenced_from, missing.reason));
  }
  for outcome in &report.outcomes {
    let result = match &outcome.result {
      LineResult::Completed(response) if response.is_success() => format!("ok: {}", response.message),
      LineResult::Completed(response) => format!("failed: {}", response.message),
      LineResult::Entered(id) => format!("entering {id}"),
      LineResult::Failed(reason) => format!("error: {reason}"),
      LineResult::Skipped(reason) => format!("skipped: {reason}"),
    };
    out.push_str(&format!("  {}:{} {} -> {}\n", outcome.script, outcome.line, outcome.command, result));
  }
  let failures = report.failures().count();
  out.push_str(&format!("{} lines, {} failed\n", report.outcomes.len(), failures));
  out
}
