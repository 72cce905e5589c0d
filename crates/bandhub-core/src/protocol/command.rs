use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ProtocolError;

/// Conjunto cerrado de operaciones que entiende la autoridad.
///
/// El despacho se hace con `match` exhaustivo sobre esta enum; los nombres en
/// texto sólo aparecen en los bordes (scripts, consola, cable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
  Add,
  Clear,
  ExecuteScript,
  GroupCountingByLabel,
  Help,
  Info,
  PrintDescending,
  PrintFieldAscendingLabel,
  RemoveAt,
  RemoveById,
  RemoveFirst,
  Register,
  Login,
  Shuffle,
  Show,
  UpdateId,
}

/// Forma del payload que transporta un `Request` para un comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
  None,
  Band,
  Id,
  BandAndId,
}

impl fmt::Display for PayloadKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      PayloadKind::None => "empty",
      PayloadKind::Band => "band",
      PayloadKind::Id => "identifier",
      PayloadKind::BandAndId => "band + identifier",
    };
    f.write_str(text)
  }
}

impl Command {
  pub const ALL: [Command; 16] = [
    Command::Add,
    Command::Clear,
    Command::ExecuteScript,
    Command::GroupCountingByLabel,
    Command::Help,
    Command::Info,
    Command::PrintDescending,
    Command::PrintFieldAscendingLabel,
    Command::RemoveAt,
    Command::RemoveById,
    Command::RemoveFirst,
    Command::Register,
    Command::Login,
    Command::Shuffle,
    Command::Show,
    Command::UpdateId,
  ];

  /// Nombre canónico, el que se escribe en los scripts.
  pub fn name(&self) -> &'static str {
    match self {
      Command::Add => "add",
      Command::Clear => "clear",
      Command::ExecuteScript => "execute_script",
      Command::GroupCountingByLabel => "group_counting_by_label",
      Command::Help => "help",
      Command::Info => "info",
      Command::PrintDescending => "print_descending",
      Command::PrintFieldAscendingLabel => "print_field_ascending_label",
      Command::RemoveAt => "remove_at",
      Command::RemoveById => "remove_by_id",
      Command::RemoveFirst => "remove_first",
      Command::Register => "register",
      Command::Login => "login",
      Command::Shuffle => "shuffle",
      Command::Show => "show",
      Command::UpdateId => "update_id",
    }
  }

  /// Descripción legible, tal como la muestra `help`.
  pub fn description(&self) -> &'static str {
    match self {
      Command::Add => "add {element} : add a new element to the collection",
      Command::Clear => "clear : remove every element you own",
      Command::ExecuteScript => "execute_script file_name : read and execute a script from the given file",
      Command::GroupCountingByLabel => {
        "group_counting_by_label : group the elements by label and print the size of each group"
      }
      Command::Help => "help : print the available commands",
      Command::Info => "info : print information about the collection (type, creation date, size)",
      Command::PrintDescending => "print_descending : print the elements in descending order",
      Command::PrintFieldAscendingLabel => {
        "print_field_ascending_label : print the label of every element in ascending order"
      }
      Command::RemoveAt => "remove_at index : remove the element at the given position",
      Command::RemoveById => "remove_by_id id : remove the element with the given id",
      Command::RemoveFirst => "remove_first : remove the first element you own",
      Command::Register => "register : register a new user",
      Command::Login => "login : log in with an existing user",
      Command::Shuffle => "shuffle : shuffle the elements of the collection",
      Command::Show => "show : print every element of the collection",
      Command::UpdateId => "update_id id {element} : replace the element with the given id",
    }
  }

  /// `true` si el comando necesita un argumento además de la credencial.
  ///
  /// `execute_script` lo necesita (la ruta) aunque nunca viaje a la autoridad.
  pub fn has_payload(&self) -> bool {
    matches!(
      self,
      Command::Add | Command::ExecuteScript | Command::RemoveAt | Command::RemoveById | Command::UpdateId
    )
  }

  /// Payload que debe acompañar al comando dentro de un `Request`.
  pub fn payload_kind(&self) -> PayloadKind {
    match self {
      Command::Add => PayloadKind::Band,
      Command::RemoveAt | Command::RemoveById => PayloadKind::Id,
      Command::UpdateId => PayloadKind::BandAndId,
      _ => PayloadKind::None,
    }
  }

  /// Comandos que cambian la colección; tras ellos la vista debe refrescarse.
  pub fn mutates(&self) -> bool {
    matches!(
      self,
      Command::Add
        | Command::Clear
        | Command::RemoveAt
        | Command::RemoveById
        | Command::RemoveFirst
        | Command::Shuffle
        | Command::UpdateId
    )
  }

  /// Búsqueda tolerante: un nombre desconocido se resuelve como [`Command::Help`].
  ///
  /// Es el comportamiento que esperan los scripts. Quien necesite distinguir
  /// un nombre inválido debe usar `str::parse`.
  pub fn resolve(name: &str) -> Command {
    name.parse().unwrap_or_else(|_| {
      debug!(name, "unknown command name, falling back to help");
      Command::Help
    })
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Command {
  type Err = ProtocolError;

  /// Acepta tanto el nombre canónico (`remove_by_id`) como el de los botones
  /// de la interfaz (`RemoveById`): se ignoran mayúsculas y separadores.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace(['_', '-', ' '], "");

    let command = match normalized.as_str() {
      "add" => Command::Add,
      "clear" => Command::Clear,
      "executescript" => Command::ExecuteScript,
      "groupcountingbylabel" => Command::GroupCountingByLabel,
      "help" => Command::Help,
      "info" => Command::Info,
      "printdescending" => Command::PrintDescending,
      "printfieldascendinglabel" => Command::PrintFieldAscendingLabel,
      "removeat" => Command::RemoveAt,
      "removebyid" => Command::RemoveById,
      "removefirst" => Command::RemoveFirst,
      "register" => Command::Register,
      "login" => Command::Login,
      "shuffle" => Command::Shuffle,
      "show" => Command::Show,
      "updateid" => Command::UpdateId,
      _ => return Err(ProtocolError::UnknownCommand(s.to_string())),
    };

    Ok(command)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_command_parses_from_its_canonical_name() {
    for command in Command::ALL {
      assert_eq!(command.name().parse::<Command>(), Ok(command));
    }
  }

  #[test]
  fn button_style_names_are_accepted() {
    assert_eq!("RemoveById".parse::<Command>(), Ok(Command::RemoveById));
    assert_eq!("PrintFieldAscendingLabel".parse::<Command>(), Ok(Command::PrintFieldAscendingLabel));
  }

  #[test]
  fn strict_parse_rejects_unknown_names() {
    assert_eq!("dance".parse::<Command>(), Err(ProtocolError::UnknownCommand("dance".into())));
  }

  #[test]
  fn resolve_falls_back_to_help() {
    assert_eq!(Command::resolve("dance"), Command::Help);
    assert_eq!(Command::resolve("show"), Command::Show);
    assert!(!Command::resolve("dance").has_payload());
  }

  #[test]
  fn payload_flags_match_the_catalog() {
    let with_payload: Vec<_> = Command::ALL.into_iter().filter(Command::has_payload).collect();
    assert_eq!(
      with_payload,
      vec![Command::Add, Command::ExecuteScript, Command::RemoveAt, Command::RemoveById, Command::UpdateId]
    );
    assert_eq!(Command::UpdateId.payload_kind(), PayloadKind::BandAndId);
    assert_eq!(Command::ExecuteScript.payload_kind(), PayloadKind::None);
  }

  #[test]
  fn every_description_starts_with_the_name() {
    for command in Command::ALL {
      assert!(command.description().starts_with(command.name()), "{command}");
    }
  }
}
