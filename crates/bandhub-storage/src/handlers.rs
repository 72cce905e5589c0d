use std::collections::BTreeMap;

use chrono::Local;
use tracing::{debug, info};
use uuid::Uuid;

use bandhub_core::domain::{Band, BandId, Coordinates, User};
use bandhub_core::protocol::{Command, Payload, Request, Response};

use crate::authority::AuthorityState;

/// Ejecuta un comando ya autenticado y con el payload correcto.
pub(crate) fn dispatch(state: &mut AuthorityState, request: Request) -> Response {
  let Request { command, user, payload } = request;

  match (command, payload) {
    (Command::Show, _) => Response::snapshot(state.bands.clone()),
    (Command::PrintDescending, _) => print_descending(state),
    (Command::Info, _) => info(state),
    (Command::Help, _) => help(),
    (Command::Add, Payload::Band(band)) => add(state, &user, band),
    (Command::UpdateId, Payload::Update { band, id }) => update_id(state, &user, id, band),
    (Command::RemoveById, Payload::Id(id)) => remove_by_id(state, &user, BandId::new(id)),
    (Command::RemoveAt, Payload::Id(index)) => remove_at(state, &user, index),
    (Command::RemoveFirst, _) => remove_first(state, &user),
    (Command::Clear, _) => clear(state, &user),
    (Command::Shuffle, _) => shuffle(state),
    (Command::GroupCountingByLabel, _) => group_counting_by_label(state),
    (Command::PrintFieldAscendingLabel, _) => print_field_ascending_label(state),
    (Command::ExecuteScript, _) => Response::outcome(false, "scripts are executed by the client"),
    (Command::Login | Command::Register, _) => Response::outcome(false, "credentials are handled before dispatch"),
    (command, payload) => Response::outcome(false, format!("{command} cannot take a {} payload", payload.kind())),
  }
}

fn print_descending(state: &AuthorityState) -> Response {
  let mut bands = state.bands.clone();
  bands.sort_by(|a, b| b.id.cmp(&a.id));
  Response::snapshot(bands)
}

fn info(state: &AuthorityState) -> Response {
  Response::message(format!(
    "collection type: Vec<Band>\ncreated: {}\nelements: {}\nusers: {}",
    state.created_at.format("%Y-%m-%d %H:%M:%S"),
    state.bands.len(),
    state.users.len(),
  ))
}

fn help() -> Response {
  let lines: Vec<&str> = Command::ALL.iter().map(Command::description).collect();
  Response::message(lines.join("\n"))
}

fn add(state: &mut AuthorityState, user: &User, mut band: Band) -> Response {
  band.owner = user.login().to_string();
  band.creation_date = Local::now().naive_local();
  band.id = BandId::UNASSIGNED;
  if !band.coordinates.is_within_bounds() {
    return Response::outcome(false, format!("y must not be greater than {}", Coordinates::MAX_Y));
  }

  match state.ids.assign(&mut band) {
    Some(id) => {
      info!(%id, owner = %user, "band added");
      state.bands.push(band);
      Response::outcome(true, format!("band {id} added"))
    }
    None => Response::outcome(false, "the band is not valid"),
  }
}

fn update_id(state: &mut AuthorityState, user: &User, id: BandId, band: Band) -> Response {
  let Some(current) = state.bands.iter_mut().find(|b| b.id == id) else {
    return Response::outcome(false, format!("no band with id {id}"));
  };
  if !current.is_owned_by(user.login()) {
    debug!(%id, user = %user, owner = %current.owner_display(), "update rejected");
    return Response::unauthorized(format!("band {id} belongs to {}", current.owner_display()));
  }
  if !band.validate_fields() || !band.coordinates.is_within_bounds() {
    return Response::outcome(false, "the band is not valid");
  }

  current.replace_fields(&band);
  Response::outcome(true, format!("band {id} updated"))
}

fn remove_by_id(state: &mut AuthorityState, user: &User, id: BandId) -> Response {
  match state.bands.iter().position(|b| b.id == id) {
    Some(index) => remove_owned(state, user, index),
    None => Response::outcome(false, format!("no band with id {id}")),
  }
}

fn remove_at(state: &mut AuthorityState, user: &User, index: i64) -> Response {
  match usize::try_from(index).ok().filter(|i| *i < state.bands.len()) {
    Some(index) => remove_owned(state, user, index),
    None => Response::outcome(false, format!("no band at position {index}")),
  }
}

fn remove_owned(state: &mut AuthorityState, user: &User, index: usize) -> Response {
  let band = &state.bands[index];
  if !band.is_owned_by(user.login()) {
    return Response::unauthorized(format!("band {} belongs to {}", band.id, band.owner_display()));
  }
  let removed = state.bands.remove(index);
  info!(id = %removed.id, "band removed");
  Response::ids(format!("band {} removed", removed.id), vec![removed.id])
}

fn remove_first(state: &mut AuthorityState, user: &User) -> Response {
  match state.bands.iter().position(|b| b.is_owned_by(user.login())) {
    Some(index) => remove_owned(state, user, index),
    None => Response::ids("nothing to remove", Vec::new()),
  }
}

fn clear(state: &mut AuthorityState, user: &User) -> Response {
  let mut removed = Vec::new();
  state.bands.retain(|b| {
    if b.is_owned_by(user.login()) {
      removed.push(b.id);
      false
    } else {
      true
    }
  });
  info!(count = removed.len(), user = %user, "bands cleared");
  Response::ids(format!("{} bands removed", removed.len()), removed)
}

fn shuffle(state: &mut AuthorityState) -> Response {
  state.bands.sort_by_cached_key(|_| Uuid::new_v4());
  Response::outcome(true, "collection shuffled")
}

fn group_counting_by_label(state: &AuthorityState) -> Response {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for band in &state.bands {
    *counts.entry(band.label.name.as_str()).or_default() += 1;
  }
  let lines: Vec<String> = counts.iter().map(|(label, count)| format!("{label}: {count}")).collect();
  Response::message(lines.join("\n"))
}

fn print_field_ascending_label(state: &AuthorityState) -> Response {
  let mut labels: Vec<_> = state.bands.iter().map(|b| &b.label).collect();
  labels.sort_by(|a, b| (&a.name, a.bands, a.sales).cmp(&(&b.name, b.bands, b.sales)));
  let lines: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
  Response::message(lines.join("\n"))
}
