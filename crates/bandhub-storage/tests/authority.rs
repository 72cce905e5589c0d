use std::sync::Arc;

use bandhub_core::ClientError;
use bandhub_core::domain::{Band, BandId, Coordinates, Label, User};
use bandhub_core::ports::ScriptId;
use bandhub_core::protocol::{Command, LoginError, Request, ResponseBody};
use bandhub_core::script::{InMemoryScripts, ScriptRunner};
use bandhub_core::services::{BandClient, Session};
use bandhub_storage::MemoryAuthority;

fn band(name: &str, owner: &str) -> Band {
  Band::draft(name, Coordinates::new(1.0, 1), Label::new("Rough Trade", 4, 400), owner)
}

fn setup() -> (Arc<MemoryAuthority>, BandClient<MemoryAuthority>, User, User) {
  let authority = Arc::new(MemoryAuthority::new());
  let alice = User::new("alice", "pw-a");
  let bob = User::new("bob", "pw-b");
  authority.register_user(&alice).unwrap();
  authority.register_user(&bob).unwrap();
  let client = BandClient::new(Arc::clone(&authority));
  (authority, client, alice, bob)
}

#[tokio::test]
async fn wrong_password_does_not_authenticate() {
  let (_authority, client, alice, _bob) = setup();
  let mut session = Session::new();
  let attempt = User::new(alice.login(), "wrong");

  let response = client.execute(Request::login(attempt.clone())).await.unwrap();

  assert_eq!(response.login_error(), Some(LoginError::WrongPassword));
  assert_eq!(session.apply_login(attempt, &response), Err(LoginError::WrongPassword));
  assert!(session.current_user().is_none());

  let response = client.execute(Request::login(alice.clone())).await.unwrap();
  session.apply_login(alice, &response).unwrap();
  assert!(session.is_authenticated());
}

#[tokio::test]
async fn register_twice_is_rejected() {
  let (_authority, client, alice, _bob) = setup();
  let response = client.execute(Request::register(alice)).await.unwrap();
  assert_eq!(response.login_error(), Some(LoginError::AlreadyRegistered));
}

#[tokio::test]
async fn bad_credential_on_any_command_is_not_authenticated() {
  let (_authority, client, _alice, _bob) = setup();
  let intruder = User::new("mallory", "x");

  let response = client.execute(Request::show(intruder.clone())).await.unwrap();
  assert_eq!(response.login_error(), Some(LoginError::NotAuthenticated));
  assert!(matches!(client.fetch_snapshot(&intruder).await, Err(ClientError::NotAuthenticated)));
}

#[tokio::test]
async fn non_owner_update_leaves_the_band_unchanged() {
  let (authority, client, alice, bob) = setup();
  client.execute(Request::add(alice.clone(), band("Wire", "ignored"))).await.unwrap();
  let before = authority.snapshot().unwrap();
  let id = before[0].id;

  let response = client.execute(Request::update_id(bob.clone(), id, band("Hijacked", "bob"))).await.unwrap();

  assert_eq!(response.body, ResponseBody::Unauthorized);
  assert!(!response.is_success());
  assert_eq!(authority.snapshot().unwrap(), before);

  let response = client.execute(Request::update_id(alice, id, band("Wire (remastered)", "alice"))).await.unwrap();
  assert!(response.is_success());
  let after = authority.snapshot().unwrap();
  assert_eq!(after[0].name, "Wire (remastered)");
  assert_eq!(after[0].id, id);
  assert_eq!(after[0].owner, "alice");
}

#[tokio::test]
async fn add_assigns_increasing_ids_and_the_caller_as_owner() {
  let (authority, client, alice, _bob) = setup();

  for name in ["Fall", "Slits", "Raincoats"] {
    assert!(client.execute(Request::add(alice.clone(), band(name, "someone-else"))).await.unwrap().is_success());
  }
  let invalid = client.execute(Request::add(alice.clone(), band("", "alice"))).await.unwrap();
  assert_eq!(invalid.body, ResponseBody::Outcome { success: false });

  let bands = authority.snapshot().unwrap();
  let ids: Vec<i64> = bands.iter().map(|b| b.id.value()).collect();
  assert_eq!(ids, vec![1, 2, 3]);
  assert!(bands.iter().all(|b| b.owner == "alice" && b.validate()));

  client.execute(Request::add(alice, band("Delta 5", "alice"))).await.unwrap();
  assert_eq!(authority.snapshot().unwrap().last().map(|b| b.id), Some(BandId::new(4)));
}

#[tokio::test]
async fn removals_are_owner_checked_and_return_ids() {
  let (authority, client, alice, bob) = setup();
  authority.seed([band("A1", "alice"), band("B1", "bob"), band("A2", "alice")]).unwrap();

  let denied = client.execute(Request::remove_by_id(bob.clone(), BandId::new(1))).await.unwrap();
  assert_eq!(denied.body, ResponseBody::Unauthorized);

  let first = client.execute(Request::simple(Command::RemoveFirst, bob.clone()).unwrap()).await.unwrap();
  assert_eq!(first.body, ResponseBody::IdList { ids: vec![BandId::new(2)] });

  let cleared = client.execute(Request::simple(Command::Clear, alice).unwrap()).await.unwrap();
  assert_eq!(cleared.body, ResponseBody::IdList { ids: vec![BandId::new(1), BandId::new(3)] });
  assert!(authority.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn print_descending_orders_by_id() {
  let (authority, client, alice, _bob) = setup();
  authority.seed([band("x", "alice"), band("y", "alice"), band("z", "alice")]).unwrap();

  let bands = client.execute(Request::simple(Command::PrintDescending, alice).unwrap()).await.unwrap().into_bands().unwrap();
  let ids: Vec<i64> = bands.iter().map(|b| b.id.value()).collect();
  assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn help_lists_every_command() {
  let (_authority, client, alice, _bob) = setup();
  let response = client.execute(Request::simple(Command::Help, alice).unwrap()).await.unwrap();

  for command in Command::ALL {
    assert!(response.message.contains(command.name()), "missing {command}");
  }
}

#[tokio::test]
async fn script_adds_bands_with_clamped_coordinates() {
  let (authority, client, alice, _bob) = setup();
  let script = "\
# two bands, the second with an out of range y
add
Magazine
1.5
10
5
1977
3
4
post-punk
Virgin
12
5000
add
PiL
2
2000



Virgin
12
5000
group_counting_by_label
";
  let runner = ScriptRunner::new(Arc::new(InMemoryScripts::new().with_script("seed", script)));

  let report = runner.run(&client, Some(&alice), &ScriptId::new("seed")).await.unwrap();

  assert_eq!(report.failures().count(), 0);
  let bands = authority.snapshot().unwrap();
  assert_eq!(bands.len(), 2);
  assert_eq!(bands[1].coordinates.y, 968);
  assert_eq!(bands[0].number_of_participants, Some(5));
  assert!(bands.iter().all(|b| b.owner == "alice"));
  assert!(report.mutated());
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
  let (authority, client, alice, _bob) = setup();
  let mut far = band("Far", "alice");
  far.coordinates = Coordinates::new(0.0, Coordinates::MAX_Y + 1);

  let response = client.execute(Request::add(alice, far)).await.unwrap();

  assert_eq!(response.body, ResponseBody::Outcome { success: false });
  assert!(authority.snapshot().unwrap().is_empty());
}
