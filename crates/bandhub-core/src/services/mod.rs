pub mod client;
pub mod dispatcher;
pub mod refresh;
pub mod session;
pub mod table;
pub mod view;

pub use client::BandClient;
pub use dispatcher::{ClientEvent, Dispatcher, Ticket};
pub use refresh::RefreshPoller;
pub use session::Session;
pub use table::{Column, EditError};
pub use view::{ViewState, ViewUpdate};
