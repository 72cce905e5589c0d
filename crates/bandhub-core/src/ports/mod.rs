pub mod input;
pub mod script_source;
pub mod transport;

pub use input::{BuildError, InputProblem, LineReader, QueuedLines};
pub use script_source::{ScriptId, ScriptSource, ScriptSourceError};
pub use transport::{Transport, TransportError};
