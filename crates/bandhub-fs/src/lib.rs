pub mod io;
pub mod script_source;

pub use io::atomic_write_str;
pub use script_source::FsScriptSource;
