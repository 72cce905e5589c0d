pub mod band;
pub mod credentials;
pub mod field;

pub use band::BandBuilder;
pub use credentials::CredentialsBuilder;
pub use field::{FieldBuilder, InputMode};
