pub mod band;
pub mod coordinates;
pub mod genre;
pub mod id_sequence;
pub mod ids;
pub mod label;
pub mod user;

pub use band::Band;
pub use coordinates::Coordinates;
pub use genre::{GenreParseError, MusicGenre};
pub use id_sequence::IdSequence;
pub use ids::BandId;
pub use label::Label;
pub use user::User;
