use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Géneros que puede declarar una banda.
///
/// Es un conjunto cerrado: la autoridad rechaza cualquier otro valor, así que
/// aquí no existe una variante `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MusicGenre {
  ProgressiveRock,
  HipHop,
  PsychedelicCloudRap,
  Soul,
  PostPunk,
}

impl MusicGenre {
  pub const ALL: [MusicGenre; 5] = [
    MusicGenre::ProgressiveRock,
    MusicGenre::HipHop,
    MusicGenre::PsychedelicCloudRap,
    MusicGenre::Soul,
    MusicGenre::PostPunk,
  ];
}

impl fmt::Display for MusicGenre {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      MusicGenre::ProgressiveRock => "PROGRESSIVE_ROCK",
      MusicGenre::HipHop => "HIP_HOP",
      MusicGenre::PsychedelicCloudRap => "PSYCHEDELIC_CLOUD_RAP",
      MusicGenre::Soul => "SOUL",
      MusicGenre::PostPunk => "POST_PUNK",
    };
    write!(f, "{text}")
  }
}

/// Error producido cuando una cadena no puede convertirse en [`MusicGenre`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid genre: {input}")]
pub struct GenreParseError {
  pub input: String,
}

impl FromStr for MusicGenre {
  type Err = GenreParseError;

  /// Normaliza mayúsculas, espacios, guiones y guiones bajos antes de comparar,
  /// de modo que `"post punk"`, `"Post-Punk"` y `"POST_PUNK"` son equivalentes.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace(['-', ' ', '_'], "");

    let genre = match normalized.as_str() {
      "progressiverock" | "progrock" => MusicGenre::ProgressiveRock,
      "hiphop" => MusicGenre::HipHop,
      "psychedeliccloudrap" | "cloudrap" => MusicGenre::PsychedelicCloudRap,
      "soul" => MusicGenre::Soul,
      "postpunk" => MusicGenre::PostPunk,
      _ => return Err(GenreParseError { input: s.to_string() }),
    };

    Ok(genre)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parsing_ignores_case_and_separators() {
    assert_eq!("post punk".parse::<MusicGenre>(), Ok(MusicGenre::PostPunk));
    assert_eq!("Hip-Hop".parse::<MusicGenre>(), Ok(MusicGenre::HipHop));
    assert_eq!("PSYCHEDELIC_CLOUD_RAP".parse::<MusicGenre>(), Ok(MusicGenre::PsychedelicCloudRap));
  }

  #[test]
  fn display_round_trips_through_from_str() {
    for genre in MusicGenre::ALL {
      assert_eq!(genre.to_string().parse::<MusicGenre>(), Ok(genre));
    }
  }

  #[test]
  fn unknown_genre_is_an_error() {
    let err = "polka".parse::<MusicGenre>().unwrap_err();
    assert_eq!(err.input, "polka");
  }
}
