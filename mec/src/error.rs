//! Contains the error type for deck parsing.
//!
//! Missing or malformed fields are never errors -- extractors absorb those.
//! What ends up here is whatever stops a parse as a whole.

use std::error::Error;
use std::fmt::Display;
use std::io;

use derive_more::From;

/// Errors that make a whole parse fail.
#[derive(Debug, From)]
#[non_exhaustive]
pub enum DeckError {
  /// Could not read the input.
  Io(io::Error),
  /// An extraction pattern could not be built.
  Pattern(regex::Error),
}

impl Display for DeckError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Io(e) => write!(f, "could not read deck: {}", e),
      Self::Pattern(e) => write!(f, "bad extraction pattern: {}", e),
    };
  }
}

impl Error for DeckError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match self {
      Self::Io(e) => Some(e),
      Self::Pattern(e) => Some(e),
    };
  }
}
