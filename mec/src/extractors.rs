//! This module defines the extractors that make up the deck parser. Each one
//! scans the whole text of a deck and recovers one category of records.
//!
//! Extractors are independent: none of them looks at another's output, and
//! all of them read the same immutable text, so they can run in any order or
//! at the same time.

pub mod boundary;
pub mod geoparams;
pub mod loads;
pub mod materials;
pub mod model_info;
pub mod properties;
pub mod sets;
pub mod settings;
pub mod stages;
pub mod subcases;

use regex::{Captures, Regex};

use crate::error::DeckError;

/// All extractors implement this trait.
pub trait Extractor: Sized + Send + Sync {
  /// The category of records this extractor produces.
  type Output: Default + Send;
  /// A short name for the category, for logging.
  const NAME: &'static str;

  /// Builds the extractor, compiling its patterns.
  fn new() -> Result<Self, DeckError>;

  /// Scans a deck's text. Never fails: no matches means an empty output.
  fn extract(&self, text: &str) -> Self::Output;
}

/// Compiles a pattern.
pub(crate) fn pattern(re: &str) -> Result<Regex, DeckError> {
  return Ok(Regex::new(re)?);
}

/// A header match and the text it governs.
pub(crate) struct HeaderBlock<'t> {
  /// The header's captures.
  pub caps: Captures<'t>,
  /// The text from the start of this header to the start of the next one,
  /// or to the end of the text for the last header.
  pub text: &'t str,
}

/// Splits text into blocks delimited by a header pattern. First collects the
/// headers in file order, then slices between consecutive header starts.
/// Text before the first header belongs to no block.
pub(crate) fn header_blocks<'t>(
  header: &Regex,
  text: &'t str
) -> Vec<HeaderBlock<'t>> {
  let headers: Vec<Captures<'t>> = header.captures_iter(text).collect();
  let starts: Vec<usize> = headers.iter()
    .filter_map(|c| c.get(0))
    .map(|m| m.start())
    .collect();
  return headers.into_iter()
    .zip(starts.iter().enumerate())
    .map(|(caps, (i, &start))| {
      let end = starts.get(i + 1).copied().unwrap_or(text.len());
      return HeaderBlock { caps, text: &text[start..end] };
    })
    .collect();
}
