//! Extracts `SET` definitions from the case control section. Only their
//! number matters for summaries, so definitions are kept as text.

use itertools::Itertools;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::util::*;

/// A set definition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetDefinition {
  /// The set ID.
  pub id: usize,
  /// The comment line right above the definition, if any.
  pub comment: Option<String>,
  /// The definition, continuation lines joined with single spaces.
  pub definition: String,
}

/// Extracts set definitions.
pub struct SetExtractor {
  /// Optional comment line, then the `SET n =` entry and any lines it
  /// continues onto through trailing commas.
  set: Regex,
}

impl Extractor for SetExtractor {
  type Output = Vec<SetDefinition>;
  const NAME: &'static str = "sets";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      set: pattern(concat!(
        r"(?m)(?:^\$+[ \t]*([^\n]*)\n)?",
        r"^[ \t]*SET[ \t]+(\d+)[ \t]*=[ \t]*",
        r"((?:[^\n]*,[ \t]*\r?\n)*[^\n]*)"
      ))?,
    });
  }

  fn extract(&self, text: &str) -> Vec<SetDefinition> {
    let sets: Vec<SetDefinition> = self.set.captures_iter(text)
      .filter_map(|c| Some(SetDefinition {
        id: id_field(group(&c, 2)?, "SET ID")?,
        comment: group(&c, 1)
          .map(str::trim)
          .filter(|s| !s.is_empty())
          .map(String::from),
        definition: group(&c, 3)?
          .lines()
          .map(str::trim)
          .filter(|l| !l.is_empty())
          .join(" "),
      }))
      .collect();
    debug!("Found {} SET definitions.", sets.len());
    return sets;
  }
}
