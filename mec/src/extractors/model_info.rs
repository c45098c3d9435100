//! Counts the structural entities in a deck.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};

/// Card names that count as elements.
pub const ELEMENT_CARDS: [&str; 6] = [
  "CHEXA", "CPENTA", "CPYRAM", "CTETRA", "CQUAD4", "CTRIA3"
];

/// Entity counts for a model.
#[derive(
  Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq
)]
pub struct ModelInfo {
  /// Number of GRID records.
  pub nodes: usize,
  /// Number of element records.
  pub elements: usize,
  /// Number of SPC1 records.
  pub spc_count: usize,
}

/// Counts lines by their leading card name.
pub struct ModelInfoExtractor {
  /// Node lines.
  nodes: Regex,
  /// Element lines, any of the known element cards.
  elements: Regex,
  /// Constraint lines.
  spcs: Regex,
}

impl Extractor for ModelInfoExtractor {
  type Output = ModelInfo;
  const NAME: &'static str = "model info";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      nodes: pattern(r"(?m)^GRID\s")?,
      elements: pattern(
        &format!(r"(?m)^(?:{})\s", ELEMENT_CARDS.join("|"))
      )?,
      spcs: pattern(r"(?m)^SPC1\s")?,
    });
  }

  fn extract(&self, text: &str) -> ModelInfo {
    let info = ModelInfo {
      nodes: self.nodes.find_iter(text).count(),
      elements: self.elements.find_iter(text).count(),
      spc_count: self.spcs.find_iter(text).count(),
    };
    debug!(
      "Counted {} nodes, {} elements and {} SPC1 records.",
      info.nodes,
      info.elements,
      info.spc_count
    );
    return info;
  }
}
