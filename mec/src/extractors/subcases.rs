//! Extracts analysis steps (`SUBCASE` entries) from the case control section.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::util::*;

/// A `SUBCASE` header and its indented body. The body is made of lines
/// starting with whitespace and stops at the first line that doesn't.
pub(crate) const SUBCASE_BLOCK: &str = r"SUBCASE\s+(\d+)\s*\n((?:\s+[^\n]+\n)+)";

/// One analysis step.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subcase {
  /// The subcase ID.
  pub id: usize,
  /// The solution sequence, as in `SOL 106`.
  pub sol: Option<usize>,
  /// The label text.
  pub label: Option<String>,
  /// The load set, as in `LOAD = 5`.
  pub load: Option<usize>,
  /// The constraint set, as in `SPC = 3`.
  pub spc: Option<usize>,
  /// The stage this one continues from, as in `USE(STAGE) = 1`.
  pub use_stage: Option<usize>,
}

/// Walks over subcase blocks, yielding their IDs and bodies in file order.
pub(crate) fn subcase_blocks<'r, 't>(
  re: &'r Regex,
  text: &'t str
) -> impl Iterator<Item = (usize, &'t str)> + 'r
  where 't: 'r {
  return re.captures_iter(text).filter_map(|c| {
    let id = id_field(group(&c, 1)?, "subcase ID")?;
    return Some((id, group(&c, 2)?));
  });
}

/// Extracts subcases. Duplicate IDs are kept as separate records.
pub struct SubcaseExtractor {
  /// Header plus body.
  block: Regex,
  /// Solution sequence.
  sol: Regex,
  /// Label.
  label: Regex,
  /// Load set reference.
  load: Regex,
  /// Constraint set reference.
  spc: Regex,
  /// Previous stage reference.
  use_stage: Regex,
}

impl SubcaseExtractor {
  /// Decodes a single subcase body.
  fn decode(&self, id: usize, body: &str) -> Subcase {
    return Subcase {
      id,
      sol: first_id(&self.sol, body, "SOL"),
      label: self.label.captures(body)
        .and_then(|c| group(&c, 1))
        .map(|s| s.trim().to_string()),
      load: first_id(&self.load, body, "LOAD reference"),
      spc: first_id(&self.spc, body, "SPC reference"),
      use_stage: first_id(&self.use_stage, body, "USE(STAGE) reference"),
    };
  }
}

impl Extractor for SubcaseExtractor {
  type Output = Vec<Subcase>;
  const NAME: &'static str = "subcases";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      block: pattern(SUBCASE_BLOCK)?,
      sol: pattern(r"SOL\s+(\d+)")?,
      label: pattern(r"LABEL\s*=\s*([^\n]+)")?,
      load: pattern(r"LOAD\s*=\s*(\d+)")?,
      spc: pattern(r"SPC\s*=\s*(\d+)")?,
      use_stage: pattern(r"USE\(STAGE\)\s*=\s*(\d+)")?,
    });
  }

  fn extract(&self, text: &str) -> Vec<Subcase> {
    let subcases: Vec<Subcase> = subcase_blocks(&self.block, text)
      .map(|(id, body)| self.decode(id, body))
      .collect();
    debug!("Found {} subcases.", subcases.len());
    return subcases;
  }
}
