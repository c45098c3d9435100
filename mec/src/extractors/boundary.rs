//! Extracts constraint (SPC) definitions and which subcases use them.

use std::collections::BTreeSet;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::extractors::subcases::SubcaseExtractor;
use crate::util::*;

/// A subcase using a constraint set.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub struct SpcUsage {
  /// The constraint set ID.
  pub spc: usize,
  /// The subcase ID.
  pub subcase: usize,
}

/// Constraint definitions and their usage.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundaryConditions {
  /// Number of SPC/SPC1 records.
  pub definitions: usize,
  /// Distinct constraint set IDs defined, ascending.
  pub set_ids: Vec<usize>,
  /// Subcases and the constraint sets they use, in subcase order.
  pub usages: Vec<SpcUsage>,
}

/// Extracts boundary conditions.
pub struct BoundaryExtractor {
  /// An SPC or SPC1 bulk record with its set ID, fixed or free field.
  record: Regex,
  /// Subcases, to find usages.
  subcases: SubcaseExtractor,
}

impl Extractor for BoundaryExtractor {
  type Output = BoundaryConditions;
  const NAME: &'static str = "boundary conditions";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      record: pattern(r"(?m)^SPC1?(?:[ \t]+|[ \t]*,[ \t]*)(\d+)")?,
      subcases: SubcaseExtractor::new()?,
    });
  }

  fn extract(&self, text: &str) -> BoundaryConditions {
    let mut definitions = 0;
    let mut set_ids: BTreeSet<usize> = BTreeSet::new();
    for c in self.record.captures_iter(text) {
      definitions += 1;
      if let Some(id) = group(&c, 1).and_then(|s| id_field(s, "SPC set ID")) {
        set_ids.insert(id);
      }
    }
    let usages: Vec<SpcUsage> = self.subcases.extract(text)
      .into_iter()
      .filter_map(|sc| Some(SpcUsage { spc: sc.spc?, subcase: sc.id }))
      .collect();
    debug!(
      "Found {} SPC records over {} sets, used by {} subcases.",
      definitions,
      set_ids.len(),
      usages.len()
    );
    return BoundaryConditions {
      definitions,
      set_ids: set_ids.into_iter().collect(),
      usages,
    };
  }
}
