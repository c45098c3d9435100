//! Extracts per-stage auxiliary parameters from `STGCONF` records.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::util::*;

/// Maximum number of parameters a stage config carries.
pub const STAGE_PARAMS: usize = 4;

/// Auxiliary parameters for one stage. The ID is a subcase ID.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StageConfig {
  /// The stage (subcase) ID.
  pub id: usize,
  /// The positional parameters. Blank fields are absent.
  pub params: [Option<f64>; STAGE_PARAMS],
}

impl StageConfig {
  /// Returns the n-th parameter, if present.
  pub fn param(&self, n: usize) -> Option<f64> {
    return self.params.get(n).copied().flatten();
  }
}

/// Extracts stage configs.
pub struct StageConfigExtractor {
  /// The record: ID, then the rest of the line up to any comment.
  record: Regex,
}

impl Extractor for StageConfigExtractor {
  type Output = Vec<StageConfig>;
  const NAME: &'static str = "stage configs";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      record: pattern(r"(?m)^STGCONF[ \t]*,[ \t]*(\d+)([^\n$]*)")?,
    });
  }

  fn extract(&self, text: &str) -> Vec<StageConfig> {
    let configs: Vec<StageConfig> = self.record.captures_iter(text)
      .filter_map(|c| {
        let id = id_field(group(&c, 1)?, "STGCONF ID")?;
        let mut params = [None; STAGE_PARAMS];
        // the rest starts with the comma after the ID
        let fields = group(&c, 2).unwrap_or("").split(',').skip(1);
        for (slot, field) in params.iter_mut().zip(fields) {
          if !field.trim().is_empty() {
            *slot = real_field(field, "STGCONF parameter");
          }
        }
        return Some(StageConfig { id, params });
      })
      .collect();
    debug!("Found {} STGCONF records.", configs.len());
    return configs;
  }
}
