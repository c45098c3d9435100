//! Extracts which geotechnical parameter set each subcase uses.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::extractors::subcases::{SUBCASE_BLOCK, subcase_blocks};
use crate::util::*;

/// A subcase using a GEOPARM set. Many subcases may share one set.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub struct GeoParamLink {
  /// The subcase ID.
  pub subcase: usize,
  /// The GEOPARM set ID.
  pub geo_param: usize,
}

/// Extracts `GEOPARM = <id>` entries from subcase bodies.
pub struct GeoParamExtractor {
  /// Subcase header plus body.
  block: Regex,
  /// The GEOPARM entry.
  geoparm: Regex,
}

impl Extractor for GeoParamExtractor {
  type Output = Vec<GeoParamLink>;
  const NAME: &'static str = "geoparams";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      block: pattern(SUBCASE_BLOCK)?,
      geoparm: pattern(r"GEOPARM\s*=\s*(\d+)")?,
    });
  }

  fn extract(&self, text: &str) -> Vec<GeoParamLink> {
    let links: Vec<GeoParamLink> = subcase_blocks(&self.block, text)
      .filter_map(|(subcase, body)| Some(GeoParamLink {
        subcase,
        geo_param: first_id(&self.geoparm, body, "GEOPARM reference")?,
      }))
      .collect();
    debug!("Found {} subcases with GEOPARM sets.", links.len());
    return links;
  }
}
