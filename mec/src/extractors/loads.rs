//! Extracts load records: gravity (`GRAV`), surface pressure (`PLOAD4`) and
//! load combinations (`LOAD`).

use std::collections::BTreeMap;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::util::*;

/// A gravity load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GravityLoad {
  /// The load set ID.
  pub id: usize,
  /// The acceleration magnitude. The sign only encodes direction, so it's
  /// dropped; this is never negative.
  pub value: Option<f64>,
}

/// Pressure loads sharing one ID, aggregated over their element records.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PressureLoad {
  /// The load set ID.
  pub id: usize,
  /// The pressure of the last record with this ID.
  pub pressure: Option<f64>,
  /// How many element records carry this ID.
  pub count: usize,
}

/// A load combination, with its components left as written.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadCombination {
  /// The combined load set ID.
  pub id: usize,
  /// The scale factors and load set IDs, verbatim.
  pub components: String,
}

/// All loads in a deck.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Loads {
  /// Gravity loads, in file order.
  pub gravity: Vec<GravityLoad>,
  /// Pressure loads, by ascending ID.
  pub pressure: Vec<PressureLoad>,
  /// Load combinations, in file order.
  pub combinations: Vec<LoadCombination>,
}

impl Loads {
  /// Returns true if there are no loads of any kind, combinations included.
  pub fn is_empty(&self) -> bool {
    return self.gravity.is_empty()
      && self.pressure.is_empty()
      && self.combinations.is_empty();
  }

  /// Finds the pressure aggregate for an ID.
  pub fn pressure_load(&self, id: usize) -> Option<&PressureLoad> {
    return self.pressure.iter().find(|p| p.id == id);
  }
}

/// Extracts the three load kinds in three independent passes.
pub struct LoadExtractor {
  /// ID, direction code, three components, trailing magnitude.
  grav: Regex,
  /// ID, element, pressure.
  pload4: Regex,
  /// ID and the rest of the line up to a comment.
  combination: Regex,
}

impl LoadExtractor {
  /// Extracts gravity loads.
  fn gravity(&self, text: &str) -> Vec<GravityLoad> {
    return self.grav.captures_iter(text)
      .filter_map(|c| Some(GravityLoad {
        id: id_field(group(&c, 1)?, "GRAV ID")?,
        value: group(&c, 2)
          .and_then(|s| real_field(s, "GRAV magnitude"))
          .map(f64::abs),
      }))
      .collect();
  }

  /// Extracts and aggregates pressure loads. The last pressure wins; a
  /// malformed one still counts but doesn't replace the previous value.
  fn pressure(&self, text: &str) -> Vec<PressureLoad> {
    let mut by_id: BTreeMap<usize, PressureLoad> = BTreeMap::new();
    for c in self.pload4.captures_iter(text) {
      let id = match group(&c, 1).and_then(|s| id_field(s, "PLOAD4 ID")) {
        Some(id) => id,
        None => continue
      };
      let pressure = group(&c, 2)
        .and_then(|s| real_field(s, "PLOAD4 pressure"));
      let agg = by_id.entry(id)
        .or_insert(PressureLoad { id, pressure: None, count: 0 });
      agg.pressure = pressure.or(agg.pressure);
      agg.count += 1;
    }
    return by_id.into_values().collect();
  }

  /// Extracts load combinations.
  fn combinations(&self, text: &str) -> Vec<LoadCombination> {
    return self.combination.captures_iter(text)
      .filter_map(|c| Some(LoadCombination {
        id: id_field(group(&c, 1)?, "LOAD ID")?,
        components: group(&c, 2)?.trim().to_string(),
      }))
      .collect();
  }
}

impl Extractor for LoadExtractor {
  type Output = Loads;
  const NAME: &'static str = "loads";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      grav: pattern(concat!(
        r"GRAV\s*,\s*(\d+)\s*,\s*\d+\s*,\s*[\d.eE+-]+\s*,\s*[\d.eE+-]+\s*,",
        r"\s*[\d.eE+-]+\s*,\s*([\d.eE+-]+)"
      ))?,
      pload4: pattern(r"PLOAD4\s*,\s*(\d+)\s*,\s*\d+\s*,\s*([\d.eE+-]+)")?,
      combination: pattern(r"LOAD\s*,\s*(\d+)\s*,([^$\n]+)")?,
    });
  }

  fn extract(&self, text: &str) -> Loads {
    let loads = Loads {
      gravity: self.gravity(text),
      pressure: self.pressure(text),
      combinations: self.combinations(text),
    };
    debug!(
      "Found {} GRAV records, {} PLOAD4 IDs and {} load combinations.",
      loads.gravity.len(),
      loads.pressure.len(),
      loads.combinations.len()
    );
    return loads;
  }
}
