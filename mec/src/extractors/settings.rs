//! Extracts top-level analysis settings: the title, a handful of named solver
//! parameters and the nonlinear iteration parameters.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, pattern};
use crate::util::*;

/// Generates the SolverParam enum.
macro_rules! gen_params {
  (
    $(($vn:ident, $nm:literal, $desc:literal),)*
  ) => {
    /// Known solver parameters, set through `PARAM` records.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord, Hash
    )]
    #[serde(rename_all = "lowercase")]
    #[non_exhaustive]
    pub enum SolverParam {
      $(
        #[doc = $desc]
        $vn,
      )*
    }

    impl SolverParam {
      /// Returns the all-caps name of the parameter, as written in decks.
      pub const fn name(&self) -> &'static str {
        return match self {
          $(Self::$vn => $nm,)*
        };
      }

      /// Returns a static slice with all known parameters.
      pub const fn all() -> &'static [Self] {
        return &[
          $(Self::$vn,)*
        ];
      }
    }
  };
}

gen_params!(
  (Units, "UNITS", "The unit system."),
  (AutoSpc, "AUTOSPC", "Automatic constraint of singular DOFs."),
  (AdjustElemShape, "ADJUSTELEMSHAPE", "Element shape adjustment."),
  (NlSequential, "NLSEQUENTIAL", "Sequential nonlinear analysis."),
);

impl Display for SolverParam {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// The named parameters found in a deck, with their raw values. Parameters
/// absent from the deck are absent from the map.
pub type Params = BTreeMap<SolverParam, String>;

/// Nonlinear iteration parameters from an `NLPARM` record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NlParam {
  /// The NLPARM ID.
  pub id: usize,
  /// Number of load increments.
  pub increments: usize,
  /// Iteration method, such as AUTO or SEMI.
  pub method: String,
  /// Maximum number of iterations per increment.
  pub max_iterations: usize,
  /// Convergence flag.
  pub convergence: usize,
}

/// Extracts the analysis title.
pub struct TitleExtractor {
  /// The `TITLE = ...` entry.
  title: Regex,
}

impl Extractor for TitleExtractor {
  type Output = String;
  const NAME: &'static str = "title";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self { title: pattern(r"\bTITLE\s*=\s*([^\n]+)")? });
  }

  fn extract(&self, text: &str) -> String {
    return self.title.captures(text)
      .and_then(|c| group(&c, 1))
      .map(|s| s.trim().to_string())
      .unwrap_or_default();
  }
}

/// Extracts the known solver parameters, first match for each.
pub struct ParamExtractor {
  /// One pattern per known parameter.
  params: Vec<(SolverParam, Regex)>,
}

impl Extractor for ParamExtractor {
  type Output = Params;
  const NAME: &'static str = "params";

  fn new() -> Result<Self, DeckError> {
    let params = SolverParam::all()
      .iter()
      .map(|p| {
        let re = format!(r"PARAM,\s*{},\s*([^\n,]+)", regex::escape(p.name()));
        return Ok((*p, pattern(&re)?));
      })
      .collect::<Result<Vec<_>, DeckError>>()?;
    return Ok(Self { params });
  }

  fn extract(&self, text: &str) -> Params {
    let params: Params = self.params.iter()
      .filter_map(|(p, re)| {
        let val = re.captures(text).and_then(|c| group(&c, 1))?;
        return Some((*p, val.trim().to_string()));
      })
      .collect();
    debug!("Found {} known PARAM records.", params.len());
    return params;
  }
}

/// Extracts `NLPARM` records.
pub struct NlParamExtractor {
  /// The whole record.
  nlparm: Regex,
}

impl Extractor for NlParamExtractor {
  type Output = Vec<NlParam>;
  const NAME: &'static str = "nlparams";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      nlparm: pattern(concat!(
        r"NLPARM\s*,\s*(\d+)\s*,\s*(\d+)\s*,[^,]*,\s*([^,\s]+)\s*,",
        r"\s*(\d+)\s*,\s*(\d+)"
      ))?,
    });
  }

  fn extract(&self, text: &str) -> Vec<NlParam> {
    let nlparams: Vec<NlParam> = self.nlparm.captures_iter(text)
      .filter_map(|c| Some(NlParam {
        id: id_field(group(&c, 1)?, "NLPARM ID")?,
        increments: id_field(group(&c, 2)?, "NLPARM increments")?,
        method: group(&c, 3)?.trim().to_string(),
        max_iterations: id_field(group(&c, 4)?, "NLPARM iterations")?,
        convergence: id_field(group(&c, 5)?, "NLPARM convergence")?,
      }))
      .collect();
    debug!("Found {} NLPARM records.", nlparams.len());
    return nlparams;
  }
}
