//! Extracts materials. A material block starts at its commented name/type
//! header and runs up to the next material header.
//!
//! Values come from several places inside a block: the commented attribute
//! lines written above each card, and the cards themselves (`MAT1`,
//! `MATEP2H`, `MATGEO`). Each source is read by one rule. Rules run in a
//! fixed order and every value a rule finds replaces whatever an earlier rule
//! found for the same attribute, so the order below decides precedence:
//!
//!   1. commented generic attributes (E, nu, density, K0);
//!   2. commented D-min attributes, for D-min materials -- the initial
//!      modulus and Poisson's ratio also stand in for E and nu;
//!   3. commented Mohr-Coulomb attributes, for Mohr-Coulomb materials;
//!   4. the `MAT1` card (E, nu);
//!   5. the `MATEP2H` card (phi, c);
//!   6. the `MATGEO` card (K0).

use std::fmt::Display;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, header_blocks, pattern};
use crate::util::*;

/// Converts mass density to unit weight in the deck's M-N-J-SEC system.
pub const DENSITY_TO_UNIT_WEIGHT: f64 = 9.80665e15;

/// Cohesion values above this are taken to be in base units and get divided
/// by a thousand. It's a heuristic, not a unit detector.
pub const COHESION_BASE_UNIT_THRESHOLD: f64 = 100.0;

/// Converts a mass density to a unit weight.
pub fn unit_weight(density: f64) -> f64 {
  return density * DENSITY_TO_UNIT_WEIGHT;
}

/// Brings a raw cohesion value to kPa-like units. Values up to and including
/// the threshold pass through unchanged.
pub fn normalize_cohesion(raw: f64) -> f64 {
  if raw > COHESION_BASE_UNIT_THRESHOLD {
    return raw / 1000.0;
  }
  return raw;
}

/// Broad material models, used to pick which attributes matter.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum MaterialModel {
  /// Linear elastic.
  Elastic,
  /// The D-min nonlinear soil model.
  DMin,
  /// Mohr-Coulomb plasticity.
  MohrCoulomb,
  /// Anything else.
  Other,
}

impl MaterialModel {
  /// Interprets a material type tag. Tags are free text, so this goes by
  /// substrings.
  pub fn from_tag(tag: &str) -> Self {
    if tag.contains("D-min") {
      return Self::DMin;
    }
    if tag.contains("Mohr-Coulomb") {
      return Self::MohrCoulomb;
    }
    if tag.contains("弾性") || tag.to_lowercase().contains("elastic") {
      return Self::Elastic;
    }
    return Self::Other;
  }
}

impl Display for MaterialModel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", match self {
      Self::Elastic => "elastic",
      Self::DMin => "D-min",
      Self::MohrCoulomb => "Mohr-Coulomb",
      Self::Other => "other"
    });
  }
}

/// Physical attributes of a material. Absent means not found in the deck.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MaterialAttributes {
  /// Elastic modulus.
  pub e: Option<f64>,
  /// Poisson's ratio.
  pub nu: Option<f64>,
  /// Unit weight, from mass density.
  pub gamma: Option<f64>,
  /// Cohesion.
  pub c: Option<f64>,
  /// Friction angle, in degrees.
  pub phi: Option<f64>,
  /// At-rest lateral earth pressure coefficient.
  pub k0: Option<f64>,
  /// D-min initial modulus of deformability.
  pub e0: Option<f64>,
  /// D-min critical modulus of deformability.
  pub e_cr: Option<f64>,
  /// D-min initial Poisson's ratio.
  pub nu0: Option<f64>,
  /// D-min critical Poisson's ratio.
  pub nu_cr: Option<f64>,
  /// Shear strength.
  pub tau_f: Option<f64>,
  /// Tensile strength.
  pub sigma_t: Option<f64>,
}

impl MaterialAttributes {
  /// Lays another set of attributes over this one. Whatever is present on top
  /// wins.
  pub fn overlay(self, top: Self) -> Self {
    return Self {
      e: top.e.or(self.e),
      nu: top.nu.or(self.nu),
      gamma: top.gamma.or(self.gamma),
      c: top.c.or(self.c),
      phi: top.phi.or(self.phi),
      k0: top.k0.or(self.k0),
      e0: top.e0.or(self.e0),
      e_cr: top.e_cr.or(self.e_cr),
      nu0: top.nu0.or(self.nu0),
      nu_cr: top.nu_cr.or(self.nu_cr),
      tau_f: top.tau_f.or(self.tau_f),
      sigma_t: top.sigma_t.or(self.sigma_t),
    };
  }
}

/// A material.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Material {
  /// The material ID. Decks may repeat an ID; every block is kept.
  pub id: usize,
  /// The material name.
  pub name: String,
  /// The type tag, as written.
  pub type_tag: String,
  /// The attributes found.
  #[serde(flatten)]
  pub attributes: MaterialAttributes,
}

impl Material {
  /// Returns the broad model of this material.
  pub fn model(&self) -> MaterialModel {
    return MaterialModel::from_tag(&self.type_tag);
  }
}

/// What a rule gets to look at.
struct MaterialBlock<'t> {
  /// The material ID from the header.
  id: usize,
  /// The type tag from the header.
  type_tag: &'t str,
  /// The whole block.
  text: &'t str,
}

/// The patterns rules use.
struct MaterialPatterns {
  /// Commented elastic modulus.
  e: Regex,
  /// Commented Poisson's ratio.
  nu: Regex,
  /// Commented mass density.
  density: Regex,
  /// Commented K0.
  k0: Regex,
  /// Commented D-min initial modulus.
  e0: Regex,
  /// Commented D-min critical modulus.
  e_cr: Regex,
  /// Commented D-min initial Poisson's ratio.
  nu0: Regex,
  /// Commented D-min critical Poisson's ratio.
  nu_cr: Regex,
  /// Commented shear strength.
  tau_f: Regex,
  /// Commented tensile strength.
  sigma_t: Regex,
  /// Commented friction angle.
  phi: Regex,
  /// Commented cohesion.
  c: Regex,
  /// Start of a MAT1 card, with its ID.
  mat1_head: Regex,
  /// A whole MAT1 card, anchored: ID, E, G, nu, rho.
  mat1: Regex,
  /// Start of a MATEP2H card, with its ID.
  matep2h_head: Regex,
  /// A PERFECT plasticity value.
  perfect: Regex,
  /// Start of a MATGEO card, with its ID.
  matgeo_head: Regex,
  /// What a K0 field looks like.
  k0_field: Regex,
}

impl MaterialPatterns {
  /// Compiles the patterns.
  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      e: pattern(r"\$\$ Elastic Modulus <([^>]+)>")?,
      nu: pattern(r"\$\$ Poisson's ratio <([^>]+)>")?,
      density: pattern(r"\$\$ Mass density <([^>]+)>")?,
      k0: pattern(r"\$\$ K0 <([^>]+)>")?,
      e0: pattern(r"\$\$ Initial Modulus of deformability <([^>]+)>")?,
      e_cr: pattern(r"\$\$ Critical Modulus of deformability <([^>]+)>")?,
      nu0: pattern(r"\$\$ Initial Poisson's Ratio <([^>]+)>")?,
      nu_cr: pattern(r"\$\$ Critical Poisson's Ratio <([^>]+)>")?,
      tau_f: pattern(r"\$\$ Shear Strength <([^>]+)>")?,
      sigma_t: pattern(r"\$\$ Tensile Strength <([^>]+)>")?,
      phi: pattern(r"\$\$ Frictional Angle <([^>]+)>")?,
      c: pattern(r"\$\$ Cohesion <([^>]+)>")?,
      mat1_head: pattern(r"MAT1\s*,\s*(\d+)")?,
      mat1: pattern(concat!(
        r"\AMAT1\s*,\s*\d+\s*,\s*([^,]+)\s*,\s*[^,]*\s*,\s*([^,]+)\s*,",
        r"\s*([^,]+)"
      ))?,
      matep2h_head: pattern(r"MATEP2H\s*,\s*(\d+)")?,
      perfect: pattern(r"PERFECT\s*,\s*([\d.eE+-]+)")?,
      matgeo_head: pattern(r"MATGEO\s*,\s*(\d+)")?,
      k0_field: pattern(r"\A0\.\d+\z")?,
    });
  }
}

/// Finds the cards of a kind whose ID matches the block's, returning the
/// text from the start of each card on.
fn keyed_cards<'t>(head: &Regex, block: &MaterialBlock<'t>) -> Vec<&'t str> {
  let text = block.text;
  return head.captures_iter(text)
    .filter(|c| {
      group(c, 1).and_then(|s| s.parse::<usize>().ok()) == Some(block.id)
    })
    .filter_map(|c| c.get(0))
    .map(|m| &text[m.start()..])
    .collect();
}

/// Cuts a card off at the next comment.
fn until_comment(card: &str) -> &str {
  return card.split('$').next().unwrap_or(card);
}

/// One step of material extraction.
struct Rule {
  /// What the rule reads, for logging.
  name: &'static str,
  /// Whether the rule runs for a given type tag.
  applies: fn(&str) -> bool,
  /// Reads the block.
  read: fn(&MaterialPatterns, &MaterialBlock<'_>) -> MaterialAttributes,
}

/// For rules that always run.
fn any_model(_tag: &str) -> bool {
  return true;
}

/// For rules that only run on D-min materials.
fn is_dmin(tag: &str) -> bool {
  return tag.contains("D-min");
}

/// For rules that only run on Mohr-Coulomb materials.
fn is_mohr_coulomb(tag: &str) -> bool {
  return tag.contains("Mohr-Coulomb");
}

/// The rules, in precedence order (last wins).
const RULES: [Rule; 6] = [
  Rule { name: "generic comments", applies: any_model, read: read_generic },
  Rule { name: "D-min comments", applies: is_dmin, read: read_dmin },
  Rule {
    name: "Mohr-Coulomb comments",
    applies: is_mohr_coulomb,
    read: read_mohr_coulomb
  },
  Rule { name: "MAT1", applies: any_model, read: read_mat1 },
  Rule { name: "MATEP2H", applies: any_model, read: read_matep2h },
  Rule { name: "MATGEO", applies: any_model, read: read_matgeo },
];

/// Commented generic attributes.
fn read_generic(p: &MaterialPatterns, b: &MaterialBlock) -> MaterialAttributes {
  return MaterialAttributes {
    e: first_real(&p.e, b.text, "elastic modulus"),
    nu: first_real(&p.nu, b.text, "Poisson's ratio"),
    gamma: first_real(&p.density, b.text, "mass density").map(unit_weight),
    k0: first_real(&p.k0, b.text, "K0"),
    ..Default::default()
  };
}

/// Commented D-min attributes.
fn read_dmin(p: &MaterialPatterns, b: &MaterialBlock) -> MaterialAttributes {
  let e0 = first_real(&p.e0, b.text, "initial modulus");
  let nu0 = first_real(&p.nu0, b.text, "initial Poisson's ratio");
  return MaterialAttributes {
    e: e0,
    nu: nu0,
    e0,
    nu0,
    e_cr: first_real(&p.e_cr, b.text, "critical modulus"),
    nu_cr: first_real(&p.nu_cr, b.text, "critical Poisson's ratio"),
    tau_f: first_real(&p.tau_f, b.text, "shear strength"),
    sigma_t: first_real(&p.sigma_t, b.text, "tensile strength"),
    phi: first_real(&p.phi, b.text, "friction angle"),
    ..Default::default()
  };
}

/// Commented Mohr-Coulomb attributes.
fn read_mohr_coulomb(
  p: &MaterialPatterns,
  b: &MaterialBlock
) -> MaterialAttributes {
  return MaterialAttributes {
    c: first_real(&p.c, b.text, "cohesion").map(normalize_cohesion),
    phi: first_real(&p.phi, b.text, "friction angle"),
    ..Default::default()
  };
}

/// The MAT1 card: E is the field after the ID, nu comes after the shear
/// modulus.
fn read_mat1(p: &MaterialPatterns, b: &MaterialBlock) -> MaterialAttributes {
  let caps = keyed_cards(&p.mat1_head, b)
    .into_iter()
    .find_map(|card| p.mat1.captures(card));
  return match caps {
    Some(c) => MaterialAttributes {
      e: group(&c, 1).and_then(|s| real_field(s, "MAT1 modulus")),
      nu: group(&c, 2).and_then(|s| real_field(s, "MAT1 Poisson's ratio")),
      ..Default::default()
    },
    None => MaterialAttributes::default()
  };
}

/// The MATEP2H card: the first two PERFECT values are the friction angle and
/// the cohesion.
fn read_matep2h(p: &MaterialPatterns, b: &MaterialBlock) -> MaterialAttributes {
  let card = match keyed_cards(&p.matep2h_head, b).first().copied() {
    Some(card) => until_comment(card),
    None => return MaterialAttributes::default()
  };
  let values: Vec<&str> = p.perfect.captures_iter(card)
    .filter_map(|c| group(&c, 1))
    .collect();
  if values.len() < 2 {
    return MaterialAttributes::default();
  }
  return MaterialAttributes {
    phi: real_field(values[0], "MATEP2H friction angle"),
    c: real_field(values[1], "MATEP2H cohesion").map(normalize_cohesion),
    ..Default::default()
  };
}

/// The MATGEO card: K0 is written three times in a row.
fn read_matgeo(p: &MaterialPatterns, b: &MaterialBlock) -> MaterialAttributes {
  let card = match keyed_cards(&p.matgeo_head, b).first().copied() {
    Some(card) => until_comment(card),
    None => return MaterialAttributes::default()
  };
  // the card name itself is never a candidate
  let fields: Vec<&str> = card.split(',').skip(1).map(str::trim).collect();
  let k0 = fields.windows(3)
    .find(|w| {
      w[0] == w[1] && w[1] == w[2] && p.k0_field.is_match(w[0])
    })
    .and_then(|w| real_field(w[0], "MATGEO K0"));
  return MaterialAttributes { k0, ..Default::default() };
}

/// Extracts materials.
pub struct MaterialExtractor {
  /// Name line followed by type line.
  header: Regex,
  /// Everything the rules need.
  patterns: MaterialPatterns,
}

impl MaterialExtractor {
  /// Runs every applicable rule over a block and folds the results.
  fn attributes(&self, block: &MaterialBlock) -> MaterialAttributes {
    return RULES.iter()
      .filter(|r| (r.applies)(block.type_tag))
      .map(|r| {
        let found = (r.read)(&self.patterns, block);
        if found != MaterialAttributes::default() {
          debug!("Material {}: read {}.", block.id, r.name);
        }
        return found;
      })
      .fold(MaterialAttributes::default(), MaterialAttributes::overlay);
  }
}

impl Extractor for MaterialExtractor {
  type Output = Vec<Material>;
  const NAME: &'static str = "materials";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      header: pattern(concat!(
        r"\$\$ Name of Material \[ID:(\d+)\] <([^>]+)>\s*\n",
        r"\$\$ Type of Material <([^>]+)>"
      ))?,
      patterns: MaterialPatterns::new()?,
    });
  }

  fn extract(&self, text: &str) -> Vec<Material> {
    let materials: Vec<Material> = header_blocks(&self.header, text)
      .into_iter()
      .filter_map(|b| {
        let id = id_field(group(&b.caps, 1)?, "material ID")?;
        let name = group(&b.caps, 2)?;
        let type_tag = group(&b.caps, 3)?;
        let block = MaterialBlock { id, type_tag, text: b.text };
        return Some(Material {
          id,
          name: name.to_string(),
          type_tag: type_tag.to_string(),
          attributes: self.attributes(&block),
        });
      })
      .collect();
    debug!("Found {} materials.", materials.len());
    return materials;
  }
}
