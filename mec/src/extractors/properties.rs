//! Extracts section properties from the commented property headers that
//! precede each property card.

use std::fmt::Display;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::{Extractor, header_blocks, pattern};
use crate::util::*;

/// The kinds of section property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyKind {
  /// Shell sections, with a thickness.
  Shell,
  /// Solid sections.
  Solid,
  /// Beam sections.
  Beam,
  /// Truss members embedded in solids.
  EmbeddedTruss,
  /// Anything else, with the tag as written.
  Other(String),
}

impl PropertyKind {
  /// Interprets a property type tag.
  pub fn from_tag(tag: &str) -> Self {
    return match tag.trim() {
      "Shell" => Self::Shell,
      "Solid" => Self::Solid,
      "Beam" => Self::Beam,
      "Embedded Truss" => Self::EmbeddedTruss,
      other => Self::Other(other.to_string())
    };
  }

  /// Returns the tag as written in decks.
  pub fn tag(&self) -> &str {
    return match self {
      Self::Shell => "Shell",
      Self::Solid => "Solid",
      Self::Beam => "Beam",
      Self::EmbeddedTruss => "Embedded Truss",
      Self::Other(s) => s.as_str()
    };
  }
}

impl Display for PropertyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.tag());
  }
}

/// A section property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Property {
  /// The property ID.
  pub id: usize,
  /// The property name.
  pub name: String,
  /// The kind of section.
  pub kind: PropertyKind,
  /// The thickness, for shells.
  pub thickness: Option<f64>,
  /// The material this section uses. Not checked to exist.
  pub material_id: Option<usize>,
}

/// Extracts properties. Each block runs from its header to the next one.
pub struct PropertyExtractor {
  /// Name line followed by type line.
  header: Regex,
  /// Thickness comment.
  thickness: Regex,
  /// Material ID comment.
  material_id: Regex,
}

impl Extractor for PropertyExtractor {
  type Output = Vec<Property>;
  const NAME: &'static str = "properties";

  fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      header: pattern(concat!(
        r"\$\$ Name of Property \[ID:(\d+)\] <([^>]+)>\s*\n",
        r"\$\$ Type of Property <([^>]+)>"
      ))?,
      thickness: pattern(r"\$\$ Thickness <([^>]+)>")?,
      material_id: pattern(r"\$\$ Material ID <([^>]+)>")?,
    });
  }

  fn extract(&self, text: &str) -> Vec<Property> {
    let properties: Vec<Property> = header_blocks(&self.header, text)
      .into_iter()
      .filter_map(|b| Some(Property {
        id: id_field(group(&b.caps, 1)?, "property ID")?,
        name: group(&b.caps, 2)?.to_string(),
        kind: PropertyKind::from_tag(group(&b.caps, 3)?),
        thickness: first_real(&self.thickness, b.text, "thickness"),
        material_id: first_id(&self.material_id, b.text, "material ID"),
      }))
      .collect();
    debug!("Found {} properties.", properties.len());
    return properties;
  }
}
