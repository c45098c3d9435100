//! This module implements the structure of a parsed deck as we interpret it:
//! every category of records, plus the lookups presentation code needs to
//! join them up.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::extractors::boundary::BoundaryConditions;
use crate::extractors::geoparams::GeoParamLink;
use crate::extractors::loads::Loads;
use crate::extractors::materials::{Material, MaterialModel};
use crate::extractors::model_info::ModelInfo;
use crate::extractors::properties::{Property, PropertyKind};
use crate::extractors::sets::SetDefinition;
use crate::extractors::settings::{NlParam, Params};
use crate::extractors::stages::StageConfig;
use crate::extractors::subcases::Subcase;
use crate::parser::DeckParser;

/// This is the output of the deck parser. Every category is always present;
/// categories the deck doesn't have are empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Deck {
  /// The file name, if it was read from a file.
  pub filename: Option<String>,
  /// Entity counts.
  pub model_info: ModelInfo,
  /// The analysis title, empty if there is none.
  pub title: String,
  /// Named solver parameters.
  pub params: Params,
  /// Nonlinear iteration parameters.
  pub nlparams: Vec<NlParam>,
  /// Analysis steps, in file order.
  pub subcases: Vec<Subcase>,
  /// Stage configs, in file order.
  pub stage_configs: Vec<StageConfig>,
  /// GEOPARM sets used by subcases.
  pub geo_params: Vec<GeoParamLink>,
  /// Loads.
  pub loads: Loads,
  /// Section properties, in file order.
  pub properties: Vec<Property>,
  /// Materials, in file order.
  pub materials: Vec<Material>,
  /// Set definitions, in file order.
  pub sets: Vec<SetDefinition>,
  /// Constraint definitions and usage.
  pub boundary_conditions: BoundaryConditions,
}

impl Deck {
  /// Parses a deck's text.
  pub fn parse(text: &str) -> Result<Self, DeckError> {
    return Ok(DeckParser::new()?.parse(text));
  }

  /// Parses a deck's text, running the extractors in parallel.
  pub fn parse_parallel(text: &str) -> Result<Self, DeckError> {
    return Ok(DeckParser::new()?.parse_parallel(text));
  }

  /// Parses raw bytes, replacing invalid UTF-8.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeckError> {
    return Ok(DeckParser::new()?.parse_bytes(bytes));
  }

  /// Reads and parses a file.
  pub fn from_file<S: AsRef<Path>>(p: S) -> Result<Self, DeckError> {
    return Ok(DeckParser::new()?.parse_file(p)?);
  }

  /// Looks up a material by ID. If the ID is repeated, the first one wins.
  pub fn material(&self, id: usize) -> Option<&Material> {
    return self.materials.iter().find(|m| m.id == id);
  }

  /// Looks up a property by ID. If the ID is repeated, the first one wins.
  pub fn property(&self, id: usize) -> Option<&Property> {
    return self.properties.iter().find(|p| p.id == id);
  }

  /// Looks up a subcase by ID. If the ID is repeated, the first one wins.
  pub fn subcase(&self, id: usize) -> Option<&Subcase> {
    return self.subcases.iter().find(|s| s.id == id);
  }

  /// Resolves the material a property refers to, if it exists.
  pub fn property_material(&self, prop: &Property) -> Option<&Material> {
    return prop.material_id.and_then(|id| self.material(id));
  }

  /// Looks up the stage config for a subcase.
  pub fn stage_config(&self, subcase: usize) -> Option<&StageConfig> {
    return self.stage_configs.iter().find(|s| s.id == subcase);
  }

  /// Looks up the GEOPARM set a subcase uses.
  pub fn geo_param(&self, subcase: usize) -> Option<usize> {
    return self.geo_params.iter()
      .find(|g| g.subcase == subcase)
      .map(|g| g.geo_param);
  }

  /// Groups materials by type tag, groups in order of first appearance.
  pub fn materials_by_type(&self) -> Vec<(&str, Vec<&Material>)> {
    let mut groups: Vec<(&str, Vec<&Material>)> = Vec::new();
    for mat in self.materials.iter() {
      match groups.iter_mut().find(|(tag, _)| *tag == mat.type_tag) {
        Some((_, mats)) => mats.push(mat),
        None => groups.push((mat.type_tag.as_str(), vec![mat]))
      }
    }
    return groups;
  }

  /// Returns the materials of one broad model.
  pub fn materials_of(
    &self,
    model: MaterialModel
  ) -> impl Iterator<Item = &Material> {
    return self.materials.iter().filter(move |m| m.model() == model);
  }

  /// Returns the shell properties.
  pub fn shell_properties(&self) -> impl Iterator<Item = &Property> {
    return self.properties.iter().filter(|p| p.kind == PropertyKind::Shell);
  }

  /// Returns the solid properties.
  pub fn solid_properties(&self) -> impl Iterator<Item = &Property> {
    return self.properties.iter().filter(|p| p.kind == PropertyKind::Solid);
  }
}
