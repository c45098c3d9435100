//! This library implements types and functions to parse the modeling data
//! within MEC analysis decks, the Nastran-like input files written by FEA
//! pre-processors for geotechnical analysis.
//!
//! It recovers materials, section properties, analysis steps, loads,
//! parameters and boundary conditions from the deck's cards and from the
//! structured comments pre-processors write above them. The result is meant
//! for display and reporting: nothing is validated and the source file is
//! never touched.
//!
//! Parsing is split into independent extractors, one per category of
//! records (see [`extractors`]). Adding a category means adding an
//! extractor and a field in [`deck::Deck`].

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod deck;
pub mod error;
pub mod extractors;
pub mod format;
pub mod parser;
pub mod util;

#[cfg(test)]
mod tests;

/// Brings the commonly-used types into scope.
pub mod prelude {
  pub use crate::deck::Deck;
  pub use crate::error::DeckError;
  pub use crate::extractors::Extractor;
  pub use crate::extractors::boundary::{BoundaryConditions, SpcUsage};
  pub use crate::extractors::geoparams::GeoParamLink;
  pub use crate::extractors::loads::*;
  pub use crate::extractors::materials::{
    Material, MaterialAttributes, MaterialModel
  };
  pub use crate::extractors::model_info::ModelInfo;
  pub use crate::extractors::properties::{Property, PropertyKind};
  pub use crate::extractors::sets::SetDefinition;
  pub use crate::extractors::settings::{NlParam, Params, SolverParam};
  pub use crate::extractors::stages::StageConfig;
  pub use crate::extractors::subcases::Subcase;
  pub use crate::format::NumberFormat;
  pub use crate::parser::DeckParser;
}
