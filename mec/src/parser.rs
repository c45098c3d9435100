//! This module implements the deck parser, which runs every extractor over
//! the same text and assembles their output into a [`Deck`].

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::deck::Deck;
use crate::error::DeckError;
use crate::extractors::Extractor;
use crate::extractors::boundary::BoundaryExtractor;
use crate::extractors::geoparams::GeoParamExtractor;
use crate::extractors::loads::LoadExtractor;
use crate::extractors::materials::MaterialExtractor;
use crate::extractors::model_info::ModelInfoExtractor;
use crate::extractors::properties::PropertyExtractor;
use crate::extractors::sets::SetExtractor;
use crate::extractors::settings::*;
use crate::extractors::stages::StageConfigExtractor;
use crate::extractors::subcases::SubcaseExtractor;
use crate::util::with_final_newline;

/// Runs an extractor, logging what it's doing.
fn run<E: Extractor>(extractor: &E, text: &str) -> E::Output {
  debug!("Extracting {}...", E::NAME);
  return extractor.extract(text);
}

/// The deck parser. Holds every extractor with its patterns compiled, so one
/// instance can parse any number of decks.
pub struct DeckParser {
  /// Entity counts.
  model_info: ModelInfoExtractor,
  /// The title.
  title: TitleExtractor,
  /// Named solver parameters.
  params: ParamExtractor,
  /// Nonlinear iteration parameters.
  nlparams: NlParamExtractor,
  /// Analysis steps.
  subcases: SubcaseExtractor,
  /// Stage configs.
  stage_configs: StageConfigExtractor,
  /// GEOPARM usage.
  geo_params: GeoParamExtractor,
  /// Loads.
  loads: LoadExtractor,
  /// Section properties.
  properties: PropertyExtractor,
  /// Materials.
  materials: MaterialExtractor,
  /// Set definitions.
  sets: SetExtractor,
  /// Constraints.
  boundary_conditions: BoundaryExtractor,
}

impl DeckParser {
  /// Instantiates a new parser, compiling every pattern.
  pub fn new() -> Result<Self, DeckError> {
    return Ok(Self {
      model_info: ModelInfoExtractor::new()?,
      title: TitleExtractor::new()?,
      params: ParamExtractor::new()?,
      nlparams: NlParamExtractor::new()?,
      subcases: SubcaseExtractor::new()?,
      stage_configs: StageConfigExtractor::new()?,
      geo_params: GeoParamExtractor::new()?,
      loads: LoadExtractor::new()?,
      properties: PropertyExtractor::new()?,
      materials: MaterialExtractor::new()?,
      sets: SetExtractor::new()?,
      boundary_conditions: BoundaryExtractor::new()?,
    });
  }

  /// Parses a deck's text, one extractor after the other.
  pub fn parse(&self, text: &str) -> Deck {
    let text = with_final_newline(text);
    let text: &str = &text;
    return Deck {
      filename: None,
      model_info: run(&self.model_info, text),
      title: run(&self.title, text),
      params: run(&self.params, text),
      nlparams: run(&self.nlparams, text),
      subcases: run(&self.subcases, text),
      stage_configs: run(&self.stage_configs, text),
      geo_params: run(&self.geo_params, text),
      loads: run(&self.loads, text),
      properties: run(&self.properties, text),
      materials: run(&self.materials, text),
      sets: run(&self.sets, text),
      boundary_conditions: run(&self.boundary_conditions, text),
    };
  }

  /// Parses a deck's text, running the extractors on the rayon thread pool.
  /// The output is the same as [`DeckParser::parse`]'s.
  pub fn parse_parallel(&self, text: &str) -> Deck {
    let text = with_final_newline(text);
    let text: &str = &text;
    let mut deck = Deck::default();
    rayon::scope(|s| {
      s.spawn(|_| deck.model_info = run(&self.model_info, text));
      s.spawn(|_| deck.title = run(&self.title, text));
      s.spawn(|_| deck.params = run(&self.params, text));
      s.spawn(|_| deck.nlparams = run(&self.nlparams, text));
      s.spawn(|_| deck.subcases = run(&self.subcases, text));
      s.spawn(|_| deck.stage_configs = run(&self.stage_configs, text));
      s.spawn(|_| deck.geo_params = run(&self.geo_params, text));
      s.spawn(|_| deck.loads = run(&self.loads, text));
      s.spawn(|_| deck.properties = run(&self.properties, text));
      s.spawn(|_| deck.materials = run(&self.materials, text));
      s.spawn(|_| deck.sets = run(&self.sets, text));
      s.spawn(|_| {
        deck.boundary_conditions = run(&self.boundary_conditions, text)
      });
    });
    return deck;
  }

  /// Parses raw bytes. Invalid UTF-8 is replaced, never fatal.
  pub fn parse_bytes(&self, bytes: &[u8]) -> Deck {
    return self.parse(&String::from_utf8_lossy(bytes));
  }

  /// Reads everything from a reader and parses it.
  pub fn parse_reader<R: Read>(&self, mut reader: R) -> io::Result<Deck> {
    let mut bytes: Vec<u8> = Vec::new();
    reader.read_to_end(&mut bytes)?;
    return Ok(self.parse_bytes(&bytes));
  }

  /// Utility method -- reads and parses a file.
  pub fn parse_file<S: AsRef<Path>>(&self, p: S) -> io::Result<Deck> {
    let file = File::open(p.as_ref())?;
    let mut deck = self.parse_reader(BufReader::new(file))?;
    deck.filename = p.as_ref().file_name()
      .and_then(|s| s.to_str())
      .map(String::from);
    info!(
      "Parsed {}: {} materials, {} properties, {} subcases.",
      p.as_ref().display(),
      deck.materials.len(),
      deck.properties.len(),
      deck.subcases.len()
    );
    return Ok(deck);
  }
}
