//! This submodule lays out the deck's categories as CSV tables.

use std::fmt::Display;

use clap::ValueEnum;
use convert_case::{Case, Casing};
use mec::prelude::*;

/// The kinds of fields we write.
#[derive(Clone, Debug, PartialEq, PartialOrd, derive_more::From)]
pub(crate) enum CsvField {
  /// A blank field, for absent values.
  Blank,
  /// A natural number, such as an ID.
  Natural(usize),
  /// A real number.
  Real(f64),
  /// Free text.
  String(String),
}

impl From<&str> for CsvField {
  fn from(value: &str) -> Self {
    return Self::String(value.to_owned());
  }
}

impl<T: Into<CsvField>> From<Option<T>> for CsvField {
  fn from(value: Option<T>) -> Self {
    return value.map_or(Self::Blank, |x| x.into());
  }
}

impl Display for CsvField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Blank => write!(f, ""),
      Self::Natural(n) => write!(f, "{}", n),
      Self::Real(x) => write!(f, "{}", x),
      Self::String(s) => write!(f, "{}", s),
    };
  }
}

/// A row of fields, without the category column.
pub(crate) type Row = Vec<CsvField>;

/// Generates the Category enum and its table layouts.
macro_rules! gen_categories {
  (
    $({
      $desc:literal,
      $cname:ident,
      $rows:ident,
      [$($hdr:literal),+ $(,)?]
    },)*
  ) => {
    /// A category of records we can write as a table.
    #[derive(
      Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum
    )]
    #[value(rename_all = "snake_case")]
    pub(crate) enum Category {
      $(
        #[doc = $desc]
        $cname,
      )*
    }

    impl Category {
      /// Returns all categories, in output order.
      pub(crate) const fn all() -> &'static [Self] {
        return &[$(Self::$cname,)*];
      }

      /// Returns the small name of the variant, CamelCase.
      pub(crate) const fn short_name(&self) -> &'static str {
        return match self {
          $(Self::$cname => stringify!($cname),)*
        };
      }

      /// Returns the snake case name, written in the first column.
      pub(crate) fn snake_case_name(&self) -> String {
        return self.short_name().to_case(Case::Snake);
      }

      /// Returns the column headers, without the category column.
      pub(crate) const fn headers(&self) -> &'static [&'static str] {
        return match self {
          $(Self::$cname => &[$($hdr,)+],)*
        };
      }

      /// Lays out the rows of this category.
      pub(crate) fn rows(&self, deck: &Deck) -> Vec<Row> {
        return match self {
          $(Self::$cname => $rows(deck),)*
        };
      }
    }
  };
}

gen_categories!(
  {
    "Materials and their attributes.",
    Materials,
    material_rows,
    [
      "id", "name", "type", "model", "E", "nu", "gamma", "c", "phi", "K0",
      "E0", "E_cr", "nu0", "nu_cr", "tau_f", "sigma_t"
    ]
  },
  {
    "Section properties, joined with their materials.",
    Properties,
    property_rows,
    ["id", "name", "kind", "thickness", "material_id", "material_name"]
  },
  {
    "Analysis steps.",
    Subcases,
    subcase_rows,
    ["id", "label", "sol", "load", "spc", "use_stage", "geo_param"]
  },
  {
    "Gravity loads.",
    Gravity,
    gravity_rows,
    ["id", "value"]
  },
  {
    "Pressure loads, aggregated by ID.",
    Pressure,
    pressure_rows,
    ["id", "pressure", "count"]
  },
  {
    "Load combinations.",
    Combinations,
    combination_rows,
    ["id", "components"]
  },
  {
    "Nonlinear iteration parameters.",
    NlParams,
    nlparam_rows,
    ["id", "increments", "method", "max_iterations", "convergence"]
  },
  {
    "Stage configs.",
    StageConfigs,
    stage_rows,
    ["id", "p1", "p2", "p3", "p4"]
  },
  {
    "Subcases using GEOPARM sets.",
    GeoParams,
    geo_param_rows,
    ["subcase", "geo_param"]
  },
  {
    "Set definitions.",
    Sets,
    set_rows,
    ["id", "comment", "definition"]
  },
  {
    "Subcases using constraint sets.",
    Boundary,
    boundary_rows,
    ["spc", "subcase"]
  },
);

/// Lays out materials.
fn material_rows(deck: &Deck) -> Vec<Row> {
  return deck.materials.iter().map(|m| {
    let a = &m.attributes;
    return vec![
      m.id.into(),
      m.name.as_str().into(),
      m.type_tag.as_str().into(),
      m.model().to_string().into(),
      a.e.into(),
      a.nu.into(),
      a.gamma.into(),
      a.c.into(),
      a.phi.into(),
      a.k0.into(),
      a.e0.into(),
      a.e_cr.into(),
      a.nu0.into(),
      a.nu_cr.into(),
      a.tau_f.into(),
      a.sigma_t.into(),
    ];
  }).collect();
}

/// Lays out properties.
fn property_rows(deck: &Deck) -> Vec<Row> {
  return deck.properties.iter().map(|p| vec![
    p.id.into(),
    p.name.as_str().into(),
    p.kind.tag().into(),
    p.thickness.into(),
    p.material_id.into(),
    deck.property_material(p).map(|m| m.name.as_str()).into(),
  ]).collect();
}

/// Lays out subcases.
fn subcase_rows(deck: &Deck) -> Vec<Row> {
  return deck.subcases.iter().map(|sc| vec![
    sc.id.into(),
    sc.label.as_deref().into(),
    sc.sol.into(),
    sc.load.into(),
    sc.spc.into(),
    sc.use_stage.into(),
    deck.geo_param(sc.id).into(),
  ]).collect();
}

/// Lays out gravity loads.
fn gravity_rows(deck: &Deck) -> Vec<Row> {
  return deck.loads.gravity.iter()
    .map(|g| vec![g.id.into(), g.value.into()])
    .collect();
}

/// Lays out pressure loads.
fn pressure_rows(deck: &Deck) -> Vec<Row> {
  return deck.loads.pressure.iter()
    .map(|p| vec![p.id.into(), p.pressure.into(), p.count.into()])
    .collect();
}

/// Lays out load combinations.
fn combination_rows(deck: &Deck) -> Vec<Row> {
  return deck.loads.combinations.iter()
    .map(|c| vec![c.id.into(), c.components.as_str().into()])
    .collect();
}

/// Lays out NLPARM records.
fn nlparam_rows(deck: &Deck) -> Vec<Row> {
  return deck.nlparams.iter().map(|nl| vec![
    nl.id.into(),
    nl.increments.into(),
    nl.method.as_str().into(),
    nl.max_iterations.into(),
    nl.convergence.into(),
  ]).collect();
}

/// Lays out stage configs.
fn stage_rows(deck: &Deck) -> Vec<Row> {
  return deck.stage_configs.iter().map(|s| {
    let mut row: Row = vec![s.id.into()];
    row.extend(s.params.iter().map(|p| CsvField::from(*p)));
    return row;
  }).collect();
}

/// Lays out GEOPARM usage.
fn geo_param_rows(deck: &Deck) -> Vec<Row> {
  return deck.geo_params.iter()
    .map(|g| vec![g.subcase.into(), g.geo_param.into()])
    .collect();
}

/// Lays out set definitions.
fn set_rows(deck: &Deck) -> Vec<Row> {
  return deck.sets.iter().map(|s| vec![
    s.id.into(),
    s.comment.as_deref().into(),
    s.definition.as_str().into(),
  ]).collect();
}

/// Lays out constraint usage.
fn boundary_rows(deck: &Deck) -> Vec<Row> {
  return deck.boundary_conditions.usages.iter()
    .map(|u| vec![u.spc.into(), u.subcase.into()])
    .collect();
}
