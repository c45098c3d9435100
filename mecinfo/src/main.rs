//! Dumps information on a MEC deck: its materials, properties, steps, loads
//! and so on.

#![allow(clippy::needless_return)]

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, info, error};
use mec::prelude::*;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Write the whole parsed deck as JSON to standard output instead.
  #[arg(short, long)]
  json: bool,
  /// Run the extractors in parallel.
  #[arg(short, long)]
  parallel: bool,
  /// Number display options.
  #[command(flatten)]
  fmt: NumberFormat,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

const INDENT: &str = "  ";

/// Reads and parses the input, exiting if the path is bad.
fn read_deck(args: &Cli, parser: &DeckParser) -> io::Result<Deck> {
  let from_stdin = args.file.as_os_str().eq_ignore_ascii_case("-");
  if !from_stdin && !args.file.is_file() {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  }
  if !args.parallel {
    return if from_stdin {
      parser.parse_reader(BufReader::new(io::stdin()))
    } else {
      parser.parse_file(&args.file)
    };
  }
  // parallel path: read everything first, then split the work
  let bytes = if from_stdin {
    let mut buf: Vec<u8> = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    buf
  } else {
    std::fs::read(&args.file)?
  };
  let mut deck = parser.parse_parallel(&String::from_utf8_lossy(&bytes));
  deck.filename = args.file.file_name()
    .filter(|_| !from_stdin)
    .and_then(|s| s.to_str())
    .map(String::from);
  return Ok(deck);
}

/// Logs the entity counts, title and solver settings.
fn show_settings(deck: &Deck) {
  let mi = &deck.model_info;
  info!(
    "Model has {} nodes, {} elements and {} SPC1 records.",
    mi.nodes,
    mi.elements,
    mi.spc_count
  );
  if deck.title.is_empty() {
    info!("No title.");
  } else {
    info!("Title is \"{}\".", deck.title);
  }
  if deck.params.is_empty() {
    info!("No known parameters set.");
  } else {
    info!(
      "Parameters: {}.",
      deck.params.iter().map(|(p, v)| format!("{}={}", p, v)).join(", ")
    );
  }
  for nl in deck.nlparams.iter() {
    info!(
      "NLPARM {}: {} increments, method {}, at most {} iterations, \
      convergence {}.",
      nl.id,
      nl.increments,
      nl.method,
      nl.max_iterations,
      nl.convergence
    );
  }
}

/// Logs every subcase along with what it refers to.
fn show_subcases(deck: &Deck, fmt: &NumberFormat) {
  if deck.subcases.is_empty() {
    info!("No subcases found.");
    return;
  }
  info!("Subcases found:");
  for sc in deck.subcases.iter() {
    info!(
      "{}- Subcase {} ({}): SOL {}, LOAD {}, SPC {}, USE(STAGE) {}",
      INDENT,
      sc.id,
      sc.label.as_deref().unwrap_or(&fmt.placeholder),
      fmt.format_id(sc.sol),
      fmt.format_id(sc.load),
      fmt.format_id(sc.spc),
      fmt.format_id(sc.use_stage)
    );
    if let Some(stage) = deck.stage_config(sc.id) {
      info!(
        "{}{}- Stage config: {}",
        INDENT,
        INDENT,
        stage.params.iter().map(|p| fmt.format_opt(*p)).join(", ")
      );
    }
    if let Some(gp) = deck.geo_param(sc.id) {
      info!("{}{}- GEOPARM {}", INDENT, INDENT, gp);
    }
  }
}

/// Logs the loads.
fn show_loads(deck: &Deck, fmt: &NumberFormat) {
  let loads = &deck.loads;
  if loads.is_empty() {
    info!("No loads found.");
    return;
  }
  for g in loads.gravity.iter() {
    info!("{}- Gravity {}: {}", INDENT, g.id, fmt.format_opt(g.value));
  }
  for p in loads.pressure.iter() {
    info!(
      "{}- Pressure {}: {} over {} records",
      INDENT,
      p.id,
      fmt.format_opt(p.pressure),
      p.count
    );
  }
  for c in loads.combinations.iter() {
    info!("{}- Combination {}: {}", INDENT, c.id, c.components);
  }
}

/// Logs the properties, joined with their materials.
fn show_properties(deck: &Deck, fmt: &NumberFormat) {
  if deck.properties.is_empty() {
    info!("No properties found.");
    return;
  }
  info!("Properties found:");
  for prop in deck.properties.iter() {
    let mat = deck.property_material(prop)
      .map(|m| format!("{} ({})", m.name, m.id))
      .unwrap_or_else(|| fmt.format_id(prop.material_id));
    info!(
      "{}- [{}] {} <{}>: thickness {}, material {}",
      INDENT,
      prop.id,
      prop.name,
      prop.kind,
      fmt.format_opt(prop.thickness),
      mat
    );
  }
}

/// Logs the materials, grouped by type.
fn show_materials(deck: &Deck, fmt: &NumberFormat) {
  if deck.materials.is_empty() {
    info!("No materials found.");
    return;
  }
  for (tag, mats) in deck.materials_by_type() {
    info!("Materials of type {}:", tag);
    for mat in mats {
      let a = &mat.attributes;
      info!(
        "{}- [{}] {}: E={}, nu={}, gamma={}, c={}, phi={}, K0={}",
        INDENT,
        mat.id,
        mat.name,
        fmt.format_opt(a.e),
        fmt.format_opt(a.nu),
        fmt.format_opt(a.gamma),
        fmt.format_opt(a.c),
        fmt.format_opt(a.phi),
        fmt.format_opt(a.k0)
      );
      if mat.model() == MaterialModel::DMin {
        info!(
          "{}{}- E_cr={}, nu_cr={}, tau_f={}, sigma_t={}",
          INDENT,
          INDENT,
          fmt.format_opt(a.e_cr),
          fmt.format_opt(a.nu_cr),
          fmt.format_opt(a.tau_f),
          fmt.format_opt(a.sigma_t)
        );
      }
    }
  }
}

/// Logs sets and boundary conditions.
fn show_sets_and_constraints(deck: &Deck) {
  info!("{} set definitions found.", deck.sets.len());
  for set in deck.sets.iter() {
    match set.comment {
      Some(ref c) => {
        info!("{}- SET {} ({}): {}", INDENT, set.id, c, set.definition)
      },
      None => info!("{}- SET {}: {}", INDENT, set.id, set.definition)
    }
  }
  let bc = &deck.boundary_conditions;
  info!(
    "{} SPC records defining sets {}.",
    bc.definitions,
    bc.set_ids.iter().join(", ")
  );
  for usage in bc.usages.iter() {
    info!("{}- Subcase {} uses SPC {}", INDENT, usage.subcase, usage.spc);
  }
}

fn main() -> io::Result<()> {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  let parser = match DeckParser::new() {
    Ok(p) => p,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    }
  };
  // parse the file
  if let Some(sbn) = args.file.file_name().and_then(|bn| bn.to_str()) {
    info!("Parsing {}...", sbn);
  } else {
    info!("Parsing...");
  }
  let deck = read_deck(&args, &parser)?;
  info!("Done parsing.");
  if args.json {
    let mut out = BufWriter::new(io::stdout());
    serde_json::to_writer_pretty(&mut out, &deck)?;
    writeln!(out)?;
    return Ok(());
  }
  show_settings(&deck);
  show_subcases(&deck, &args.fmt);
  show_loads(&deck, &args.fmt);
  show_properties(&deck, &args.fmt);
  show_materials(&deck, &args.fmt);
  show_sets_and_constraints(&deck);
  return Ok(());
}
