//! A command-line application to write the tables in a MEC deck as CSV.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

mod tables;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::*;
use mec::prelude::*;

use crate::tables::Category;

/// The arguments passed to the converter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Categories to write. Can be specified more than once, or
  /// comma-separated. If absent, all categories are written.
  #[arg(short = 'c', long = "categories", num_args = 0.., value_delimiter = ',')]
  categories: Vec<Category>,
  /// The delimiter used in the CSV.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Output extra/debug info while parsing and converting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// Enable writing CSV headers, once before each category.
  #[arg(short = 'H', long = "headers")]
  headers: bool,
  /// Path to write output to. If absent, writes to standard output.
  #[arg(short = 'o')]
  output: Option<PathBuf>,
  /// The name of the input deck. If -, reads from standard input.
  input: PathBuf,
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
  let delim_byte: u8 = match args.delim.try_into() {
    Ok(b) => b,
    Err(_) => {
      error!("Delimiter must be a single-byte character!");
      std::process::exit(1);
    }
  };
  // parse the deck
  let parser = match DeckParser::new() {
    Ok(p) => p,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    }
  };
  let deck: Deck = if args.input.as_os_str().eq_ignore_ascii_case("-") {
    parser.parse_reader(io::stdin())?
  } else if args.input.is_file() {
    if let Some(sbn) = args.input.file_name().and_then(|bn| bn.to_str()) {
      info!("Parsing {}...", sbn);
    } else {
      info!("Parsing...");
    }
    parser.parse_file(&args.input)?
  } else {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  };
  info!("Done parsing.");
  // init the csv writer
  let output: BufWriter<Box<dyn Write>> = BufWriter::new(
    if let Some(ref op) = args.output {
      Box::new(File::create(op)?)
    } else {
      Box::new(io::stdout())
    }
  );
  let mut wtr = csv::WriterBuilder::new()
    .delimiter(delim_byte)
    .flexible(true)
    .from_writer(output);
  let categories: &[Category] = if args.categories.is_empty() {
    Category::all()
  } else {
    &args.categories
  };
  // write tables
  info!("Writing CSV records...");
  for cat in categories {
    let name = cat.snake_case_name();
    let rows = cat.rows(&deck);
    debug!("Writing {} rows of {}.", rows.len(), cat.short_name());
    if args.headers {
      wtr.write_record(
        std::iter::once("category").chain(cat.headers().iter().copied())
      )?;
    }
    for row in rows {
      wtr.write_record(
        std::iter::once(name.clone())
          .chain(row.into_iter().map(|f| f.to_string()))
      )?;
    }
  }
  wtr.flush()?;
  info!("All done.");
  // done
  return Ok(());
}
