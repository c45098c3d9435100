//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

use log::warn;
use regex::{Captures, Regex};

/// Characters that may appear in a real number, Nastran shorthand included.
const REAL_CHARS: &str = "0123456789.+-eEdD";

/// Decodes a Nastran-format real number. Takes everything Rust's own float
/// parser takes, plus the card shorthand where the exponent letter is left
/// out (`2.1+5`, `1.-3`) or is a Fortran-style `D`.
pub(crate) fn decode_nasreal(s: &str) -> Option<f64> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(x) = s.parse::<f64>() {
    return Some(x);
  }
  if !s.chars().all(|c| REAL_CHARS.contains(c)) {
    return None;
  }
  // the exponent starts at the last sign that isn't the leading one
  let split = s.char_indices()
    .skip(1)
    .filter(|(_, c)| *c == '+' || *c == '-')
    .map(|(i, _)| i)
    .last()?;
  let (mantissa, exponent) = s.split_at(split);
  let mantissa = mantissa.trim_end_matches(&['e', 'E', 'd', 'D'][..]);
  let exponent = exponent.parse::<i32>().ok()?;
  // going through the string keeps the rounding of the literal
  return format!("{}e{}", mantissa, exponent).parse::<f64>().ok();
}

/// Decodes a real field, logging and dropping it if it's malformed.
pub(crate) fn real_field(s: &str, what: &str) -> Option<f64> {
  let val = decode_nasreal(s);
  if val.is_none() {
    warn!("Skipping malformed {} \"{}\".", what, s.trim());
  }
  return val;
}

/// Decodes an ID field. IDs are always non-negative integers that fit in a
/// `usize`; anything larger is logged and dropped like any malformed ID, so
/// a record keyed by it is skipped.
pub(crate) fn id_field(s: &str, what: &str) -> Option<usize> {
  let val = s.trim().parse::<usize>().ok();
  if val.is_none() {
    warn!("Skipping malformed {} \"{}\".", what, s.trim());
  }
  return val;
}

/// Returns the text of a capture group, if it participated in the match.
pub(crate) fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
  return caps.get(i).map(|m| m.as_str());
}

/// Searches for the first match of a pattern and decodes its first group as
/// a real number.
pub(crate) fn first_real(re: &Regex, block: &str, what: &str) -> Option<f64> {
  return re.captures(block)
    .and_then(|c| group(&c, 1))
    .and_then(|s| real_field(s, what));
}

/// Searches for the first match of a pattern and decodes its first group as
/// an ID.
pub(crate) fn first_id(re: &Regex, block: &str, what: &str) -> Option<usize> {
  return re.captures(block)
    .and_then(|c| group(&c, 1))
    .and_then(|s| id_field(s, what));
}

/// Makes sure the text ends in a newline, so line-terminated patterns also
/// see the last line.
pub(crate) fn with_final_newline(text: &str) -> std::borrow::Cow<'_, str> {
  if text.is_empty() || text.ends_with('\n') {
    return text.into();
  }
  return format!("{}\n", text).into();
}
