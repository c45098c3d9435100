//! This module implements facilities to customise the display of the values
//! extracted from a deck.

use clap::Args;
use serde::{Deserialize, Serialize};

/// The multiplication sign used in scientific notation.
const TIMES_TEN: &str = "×10^";

/// Specifies how magnitudes are written when displayed.
#[derive(Clone, Debug, Serialize, Deserialize, Args)]
pub struct NumberFormat {
  /// Magnitudes at or above this are written in scientific notation.
  #[arg(long = "sci-above", default_value_t = 1000.0)]
  pub upper: f64,
  /// Non-zero magnitudes below this are written in scientific notation.
  #[arg(long = "sci-below", default_value_t = 0.01)]
  pub lower: f64,
  /// Decimal places for the mantissa in scientific notation.
  #[arg(long = "mantissa-decimals", default_value_t = 2)]
  pub mantissa_decimals: usize,
  /// Maximum decimal places for fixed-point values.
  #[arg(long = "decimals", default_value_t = 3)]
  pub decimals: usize,
  /// What to print for absent values.
  #[arg(long = "placeholder", default_value = "-")]
  pub placeholder: String,
}

impl Default for NumberFormat {
  fn default() -> Self {
    return Self {
      upper: 1000.0,
      lower: 0.01,
      mantissa_decimals: 2,
      decimals: 3,
      placeholder: String::from("-"),
    };
  }
}

impl NumberFormat {
  /// Formats a value: scientific notation for very large or very small
  /// magnitudes, fixed-point otherwise.
  pub fn format(&self, x: f64) -> String {
    if !x.is_finite() {
      return format!("{}", x);
    }
    if x == 0.0 {
      return String::from("0");
    }
    if x.abs() >= self.upper || x.abs() < self.lower {
      // rounding happens before the exponent is picked, so 9999.6 is 1.00e4
      let sci = format!("{:.prec$e}", x, prec = self.mantissa_decimals);
      return sci.replacen('e', TIMES_TEN, 1);
    }
    if x.fract() == 0.0 {
      return format!("{:.0}", x);
    }
    let fixed = format!("{:.prec$}", x, prec = self.decimals);
    return fixed.trim_end_matches('0').trim_end_matches('.').to_string();
  }

  /// Formats an optional value, using the placeholder if it's absent.
  pub fn format_opt(&self, x: Option<f64>) -> String {
    return x.map_or_else(|| self.placeholder.clone(), |v| self.format(v));
  }

  /// Formats an optional ID, using the placeholder if it's absent.
  pub fn format_id(&self, id: Option<usize>) -> String {
    return id.map_or_else(|| self.placeholder.clone(), |v| v.to_string());
  }
}
