//! Amount cleanup for currency-formatted columns.
//!
//! Sales exports carry amounts like `"$1,250.00"`. The currency symbol and
//! thousands separators are stripped before parsing.

use crate::error::{IndexError, Result};

/// Currency symbol stripped by default
pub const DEFAULT_CURRENCY_SYMBOL: char = '$';

/// Parse an amount after removing every `strip` character
///
/// Blank input yields `0.0`, the same default an empty record carries.
/// Negative, non-finite, or otherwise unparseable values are rejected.
pub fn parse_amount(raw: &str, strip: char) -> Result<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != strip && c != ',')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(IndexError::invalid_amount(raw)),
    }
}
