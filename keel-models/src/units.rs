// src/units.rs

//! Conversion between token amounts and integer ledger units.

/// Ledger units in one token
pub const UNITS_PER_TOKEN: i64 = 100_000_000;

/// Converts a token amount to units
///
/// The fractional part is truncated toward zero, so amounts that are not
/// exactly representable in binary may lose one unit (`0.29` gives
/// `28_999_999`). Out-of-range values saturate and NaN gives 0.
pub fn to_units(amount: f64) -> i64 {
    (amount * UNITS_PER_TOKEN as f64) as i64
}

/// Converts units back to a token amount
pub fn from_units(units: i64) -> f64 {
    units as f64 / UNITS_PER_TOKEN as f64
}
