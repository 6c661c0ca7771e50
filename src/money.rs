//! Fixed-point monetary amounts.
//!
//! Every price and total is a `DECIMAL(10, 2)`: at most eight integer digits,
//! at most two fractional digits, never negative.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Fractional digits kept for every amount
pub const SCALE: u32 = 2;

/// Total significant digits allowed for every amount
pub const PRECISION: u32 = 10;

/// Checks `value` against the `DECIMAL(10, 2)`, non-negative rule.
pub fn validate_amount(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::validation(field, format!("{value} is negative")));
    }

    if value.normalize().scale() > SCALE {
        return Err(Error::validation(
            field,
            format!("{value} has more than {SCALE} decimal places"),
        ));
    }

    let integer_limit = Decimal::from(10_u64.pow(PRECISION - SCALE));
    if value.trunc() >= integer_limit {
        return Err(Error::validation(
            field,
            format!("{value} has more than {PRECISION} digits"),
        ));
    }

    Ok(())
}

/// Returns `value` with exactly two fractional digits.
#[must_use]
pub fn to_wire(value: Decimal) -> Decimal {
    let mut out = value;
    out.rescale(SCALE);
    out
}

/// Serde adapter writing amounts as JSON numbers with two fractional digits.
///
/// Reading is exact: `12.345` comes back with scale 3 so validation can
/// reject it instead of silently rounding.
pub mod two_places {
    use super::to_wire;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
    use std::str::FromStr;

    /// Serializes `value` as a JSON number such as `12.30`.
    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_json::Number::from_str(&to_wire(*value).to_string())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }

    /// Parses a JSON number without going through `f64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        let text = number.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(de::Error::custom)
    }
}
