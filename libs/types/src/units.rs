//! Base-unit amounts and human-readable unit parsing
//!
//! Ledger amounts are integral counts of an asset's smallest unit. Conversion
//! from decimal strings goes through rust_decimal so no floating point
//! is ever involved.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::TypesError;

/// Count of an asset's base units.
pub type Amount = u128;

/// Decimal places of the native currency.
pub const NATIVE_DECIMALS: u32 = 18;

/// Convert a decimal string such as `"3.5"` into base units.
///
/// Fails on negative values, on more fractional digits than `decimals`
/// allows, and on results that do not fit in an [`Amount`].
pub fn parse_units(value: &str, decimals: u32) -> Result<Amount, TypesError> {
    let parsed = Decimal::from_str(value.trim()).map_err(|e| TypesError::InvalidUnits {
        input: value.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(TypesError::InvalidUnits {
            input: value.to_string(),
            reason: "negative amount".to_string(),
        });
    }

    let normalized = parsed.normalize();
    let scale = normalized.scale();
    if scale > decimals {
        return Err(TypesError::TooPrecise {
            input: value.to_string(),
            decimals,
        });
    }

    let overflow = || TypesError::UnitsOverflow {
        input: value.to_string(),
        decimals,
    };

    let mantissa = normalized.mantissa().unsigned_abs();
    let factor = 10u128.checked_pow(decimals - scale).ok_or_else(overflow)?;
    mantissa.checked_mul(factor).ok_or_else(overflow)
}

/// Convert a native-currency decimal string into base units.
pub fn parse_native(value: &str) -> Result<Amount, TypesError> {
    parse_units(value, NATIVE_DECIMALS)
}
