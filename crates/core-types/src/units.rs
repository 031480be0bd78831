// In crates/core-types/src/units.rs

//! Conversions from raw on-chain integer amounts to human units.

use crate::{Error, Result};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal keeps at most 28 fractional digits.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Scales a raw base-10 integer amount (e.g. satoshis, wei) down by `decimals`.
pub fn scale_decimal_string(raw: &str, decimals: u32) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(raw, "expected an unsigned base-10 integer"));
    }

    if decimals <= MAX_DECIMAL_SCALE {
        if let Ok(mut value) = Decimal::from_str(raw) {
            if value.set_scale(decimals).is_ok() {
                return value.to_f64().ok_or_else(|| invalid(raw, "out of range"));
            }
        }
    }

    // Too large for Decimal's 96-bit mantissa; fall back to float arithmetic.
    let value: f64 = raw.parse().map_err(|_| invalid(raw, "not a number"))?;
    Ok(value / 10f64.powi(decimals as i32))
}

/// Scales a `0x`-prefixed hex quantity (as returned by `eth_getBalance`) down by `decimals`.
pub fn scale_hex_quantity(hex: &str, decimals: u32) -> Result<f64> {
    let digits = hex.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Ok(0.0);
    }

    match u128::from_str_radix(digits, 16) {
        Ok(value) => match i128::try_from(value)
            .ok()
            .and_then(|v| scaled_decimal(v, decimals))
        {
            Some(scaled) => scaled.to_f64().ok_or_else(|| invalid(hex, "out of range")),
            None => Ok(value as f64 / 10f64.powi(decimals as i32)),
        },
        Err(_) => {
            let mut value = 0f64;
            for c in digits.chars() {
                let digit = c
                    .to_digit(16)
                    .ok_or_else(|| invalid(hex, "expected hex digits"))?;
                value = value * 16.0 + digit as f64;
            }
            Ok(value / 10f64.powi(decimals as i32))
        }
    }
}

fn scaled_decimal(value: i128, decimals: u32) -> Option<Decimal> {
    if decimals > MAX_DECIMAL_SCALE {
        return None;
    }
    Decimal::try_from_i128_with_scale(value, decimals).ok()
}

fn invalid(raw: &str, reason: &str) -> Error {
    Error::InvalidAmount {
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn scales_satoshis_to_bitcoin() {
        assert_eq!(scale_decimal_string("150000000", 8).unwrap(), 1.5);
        assert_eq!(scale_decimal_string("0", 8).unwrap(), 0.0);
    }

    #[test]
    fn scales_token_amount_exactly() {
        let amount = scale_decimal_string("1234500", 6).unwrap();
        assert_eq!(Decimal::from_f64_retain(amount).unwrap().round_dp(6), dec!(1.2345));
    }

    #[test]
    fn handles_amounts_beyond_decimal_range() {
        // 1e30 raw units with 18 decimals.
        let raw = format!("1{}", "0".repeat(30));
        let amount = scale_decimal_string(&raw, 18).unwrap();
        assert!((amount - 1e12).abs() < 1.0);
    }

    #[test]
    fn rejects_non_integer_input() {
        assert!(scale_decimal_string("1.5", 8).is_err());
        assert!(scale_decimal_string("-10", 8).is_err());
        assert!(scale_decimal_string("", 8).is_err());
    }

    #[test]
    fn scales_wei_hex_to_ether() {
        // 1.5 ETH
        assert_eq!(scale_hex_quantity("0x14d1120d7b160000", 18).unwrap(), 1.5);
        assert_eq!(scale_hex_quantity("0x0", 18).unwrap(), 0.0);
        assert_eq!(scale_hex_quantity("0x", 18).unwrap(), 0.0);
        assert!(scale_hex_quantity("0xzz", 18).is_err());
    }
}
