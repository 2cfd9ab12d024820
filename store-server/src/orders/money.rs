//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary sums are computed with `Decimal` internally, then
//! converted to `f64` for storage/serialization. Rounding is 2 decimal
//! places, half-up.

use rust_decimal::prelude::*;

use crate::utils::AppError;
use crate::utils::validation::MAX_PRICE;

/// Rounding: 2 decimal places
pub const DECIMAL_PLACES: u32 = 2;

/// Convert an f64 monetary value to Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded half-up to 2 places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// price * qty as Decimal
pub fn line_total(price: f64, qty: i64) -> Decimal {
    to_decimal(price) * Decimal::from(qty)
}

/// Snap a monetary value to exact 2 decimal places.
///
/// Applied wherever a price or cost is snapshotted onto an order, so
/// stored amounts carry no sub-cent precision and rollups at different
/// granularities can never round apart.
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Validate that a monetary value is finite, non-negative and bounded
pub fn validate_money(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        let sum_f64 = a + b;

        // f64 fails
        assert_ne!(sum_f64, 0.3);

        // Decimal succeeds
        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(10.99, 3)), 32.97);
        assert_eq!(to_f64(line_total(0.0, 5)), 0.0);
    }

    #[test]
    fn test_round_money_snaps_to_two_places() {
        assert_eq!(round_money(0.014), 0.01);
        assert_eq!(round_money(0.006), 0.01);
        assert_eq!(round_money(0.005), 0.01);
        assert_eq!(round_money(19.99), 19.99);
        assert_eq!(round_money(0.0), 0.0);
    }

    #[test]
    fn test_validate_money_rejects_bad_values() {
        assert!(validate_money(f64::NAN, "price").is_err());
        assert!(validate_money(f64::INFINITY, "price").is_err());
        assert!(validate_money(-0.01, "price").is_err());
        assert!(validate_money(2_000_000.0, "price").is_err());
        assert!(validate_money(19.99, "price").is_ok());
    }
}
