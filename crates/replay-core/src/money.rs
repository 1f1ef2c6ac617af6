//! Conversions between bar prices (`f64`) and money (`Decimal`).

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a price to `Decimal`. Non-finite inputs map to zero; validated
/// series never contain them.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// Convert money back to `f64` for ratios and reporting.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip() {
        assert_eq!(to_decimal(100.5), dec!(100.5));
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert!((to_f64(dec!(0.002)) - 0.002).abs() < 1e-12);
    }
}
