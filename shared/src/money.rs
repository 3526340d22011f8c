//! Money calculation utilities using rust_decimal for precision
//!
//! Prices and totals are stored as `f64` (DOUBLE PRECISION). Every
//! calculation converts to `Decimal` first and rounds back to 2 decimal places.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Lower bound of the "similar price" band, as a fraction of the source price
pub const SIMILAR_PRICE_LOW: Decimal = Decimal::from_parts(7, 0, 0, false, 1);
/// Upper bound of the "similar price" band, as a fraction of the source price
pub const SIMILAR_PRICE_HIGH: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

/// Convert f64 to Decimal (NaN / infinity become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Total for one order line: (unit price + add-on prices) × quantity
pub fn line_total(unit_price: f64, addon_prices: &[f64], quantity: i32) -> Decimal {
    let unit = addon_prices
        .iter()
        .fold(to_decimal(unit_price), |acc, p| acc + to_decimal(*p));
    round(unit * Decimal::from(quantity))
}

/// Compare two monetary values for equality (within 0.01 tolerance, inclusive)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff <= MONEY_TOLERANCE
}

/// Open price interval `(low, high)` used by the similar-items recommender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    /// Band strictly between 70% and 130% of `price`
    pub fn around(price: f64) -> Self {
        let p = to_decimal(price);
        Self {
            low: to_f64(p * SIMILAR_PRICE_LOW),
            high: to_f64(p * SIMILAR_PRICE_HIGH),
        }
    }
}
