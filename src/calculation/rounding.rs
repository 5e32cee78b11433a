//! Statutory rounding helpers.
//!
//! Polish payroll applies two distinct rounding rules: contribution and
//! salary amounts are rounded to the grosz (2 decimal places), while the tax
//! basis and the final tax advance are rounded to the whole złoty. Both use
//! round-half-up (midpoint away from zero).

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to 2 decimal places, half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a currency amount to the whole złoty, half-up.
pub fn round_zloty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
