//! Year-to-date accumulator model.
//!
//! The ZUS annual ceiling and the progressive tax brackets both depend on
//! what an employee has already earned in the tax year. The [`YtdSnapshot`]
//! carries those cumulative figures; the engine reads the snapshot as of the
//! periods strictly before the one being calculated and writes an updated
//! snapshot into each payroll record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative year-to-date figures for one employee in one tax year.
///
/// All three figures are monotonically non-decreasing within a tax year and
/// reset to zero at the year boundary. They must reflect exactly the set of
/// finalized periods prior to the period under calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::YtdSnapshot;
///
/// let ytd = YtdSnapshot::zero();
/// assert!(ytd.gross.is_zero());
/// assert!(ytd.social_insurance_basis.is_zero());
/// assert!(ytd.tax_basis.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtdSnapshot {
    /// Cumulative gross paid in prior periods of the year.
    pub gross: Decimal,
    /// Cumulative basis subject to the annual ceiling (retirement and
    /// disability only; sickness and health have no ceiling). Accumulates
    /// the capped basis, so it never exceeds the ceiling.
    pub social_insurance_basis: Decimal,
    /// Cumulative tax basis (health-insurance base minus cost of revenue,
    /// rounded to the whole złoty, summed across prior periods).
    pub tax_basis: Decimal,
}

impl YtdSnapshot {
    /// Returns the all-zero snapshot used at the start of a tax year.
    pub fn zero() -> Self {
        Self {
            gross: Decimal::ZERO,
            social_insurance_basis: Decimal::ZERO,
            tax_basis: Decimal::ZERO,
        }
    }
}

impl Default for YtdSnapshot {
    fn default() -> Self {
        Self::zero()
    }
}
