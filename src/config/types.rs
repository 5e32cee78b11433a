//! Rate table types.
//!
//! All rates are stored as decimal fractions (9.76% is `0.0976`), all
//! thresholds and flat amounts as currency values. A table is immutable once
//! in force; changes in law are expressed as a new table with a later
//! `effective_from` date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee-side ZUS contribution rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeZusRates {
    /// Retirement (emerytalne) rate, ceiling-capped basis.
    pub retirement: Decimal,
    /// Disability (rentowe) rate, ceiling-capped basis.
    pub disability: Decimal,
    /// Sickness (chorobowe) rate, full basis.
    pub sickness: Decimal,
}

/// Employer-side ZUS contribution rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerZusRates {
    /// Retirement (emerytalne) rate, ceiling-capped basis.
    pub retirement: Decimal,
    /// Disability (rentowe) rate, ceiling-capped basis.
    pub disability: Decimal,
    /// Accident (wypadkowe) rate, full basis.
    pub accident: Decimal,
    /// Labor Fund (Fundusz Pracy) rate, full basis.
    pub labor_fund: Decimal,
    /// Guaranteed Employee Benefits Fund (FGŚP) rate, full basis.
    pub guaranteed_fund: Decimal,
}

/// Health-insurance rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRates {
    /// The full health-insurance contribution rate.
    pub rate: Decimal,
    /// The tax-deductible sub-rate; the portion of the contribution computed
    /// at this rate offsets the tax advance, the rest does not.
    pub deductible_rate: Decimal,
}

/// Progressive income-tax scale parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxScale {
    /// First-bracket rate.
    pub bracket1_rate: Decimal,
    /// Second-bracket rate.
    pub bracket2_rate: Decimal,
    /// The cumulative annual tax-basis amount at which the second bracket
    /// begins.
    pub threshold: Decimal,
    /// The full monthly flat-rate tax relief (kwota zmniejszająca podatek).
    pub monthly_relief: Decimal,
    /// Standard monthly cost-of-revenue deduction.
    pub cost_standard: Decimal,
    /// Elevated monthly cost-of-revenue deduction.
    pub cost_elevated: Decimal,
}

/// One effective-dated set of ZUS and tax parameters.
///
/// Selection rule: the table in force for a date is the latest table whose
/// `effective_from` is on or before that date and whose `effective_to` is
/// absent or on/after it.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::RateConfigLoader;
/// use chrono::NaiveDate;
///
/// let provider = RateConfigLoader::load("./config/pl")?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// The first day this table is in force.
    pub effective_from: NaiveDate,
    /// The last day this table is in force, or `None` for open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Employee-side ZUS rates.
    pub employee_zus: EmployeeZusRates,
    /// Employer-side ZUS rates.
    pub employer_zus: EmployerZusRates,
    /// Health-insurance rates.
    pub health: HealthRates,
    /// Annual ceiling on the retirement/disability basis
    /// (roczna podstawa wymiaru).
    pub annual_ceiling: Decimal,
    /// Progressive income-tax scale.
    pub tax: TaxScale,
}

impl RateTable {
    /// Returns `true` if this table is in force on the given date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}
