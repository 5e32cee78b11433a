//! Payroll record models.
//!
//! This module contains the [`PayrollRecord`] type and its associated
//! structures that capture all outputs from one employee/period calculation:
//! the gross component breakdown, both sides of the ZUS contributions, health
//! insurance, the tax advance, the net salary and the updated year-to-date
//! figures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayrollPeriod, YtdSnapshot};

/// The status of a payroll record.
///
/// A record is written with status [`RecordStatus::Error`] when the
/// employee's calculation failed inside a batch; the error message is kept
/// on the record so the operator can correct and re-run that employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// The calculation completed and the figures are valid.
    Calculated,
    /// The calculation failed; all monetary figures are zero.
    Error,
}

fn default_true() -> bool {
    true
}

/// A single line item of the gross salary breakdown.
///
/// Manual additions may be excluded from the tax basis or the
/// social-insurance basis via the two flags; both default to included.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayComponent;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bonus = PayComponent::new(
///     "bonus",
///     "Premia uznaniowa",
///     Decimal::from_str("2000.00").unwrap(),
/// );
/// assert!(bonus.taxable);
/// assert!(bonus.social_insurance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponent {
    /// A stable code identifying the component kind (e.g. "base_salary").
    pub code: String,
    /// The human-readable label shown on the payslip.
    pub label: String,
    /// The gross amount of this component.
    pub amount: Decimal,
    /// Whether the component counts towards the tax basis.
    #[serde(default = "default_true")]
    pub taxable: bool,
    /// Whether the component counts towards the social-insurance basis.
    #[serde(default = "default_true")]
    pub social_insurance: bool,
}

impl PayComponent {
    /// Creates a component included in both the tax and the
    /// social-insurance basis.
    pub fn new(code: &str, label: &str, amount: Decimal) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            amount,
            taxable: true,
            social_insurance: true,
        }
    }
}

/// Employee-side ZUS contributions for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeContributions {
    /// Retirement (emerytalne) contribution, subject to the annual ceiling.
    pub retirement: Decimal,
    /// Disability (rentowe) contribution, subject to the annual ceiling.
    pub disability: Decimal,
    /// Sickness (chorobowe) contribution, computed on the full basis.
    pub sickness: Decimal,
    /// Sum of the rounded line items above.
    pub total: Decimal,
}

impl EmployeeContributions {
    /// Returns the all-zero breakdown.
    pub fn zero() -> Self {
        Self {
            retirement: Decimal::ZERO,
            disability: Decimal::ZERO,
            sickness: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Employer-side ZUS contributions for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Retirement (emerytalne) contribution, subject to the annual ceiling.
    pub retirement: Decimal,
    /// Disability (rentowe) contribution, subject to the annual ceiling.
    pub disability: Decimal,
    /// Accident (wypadkowe) contribution, computed on the full basis.
    pub accident: Decimal,
    /// Labor Fund (Fundusz Pracy) contribution, computed on the full basis.
    pub labor_fund: Decimal,
    /// Guaranteed Employee Benefits Fund (FGŚP) contribution, computed on
    /// the full basis.
    pub guaranteed_fund: Decimal,
    /// Sum of the rounded line items above.
    pub total: Decimal,
}

impl EmployerContributions {
    /// Returns the all-zero breakdown.
    pub fn zero() -> Self {
        Self {
            retirement: Decimal::ZERO,
            disability: Decimal::ZERO,
            accident: Decimal::ZERO,
            labor_fund: Decimal::ZERO,
            guaranteed_fund: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// The complete result of one employee/period payroll calculation.
///
/// Records are uniquely keyed by (period, employee); recalculating the same
/// key overwrites the prior record while the enclosing period still allows
/// it. An `Error`-status record carries the failure message and all-zero
/// figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub calculated_at: DateTime<Utc>,
    /// The tenant (employer) this record belongs to.
    pub tenant_id: String,
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar year of the period.
    pub year: i32,
    /// The calendar month of the period (1-12).
    pub month: u32,
    /// Whether the calculation succeeded.
    pub status: RecordStatus,
    /// The failure message for `Error`-status records.
    pub error_message: Option<String>,
    /// The gross salary for the period (sum of all components).
    pub gross_salary: Decimal,
    /// The component breakdown of the gross salary.
    pub components: Vec<PayComponent>,
    /// Employee-side ZUS contributions.
    pub employee_zus: EmployeeContributions,
    /// Employer-side ZUS contributions.
    pub employer_zus: EmployerContributions,
    /// Health-insurance base (taxable gross minus employee ZUS total).
    pub health_base: Decimal,
    /// Health-insurance contribution.
    pub health_contribution: Decimal,
    /// The tax-deductible portion of the health contribution.
    pub health_deductible: Decimal,
    /// The tax basis for the period, rounded to the whole złoty.
    pub tax_basis: Decimal,
    /// The cost-of-revenue amount deducted from the tax basis.
    pub cost_of_revenue: Decimal,
    /// The tax-relief amount applied.
    pub relief_applied: Decimal,
    /// The computed tax before relief and health deduction.
    pub tax_before_relief: Decimal,
    /// The final income-tax advance, rounded to the whole złoty.
    pub tax_advance: Decimal,
    /// The net salary paid out.
    pub net_salary: Decimal,
    /// The employer's total cost (gross plus employer contributions).
    pub employer_total_cost: Decimal,
    /// Whether the annual social-insurance ceiling limited the basis this
    /// period.
    pub ceiling_applied: bool,
    /// Year-to-date figures as of and including this period.
    pub ytd: YtdSnapshot,
}

impl PayrollRecord {
    /// Creates an `Error`-status record for an employee whose calculation
    /// failed inside a batch.
    ///
    /// All monetary figures are zero; the YTD snapshot repeats the prior
    /// state so later periods are unaffected.
    pub fn error(
        tenant_id: &str,
        employee_id: &str,
        period: &PayrollPeriod,
        message: String,
    ) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            tenant_id: tenant_id.to_string(),
            employee_id: employee_id.to_string(),
            year: period.year,
            month: period.month,
            status: RecordStatus::Error,
            error_message: Some(message),
            gross_salary: Decimal::ZERO,
            components: Vec::new(),
            employee_zus: EmployeeContributions::zero(),
            employer_zus: EmployerContributions::zero(),
            health_base: Decimal::ZERO,
            health_contribution: Decimal::ZERO,
            health_deductible: Decimal::ZERO,
            tax_basis: Decimal::ZERO,
            cost_of_revenue: Decimal::ZERO,
            relief_applied: Decimal::ZERO,
            tax_before_relief: Decimal::ZERO,
            tax_advance: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            employer_total_cost: Decimal::ZERO,
            ceiling_applied: false,
            ytd: YtdSnapshot::zero(),
        }
    }

    /// Returns `true` when two records carry identical computed figures.
    ///
    /// `calculation_id` and `calculated_at` are write metadata minted per
    /// write and are excluded; every other field takes part. Recalculating a
    /// period with identical inputs and YTD state yields a record for which
    /// this holds against the previous one.
    pub fn same_figures(&self, other: &PayrollRecord) -> bool {
        let mut normalized = other.clone();
        normalized.calculation_id = self.calculation_id;
        normalized.calculated_at = self.calculated_at;
        *self == normalized
    }
}

/// Aggregate totals for a period, recomputed after each batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Sum of gross salaries across calculated records.
    pub total_gross: Decimal,
    /// Sum of net salaries across calculated records.
    pub total_net: Decimal,
    /// Sum of employer total costs across calculated records.
    pub total_employer_cost: Decimal,
    /// Number of records in the period (calculated and error).
    pub employee_count: usize,
}

impl PeriodTotals {
    /// Computes the aggregate totals from the records of one period.
    ///
    /// Error-status records count towards `employee_count` but contribute
    /// zero to the monetary totals.
    pub fn from_records(records: &[PayrollRecord]) -> Self {
        let calculated = records
            .iter()
            .filter(|r| r.status == RecordStatus::Calculated);
        let mut totals = Self {
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_employer_cost: Decimal::ZERO,
            employee_count: records.len(),
        };
        for record in calculated {
            totals.total_gross += record.gross_salary;
            totals.total_net += record.net_salary;
            totals.total_employer_cost += record.employer_total_cost;
        }
        totals
    }
}
