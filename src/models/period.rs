//! Payroll period model and its lifecycle.
//!
//! A payroll period is one calendar month's run for a tenant. Periods move
//! through a lifecycle from [`PeriodStatus::Open`] to [`PeriodStatus::Closed`];
//! the engine owns the `Calculating`/`Calculated` transitions while approval,
//! payment and closing are owned by the surrounding service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The lifecycle status of a payroll period.
///
/// The engine only ever writes `Calculating` and `Calculated`; the remaining
/// transitions belong to period lifecycle management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// The period is open and has not been calculated yet.
    Open,
    /// A batch calculation is currently running for the period.
    Calculating,
    /// All employees have been calculated; results may still be recalculated.
    Calculated,
    /// The period has been approved; records are immutable from here on.
    Approved,
    /// Salaries for the period have been paid out.
    Paid,
    /// The period is closed for good.
    Closed,
}

impl PeriodStatus {
    /// Returns the lowercase label used in error messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "open",
            PeriodStatus::Calculating => "calculating",
            PeriodStatus::Calculated => "calculated",
            PeriodStatus::Approved => "approved",
            PeriodStatus::Paid => "paid",
            PeriodStatus::Closed => "closed",
        }
    }
}

/// One calendar month's payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollPeriod, PeriodStatus};
///
/// let period = PayrollPeriod::new(2024, 3);
/// assert_eq!(period.status, PeriodStatus::Open);
/// assert!(period.allows_recalculation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// The calendar year of the period.
    pub year: i32,
    /// The calendar month of the period (1-12).
    pub month: u32,
    /// The current lifecycle status.
    pub status: PeriodStatus,
}

impl PayrollPeriod {
    /// Creates a new open period for the given year and month.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            status: PeriodStatus::Open,
        }
    }

    /// Returns the first calendar day of the period, or `None` when the
    /// month is out of range.
    ///
    /// Rate tables are effective-dated; the first day of the period is the
    /// target date used for rate resolution.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns `true` if the period is closed.
    pub fn is_closed(&self) -> bool {
        self.status == PeriodStatus::Closed
    }

    /// Returns `true` while records for this period may still be written or
    /// overwritten.
    ///
    /// Once a period is approved, paid or closed its records are immutable.
    pub fn allows_recalculation(&self) -> bool {
        matches!(
            self.status,
            PeriodStatus::Open | PeriodStatus::Calculating | PeriodStatus::Calculated
        )
    }
}
