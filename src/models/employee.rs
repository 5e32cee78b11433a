//! Employee context and contract models.
//!
//! The engine treats employee and contract records as read-only input
//! provided by the surrounding employee-management service. The
//! [`EmployeeContext`] carries everything the calculation needs: the gross
//! base salary, the statutory elections, and the contract used to decide
//! whether the employee is payable in a given period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// The employee's cost-of-revenue election (koszty uzyskania przychodu).
///
/// A statutory flat monthly deduction from the tax basis. The elevated
/// amount applies to employees commuting from another town; the rights-based
/// election applies 50% author's-rights costs instead of a flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostOfRevenue {
    /// Standard monthly flat deduction.
    Standard,
    /// Elevated monthly flat deduction (out-of-town commuters).
    Elevated,
    /// 50% author's-rights costs computed from the health-insurance base.
    RightsBased,
}

/// The employee's tax-relief election (kwota zmniejszająca podatek).
///
/// A statutory flat monthly reduction of the computed tax, applied in full,
/// in half (PIT-2 shared between two employers), or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRelief {
    /// Full monthly relief amount.
    Full,
    /// Half of the monthly relief amount.
    Half,
    /// No relief applied.
    None,
}

/// The status of an employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// The contract is in force.
    Active,
    /// The contract is suspended (e.g. unpaid leave).
    Suspended,
    /// The contract has ended.
    Terminated,
}

/// An employment contract with its validity window.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Contract, ContractStatus, PayrollPeriod};
/// use chrono::NaiveDate;
///
/// let contract = Contract {
///     status: ContractStatus::Active,
///     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     end_date: None,
/// };
/// assert!(contract.is_active_in(&PayrollPeriod::new(2024, 6)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// The current contract status.
    pub status: ContractStatus,
    /// The first day the contract is in force.
    pub start_date: NaiveDate,
    /// The last day the contract is in force, or `None` for open-ended.
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    /// Returns `true` if the contract is active and covers the first day of
    /// the given period.
    pub fn is_active_in(&self, period: &PayrollPeriod) -> bool {
        if self.status != ContractStatus::Active {
            return false;
        }
        let Some(first_day) = period.first_day() else {
            return false;
        };
        if self.start_date > first_day {
            return false;
        }
        self.end_date.is_none_or(|end| end >= first_day)
    }
}

/// Everything the engine needs to know about one employee for one period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     Contract, ContractStatus, CostOfRevenue, EmployeeContext, TaxRelief,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = EmployeeContext {
///     employee_id: "emp_001".to_string(),
///     tenant_id: "acme".to_string(),
///     gross_base_salary: Decimal::from_str("15000.00").unwrap(),
///     working_hours_fraction: Decimal::ONE,
///     cost_of_revenue: CostOfRevenue::Standard,
///     tax_relief: TaxRelief::Full,
///     contract: Contract {
///         status: ContractStatus::Active,
///         start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///         end_date: None,
///     },
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeContext {
    /// The unique identifier of the employee.
    pub employee_id: String,
    /// The tenant (employer) the employee belongs to.
    pub tenant_id: String,
    /// The contractual gross base salary for a full month.
    pub gross_base_salary: Decimal,
    /// The working-hours fraction of a full-time position (1 = full time).
    pub working_hours_fraction: Decimal,
    /// The cost-of-revenue election.
    pub cost_of_revenue: CostOfRevenue,
    /// The tax-relief election.
    pub tax_relief: TaxRelief,
    /// The employment contract.
    pub contract: Contract,
}

impl EmployeeContext {
    /// Returns `true` if the employee holds a contract active in the period.
    pub fn has_active_contract(&self, period: &PayrollPeriod) -> bool {
        self.contract.is_active_in(period)
    }
}
