//! Data models for the Payroll Calculation Engine.
//!
//! This module contains the core data structures used throughout the engine:
//! employees and their contracts, payroll periods and their lifecycle,
//! year-to-date accumulators, and the payroll record produced per employee
//! per period.

mod employee;
mod payroll_record;
mod period;
mod ytd;

pub use employee::{Contract, ContractStatus, CostOfRevenue, EmployeeContext, TaxRelief};
pub use payroll_record::{
    EmployerContributions, EmployeeContributions, PayComponent, PayrollRecord, PeriodTotals,
    RecordStatus,
};
pub use period::{PayrollPeriod, PeriodStatus};
pub use ytd::YtdSnapshot;
