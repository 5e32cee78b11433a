//! Calculation logic for the Payroll Calculation Engine.
//!
//! This module contains the three calculation stages run per employee per
//! period: assembling the gross component breakdown, computing ZUS
//! social-insurance contributions with the annual ceiling, and computing the
//! progressive income-tax advance. It also provides the two statutory
//! rounding helpers shared by all stages.

mod components;
mod contributions;
mod rounding;
mod tax;

pub use components::{GrossBreakdown, PeriodAttendance, build_components};
pub use contributions::{ContributionResult, calculate_contributions};
pub use rounding::{round2, round_zloty};
pub use tax::{TaxResult, calculate_tax};
