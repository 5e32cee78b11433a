//! Rate configuration for the Payroll Calculation Engine.
//!
//! This module contains the effective-dated [`RateTable`] with all ZUS,
//! health-insurance and income-tax parameters, the [`RateProvider`] trait
//! that resolves the table in force for a payroll period, and a loader that
//! reads rate tables from a directory of YAML files.

mod loader;
mod provider;
mod types;

pub use loader::RateConfigLoader;
pub use provider::{InMemoryRateProvider, RateProvider};
pub use types::{EmployeeZusRates, EmployerZusRates, HealthRates, RateTable, TaxScale};
