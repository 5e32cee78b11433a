//! Payroll Calculation Engine for Polish employers
//!
//! This crate turns an employee's gross compensation for one monthly period
//! into a legally-compliant net salary: tiered ZUS social-insurance
//! contributions with an annual ceiling, health insurance with a
//! tax-deductible portion, and a progressive income-tax advance whose bracket
//! depends on cumulative year-to-date income. A batch processor fans the
//! calculation out over a whole workforce with bounded concurrency and
//! per-employee failure isolation.

#![warn(missing_docs)]

pub mod batch;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
