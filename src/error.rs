//! Error types for the Payroll Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during a payroll run.
//!
//! Errors fall into two severity classes. Per-employee errors (bad input,
//! missing contract) are recoverable: a batch records them and keeps going.
//! Fatal errors (no rate table for the period, period already closed) affect
//! every employee equally and abort the whole batch. Use
//! [`EngineError::is_fatal`] to distinguish the two.

use thiserror::Error;

/// The main error type for the Payroll Calculation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::RatesNotConfigured { year: 2024, month: 3 };
/// assert_eq!(error.to_string(), "No rate table configured for period 2024-03");
/// assert!(error.is_fatal());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate table was invalid or inconsistent with the other loaded tables.
    #[error("Invalid rate table: {message}")]
    InvalidRateTable {
        /// A description of what made the table invalid.
        message: String,
    },

    /// No rate table is effective for the requested payroll period.
    ///
    /// This is fatal at the batch level: every employee in the period is
    /// equally affected.
    #[error("No rate table configured for period {year}-{month:02}")]
    RatesNotConfigured {
        /// The calendar year of the period.
        year: i32,
        /// The calendar month of the period (1-12).
        month: u32,
    },

    /// The payroll period no longer accepts calculation.
    ///
    /// Raised when the period is APPROVED, PAID or CLOSED. Fatal at the
    /// batch level; reported once.
    #[error("Payroll period {year}-{month:02} is {status} and cannot be recalculated")]
    PeriodClosed {
        /// The calendar year of the period.
        year: i32,
        /// The calendar month of the period (1-12).
        month: u32,
        /// The period status that blocked the calculation.
        status: String,
    },

    /// The employee has no contract active within the payroll period.
    #[error("Employee '{employee_id}' has no active contract for the period")]
    NoActiveContract {
        /// The identifier of the employee.
        employee_id: String,
    },

    /// An input field was invalid (zero working days, worked days exceeding
    /// working days, negative amounts).
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl EngineError {
    /// Returns `true` if this error aborts a whole batch rather than a
    /// single employee's calculation.
    ///
    /// Fatal errors are configuration-level: a missing rate table or a
    /// period that is no longer open for calculation. Everything else is
    /// isolated per employee.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::RatesNotConfigured { .. } | EngineError::PeriodClosed { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
