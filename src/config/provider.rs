//! Rate resolution for payroll periods.
//!
//! The [`RateProvider`] trait is the seam between the engine and rate
//! configuration storage. The in-memory implementation holds an ordered set
//! of effective-dated tables and is safely shared read-only across all
//! concurrent calculations in a batch.

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

use super::types::RateTable;

/// Resolves the rate table effective for a payroll period.
///
/// Implementations must be thread-safe: a batch shares one provider across
/// all in-flight employee calculations.
pub trait RateProvider: Send + Sync {
    /// Returns the table in force on the first day of the given period.
    ///
    /// Fails with [`EngineError::RatesNotConfigured`] when no table covers
    /// the period; this error is fatal at the batch level.
    fn resolve(&self, year: i32, month: u32) -> EngineResult<RateTable>;
}

/// A [`RateProvider`] backed by an in-memory, ordered list of tables.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::{InMemoryRateProvider, RateProvider};
///
/// let provider = InMemoryRateProvider::new(vec![/* tables */])?;
/// let table = provider.resolve(2024, 3)?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryRateProvider {
    /// Tables sorted ascending by `effective_from`.
    tables: Vec<RateTable>,
}

impl InMemoryRateProvider {
    /// Creates a provider from an unordered list of tables.
    ///
    /// Tables are sorted by `effective_from`. Construction fails with
    /// [`EngineError::InvalidRateTable`] when two tables share an
    /// `effective_from` date or when a bounded table overlaps the next
    /// table's window, so that at most one table is in force on any day.
    /// An open-ended table is allowed before a later table; the later table
    /// supersedes it from its own `effective_from` on.
    pub fn new(mut tables: Vec<RateTable>) -> EngineResult<Self> {
        tables.sort_by_key(|t| t.effective_from);

        for window in tables.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if a.effective_from == b.effective_from {
                return Err(EngineError::InvalidRateTable {
                    message: format!(
                        "two rate tables share effective_from {}",
                        a.effective_from
                    ),
                });
            }
            if let Some(to) = a.effective_to {
                if to >= b.effective_from {
                    return Err(EngineError::InvalidRateTable {
                        message: format!(
                            "rate table effective {}..={} overlaps table effective from {}",
                            a.effective_from, to, b.effective_from
                        ),
                    });
                }
            }
        }

        for table in &tables {
            if let Some(to) = table.effective_to {
                if to < table.effective_from {
                    return Err(EngineError::InvalidRateTable {
                        message: format!(
                            "rate table effective_to {} precedes effective_from {}",
                            to, table.effective_from
                        ),
                    });
                }
            }
        }

        Ok(Self { tables })
    }

    /// Returns the loaded tables in ascending `effective_from` order.
    pub fn tables(&self) -> &[RateTable] {
        &self.tables
    }
}

impl RateProvider for InMemoryRateProvider {
    fn resolve(&self, year: i32, month: u32) -> EngineResult<RateTable> {
        let target = PayrollPeriod::new(year, month)
            .first_day()
            .ok_or_else(|| EngineError::InvalidInput {
                field: "month".to_string(),
                message: format!("{} is not a valid calendar month", month),
            })?;

        // Tables are sorted ascending, so the latest applicable one wins.
        self.tables
            .iter()
            .rfind(|t| t.is_effective_on(target))
            .cloned()
            .ok_or(EngineError::RatesNotConfigured { year, month })
    }
}
