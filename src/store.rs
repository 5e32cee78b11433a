//! Payroll record storage and the year-to-date ledger.
//!
//! The engine emits immutable [`PayrollRecord`]s keyed by (period, employee);
//! how they are persisted is an external concern behind the [`PayrollStore`]
//! trait. The same store doubles as the YTD ledger: the snapshot for a period
//! is derived from the latest finalized record of an earlier month in the
//! same tax year, so recalculation never double-counts.
//!
//! Any storage engine with a per-key atomic upsert satisfies the trait; the
//! in-memory implementation provided here backs the tests and small
//! deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{PayrollRecord, RecordStatus, YtdSnapshot};

/// Storage boundary for payroll records and year-to-date figures.
///
/// Implementations must be thread-safe and must make `upsert` atomic per
/// (period, employee) key: two racing recalculations of the same key resolve
/// to last-write-wins, never an interleaved record.
pub trait PayrollStore: Send + Sync {
    /// Returns the YTD snapshot for an employee as of the periods strictly
    /// before (`year`, `month`).
    ///
    /// Only `Calculated` records of the same tax year and an earlier month
    /// contribute; `Error` records and later periods never do. Returns the
    /// zero snapshot at the start of a tax year.
    fn ytd_before(&self, employee_id: &str, year: i32, month: u32) -> YtdSnapshot;

    /// Returns the record for the given key, if any.
    fn get(&self, employee_id: &str, year: i32, month: u32) -> Option<PayrollRecord>;

    /// Inserts or overwrites the record under its (period, employee) key.
    fn upsert(&self, record: PayrollRecord);

    /// Returns all records of one period, in no particular order.
    fn records_for_period(&self, year: i32, month: u32) -> Vec<PayrollRecord>;
}

type RecordKey = (String, i32, u32);

/// An in-memory [`PayrollStore`] backed by a `RwLock`ed map.
///
/// # Example
///
/// ```
/// use payroll_engine::store::{InMemoryPayrollStore, PayrollStore};
///
/// let store = InMemoryPayrollStore::new();
/// assert!(store.get("emp_001", 2024, 3).is_none());
/// assert!(store.ytd_before("emp_001", 2024, 3).gross.is_zero());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    records: RwLock<HashMap<RecordKey, PayrollRecord>>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn ytd_before(&self, employee_id: &str, year: i32, month: u32) -> YtdSnapshot {
        // A record is cloned before insertion, so a writer panicking cannot
        // leave the map half-updated; a poisoned lock is still readable.
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());

        // The YTD figures on a record are cumulative as of that record, so
        // the latest prior Calculated month carries the whole history.
        records
            .values()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.year == year
                    && r.month < month
                    && r.status == RecordStatus::Calculated
            })
            .max_by_key(|r| r.month)
            .map(|r| r.ytd.clone())
            .unwrap_or_else(YtdSnapshot::zero)
    }

    fn get(&self, employee_id: &str, year: i32, month: u32) -> Option<PayrollRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records
            .get(&(employee_id.to_string(), year, month))
            .cloned()
    }

    fn upsert(&self, record: PayrollRecord) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let key = (record.employee_id.clone(), record.year, record.month);
        records.insert(key, record);
    }

    fn records_for_period(&self, year: i32, month: u32) -> Vec<PayrollRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records
            .values()
            .filter(|r| r.year == year && r.month == month)
            .cloned()
            .collect()
    }
}
