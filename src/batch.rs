//! Concurrent batch processing of payroll periods.
//!
//! A batch run calculates every employee of one period with bounded
//! concurrency. Fatal conditions (a closed period, a missing rate table)
//! abort the run before any employee is touched; everything else is isolated
//! per employee, recorded as an error-status [`PayrollRecord`] and reported
//! in the batch result while the rest of the batch keeps going.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::engine::{CalculationInput, PayrollEngine};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollPeriod, PayrollRecord, PeriodStatus, PeriodTotals, RecordStatus};
use crate::store::PayrollStore;

/// Default bound on concurrently calculated employees.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Options controlling a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of employees calculated concurrently.
    pub concurrency: usize,
    /// Whether employees that already have a calculated record for the
    /// period are recalculated instead of skipped.
    pub recalculate: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            recalculate: false,
        }
    }
}

/// One employee's failure within an otherwise successful batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// The employee whose calculation failed.
    pub employee_id: String,
    /// The rendered error message.
    pub message: String,
}

/// The outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Employees calculated successfully in this run.
    pub processed_count: usize,
    /// Employees skipped because a calculated record already existed.
    pub skipped_count: usize,
    /// Per-employee failures; empty on a clean run.
    pub errors: Vec<BatchError>,
    /// Aggregate totals over all records of the period.
    pub totals: PeriodTotals,
}

/// Runs batch calculations over a shared [`PayrollEngine`].
pub struct BatchProcessor {
    engine: Arc<PayrollEngine>,
}

impl BatchProcessor {
    /// Creates a processor over the given engine.
    pub fn new(engine: Arc<PayrollEngine>) -> Self {
        Self { engine }
    }

    /// Calculates all given employees for one period.
    ///
    /// The period moves to `Calculating` for the duration of the run and to
    /// `Calculated` when it completes. Per-employee failures produce an
    /// error-status record and a [`BatchError`] entry without affecting the
    /// other employees.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PeriodClosed`] or
    /// [`EngineError::RatesNotConfigured`] from the pre-flight checks; in
    /// that case no employee was processed and the period status is left as
    /// it was.
    pub async fn process_batch(
        &self,
        inputs: Vec<CalculationInput>,
        period: &mut PayrollPeriod,
        options: &BatchOptions,
    ) -> EngineResult<BatchResult> {
        if !period.allows_recalculation() {
            return Err(EngineError::PeriodClosed {
                year: period.year,
                month: period.month,
                status: period.status.label().to_string(),
            });
        }
        // A missing rate table hits every employee equally; fail fast.
        self.engine.rate_table(period)?;

        info!(
            year = period.year,
            month = period.month,
            employees = inputs.len(),
            concurrency = options.concurrency,
            "starting batch calculation"
        );
        period.status = PeriodStatus::Calculating;

        let mut skipped_count = 0;
        let mut to_process = Vec::with_capacity(inputs.len());
        for input in inputs {
            let existing = self.engine.store().get(
                &input.employee.employee_id,
                period.year,
                period.month,
            );
            let already_calculated =
                existing.is_some_and(|r| r.status == RecordStatus::Calculated);
            if already_calculated && !options.recalculate {
                skipped_count += 1;
            } else {
                to_process.push(input);
            }
        }

        let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
        let mut join_set: JoinSet<EngineResult<PayrollRecord>> = JoinSet::new();
        // Task id -> employee id, so even an aborted or panicked task can be
        // attributed to its employee when joined.
        let mut employee_by_task: HashMap<tokio::task::Id, String> = HashMap::new();

        for input in to_process {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            let period = period.clone();
            let employee_id = input.employee.employee_id.clone();

            let handle = join_set.spawn(async move {
                // The semaphore lives for the whole batch and is never closed.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("batch semaphore closed");
                let result = engine.calculate(&input, &period);

                if let Err(error) = &result {
                    warn!(
                        employee_id = %input.employee.employee_id,
                        error = %error,
                        "employee calculation failed"
                    );
                    engine.store().upsert(PayrollRecord::error(
                        &input.employee.tenant_id,
                        &input.employee.employee_id,
                        &period,
                        error.to_string(),
                    ));
                }
                result
            });
            employee_by_task.insert(handle.id(), employee_id);
        }

        let mut processed_count = 0;
        let mut errors = Vec::new();
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, Ok(_))) => processed_count += 1,
                Ok((task_id, Err(error))) => errors.push(BatchError {
                    employee_id: employee_by_task
                        .get(&task_id)
                        .cloned()
                        .unwrap_or_default(),
                    message: error.to_string(),
                }),
                Err(join_error) => errors.push(BatchError {
                    employee_id: employee_by_task
                        .get(&join_error.id())
                        .cloned()
                        .unwrap_or_default(),
                    message: format!("Calculation task failed: {join_error}"),
                }),
            }
        }

        let records = self
            .engine
            .store()
            .records_for_period(period.year, period.month);
        let totals = PeriodTotals::from_records(&records);
        period.status = PeriodStatus::Calculated;

        info!(
            year = period.year,
            month = period.month,
            processed = processed_count,
            skipped = skipped_count,
            failed = errors.len(),
            total_gross = %totals.total_gross,
            "batch calculation finished"
        );

        Ok(BatchResult {
            processed_count,
            skipped_count,
            errors,
            totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        EmployeeZusRates, EmployerZusRates, HealthRates, InMemoryRateProvider, RateTable,
        TaxScale,
    };
    use crate::models::{
        Contract, ContractStatus, CostOfRevenue, EmployeeContext, TaxRelief,
    };
    use crate::store::{InMemoryPayrollStore, PayrollStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn table_2024() -> RateTable {
        RateTable {
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            effective_to: None,
            employee_zus: EmployeeZusRates {
                retirement: dec("0.0976"),
                disability: dec("0.0150"),
                sickness: dec("0.0245"),
            },
            employer_zus: EmployerZusRates {
                retirement: dec("0.0976"),
                disability: dec("0.0650"),
                accident: dec("0.0167"),
                labor_fund: dec("0.0245"),
                guaranteed_fund: dec("0.0010"),
            },
            health: HealthRates {
                rate: dec("0.09"),
                deductible_rate: dec("0.0775"),
            },
            annual_ceiling: dec("234720"),
            tax: TaxScale {
                bracket1_rate: dec("0.12"),
                bracket2_rate: dec("0.32"),
                threshold: dec("120000"),
                monthly_relief: dec("300"),
                cost_standard: dec("250"),
                cost_elevated: dec("300"),
            },
        }
    }

    fn processor() -> BatchProcessor {
        let rates = Arc::new(InMemoryRateProvider::new(vec![table_2024()]).unwrap());
        let store = Arc::new(InMemoryPayrollStore::new());
        BatchProcessor::new(Arc::new(PayrollEngine::new(rates, store)))
    }

    fn employee(id: &str, base: &str) -> EmployeeContext {
        EmployeeContext {
            employee_id: id.to_string(),
            tenant_id: "acme".to_string(),
            gross_base_salary: dec(base),
            working_hours_fraction: Decimal::ONE,
            cost_of_revenue: CostOfRevenue::Standard,
            tax_relief: TaxRelief::Full,
            contract: Contract {
                status: ContractStatus::Active,
                start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end_date: None,
            },
        }
    }

    fn inputs(count: usize) -> Vec<CalculationInput> {
        (0..count)
            .map(|i| {
                CalculationInput::full_month(
                    employee(&format!("emp_{i:03}"), "10000.00"),
                    21,
                )
            })
            .collect()
    }

    /// BP-001: a clean batch calculates every employee
    #[tokio::test]
    async fn test_clean_batch_processes_all() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2024, 1);

        let result = processor
            .process_batch(inputs(25), &mut period, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(result.processed_count, 25);
        assert_eq!(result.skipped_count, 0);
        assert!(result.errors.is_empty());
        assert_eq!(result.totals.employee_count, 25);
        assert_eq!(result.totals.total_gross, dec("250000.00"));
        assert_eq!(period.status, PeriodStatus::Calculated);
    }

    /// BP-002: one failing employee never affects the others
    #[tokio::test]
    async fn test_per_employee_failure_is_isolated() {
        let processor = processor();
        let mut batch = inputs(5);
        batch[2].employee.contract.status = ContractStatus::Terminated;
        let mut period = PayrollPeriod::new(2024, 1);

        let result = processor
            .process_batch(batch, &mut period, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(result.processed_count, 4);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].employee_id, "emp_002");
        assert!(result.errors[0].message.contains("no active contract"));

        // The failure left an error-status record behind.
        let record = processor
            .engine
            .store()
            .get("emp_002", 2024, 1)
            .unwrap();
        assert_eq!(record.status, RecordStatus::Error);
        assert!(record.error_message.is_some());
        assert_eq!(record.gross_salary, Decimal::ZERO);

        // Totals count the error record but only sum calculated money.
        assert_eq!(result.totals.employee_count, 5);
        assert_eq!(result.totals.total_gross, dec("40000.00"));
        assert_eq!(period.status, PeriodStatus::Calculated);
    }

    /// BP-003: a missing rate table aborts before any employee is processed
    #[tokio::test]
    async fn test_missing_rates_aborts_batch() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2023, 6);

        let result = processor
            .process_batch(inputs(5), &mut period, &BatchOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(EngineError::RatesNotConfigured { year: 2023, month: 6 })
        ));
        // Nothing was written and the period status is untouched.
        assert!(processor.engine.store().records_for_period(2023, 6).is_empty());
        assert_eq!(period.status, PeriodStatus::Open);
    }

    /// BP-004: a period past calculation rejects the whole batch
    #[tokio::test]
    async fn test_approved_period_rejects_batch() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2024, 1);
        period.status = PeriodStatus::Approved;

        let result = processor
            .process_batch(inputs(3), &mut period, &BatchOptions::default())
            .await;

        assert!(matches!(result, Err(EngineError::PeriodClosed { .. })));
        assert_eq!(period.status, PeriodStatus::Approved);
    }

    /// BP-005: calculated employees are skipped unless recalculation is on
    #[tokio::test]
    async fn test_skip_already_calculated() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2024, 1);

        let first = processor
            .process_batch(inputs(3), &mut period, &BatchOptions::default())
            .await
            .unwrap();
        assert_eq!(first.processed_count, 3);

        let second = processor
            .process_batch(inputs(3), &mut period, &BatchOptions::default())
            .await
            .unwrap();
        assert_eq!(second.processed_count, 0);
        assert_eq!(second.skipped_count, 3);
        // Skipped records still appear in the totals.
        assert_eq!(second.totals.employee_count, 3);

        let forced = processor
            .process_batch(
                inputs(3),
                &mut period,
                &BatchOptions {
                    recalculate: true,
                    ..BatchOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(forced.processed_count, 3);
        assert_eq!(forced.skipped_count, 0);
    }

    /// BP-006: failed employees are retried on the next run even without
    /// the recalculate flag
    #[tokio::test]
    async fn test_error_records_are_retried() {
        let processor = processor();
        let mut batch = inputs(2);
        batch[1].employee.contract.status = ContractStatus::Suspended;
        let mut period = PayrollPeriod::new(2024, 1);

        let first = processor
            .process_batch(batch, &mut period, &BatchOptions::default())
            .await
            .unwrap();
        assert_eq!(first.errors.len(), 1);

        // Contract fixed; the retry picks up only the failed employee.
        let second = processor
            .process_batch(inputs(2), &mut period, &BatchOptions::default())
            .await
            .unwrap();
        assert_eq!(second.processed_count, 1);
        assert_eq!(second.skipped_count, 1);
        assert!(second.errors.is_empty());

        let record = processor
            .engine
            .store()
            .get("emp_001", 2024, 1)
            .unwrap();
        assert_eq!(record.status, RecordStatus::Calculated);
    }

    /// BP-007: a narrow concurrency bound still processes the whole batch
    #[tokio::test]
    async fn test_bounded_concurrency_completes() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2024, 1);

        let result = processor
            .process_batch(
                inputs(50),
                &mut period,
                &BatchOptions {
                    concurrency: 2,
                    recalculate: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.processed_count, 50);
        assert_eq!(
            processor.engine.store().records_for_period(2024, 1).len(),
            50
        );
    }

    /// BP-008: a calculation that dies abnormally is still reported against
    /// its employee
    #[tokio::test]
    async fn test_aborted_calculation_names_its_employee() {
        let processor = processor();
        let mut batch = inputs(2);
        // Decimal::MAX overflows when the employer cost is added on top,
        // killing the task instead of returning an error.
        batch[1].employee.gross_base_salary = Decimal::MAX;
        let mut period = PayrollPeriod::new(2024, 1);

        let result = processor
            .process_batch(batch, &mut period, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(result.processed_count, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].employee_id, "emp_001");
        assert!(result.errors[0].message.contains("task failed"));
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let processor = processor();
        let mut period = PayrollPeriod::new(2024, 1);

        let result = processor
            .process_batch(
                inputs(3),
                &mut period,
                &BatchOptions {
                    concurrency: 0,
                    recalculate: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(result.processed_count, 3);
    }
}
