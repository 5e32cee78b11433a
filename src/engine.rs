//! Payroll calculation orchestration.
//!
//! The [`PayrollEngine`] runs the three calculation stages for a single
//! employee and period, derives the net salary and the employer's total
//! cost, and upserts the resulting [`PayrollRecord`]. One call is a single
//! atomic unit of work: it reads a consistent YTD snapshot, computes, and
//! writes exactly one record.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::calculation::{
    PeriodAttendance, build_components, calculate_contributions, calculate_tax, round2,
};
use crate::config::{RateProvider, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeeContext, PayComponent, PayrollPeriod, PayrollRecord, RecordStatus, YtdSnapshot,
};
use crate::store::PayrollStore;

/// Everything needed to calculate one employee in one period.
#[derive(Debug, Clone)]
pub struct CalculationInput {
    /// The employee and their elections.
    pub employee: EmployeeContext,
    /// Attendance figures for the period.
    pub attendance: PeriodAttendance,
    /// Manual additional components (bonuses etc.).
    pub extra_components: Vec<PayComponent>,
}

impl CalculationInput {
    /// A full-attendance input with no extra components.
    pub fn full_month(employee: EmployeeContext, working_days: u32) -> Self {
        Self {
            employee,
            attendance: PeriodAttendance::full_month(working_days),
            extra_components: Vec::new(),
        }
    }
}

/// Orchestrates the per-employee payroll calculation.
///
/// The engine is cheap to share: it holds the rate provider and the record
/// store behind `Arc`s and is used concurrently by the batch processor.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use payroll_engine::config::RateConfigLoader;
/// use payroll_engine::engine::PayrollEngine;
/// use payroll_engine::store::InMemoryPayrollStore;
///
/// let rates = Arc::new(RateConfigLoader::load("./config/pl")?);
/// let store = Arc::new(InMemoryPayrollStore::new());
/// let engine = PayrollEngine::new(rates, store);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub struct PayrollEngine {
    rates: Arc<dyn RateProvider>,
    store: Arc<dyn PayrollStore>,
}

impl PayrollEngine {
    /// Creates an engine over the given rate provider and record store.
    pub fn new(rates: Arc<dyn RateProvider>, store: Arc<dyn PayrollStore>) -> Self {
        Self { rates, store }
    }

    /// Resolves the rate table for a period.
    ///
    /// The batch processor calls this up front so that a missing table
    /// aborts the whole batch before any employee is processed.
    pub fn rate_table(&self, period: &PayrollPeriod) -> EngineResult<RateTable> {
        self.rates.resolve(period.year, period.month)
    }

    /// Calculates one employee for one period and upserts the record.
    ///
    /// Steps: validate the period state and the contract, resolve the rate
    /// table, read the YTD snapshot of prior periods, build the gross
    /// breakdown, compute contributions and tax, derive net salary and
    /// employer cost, and write the record keyed by (period, employee).
    /// Recalculation overwrites a prior non-final record for the same key
    /// and is idempotent per input snapshot.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PeriodClosed`] when the period no longer accepts
    ///   calculation (fatal at the batch level).
    /// - [`EngineError::RatesNotConfigured`] when no rate table covers the
    ///   period (fatal at the batch level).
    /// - [`EngineError::NoActiveContract`] / [`EngineError::InvalidInput`]
    ///   for per-employee conditions.
    pub fn calculate(
        &self,
        input: &CalculationInput,
        period: &PayrollPeriod,
    ) -> EngineResult<PayrollRecord> {
        if !period.allows_recalculation() {
            return Err(EngineError::PeriodClosed {
                year: period.year,
                month: period.month,
                status: period.status.label().to_string(),
            });
        }
        if !input.employee.has_active_contract(period) {
            return Err(EngineError::NoActiveContract {
                employee_id: input.employee.employee_id.clone(),
            });
        }

        let rates = self.rate_table(period)?;
        let ytd = self
            .store
            .ytd_before(&input.employee.employee_id, period.year, period.month);

        let breakdown =
            build_components(&input.employee, &input.attendance, &input.extra_components)?;
        let contributions = calculate_contributions(
            breakdown.social_insurance_basis,
            &rates,
            ytd.social_insurance_basis,
        );
        let tax = calculate_tax(
            breakdown.taxable_basis,
            contributions.employee.total,
            &rates,
            ytd.tax_basis,
            input.employee.cost_of_revenue,
            input.employee.tax_relief,
        );

        let net_salary = round2(
            breakdown.total
                - contributions.employee.total
                - tax.health_contribution
                - tax.tax_advance,
        );
        let employer_total_cost = round2(breakdown.total + contributions.employer.total);

        let record = PayrollRecord {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            tenant_id: input.employee.tenant_id.clone(),
            employee_id: input.employee.employee_id.clone(),
            year: period.year,
            month: period.month,
            status: RecordStatus::Calculated,
            error_message: None,
            gross_salary: breakdown.total,
            components: breakdown.components,
            employee_zus: contributions.employee,
            employer_zus: contributions.employer,
            health_base: tax.health_base,
            health_contribution: tax.health_contribution,
            health_deductible: tax.health_deductible,
            tax_basis: tax.tax_basis,
            cost_of_revenue: tax.cost_of_revenue,
            relief_applied: tax.relief,
            tax_before_relief: tax.tax_before_relief,
            tax_advance: tax.tax_advance,
            net_salary,
            employer_total_cost,
            ceiling_applied: contributions.ceiling_applied,
            ytd: YtdSnapshot {
                gross: ytd.gross + breakdown.total,
                social_insurance_basis: contributions.new_ytd_basis,
                tax_basis: tax.new_ytd_tax_basis,
            },
        };

        self.store.upsert(record.clone());
        Ok(record)
    }

    /// Returns the record store the engine writes to.
    pub fn store(&self) -> &Arc<dyn PayrollStore> {
        &self.store
    }
}
