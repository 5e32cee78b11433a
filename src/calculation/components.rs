//! Gross component assembly.
//!
//! This stage turns an employee's base salary and the period's attendance
//! figures into an ordered list of gross pay components: pro-rated base
//! salary, overtime, employer-paid sick pay, and any manual additions
//! (bonuses etc.). The component sums feed the contribution and tax stages.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeContext, PayComponent};

use super::rounding::round2;

/// Attendance figures for one employee in one period.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::PeriodAttendance;
///
/// // A full month with no overtime or sick leave.
/// let attendance = PeriodAttendance::full_month(21);
/// assert_eq!(attendance.worked_days, 21);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAttendance {
    /// The number of legal working days in the period.
    pub working_days: u32,
    /// The number of days the employee actually worked.
    pub worked_days: u32,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// The overtime rate multiplier (e.g. 1.5).
    pub overtime_multiplier: Decimal,
    /// Sick-leave days covered by the employer-paid 80% rate.
    pub sick_days: u32,
}

impl PeriodAttendance {
    /// Full attendance for a month with the given number of working days.
    pub fn full_month(working_days: u32) -> Self {
        Self {
            working_days,
            worked_days: working_days,
            overtime_hours: Decimal::ZERO,
            overtime_multiplier: Decimal::new(15, 1),
            sick_days: 0,
        }
    }
}

/// The assembled gross breakdown for one employee/period.
///
/// The basis sums honor the per-component inclusion flags: a manual addition
/// flagged out of the social-insurance basis contributes to `total` but not
/// to `social_insurance_basis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrossBreakdown {
    /// The ordered gross components.
    pub components: Vec<PayComponent>,
    /// Sum of all component amounts (the gross salary).
    pub total: Decimal,
    /// Sum of components included in the social-insurance basis.
    pub social_insurance_basis: Decimal,
    /// Sum of components included in the tax basis.
    pub taxable_basis: Decimal,
}

/// Assembles the gross components for one employee and period.
///
/// Rules:
/// - Base salary (scaled by the working-hours fraction) is pro-rated by
///   worked/working days when they differ, otherwise used verbatim.
/// - Overtime pays `hours x (base / (working days x 8)) x multiplier`.
/// - Employer-paid sick pay is `sick days x hourly rate x 8 x 0.8`; the
///   182-day lifetime cap is enforced by leave management, not here.
/// - Manual additions are appended verbatim with their own inclusion flags.
///
/// # Errors
///
/// Fails with [`EngineError::InvalidInput`] when working days is zero, when
/// worked days exceeds working days, or when an overtime figure is negative.
pub fn build_components(
    employee: &EmployeeContext,
    attendance: &PeriodAttendance,
    extras: &[PayComponent],
) -> EngineResult<GrossBreakdown> {
    if attendance.working_days == 0 {
        return Err(EngineError::InvalidInput {
            field: "working_days".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if attendance.worked_days > attendance.working_days {
        return Err(EngineError::InvalidInput {
            field: "worked_days".to_string(),
            message: format!(
                "{} exceeds the {} working days in the period",
                attendance.worked_days, attendance.working_days
            ),
        });
    }
    if attendance.overtime_hours < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "overtime_hours".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if attendance.overtime_hours > Decimal::ZERO
        && attendance.overtime_multiplier <= Decimal::ZERO
    {
        return Err(EngineError::InvalidInput {
            field: "overtime_multiplier".to_string(),
            message: "must be positive when overtime hours are present".to_string(),
        });
    }

    let mut components = Vec::new();

    let scaled_base = employee.gross_base_salary * employee.working_hours_fraction;
    let working_days = Decimal::from(attendance.working_days);
    let hourly_rate = scaled_base / (working_days * Decimal::from(8));

    // Base salary, pro-rated only when attendance differs.
    let base_amount = if attendance.worked_days == attendance.working_days {
        round2(scaled_base)
    } else {
        round2(scaled_base * Decimal::from(attendance.worked_days) / working_days)
    };
    components.push(PayComponent::new(
        "base_salary",
        "Wynagrodzenie zasadnicze",
        base_amount,
    ));

    if attendance.overtime_hours > Decimal::ZERO {
        let amount = round2(
            attendance.overtime_hours * hourly_rate * attendance.overtime_multiplier,
        );
        components.push(PayComponent::new(
            "overtime",
            "Wynagrodzenie za nadgodziny",
            amount,
        ));
    }

    if attendance.sick_days > 0 {
        // Employer-paid portion at the statutory 80% rate.
        let amount = round2(
            Decimal::from(attendance.sick_days)
                * hourly_rate
                * Decimal::from(8)
                * Decimal::new(8, 1),
        );
        components.push(PayComponent::new(
            "sick_pay",
            "Wynagrodzenie chorobowe",
            amount,
        ));
    }

    components.extend_from_slice(extras);

    let total: Decimal = components.iter().map(|c| c.amount).sum();
    let social_insurance_basis: Decimal = components
        .iter()
        .filter(|c| c.social_insurance)
        .map(|c| c.amount)
        .sum();
    let taxable_basis: Decimal = components
        .iter()
        .filter(|c| c.taxable)
        .map(|c| c.amount)
        .sum();

    Ok(GrossBreakdown {
        components,
        total,
        social_insurance_basis,
        taxable_basis,
    })
}
