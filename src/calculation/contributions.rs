//! ZUS social-insurance contribution calculation.
//!
//! Retirement and disability contributions (both sides) are computed on a
//! basis capped by the annual ceiling (roczna podstawa wymiaru); sickness,
//! accident, Labor Fund and FGŚP contributions always use the full basis.
//! Each line item is rounded to the grosz individually and the totals are
//! sums of the rounded lines, matching statutory practice.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{EmployeeContributions, EmployerContributions};

use super::rounding::round2;

/// The result of the contribution stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionResult {
    /// Employee-side contribution breakdown.
    pub employee: EmployeeContributions,
    /// Employer-side contribution breakdown.
    pub employer: EmployerContributions,
    /// The cumulative ceiling-capped basis including this period. This is
    /// what determines ceiling exhaustion in future periods.
    pub new_ytd_basis: Decimal,
    /// Whether the ceiling limited the retirement/disability basis this
    /// period.
    pub ceiling_applied: bool,
}

/// Computes both sides of the ZUS contributions for one period.
///
/// `basis` is the period's social-insurance basis (gross, minus any
/// components flagged out of it); `ytd_basis` is the cumulative capped basis
/// from prior periods of the year.
///
/// Once the remaining ceiling reaches zero the capped basis is zero for all
/// later periods of the year: retirement and disability drop to zero while
/// sickness, accident, Labor Fund and FGŚP continue on the full basis.
pub fn calculate_contributions(
    basis: Decimal,
    rates: &RateTable,
    ytd_basis: Decimal,
) -> ContributionResult {
    let remaining_ceiling = (rates.annual_ceiling - ytd_basis).max(Decimal::ZERO);
    let capped_basis = basis.min(remaining_ceiling);
    let ceiling_applied = remaining_ceiling < basis;

    let emp_retirement = round2(capped_basis * rates.employee_zus.retirement);
    let emp_disability = round2(capped_basis * rates.employee_zus.disability);
    let emp_sickness = round2(basis * rates.employee_zus.sickness);
    let employee = EmployeeContributions {
        retirement: emp_retirement,
        disability: emp_disability,
        sickness: emp_sickness,
        total: emp_retirement + emp_disability + emp_sickness,
    };

    let er_retirement = round2(capped_basis * rates.employer_zus.retirement);
    let er_disability = round2(capped_basis * rates.employer_zus.disability);
    let er_accident = round2(basis * rates.employer_zus.accident);
    let er_labor_fund = round2(basis * rates.employer_zus.labor_fund);
    let er_guaranteed = round2(basis * rates.employer_zus.guaranteed_fund);
    let employer = EmployerContributions {
        retirement: er_retirement,
        disability: er_disability,
        accident: er_accident,
        labor_fund: er_labor_fund,
        guaranteed_fund: er_guaranteed,
        total: er_retirement + er_disability + er_accident + er_labor_fund + er_guaranteed,
    };

    ContributionResult {
        employee,
        employer,
        new_ytd_basis: ytd_basis + capped_basis,
        ceiling_applied,
    }
}
