//! Income-tax advance calculation.
//!
//! This stage computes the health-insurance contribution, the monthly tax
//! basis, the progressive-bracket tax and the final advance. The bracket an
//! amount falls into depends on the employee's cumulative year-to-date tax
//! basis, so a single period can straddle the threshold and be taxed partly
//! at each rate.
//!
//! Rounding order (fixed, encoded in the tests): the tax basis is rounded to
//! the whole złoty *before* the bracket split, and the tax-deductible health
//! portion is computed from the *unrounded* health base. The rounded basis
//! is also what is carried forward into the YTD tax basis, keeping per-period
//! and cumulative figures mutually consistent.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{CostOfRevenue, TaxRelief};

use super::rounding::{round2, round_zloty};

/// The result of the tax stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxResult {
    /// Health-insurance base (taxable gross minus employee ZUS total).
    pub health_base: Decimal,
    /// Health-insurance contribution.
    pub health_contribution: Decimal,
    /// The tax-deductible portion of the health contribution.
    pub health_deductible: Decimal,
    /// The cost-of-revenue amount deducted.
    pub cost_of_revenue: Decimal,
    /// The tax basis, rounded to the whole złoty.
    pub tax_basis: Decimal,
    /// Tax computed from the bracket(s), before relief and health deduction.
    pub tax_before_relief: Decimal,
    /// The relief amount applied.
    pub relief: Decimal,
    /// The final tax advance, rounded to the whole złoty, never negative.
    pub tax_advance: Decimal,
    /// The cumulative tax basis including this period.
    pub new_ytd_tax_basis: Decimal,
}

/// Computes the health insurance and income-tax advance for one period.
///
/// `taxable_gross` is the sum of taxable components; `employee_zus_total`
/// comes from the contribution stage; `ytd_tax_basis` is the cumulative tax
/// basis of prior periods and decides the bracket(s) for this period.
pub fn calculate_tax(
    taxable_gross: Decimal,
    employee_zus_total: Decimal,
    rates: &RateTable,
    ytd_tax_basis: Decimal,
    cost_election: CostOfRevenue,
    relief_election: TaxRelief,
) -> TaxResult {
    let health_base = taxable_gross - employee_zus_total;
    let health_contribution = round2(health_base * rates.health.rate);
    let health_deductible = round2(health_base * rates.health.deductible_rate);

    let cost_of_revenue = match cost_election {
        CostOfRevenue::Standard => rates.tax.cost_standard,
        CostOfRevenue::Elevated => rates.tax.cost_elevated,
        // 50% author's-rights costs, computed from the health base.
        CostOfRevenue::RightsBased => round2(health_base * Decimal::new(5, 1)),
    };

    let tax_basis = round_zloty((health_base - cost_of_revenue).max(Decimal::ZERO));

    let threshold = rates.tax.threshold;
    let tax_before_relief = if ytd_tax_basis >= threshold {
        round2(tax_basis * rates.tax.bracket2_rate)
    } else if ytd_tax_basis + tax_basis > threshold {
        let below = threshold - ytd_tax_basis;
        let above = tax_basis - below;
        round2(below * rates.tax.bracket1_rate + above * rates.tax.bracket2_rate)
    } else {
        round2(tax_basis * rates.tax.bracket1_rate)
    };

    let relief = match relief_election {
        TaxRelief::Full => rates.tax.monthly_relief,
        TaxRelief::Half => round2(rates.tax.monthly_relief / Decimal::from(2)),
        TaxRelief::None => Decimal::ZERO,
    };

    let tax_advance =
        round_zloty(tax_before_relief - health_deductible - relief).max(Decimal::ZERO);

    TaxResult {
        health_base,
        health_contribution,
        health_deductible,
        cost_of_revenue,
        tax_basis,
        tax_before_relief,
        relief,
        tax_advance,
        new_ytd_tax_basis: ytd_tax_basis + tax_basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmployeeZusRates, EmployerZusRates, HealthRates, TaxScale};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates() -> RateTable {
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

    /// TX-001: reference scenario, gross 15 000 with standard costs and
    /// full relief
    #[test]
    fn test_reference_scenario() {
        let result = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );

        assert_eq!(result.health_base, dec("12943.50"));
        assert_eq!(result.health_contribution, dec("1164.92"));
        assert_eq!(result.health_deductible, dec("1003.12"));
        assert_eq!(result.cost_of_revenue, dec("250"));
        // 12693.50 rounds half-up to 12694
        assert_eq!(result.tax_basis, dec("12694"));
        assert_eq!(result.tax_before_relief, dec("1523.28"));
        assert_eq!(result.relief, dec("300"));
        // round(1523.28 - 1003.12 - 300) = round(220.16) = 220
        assert_eq!(result.tax_advance, dec("220"));
        assert_eq!(result.new_ytd_tax_basis, dec("12694"));
    }

    /// TX-002: period straddling the bracket threshold is split
    #[test]
    fn test_threshold_crossing_splits_brackets() {
        let result = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            dec("115000"),
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );

        // basis 12694: 5000 below at 12% = 600, 7694 above at 32% = 2462.08
        assert_eq!(result.tax_before_relief, dec("3062.08"));
        // round(3062.08 - 1003.12 - 300) = 1759
        assert_eq!(result.tax_advance, dec("1759"));
        assert_eq!(result.new_ytd_tax_basis, dec("127694"));
    }

    /// TX-003: YTD already past the threshold taxes the whole period at
    /// the second rate
    #[test]
    fn test_entirely_in_second_bracket() {
        let result = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            dec("130000"),
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );

        // 12694 * 0.32 = 4062.08
        assert_eq!(result.tax_before_relief, dec("4062.08"));
    }

    /// TX-004: the split equals the sum of the two bracket computations
    #[test]
    fn test_split_equals_sum_of_bracket_parts() {
        let table = rates();
        let ytd = dec("115000");
        let result = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &table,
            ytd,
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );

        let below = table.tax.threshold - ytd;
        let above = result.tax_basis - below;
        let expected = round2(below * table.tax.bracket1_rate + above * table.tax.bracket2_rate);
        assert_eq!(result.tax_before_relief, expected);
        assert_ne!(
            result.tax_before_relief,
            round2(result.tax_basis * table.tax.bracket2_rate)
        );
        assert_ne!(
            result.tax_before_relief,
            round2(result.tax_basis * table.tax.bracket1_rate)
        );
    }

    /// TX-005: the advance never goes negative
    #[test]
    fn test_advance_clamped_at_zero() {
        // Small gross: relief plus deductible exceed the computed tax.
        let result = calculate_tax(
            dec("1000.00"),
            dec("137.10"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );

        assert_eq!(result.tax_advance, Decimal::ZERO);
    }

    /// TX-006: elevated and rights-based cost elections
    #[test]
    fn test_cost_of_revenue_elections() {
        let elevated = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Elevated,
            TaxRelief::Full,
        );
        assert_eq!(elevated.cost_of_revenue, dec("300"));
        // 12943.50 - 300 = 12643.50 -> 12644
        assert_eq!(elevated.tax_basis, dec("12644"));

        let rights = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::RightsBased,
            TaxRelief::Full,
        );
        assert_eq!(rights.cost_of_revenue, dec("6471.75"));
        // 12943.50 - 6471.75 = 6471.75 -> 6472
        assert_eq!(rights.tax_basis, dec("6472"));
    }

    /// TX-007: relief elections
    #[test]
    fn test_relief_elections() {
        let half = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::Half,
        );
        assert_eq!(half.relief, dec("150.00"));
        // round(1523.28 - 1003.12 - 150) = round(370.16) = 370
        assert_eq!(half.tax_advance, dec("370"));

        let none = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::None,
        );
        assert_eq!(none.relief, Decimal::ZERO);
        // round(1523.28 - 1003.12) = round(520.16) = 520
        assert_eq!(none.tax_advance, dec("520"));
    }

    #[test]
    fn test_tax_basis_clamped_at_zero() {
        // Gross below the cost deduction.
        let result = calculate_tax(
            dec("200.00"),
            dec("27.42"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::None,
        );
        assert_eq!(result.tax_basis, Decimal::ZERO);
        assert_eq!(result.tax_advance, Decimal::ZERO);
        assert_eq!(result.new_ytd_tax_basis, Decimal::ZERO);
    }

    #[test]
    fn test_ytd_carries_the_rounded_basis() {
        let first = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            Decimal::ZERO,
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );
        let second = calculate_tax(
            dec("15000.00"),
            dec("2056.50"),
            &rates(),
            first.new_ytd_tax_basis,
            CostOfRevenue::Standard,
            TaxRelief::Full,
        );
        assert_eq!(second.new_ytd_tax_basis, dec("25388"));
    }
}
