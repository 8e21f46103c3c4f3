use crate::core::error::{EngineResult, ProjectionError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One year of the projected income statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    pub year: i32,
    /// Electricity sales revenue.
    pub income: Decimal,
    pub depreciation: Decimal,
    pub interest: Decimal,
    pub rent: Decimal,
    pub maintenance: Decimal,
    pub insurance: Decimal,
    /// Module recycling provision.
    pub recycling: Decimal,
    /// Pre-tax net profit.
    pub net_cash_flow: Decimal,
    pub tax_amount: Decimal,
    /// After-tax net profit.
    pub after_tax_cash_flow: Decimal,
}

impl YearRecord {
    /// Operating expenses other than depreciation and interest.
    pub fn operating_expenses(&self) -> Decimal {
        self.rent + self.maintenance + self.insurance + self.recycling
    }
}

/// Per-year arrays feeding the income statement. Every array must have
/// one entry per element of `years`.
#[derive(Debug, Clone, Copy)]
pub struct IncomeLines<'a> {
    pub years: &'a [i32],
    pub income: &'a [Decimal],
    pub depreciation: &'a [Decimal],
    pub interest: &'a [Decimal],
    pub rent: &'a [Decimal],
    pub maintenance: &'a [Decimal],
    pub insurance: &'a [Decimal],
    pub recycling: &'a [Decimal],
}

impl IncomeLines<'_> {
    fn check_shape(&self) -> EngineResult<()> {
        let expected = self.years.len();
        let lines = [
            ("income", self.income),
            ("depreciation", self.depreciation),
            ("interest", self.interest),
            ("rent", self.rent),
            ("maintenance", self.maintenance),
            ("insurance", self.insurance),
            ("recycling", self.recycling),
        ];
        for (name, values) in lines {
            if values.len() != expected {
                return Err(ProjectionError::shape_mismatch(name, expected, values.len()));
            }
        }
        Ok(())
    }
}

/// Income tax on a profit figure. Losses yield zero tax with no
/// carry-forward.
pub fn income_tax(profit: Decimal, tax_rate: Decimal) -> Decimal {
    profit.max(Decimal::ZERO) * tax_rate / dec!(100)
}

pub fn validate_tax_rate(tax_rate: Decimal) -> EngineResult<()> {
    if tax_rate < Decimal::ZERO || tax_rate > dec!(100) {
        return Err(ProjectionError::invalid_parameter(
            "tax_rate",
            format!("must be in [0, 100], got {tax_rate}"),
        ));
    }
    Ok(())
}

/// Build the income statement, one [`YearRecord`] per year.
///
/// `pretax = income - depreciation - interest - rent - maintenance
/// - insurance - recycling`, taxed at `tax_rate` percent when positive.
pub fn build_income_statement(
    lines: &IncomeLines<'_>,
    tax_rate: Decimal,
) -> EngineResult<Vec<YearRecord>> {
    validate_tax_rate(tax_rate)?;
    lines.check_shape()?;

    let records = (0..lines.years.len())
        .map(|i| {
            let pretax = lines.income[i]
                - lines.depreciation[i]
                - lines.interest[i]
                - lines.rent[i]
                - lines.maintenance[i]
                - lines.insurance[i]
                - lines.recycling[i];
            let tax = income_tax(pretax, tax_rate);
            YearRecord {
                year: lines.years[i],
                income: lines.income[i],
                depreciation: lines.depreciation[i],
                interest: lines.interest[i],
                rent: lines.rent[i],
                maintenance: lines.maintenance[i],
                insurance: lines.insurance[i],
                recycling: lines.recycling[i],
                net_cash_flow: pretax,
                tax_amount: tax,
                after_tax_cash_flow: pretax - tax,
            }
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(n: usize) -> Vec<Decimal> {
        vec![Decimal::ZERO; n]
    }

    #[test]
    fn test_untaxed_income_passes_through() {
        let years = [2025, 2026];
        let income = [dec!(1000), dec!(1000)];
        let z = zeros(2);
        let lines = IncomeLines {
            years: &years,
            income: &income,
            depreciation: &z,
            interest: &z,
            rent: &z,
            maintenance: &z,
            insurance: &z,
            recycling: &z,
        };
        let records = build_income_statement(&lines, Decimal::ZERO).unwrap();
        let after_tax: Vec<_> = records.iter().map(|r| r.after_tax_cash_flow).collect();
        assert_eq!(after_tax, vec![dec!(1000), dec!(1000)]);
    }

    #[test]
    fn test_profit_and_loss_years() {
        let years = [2025, 2026];
        let income = [dec!(1000), dec!(100)];
        let depreciation = [dec!(200), dec!(200)];
        let interest = [dec!(50), dec!(0)];
        let rent = [dec!(50), dec!(50)];
        let z = zeros(2);
        let lines = IncomeLines {
            years: &years,
            income: &income,
            depreciation: &depreciation,
            interest: &interest,
            rent: &rent,
            maintenance: &z,
            insurance: &z,
            recycling: &z,
        };
        let records = build_income_statement(&lines, dec!(20)).unwrap();

        assert_eq!(records[0].net_cash_flow, dec!(700));
        assert_eq!(records[0].tax_amount, dec!(140));
        assert_eq!(records[0].after_tax_cash_flow, dec!(560));

        // Loss year: no tax refund
        assert_eq!(records[1].net_cash_flow, dec!(-150));
        assert_eq!(records[1].tax_amount, Decimal::ZERO);
        assert_eq!(records[1].after_tax_cash_flow, dec!(-150));
    }

    #[test]
    fn test_shape_mismatch() {
        let years = [2025, 2026];
        let income = [dec!(1000)];
        let z = zeros(2);
        let lines = IncomeLines {
            years: &years,
            income: &income,
            depreciation: &z,
            interest: &z,
            rent: &z,
            maintenance: &z,
            insurance: &z,
            recycling: &z,
        };
        let err = build_income_statement(&lines, Decimal::ZERO).unwrap_err();
        assert_eq!(err, ProjectionError::shape_mismatch("income", 2, 1));
    }

    #[test]
    fn test_rejects_tax_rate_out_of_range() {
        assert!(validate_tax_rate(dec!(-1)).is_err());
        assert!(validate_tax_rate(dec!(100.5)).is_err());
        assert!(validate_tax_rate(dec!(20)).is_ok());
    }
}
