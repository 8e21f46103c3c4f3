use crate::irr::solver::IrrSolver;
use crate::statement::cash_flow::StatementRecord;
use crate::statement::income::{income_tax, YearRecord};
use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Cost-method and equity-method IRR series with their solved rates.
///
/// Rates are percentages; `None` means no rate zeroes the series' NPV.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IrrAnalysis {
    pub cost_method_cash_flows: Vec<Decimal>,
    pub cost_method_irr: Option<f64>,
    pub equity_method_cash_flows: Vec<Decimal>,
    pub equity_method_irr: Option<f64>,
}

/// Cost-method series: the full equipment cost up front, the cash each
/// year generates for all capital providers (operating cash flow plus
/// interest), and a terminal close-out settling any loan balance still
/// outstanding after the last project year.
pub fn cost_method_series(statement: &[StatementRecord], equipment_cost: Decimal) -> Vec<Decimal> {
    let residual = statement
        .last()
        .map(|r| r.loan_balance)
        .unwrap_or(Decimal::ZERO);

    let mut series = Vec::with_capacity(statement.len() + 2);
    series.push(negate(equipment_cost));
    series.extend(statement.iter().map(|r| r.cost_method_cash_flow));
    series.push(negate(residual));
    series
}

/// Equity-method series: the equity share of the equipment cost up
/// front, then each year's free cash flow to equity (operating cash flow
/// less principal repaid). One element shorter than the cost-method
/// series.
pub fn equity_method_series(
    statement: &[StatementRecord],
    equipment_cost: Decimal,
    loan_principal: Decimal,
) -> Vec<Decimal> {
    let mut series = Vec::with_capacity(statement.len() + 1);
    series.push(negate(equipment_cost - loan_principal));
    series.extend(statement.iter().map(|r| r.equity_method_cash_flow));
    series
}

/// Unlevered project series behind the headline IRR: the equipment cost
/// up front, then revenue less operating expenses and less the tax that
/// would be due without any interest deduction.
pub fn project_series(records: &[YearRecord], equipment_cost: Decimal, tax_rate: Decimal) -> Vec<Decimal> {
    let mut series = Vec::with_capacity(records.len() + 1);
    series.push(negate(equipment_cost));
    series.extend(records.iter().map(|r| {
        let before_tax = r.income - r.operating_expenses();
        before_tax - income_tax(before_tax - r.depreciation, tax_rate)
    }));
    series
}

impl IrrAnalysis {
    pub fn compute(
        solver: &IrrSolver,
        statement: &[StatementRecord],
        equipment_cost: Decimal,
        loan_principal: Decimal,
    ) -> Self {
        let cost_method_cash_flows = cost_method_series(statement, equipment_cost);
        let equity_method_cash_flows =
            equity_method_series(statement, equipment_cost, loan_principal);

        let cost_method_irr = solve_percent(solver, &cost_method_cash_flows);
        if cost_method_irr.is_none() {
            warn!("cost-method IRR could not be computed");
        }
        let equity_method_irr = solve_percent(solver, &equity_method_cash_flows);
        if equity_method_irr.is_none() {
            warn!("equity-method IRR could not be computed");
        }

        Self {
            cost_method_cash_flows,
            cost_method_irr,
            equity_method_cash_flows,
            equity_method_irr,
        }
    }
}

/// Solve a money series and report the rate as a percentage.
pub fn solve_percent(solver: &IrrSolver, series: &[Decimal]) -> Option<f64> {
    let flows: Option<Vec<f64>> = series.iter().map(|v| v.to_f64()).collect();
    solver.solve(&flows?).map(|rate| rate * 100.0)
}

/// Negation that keeps zero unsigned.
fn negate(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        -value
    }
}
