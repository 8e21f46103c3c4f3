use crate::core::error::{EngineResult, ProjectionError};
use crate::core::financing::LoanSchedule;
use crate::statement::income::YearRecord;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shareholder distribution policy for the cash-flow statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowParams {
    /// Fraction of each profitable year's after-tax profit paid as a
    /// cash dividend, in `[0, 1]`.
    pub dividend_ratio: Decimal,
    /// Every this many years, retained profit is returned to
    /// shareholders as a capital reduction.
    pub capital_reduction_period: u32,
}

impl CashFlowParams {
    pub fn validate(&self) -> EngineResult<()> {
        if self.dividend_ratio < Decimal::ZERO || self.dividend_ratio > Decimal::ONE {
            return Err(ProjectionError::invalid_parameter(
                "dividend_ratio",
                format!("must be in [0, 1], got {}", self.dividend_ratio),
            ));
        }
        if self.capital_reduction_period == 0 {
            return Err(ProjectionError::invalid_parameter(
                "capital_reduction_period",
                "must be at least one year",
            ));
        }
        Ok(())
    }

    fn is_reduction_year(&self, year_number: usize) -> bool {
        year_number % self.capital_reduction_period as usize == 0
    }
}

/// One year of the cash-flow statement.
///
/// Inflows are positive and outflows negative throughout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRecord {
    pub year: i32,

    // Operating activities
    pub aftertax_net_profit: Decimal,
    pub equipment_depreciation: Decimal,
    pub operating_cash_flow: Decimal,

    // Investing activities
    pub equipment_expenditure: Decimal,

    // Financing activities
    pub loan_financing: Decimal,
    pub loan_repayment: Decimal,
    pub cash_capital_increase: Decimal,
    pub cash_dividend: Decimal,
    pub capital_reduction: Decimal,

    pub net_cash_inflow: Decimal,
    pub opening_cash_flow: Decimal,
    pub closing_cash_flow: Decimal,

    /// This year's entry in the cost-method IRR series.
    pub cost_method_cash_flow: Decimal,
    /// This year's entry in the equity-method IRR series.
    pub equity_method_cash_flow: Decimal,

    pub loan_balance: Decimal,
}

impl StatementRecord {
    pub fn investing_cash_flow(&self) -> Decimal {
        self.equipment_expenditure
    }

    pub fn financing_cash_flow(&self) -> Decimal {
        self.loan_financing
            + self.loan_repayment
            + self.cash_capital_increase
            + self.cash_dividend
            + self.capital_reduction
    }
}

/// Build the cash-flow statement from the income statement and the loan
/// schedule.
///
/// The year loop carries two pieces of state: the opening cash balance
/// (zero in year one, the previous closing balance afterwards) and the
/// profit retained since the last capital reduction.
///
/// - Dividends pay out `dividend_ratio` of each profitable year.
/// - Every `capital_reduction_period` years the positive retained profit
///   is returned as a capital reduction and the accumulator resets. A
///   non-positive accumulator is carried forward.
/// - Whenever the year would otherwise close below zero, just enough
///   equity is injected as a cash capital increase to close at zero.
pub fn build_cash_flow_statement(
    records: &[YearRecord],
    loan: &LoanSchedule,
    equipment_cost: Decimal,
    params: &CashFlowParams,
) -> EngineResult<Vec<StatementRecord>> {
    params.validate()?;
    if loan.years().len() != records.len() {
        return Err(ProjectionError::shape_mismatch(
            "loan schedule",
            records.len(),
            loan.years().len(),
        ));
    }

    let mut statement = Vec::with_capacity(records.len());
    let mut opening = Decimal::ZERO;
    let mut retained = Decimal::ZERO;

    for (i, (record, loan_year)) in records.iter().zip(loan.years()).enumerate() {
        let profit = record.after_tax_cash_flow;
        let operating = profit + record.depreciation;
        let equipment_expenditure = if i == 0 {
            -equipment_cost
        } else {
            Decimal::ZERO
        };
        let loan_financing = loan_year.drawn;
        let loan_repayment = -loan_year.principal_repaid;

        let payout = profit * params.dividend_ratio;
        let cash_dividend = if payout > Decimal::ZERO {
            -payout
        } else {
            Decimal::ZERO
        };

        retained += profit + cash_dividend;
        let capital_reduction =
            if params.is_reduction_year(i + 1) && retained > Decimal::ZERO {
                let swept = -retained;
                retained = Decimal::ZERO;
                swept
            } else {
                Decimal::ZERO
            };

        let before_injection = opening
            + operating
            + equipment_expenditure
            + loan_financing
            + loan_repayment
            + cash_dividend
            + capital_reduction;
        let cash_capital_increase = if before_injection < Decimal::ZERO {
            -before_injection
        } else {
            Decimal::ZERO
        };

        let closing = before_injection + cash_capital_increase;
        let net_cash_inflow = closing - opening;

        statement.push(StatementRecord {
            year: record.year,
            aftertax_net_profit: profit,
            equipment_depreciation: record.depreciation,
            operating_cash_flow: operating,
            equipment_expenditure,
            loan_financing,
            loan_repayment,
            cash_capital_increase,
            cash_dividend,
            capital_reduction,
            net_cash_inflow,
            opening_cash_flow: opening,
            closing_cash_flow: closing,
            cost_method_cash_flow: operating + record.interest,
            equity_method_cash_flow: operating + loan_repayment,
            loan_balance: loan_year.balance,
        });
        opening = closing;
    }

    debug!(
        "cash-flow statement built for {} years, closing balance {}",
        statement.len(),
        opening
    );
    Ok(statement)
}
