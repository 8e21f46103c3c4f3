use crate::core::error::{EngineResult, ProjectionError};
use crate::core::span::ProjectSpan;
use log::{debug, warn};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;

/// How the equipment purchase is financed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinancingSpec {
    /// Fully equity funded; no interest and no loan flows.
    NoInterest,
    /// A bank loan drawn in full in the first project year and repaid
    /// with equal yearly installments.
    BankLoan {
        /// Percentage of equipment cost borrowed, in `(0, 100]`.
        loan_ratio: Decimal,
        /// Annual interest rate as a percentage.
        bank_rate: Decimal,
        /// Number of yearly installments.
        repayment_period: u32,
    },
}

impl FinancingSpec {
    pub fn validate(&self) -> EngineResult<()> {
        let Self::BankLoan {
            loan_ratio,
            bank_rate,
            repayment_period,
        } = *self
        else {
            return Ok(());
        };
        if loan_ratio <= Decimal::ZERO || loan_ratio > dec!(100) {
            return Err(ProjectionError::invalid_parameter(
                "loan_ratio",
                format!("must be in (0, 100], got {loan_ratio}"),
            ));
        }
        if bank_rate <= Decimal::ZERO {
            return Err(ProjectionError::invalid_parameter(
                "bank_rate",
                format!("must be positive, got {bank_rate}"),
            ));
        }
        if repayment_period == 0 {
            return Err(ProjectionError::invalid_parameter(
                "repayment_period",
                "must be at least one year",
            ));
        }
        Ok(())
    }

    /// Amount borrowed against `equipment_cost`.
    pub fn principal(&self, equipment_cost: Decimal) -> Decimal {
        match self {
            Self::NoInterest => Decimal::ZERO,
            Self::BankLoan { loan_ratio, .. } => equipment_cost * *loan_ratio / dec!(100),
        }
    }
}

/// One year of a loan schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoanYear {
    /// Amount drawn this year (the full principal in year one).
    pub drawn: Decimal,
    /// Interest accrued on the opening balance.
    pub interest: Decimal,
    /// Principal repaid this year, as a positive amount.
    pub principal_repaid: Decimal,
    /// Outstanding balance at year end.
    pub balance: Decimal,
}

/// Year-by-year loan schedule over a project span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSchedule {
    principal: Decimal,
    years: Vec<LoanYear>,
}

impl LoanSchedule {
    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn years(&self) -> &[LoanYear] {
        &self.years
    }

    pub fn interest(&self) -> Vec<Decimal> {
        self.years.iter().map(|y| y.interest).collect()
    }

    /// Balance still outstanding at the end of the span. Non-zero only
    /// when the repayment period runs past the last project year.
    pub fn residual_balance(&self) -> Decimal {
        self.years.last().map(|y| y.balance).unwrap_or(Decimal::ZERO)
    }

    pub fn total_repaid(&self) -> Decimal {
        self.years.iter().map(|y| y.principal_repaid).sum()
    }
}

/// Build the loan schedule for `financing` over `span`.
///
/// Bank loans use equal total installments (annuity) at the yearly
/// `bank_rate`:
///
/// - `interest_k = balance_(k-1) * rate`
/// - `principal_k = installment - interest_k`
/// - `balance_k = balance_(k-1) - principal_k`
///
/// The last installment repays whatever balance remains so the schedule
/// closes at exactly zero. Years past the repayment period are zero. When
/// the period is longer than the span the schedule stops at the span end
/// and the outstanding balance is carried in the final year.
pub fn amortize(
    financing: &FinancingSpec,
    equipment_cost: Decimal,
    span: &ProjectSpan,
) -> EngineResult<LoanSchedule> {
    financing.validate()?;

    let FinancingSpec::BankLoan {
        bank_rate,
        repayment_period,
        ..
    } = *financing
    else {
        return Ok(LoanSchedule {
            principal: Decimal::ZERO,
            years: vec![LoanYear::default(); span.len()],
        });
    };

    let principal = financing.principal(equipment_cost);
    let rate = bank_rate / dec!(100);
    let installment = annuity_installment(principal, rate, repayment_period)?;
    debug!(
        "amortizing {} over {} years at {}%: installment {}",
        principal, repayment_period, bank_rate, installment
    );

    let mut years = Vec::with_capacity(span.len());
    let mut balance = principal;
    for k in 1..=span.len() {
        let drawn = if k == 1 { principal } else { Decimal::ZERO };
        if k > repayment_period as usize || balance.is_zero() {
            years.push(LoanYear {
                drawn,
                interest: Decimal::ZERO,
                principal_repaid: Decimal::ZERO,
                balance,
            });
            continue;
        }

        let interest = balance * rate;
        let principal_repaid = if k == repayment_period as usize {
            balance
        } else {
            (installment - interest).min(balance)
        };
        balance -= principal_repaid;
        years.push(LoanYear {
            drawn,
            interest,
            principal_repaid,
            balance,
        });
    }

    if balance > Decimal::ZERO {
        warn!(
            "repayment period of {} years exceeds {}-year span; residual balance {} carried",
            repayment_period,
            span.len(),
            balance
        );
    }

    Ok(LoanSchedule { principal, years })
}

/// Equal yearly payment repaying `principal` over `periods` years.
///
/// `P * r * (1+r)^n / ((1+r)^n - 1)`
fn annuity_installment(principal: Decimal, rate: Decimal, periods: u32) -> EngineResult<Decimal> {
    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| {
            ProjectionError::invalid_parameter(
                "repayment_period",
                format!("{periods} years at rate {rate} overflows the installment"),
            )
        })?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| {
            ProjectionError::invalid_parameter(
                "loan_ratio",
                format!("installment for principal {principal} overflows"),
            )
        })
}
