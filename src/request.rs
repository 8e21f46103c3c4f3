//! Wire request types and their validation into engine inputs.
//!
//! The JSON shape tags each line item with a `mode` and carries the
//! matching payload in a sibling field (`yearly_data`, `range_data` or
//! `kw_based_data`); financing is a `no_interest` flag plus optional
//! `bank_loan_data`. Validation turns these into the exhaustive
//! [`LineItemSpec`] and [`FinancingSpec`] enums and rejects any
//! inconsistent combination.

use crate::core::equipment::EquipmentParams;
use crate::core::error::{EngineResult, ProjectionError};
use crate::core::financing::FinancingSpec;
use crate::core::line_item::LineItemSpec;
use crate::core::span::ProjectSpan;
use crate::statement::cash_flow::CashFlowParams;
use crate::statement::income::validate_tax_rate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemMode {
    Yearly,
    Range,
    KwBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyData {
    pub yearly_values: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeData {
    pub total_amount: Decimal,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KwBasedData {
    pub price_per_kw: Decimal,
    pub start_year: i32,
    pub end_year: i32,
}

/// A revenue or cost line as submitted: a mode plus the payload for that
/// mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub mode: LineItemMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_data: Option<YearlyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_data: Option<RangeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kw_based_data: Option<KwBasedData>,
}

impl LineItemInput {
    pub fn yearly(values: Vec<Decimal>) -> Self {
        Self {
            mode: LineItemMode::Yearly,
            yearly_data: Some(YearlyData {
                yearly_values: values,
            }),
            range_data: None,
            kw_based_data: None,
        }
    }

    pub fn range(total_amount: Decimal, start_year: i32, end_year: i32) -> Self {
        Self {
            mode: LineItemMode::Range,
            yearly_data: None,
            range_data: Some(RangeData {
                total_amount,
                start_year,
                end_year,
            }),
            kw_based_data: None,
        }
    }

    pub fn kw_based(price_per_kw: Decimal, start_year: i32, end_year: i32) -> Self {
        Self {
            mode: LineItemMode::KwBased,
            yearly_data: None,
            range_data: None,
            kw_based_data: Some(KwBasedData {
                price_per_kw,
                start_year,
                end_year,
            }),
        }
    }

    /// Convert into a [`LineItemSpec`]. Exactly the payload named by
    /// `mode` must be present.
    pub fn to_spec(&self, item: &str) -> EngineResult<LineItemSpec> {
        let populated = [
            ("yearly_data", self.yearly_data.is_some()),
            ("range_data", self.range_data.is_some()),
            ("kw_based_data", self.kw_based_data.is_some()),
        ];
        let expected = match self.mode {
            LineItemMode::Yearly => "yearly_data",
            LineItemMode::Range => "range_data",
            LineItemMode::KwBased => "kw_based_data",
        };
        if let Some((extra, _)) = populated
            .iter()
            .find(|(field, present)| *present && *field != expected)
        {
            return Err(ProjectionError::InvalidRequest(format!(
                "{item}: `{extra}` is not allowed in mode `{}`",
                mode_name(self.mode)
            )));
        }

        let missing = || {
            ProjectionError::InvalidRequest(format!(
                "{item}: mode `{}` requires `{expected}`",
                mode_name(self.mode)
            ))
        };
        let spec = match self.mode {
            LineItemMode::Yearly => {
                let data = self.yearly_data.as_ref().ok_or_else(missing)?;
                LineItemSpec::Yearly {
                    values: data.yearly_values.clone(),
                }
            }
            LineItemMode::Range => {
                let data = self.range_data.as_ref().ok_or_else(missing)?;
                LineItemSpec::RangeTotal {
                    total_amount: data.total_amount,
                    start_year: data.start_year,
                    end_year: data.end_year,
                }
            }
            LineItemMode::KwBased => {
                let data = self.kw_based_data.as_ref().ok_or_else(missing)?;
                LineItemSpec::CapacityBased {
                    price_per_kw: data.price_per_kw,
                    start_year: data.start_year,
                    end_year: data.end_year,
                }
            }
        };
        Ok(spec)
    }
}

fn mode_name(mode: LineItemMode) -> &'static str {
    match mode {
        LineItemMode::Yearly => "yearly",
        LineItemMode::Range => "range",
        LineItemMode::KwBased => "kw_based",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankLoanData {
    /// Percentage of equipment cost borrowed.
    pub loan_ratio: Decimal,
    /// Annual interest rate, percent.
    pub bank_rate: Decimal,
    /// Repayment period in years.
    pub repayment_period: u32,
}

/// Financing as submitted: the no-interest toggle plus loan terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestInput {
    #[serde(default)]
    pub no_interest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_loan_data: Option<BankLoanData>,
}

impl InterestInput {
    pub fn none() -> Self {
        Self {
            no_interest: true,
            bank_loan_data: None,
        }
    }

    pub fn bank_loan(loan_ratio: Decimal, bank_rate: Decimal, repayment_period: u32) -> Self {
        Self {
            no_interest: false,
            bank_loan_data: Some(BankLoanData {
                loan_ratio,
                bank_rate,
                repayment_period,
            }),
        }
    }

    pub fn to_spec(&self) -> EngineResult<FinancingSpec> {
        match (self.no_interest, self.bank_loan_data) {
            (true, None) => Ok(FinancingSpec::NoInterest),
            (true, Some(_)) => Err(ProjectionError::InvalidRequest(
                "interest: `bank_loan_data` is not allowed when `no_interest` is set".into(),
            )),
            (false, None) => Err(ProjectionError::InvalidRequest(
                "interest: `bank_loan_data` is required unless `no_interest` is set".into(),
            )),
            (false, Some(loan)) => {
                let spec = FinancingSpec::BankLoan {
                    loan_ratio: loan.loan_ratio,
                    bank_rate: loan.bank_rate,
                    repayment_period: loan.repayment_period,
                };
                spec.validate()?;
                Ok(spec)
            }
        }
    }
}

/// A projection request as submitted by the form layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub start_year: i32,
    pub end_year: i32,
    pub equipment_params: EquipmentParams,
    pub income: LineItemInput,
    pub interest: InterestInput,
    pub rent: LineItemInput,
    pub maintenance: LineItemInput,
    pub insurance: LineItemInput,
    pub recycling: LineItemInput,
    /// Income tax rate, percent.
    pub tax_rate: Decimal,
    pub cash_flow_params: CashFlowParams,
}

/// Validated engine inputs. Every field has passed range checks and
/// every line item carries exactly one distribution mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInputs {
    pub span: ProjectSpan,
    pub equipment: EquipmentParams,
    pub income: LineItemSpec,
    pub financing: FinancingSpec,
    pub rent: LineItemSpec,
    pub maintenance: LineItemSpec,
    pub insurance: LineItemSpec,
    pub recycling: LineItemSpec,
    pub tax_rate: Decimal,
    pub cash_flow_params: CashFlowParams,
}

impl ProjectionRequest {
    /// A complete 20-year, 100 kW request with a 70% bank loan.
    pub fn sample() -> Self {
        let (start_year, end_year) = (2025, 2044);
        let years = (end_year - start_year + 1) as usize;
        Self {
            start_year,
            end_year,
            equipment_params: EquipmentParams::new(
                Decimal::from(100),
                Decimal::from(20_000),
                Decimal::from(10),
                Decimal::from(50_000),
            ),
            income: LineItemInput::kw_based(Decimal::from(6_000), start_year, end_year),
            interest: InterestInput::bank_loan(Decimal::from(70), Decimal::new(25, 1), 10),
            rent: LineItemInput::range(Decimal::from(400_000), start_year, end_year),
            maintenance: LineItemInput::kw_based(Decimal::from(100), start_year + 1, end_year),
            insurance: LineItemInput::yearly(vec![Decimal::from(15_000); years]),
            recycling: LineItemInput::range(Decimal::from(150_000), end_year, end_year),
            tax_rate: Decimal::from(20),
            cash_flow_params: CashFlowParams {
                dividend_ratio: Decimal::new(6, 1),
                capital_reduction_period: 5,
            },
        }
    }

    /// Validate the request and convert it into [`ProjectInputs`].
    pub fn validate(&self) -> EngineResult<ProjectInputs> {
        let span = ProjectSpan::new(self.start_year, self.end_year)?;
        self.equipment_params.validate()?;
        validate_tax_rate(self.tax_rate)?;
        self.cash_flow_params.validate()?;

        Ok(ProjectInputs {
            span,
            equipment: self.equipment_params,
            income: self.income.to_spec("income")?,
            financing: self.interest.to_spec()?,
            rent: self.rent.to_spec("rent")?,
            maintenance: self.maintenance.to_spec("maintenance")?,
            insurance: self.insurance.to_spec("insurance")?,
            recycling: self.recycling.to_spec("recycling")?,
            tax_rate: self.tax_rate,
            cash_flow_params: self.cash_flow_params,
        })
    }
}

impl TryFrom<&ProjectionRequest> for ProjectInputs {
    type Error = ProjectionError;

    fn try_from(request: &ProjectionRequest) -> Result<Self, Self::Error> {
        request.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_request() -> ProjectionRequest {
        ProjectionRequest {
            start_year: 2025,
            end_year: 2027,
            equipment_params: EquipmentParams::new(dec!(100), dec!(20000), dec!(10), dec!(0)),
            income: LineItemInput::yearly(vec![dec!(1000), dec!(1000), dec!(1000)]),
            interest: InterestInput::none(),
            rent: LineItemInput::range(dec!(300), 2025, 2027),
            maintenance: LineItemInput::kw_based(dec!(5), 2025, 2027),
            insurance: LineItemInput::yearly(vec![Decimal::ZERO; 3]),
            recycling: LineItemInput::yearly(vec![Decimal::ZERO; 3]),
            tax_rate: dec!(20),
            cash_flow_params: CashFlowParams {
                dividend_ratio: dec!(0.5),
                capital_reduction_period: 5,
            },
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let inputs = base_request().validate().unwrap();
        assert_eq!(inputs.span.len(), 3);
        assert_eq!(inputs.financing, FinancingSpec::NoInterest);
        assert!(matches!(inputs.rent, LineItemSpec::RangeTotal { .. }));
        assert!(matches!(inputs.maintenance, LineItemSpec::CapacityBased { .. }));
    }

    #[test]
    fn test_missing_payload_rejected() {
        let mut request = base_request();
        request.rent.range_data = None;
        let err = request.validate().unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidRequest(msg) if msg.contains("range_data")));
    }

    #[test]
    fn test_conflicting_payloads_rejected() {
        let mut request = base_request();
        request.income.range_data = Some(RangeData {
            total_amount: dec!(10),
            start_year: 2025,
            end_year: 2026,
        });
        let err = request.validate().unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidRequest(msg) if msg.contains("income")));
    }

    #[test]
    fn test_interest_combinations() {
        let mut request = base_request();
        request.interest = InterestInput {
            no_interest: false,
            bank_loan_data: None,
        };
        assert!(request.validate().is_err());

        request.interest = InterestInput {
            no_interest: true,
            bank_loan_data: Some(BankLoanData {
                loan_ratio: dec!(70),
                bank_rate: dec!(3),
                repayment_period: 10,
            }),
        };
        assert!(request.validate().is_err());

        request.interest = InterestInput::bank_loan(dec!(70), dec!(3), 10);
        assert!(matches!(
            request.validate().unwrap().financing,
            FinancingSpec::BankLoan { repayment_period: 10, .. }
        ));
    }

    #[test]
    fn test_scalar_ranges_rejected() {
        let mut request = base_request();
        request.end_year = 2024;
        assert!(request.validate().is_err());

        let mut request = base_request();
        request.start_year = 1899;
        assert!(request.validate().is_err());

        let mut request = base_request();
        request.tax_rate = dec!(120);
        assert!(request.validate().is_err());

        let mut request = base_request();
        request.equipment_params.profit_rate = dec!(100);
        assert!(request.validate().is_err());

        let mut request = base_request();
        request.interest = InterestInput::bank_loan(dec!(70), dec!(0), 10);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_sample_is_valid() {
        let inputs = ProjectionRequest::sample().validate().unwrap();
        assert_eq!(inputs.span.len(), 20);
        assert!(matches!(inputs.financing, FinancingSpec::BankLoan { .. }));
    }

    #[test]
    fn test_parses_wire_json() {
        let json = r#"{
            "start_year": 2025,
            "end_year": 2026,
            "equipment_params": {"capacity": 100, "price_per_kw": 20000, "profit_rate": 10, "development_fee": 50000},
            "income": {"mode": "yearly", "yearly_data": {"yearly_values": [1000, 1000]}},
            "interest": {"no_interest": false, "bank_loan_data": {"loan_ratio": 70, "bank_rate": 2.5, "repayment_period": 10}},
            "rent": {"mode": "range", "range_data": {"total_amount": 300, "start_year": 2025, "end_year": 2026}},
            "maintenance": {"mode": "kw_based", "kw_based_data": {"price_per_kw": 12, "start_year": 2025, "end_year": 2026}},
            "insurance": {"mode": "yearly", "yearly_data": {"yearly_values": [0, 0]}},
            "recycling": {"mode": "yearly", "yearly_data": {"yearly_values": [0, 0]}},
            "tax_rate": 20,
            "cash_flow_params": {"dividend_ratio": 0.6, "capital_reduction_period": 5}
        }"#;
        let request: ProjectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.income.mode, LineItemMode::Yearly);
        assert_eq!(request.maintenance.mode, LineItemMode::KwBased);
        let inputs = ProjectInputs::try_from(&request).unwrap();
        assert_eq!(
            inputs.financing,
            FinancingSpec::BankLoan {
                loan_ratio: dec!(70),
                bank_rate: dec!(2.5),
                repayment_period: 10,
            }
        );
    }
}
