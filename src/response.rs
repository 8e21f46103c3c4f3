//! Wire responses and the plain-text report.

use crate::core::equipment::format_amount;
use crate::core::error::ProjectionError;
use crate::engine::Projection;
use crate::irr::analysis::IrrAnalysis;
use crate::statement::cash_flow::StatementRecord;
use crate::statement::income::YearRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Result of a projection request.
///
/// On failure `success` is false, `error` carries the message and every
/// derived array is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResponse {
    pub success: bool,
    /// Unlevered project IRR, percent.
    pub irr: Option<f64>,
    pub equipment_cost: Decimal,
    pub years: Vec<i32>,
    pub cash_flows: Vec<YearRecord>,
    pub cash_flow_statement: Vec<StatementRecord>,
    pub irr_analysis: IrrAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectionResponse {
    pub fn failure(error: &ProjectionError) -> Self {
        Self {
            success: false,
            irr: None,
            equipment_cost: Decimal::ZERO,
            years: Vec::new(),
            cash_flows: Vec::new(),
            cash_flow_statement: Vec::new(),
            irr_analysis: IrrAnalysis::default(),
            error: Some(error.to_string()),
        }
    }
}

impl From<Projection> for ProjectionResponse {
    fn from(projection: Projection) -> Self {
        Self {
            success: true,
            irr: projection.irr,
            equipment_cost: projection.equipment_cost,
            years: projection.years,
            cash_flows: projection.cash_flows,
            cash_flow_statement: projection.cash_flow_statement,
            irr_analysis: projection.irr_analysis,
            error: None,
        }
    }
}

/// Result of the equipment-cost-only operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentCostResponse {
    pub success: bool,
    pub equipment_cost: Decimal,
    /// Cost rounded to whole units with thousands separators.
    pub formatted_cost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Rate(Option<f64>);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rate) => write!(f, "{rate:.2}%"),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for ProjectionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Projection Result ===")?;
        if let Some(error) = &self.error {
            writeln!(f, "Error:          {}", error)?;
            return Ok(());
        }
        writeln!(f, "Equipment Cost: {}", format_amount(self.equipment_cost))?;
        if let (Some(first), Some(last)) = (self.years.first(), self.years.last()) {
            writeln!(f, "Years:          {}-{} ({})", first, last, self.years.len())?;
        }
        writeln!(f, "Project IRR:    {}", Rate(self.irr))?;
        writeln!(f, "Cost IRR:       {}", Rate(self.irr_analysis.cost_method_irr))?;
        writeln!(f, "Equity IRR:     {}", Rate(self.irr_analysis.equity_method_irr))?;

        writeln!(f, "\n--- Income Statement ---")?;
        writeln!(
            f,
            "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "Year", "Income", "Interest", "Pre-tax", "Tax", "After-tax"
        )?;
        for r in &self.cash_flows {
            writeln!(
                f,
                "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
                r.year,
                format_amount(r.income),
                format_amount(r.interest),
                format_amount(r.net_cash_flow),
                format_amount(r.tax_amount),
                format_amount(r.after_tax_cash_flow),
            )?;
        }

        writeln!(f, "\n--- Cash Flow Statement ---")?;
        writeln!(
            f,
            "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "Year", "Operating", "Investing", "Financing", "Net", "Closing"
        )?;
        for r in &self.cash_flow_statement {
            writeln!(
                f,
                "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
                r.year,
                format_amount(r.operating_cash_flow),
                format_amount(r.investing_cash_flow()),
                format_amount(r.financing_cash_flow()),
                format_amount(r.net_cash_inflow),
                format_amount(r.closing_cash_flow),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for EquipmentCostResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "Error: {}", error),
            None => write!(f, "Equipment Cost: {}", self.formatted_cost),
        }
    }
}
