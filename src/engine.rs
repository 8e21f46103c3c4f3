use crate::config::SolverConfig;
use crate::core::equipment::{format_amount, EquipmentParams};
use crate::core::error::EngineResult;
use crate::core::financing::{amortize, LoanSchedule};
use crate::core::line_item::distribute;
use crate::irr::analysis::{project_series, solve_percent, IrrAnalysis};
use crate::irr::solver::IrrSolver;
use crate::request::{ProjectInputs, ProjectionRequest};
use crate::response::{EquipmentCostResponse, ProjectionResponse};
use crate::statement::cash_flow::{build_cash_flow_statement, StatementRecord};
use crate::statement::depreciation::depreciate;
use crate::statement::income::{build_income_statement, IncomeLines, YearRecord};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;

/// Full output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub equipment_cost: Decimal,
    pub years: Vec<i32>,
    pub cash_flows: Vec<YearRecord>,
    pub cash_flow_statement: Vec<StatementRecord>,
    pub loan: LoanSchedule,
    pub irr_analysis: IrrAnalysis,
    /// Unlevered project IRR, percent.
    pub irr: Option<f64>,
}

/// Runs the projection pipeline: equipment cost, line-item distribution,
/// loan amortization, depreciation, income statement, cash-flow statement
/// and IRR analysis.
///
/// The engine is stateless apart from its solver settings; one instance
/// can serve any number of requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionEngine {
    solver: IrrSolver,
}

impl ProjectionEngine {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: IrrSolver::new(config),
        }
    }

    pub fn solver(&self) -> &IrrSolver {
        &self.solver
    }

    /// Project validated inputs. Any error is raised before a single
    /// derived record is returned.
    pub fn project(&self, inputs: &ProjectInputs) -> EngineResult<Projection> {
        let span = &inputs.span;
        let capacity = inputs.equipment.capacity;
        let equipment_cost = inputs.equipment.cost()?;
        debug!("projecting {} ({} years), equipment cost {}", span, span.len(), equipment_cost);

        debug!(
            "line items: income={} rent={} maintenance={} insurance={} recycling={}",
            inputs.income.mode(),
            inputs.rent.mode(),
            inputs.maintenance.mode(),
            inputs.insurance.mode(),
            inputs.recycling.mode()
        );
        let income = distribute("income", &inputs.income, span, capacity)?;
        let rent = distribute("rent", &inputs.rent, span, capacity)?;
        let maintenance = distribute("maintenance", &inputs.maintenance, span, capacity)?;
        let insurance = distribute("insurance", &inputs.insurance, span, capacity)?;
        let recycling = distribute("recycling", &inputs.recycling, span, capacity)?;

        let loan = amortize(&inputs.financing, equipment_cost, span)?;
        let interest = loan.interest();
        let depreciation = depreciate(equipment_cost, span);
        let years = span.years();

        let cash_flows = build_income_statement(
            &IncomeLines {
                years: &years,
                income: &income,
                depreciation: &depreciation,
                interest: &interest,
                rent: &rent,
                maintenance: &maintenance,
                insurance: &insurance,
                recycling: &recycling,
            },
            inputs.tax_rate,
        )?;
        let cash_flow_statement =
            build_cash_flow_statement(&cash_flows, &loan, equipment_cost, &inputs.cash_flow_params)?;

        let irr_analysis =
            IrrAnalysis::compute(&self.solver, &cash_flow_statement, equipment_cost, loan.principal());
        let irr = solve_percent(
            &self.solver,
            &project_series(&cash_flows, equipment_cost, inputs.tax_rate),
        );
        if irr.is_none() {
            warn!("project IRR could not be computed");
        }

        Ok(Projection {
            equipment_cost,
            years,
            cash_flows,
            cash_flow_statement,
            loan,
            irr_analysis,
            irr,
        })
    }

    /// Validate and project a wire request. Never fails: errors are
    /// reported in the response with empty derived arrays.
    pub fn run(&self, request: &ProjectionRequest) -> ProjectionResponse {
        match request.validate().and_then(|inputs| self.project(&inputs)) {
            Ok(projection) => ProjectionResponse::from(projection),
            Err(e) => {
                warn!("projection rejected: {}", e);
                ProjectionResponse::failure(&e)
            }
        }
    }

    /// Price the equipment alone.
    pub fn equipment_cost(&self, params: &EquipmentParams) -> EquipmentCostResponse {
        match params.cost() {
            Ok(cost) => EquipmentCostResponse {
                success: true,
                equipment_cost: cost,
                formatted_cost: format_amount(cost),
                error: None,
            },
            Err(e) => EquipmentCostResponse {
                success: false,
                equipment_cost: Decimal::ZERO,
                formatted_cost: String::new(),
                error: Some(e.to_string()),
            },
        }
    }
}
