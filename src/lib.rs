//! # pv-irr-engine
//!
//! Financial projection engine for photovoltaic power projects.
//!
//! Given equipment pricing, yearly revenue and cost lines, a financing
//! choice, a tax rate and a shareholder distribution policy, this engine
//! builds the year-by-year income and cash-flow statements and computes
//! the project IRR under both the cost method and the equity method.
//!
//! ## Architecture
//!
//! - **core**: Foundational inputs: project span, equipment cost, line-item
//!   distribution, loan amortization, errors
//! - **statement**: Depreciation, income statement, cash-flow statement
//! - **irr**: Root finder and the cost/equity IRR series
//! - **request** / **response**: Wire types and boundary validation
//! - **engine**: The end-to-end projection pipeline

pub mod config;
pub mod core;
pub mod engine;
pub mod irr;
pub mod request;
pub mod response;
pub mod statement;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::SolverConfig;
    pub use crate::core::equipment::{equipment_cost, EquipmentParams};
    pub use crate::core::error::{EngineResult, ProjectionError};
    pub use crate::core::financing::FinancingSpec;
    pub use crate::core::line_item::LineItemSpec;
    pub use crate::core::span::ProjectSpan;
    pub use crate::engine::{Projection, ProjectionEngine};
    pub use crate::irr::solver::{solve_irr, IrrSolver};
    pub use crate::request::{InterestInput, LineItemInput, ProjectInputs, ProjectionRequest};
    pub use crate::response::{EquipmentCostResponse, ProjectionResponse};
    pub use crate::statement::cash_flow::CashFlowParams;
}
