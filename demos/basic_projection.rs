//! All-equity projection example.
//!
//! Prices a 100 kW array, spreads revenue and costs over a 20-year span
//! and prints the statements with both IRRs.

use pv_irr_engine::engine::ProjectionEngine;
use pv_irr_engine::request::{InterestInput, LineItemInput, ProjectionRequest};
use rust_decimal_macros::dec;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  pv-irr-engine: All-Equity Projection      ║");
    println!("╚════════════════════════════════════════════╝\n");

    let engine = ProjectionEngine::default();

    // --- Step 1: Equipment pricing ---
    println!("━━━ Step 1: Equipment Cost ━━━\n");

    let mut request = ProjectionRequest::sample();
    let quote = engine.equipment_cost(&request.equipment_params);
    println!("Capacity:        {} kW", request.equipment_params.capacity);
    println!("Price per kW:    {}", request.equipment_params.price_per_kw);
    println!("Profit rate:     {}%", request.equipment_params.profit_rate);
    println!("Development fee: {} per kW", request.equipment_params.development_fee);
    println!("Equipment cost:  {}", quote);
    println!();

    // --- Step 2: Projection without debt ---
    println!("━━━ Step 2: 20-Year Projection (no loan) ━━━\n");

    request.interest = InterestInput::none();
    request.income = LineItemInput::kw_based(dec!(6000), 2025, 2044);
    request.recycling = LineItemInput::range(dec!(150000), 2044, 2044);

    let response = engine.run(&request);
    println!("{}", response);

    // Without debt the cost and equity series differ only by a zero
    // terminal element, so both methods agree.
    if let (Some(cost), Some(equity)) = (
        response.irr_analysis.cost_method_irr,
        response.irr_analysis.equity_method_irr,
    ) {
        println!("Cost vs equity IRR: {:.4}% / {:.4}%", cost, equity);
    }
}
