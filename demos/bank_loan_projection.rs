//! Leveraged projection example.
//!
//! Runs the same project with increasing loan ratios to show how bank
//! financing moves the equity-method IRR away from the cost-method IRR.

use pv_irr_engine::engine::ProjectionEngine;
use pv_irr_engine::request::{InterestInput, ProjectionRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fmt_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r))
        .unwrap_or_else(|| "n/a".to_string())
}

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  pv-irr-engine: Bank Loan Sensitivity      ║");
    println!("╚════════════════════════════════════════════╝\n");

    let engine = ProjectionEngine::default();
    let base = ProjectionRequest::sample();

    println!(
        "  {:>10} {:>10} {:>12} {:>12} {:>12}",
        "Loan %", "Rate %", "Project", "Cost", "Equity"
    );
    for (ratio, rate) in [
        (None, Decimal::ZERO),
        (Some(dec!(40)), dec!(2.5)),
        (Some(dec!(70)), dec!(2.5)),
        (Some(dec!(70)), dec!(6)),
        (Some(dec!(90)), dec!(2.5)),
    ] {
        let mut request = base.clone();
        request.interest = match ratio {
            Some(ratio) => InterestInput::bank_loan(ratio, rate, 10),
            None => InterestInput::none(),
        };

        let response = engine.run(&request);
        if !response.success {
            println!("  rejected: {}", response.error.unwrap_or_default());
            continue;
        }
        println!(
            "  {:>10} {:>10} {:>12} {:>12} {:>12}",
            ratio.unwrap_or(Decimal::ZERO),
            rate,
            fmt_rate(response.irr),
            fmt_rate(response.irr_analysis.cost_method_irr),
            fmt_rate(response.irr_analysis.equity_method_irr),
        );
    }

    // --- Loan outliving the project ---
    println!("\n━━━ Repayment period longer than the project ━━━\n");

    let mut request = base;
    request.interest = InterestInput::bank_loan(dec!(70), dec!(2.5), 30);
    let response = engine.run(&request);
    if let Some(last) = response.cash_flow_statement.last() {
        println!("Balance outstanding after {}: {}", last.year, last.loan_balance.round_dp(2));
    }
    if let Some(terminal) = response.irr_analysis.cost_method_cash_flows.last() {
        println!("Cost-method terminal settlement: {}", terminal.round_dp(2));
    }
}
