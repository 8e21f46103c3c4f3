//! pv-irr CLI
//!
//! Run PV project projections from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Project a request from a JSON file
//! pv-irr project --input request.json
//!
//! # Output as JSON, with solver overrides
//! pv-irr project --input request.json --format json --config solver.toml
//!
//! # Price the equipment alone
//! pv-irr equipment-cost --capacity 100 --price-per-kw 20000 --profit-rate 10 --development-fee 50000
//!
//! # Print a complete sample request
//! pv-irr sample > request.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use pv_irr_engine::config::SolverConfig;
use pv_irr_engine::core::equipment::EquipmentParams;
use pv_irr_engine::engine::ProjectionEngine;
use pv_irr_engine::request::ProjectionRequest;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "pv-irr",
    version,
    about = "PV project financing projection and IRR analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project income and cash-flow statements and compute IRRs
    Project {
        /// Path to a JSON projection request
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Optional TOML file with IRR solver settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compute the upfront equipment cost only
    EquipmentCost {
        /// Installed capacity in kW
        #[arg(long)]
        capacity: Decimal,

        /// Base price per kW
        #[arg(long)]
        price_per_kw: Decimal,

        /// Profit margin percentage, in [0, 100)
        #[arg(long)]
        profit_rate: Decimal,

        /// Development fee per kW
        #[arg(long, default_value_t = Decimal::ZERO)]
        development_fee: Decimal,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print a complete sample request as JSON
    Sample,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> SolverConfig {
    let Some(path) = path else {
        return SolverConfig::default();
    };
    SolverConfig::from_toml_file(path).unwrap_or_else(|e| {
        eprintln!("Error loading '{}': {}", path.display(), e);
        process::exit(1);
    })
}

fn load_request(path: &PathBuf) -> ProjectionRequest {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path.display(), e);
        process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Run `pv-irr sample` for a complete request.");
        process::exit(1);
    })
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_project(input: &PathBuf, format: Format, config: Option<&PathBuf>) {
    let engine = ProjectionEngine::new(load_config(config));
    let request = load_request(input);
    let response = engine.run(&request);

    match format {
        Format::Json => print_json(&response),
        Format::Text => print!("{}", response),
    }
    if !response.success {
        process::exit(1);
    }
}

fn cmd_equipment_cost(params: EquipmentParams, format: Format) {
    let response = ProjectionEngine::default().equipment_cost(&params);
    match format {
        Format::Json => print_json(&response),
        Format::Text => println!("{}", response),
    }
    if !response.success {
        process::exit(1);
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Project {
            input,
            format,
            config,
        } => cmd_project(&input, format, config.as_ref()),
        Command::EquipmentCost {
            capacity,
            price_per_kw,
            profit_rate,
            development_fee,
            format,
        } => cmd_equipment_cost(
            EquipmentParams::new(capacity, price_per_kw, profit_rate, development_fee),
            format,
        ),
        Command::Sample => print_json(&ProjectionRequest::sample()),
    }
}
