//! Income statement and cash-flow statement projection.

pub mod cash_flow;
pub mod depreciation;
pub mod income;
