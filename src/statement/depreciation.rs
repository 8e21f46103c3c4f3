use crate::core::span::ProjectSpan;
use rust_decimal::Decimal;

/// Straight-line depreciation of `equipment_cost` over every year of
/// `span`, with no salvage value.
pub fn depreciate(equipment_cost: Decimal, span: &ProjectSpan) -> Vec<Decimal> {
    let per_year = equipment_cost / Decimal::from(span.len() as u64);
    vec![per_year; span.len()]
}
