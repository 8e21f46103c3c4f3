use crate::core::error::{EngineResult, ProjectionError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Pricing inputs for the installed generation equipment.
///
/// `profit_rate` is a percentage in `[0, 100)` applied as a gross margin
/// on the per-kW price; `development_fee` is charged per kW on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentParams {
    /// Installed capacity in kW.
    pub capacity: Decimal,
    /// Base price per kW before margin.
    pub price_per_kw: Decimal,
    /// Margin percentage, strictly below 100.
    pub profit_rate: Decimal,
    /// Development fee per kW.
    pub development_fee: Decimal,
}

impl EquipmentParams {
    pub fn new(
        capacity: Decimal,
        price_per_kw: Decimal,
        profit_rate: Decimal,
        development_fee: Decimal,
    ) -> Self {
        Self {
            capacity,
            price_per_kw,
            profit_rate,
            development_fee,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.capacity <= Decimal::ZERO {
            return Err(ProjectionError::invalid_parameter(
                "capacity",
                format!("must be positive, got {}", self.capacity),
            ));
        }
        if self.price_per_kw <= Decimal::ZERO {
            return Err(ProjectionError::invalid_parameter(
                "price_per_kw",
                format!("must be positive, got {}", self.price_per_kw),
            ));
        }
        if self.profit_rate < Decimal::ZERO || self.profit_rate >= dec!(100) {
            return Err(ProjectionError::invalid_parameter(
                "profit_rate",
                format!("must be in [0, 100), got {}", self.profit_rate),
            ));
        }
        if self.development_fee < Decimal::ZERO {
            return Err(ProjectionError::invalid_parameter(
                "development_fee",
                format!("must not be negative, got {}", self.development_fee),
            ));
        }
        Ok(())
    }

    /// Total upfront equipment cost for these parameters.
    pub fn cost(&self) -> EngineResult<Decimal> {
        equipment_cost(
            self.capacity,
            self.price_per_kw,
            self.profit_rate,
            self.development_fee,
        )
    }
}

/// Upfront capital outlay for the project.
///
/// `((price_per_kw / (1 - profit_rate/100)) + development_fee) * capacity`
///
/// # Examples
///
/// ```
/// use pv_irr_engine::core::equipment::equipment_cost;
/// use rust_decimal_macros::dec;
///
/// let cost = equipment_cost(dec!(100), dec!(18000), dec!(10), dec!(0)).unwrap();
/// assert_eq!(cost, dec!(2_000_000));
/// ```
pub fn equipment_cost(
    capacity: Decimal,
    price_per_kw: Decimal,
    profit_rate: Decimal,
    development_fee: Decimal,
) -> EngineResult<Decimal> {
    EquipmentParams::new(capacity, price_per_kw, profit_rate, development_fee).validate()?;

    let margin = Decimal::ONE - profit_rate / dec!(100);
    price_per_kw
        .checked_div(margin)
        .and_then(|adjusted_price| adjusted_price.checked_add(development_fee))
        .and_then(|per_kw| per_kw.checked_mul(capacity))
        .ok_or_else(|| {
            ProjectionError::invalid_parameter(
                "capacity",
                format!("{capacity} kW at {price_per_kw} per kW overflows the equipment cost"),
            )
        })
}

/// Format a currency amount rounded to whole units with thousands separators.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < Decimal::ZERO {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal::prelude::ToPrimitive;

    #[test]
    fn test_reference_scenario() {
        let cost = equipment_cost(dec!(100), dec!(20000), dec!(10), dec!(50000)).unwrap();
        assert_relative_eq!(cost.to_f64().unwrap(), 7_222_222.222_222, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_margin() {
        let cost = equipment_cost(dec!(50), dec!(30000), dec!(0), dec!(1000)).unwrap();
        assert_eq!(cost, dec!(1_550_000));
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        let err = equipment_cost(dec!(0), dec!(20000), dec!(10), dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidParameter { name: "capacity", .. }
        ));
    }

    #[test]
    fn test_rejects_full_margin() {
        assert!(equipment_cost(dec!(100), dec!(20000), dec!(100), dec!(0)).is_err());
        assert!(equipment_cost(dec!(100), dec!(20000), dec!(-1), dec!(0)).is_err());
    }

    #[test]
    fn test_rejects_negative_price() {
        assert!(equipment_cost(dec!(100), dec!(-5), dec!(10), dec!(0)).is_err());
    }

    #[test]
    fn test_overflowing_cost_is_an_error() {
        let err = equipment_cost(dec!(1e15), dec!(1e15), dec!(10), dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidParameter { name: "capacity", .. }
        ));
        // The margin division alone can overflow near the Decimal ceiling.
        assert!(equipment_cost(dec!(1), Decimal::MAX, dec!(50), dec!(0)).is_err());
    }

    #[test]
    fn test_params_cost_matches_function() {
        let params = EquipmentParams::new(dec!(100), dec!(20000), dec!(10), dec!(50000));
        assert_eq!(
            params.cost().unwrap(),
            equipment_cost(dec!(100), dec!(20000), dec!(10), dec!(50000)).unwrap()
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(7222222.22)), "7,222,222");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1,000");
        assert_eq!(format_amount(dec!(-1234567.6)), "-1,234,568");
        assert_eq!(format_amount(Decimal::ZERO), "0");
    }
}
