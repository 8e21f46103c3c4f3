use crate::core::error::{EngineResult, ProjectionError};
use crate::core::span::ProjectSpan;
use rust_decimal::Decimal;

/// How a revenue or cost line is spread over the projection years.
///
/// Applies to income, rent, maintenance, insurance and module recycling.
/// Each variant is expanded into an explicit per-year array by
/// [`distribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemSpec {
    /// One explicit value per project year.
    Yearly { values: Vec<Decimal> },
    /// A total amount spread evenly over an inclusive year range.
    RangeTotal {
        total_amount: Decimal,
        start_year: i32,
        end_year: i32,
    },
    /// A per-kW price charged every year of an inclusive year range.
    CapacityBased {
        price_per_kw: Decimal,
        start_year: i32,
        end_year: i32,
    },
}

impl LineItemSpec {
    /// A line item that is zero in every year of `span`.
    pub fn zero(span: &ProjectSpan) -> Self {
        Self::Yearly {
            values: vec![Decimal::ZERO; span.len()],
        }
    }

    /// Short mode label used in messages.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Yearly { .. } => "yearly",
            Self::RangeTotal { .. } => "range",
            Self::CapacityBased { .. } => "kw_based",
        }
    }
}

/// Expand a line item into one value per project year.
///
/// `item` names the line in error messages. `capacity` is the installed
/// capacity in kW, used only by [`LineItemSpec::CapacityBased`].
///
/// Sub-ranges are clamped to the span; years outside the clamped range
/// are zero.
///
/// # Examples
///
/// ```
/// use pv_irr_engine::core::line_item::{distribute, LineItemSpec};
/// use pv_irr_engine::core::span::ProjectSpan;
/// use rust_decimal_macros::dec;
///
/// let span = ProjectSpan::new(2025, 2027).unwrap();
/// let spec = LineItemSpec::RangeTotal {
///     total_amount: dec!(300),
///     start_year: 2025,
///     end_year: 2027,
/// };
/// let values = distribute("rent", &spec, &span, dec!(100)).unwrap();
/// assert_eq!(values, vec![dec!(100), dec!(100), dec!(100)]);
/// ```
pub fn distribute(
    item: &str,
    spec: &LineItemSpec,
    span: &ProjectSpan,
    capacity: Decimal,
) -> EngineResult<Vec<Decimal>> {
    match spec {
        LineItemSpec::Yearly { values } => {
            if values.len() != span.len() {
                return Err(ProjectionError::shape_mismatch(
                    item,
                    span.len(),
                    values.len(),
                ));
            }
            Ok(values.clone())
        }
        LineItemSpec::RangeTotal {
            total_amount,
            start_year,
            end_year,
        } => {
            let (first, last) = clamp_range(item, *start_year, *end_year, span)?;
            let covered = (last - first + 1).max(1);
            let per_year = *total_amount / Decimal::from(covered);
            Ok(fill(span, first, last, per_year))
        }
        LineItemSpec::CapacityBased {
            price_per_kw,
            start_year,
            end_year,
        } => {
            let (first, last) = clamp_range(item, *start_year, *end_year, span)?;
            let per_year = price_per_kw.checked_mul(capacity).ok_or_else(|| {
                ProjectionError::invalid_parameter(
                    "price_per_kw",
                    format!("{item}: {price_per_kw} per kW over {capacity} kW overflows"),
                )
            })?;
            Ok(fill(span, first, last, per_year))
        }
    }
}

/// Intersect a sub-range with the span. The result may be empty
/// (`first > last`) when the range lies entirely outside the span.
fn clamp_range(
    item: &str,
    start_year: i32,
    end_year: i32,
    span: &ProjectSpan,
) -> EngineResult<(i32, i32)> {
    if start_year > end_year {
        return Err(ProjectionError::InvalidRange {
            item: item.to_string(),
            start_year,
            end_year,
        });
    }
    Ok((
        start_year.max(span.start_year()),
        end_year.min(span.end_year()),
    ))
}

fn fill(span: &ProjectSpan, first: i32, last: i32, value: Decimal) -> Vec<Decimal> {
    let mut values = vec![Decimal::ZERO; span.len()];
    if let (Some(from), Some(to)) = (span.index_of(first), span.index_of(last)) {
        if from <= to {
            values[from..=to].fill(value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn span() -> ProjectSpan {
        ProjectSpan::new(2025, 2029).unwrap()
    }

    #[test]
    fn test_yearly_pass_through() {
        let spec = LineItemSpec::Yearly {
            values: vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)],
        };
        let values = distribute("income", &spec, &span(), dec!(10)).unwrap();
        assert_eq!(values, vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)]);
    }

    #[test]
    fn test_yearly_length_mismatch() {
        let spec = LineItemSpec::Yearly {
            values: vec![dec!(1), dec!(2)],
        };
        let err = distribute("income", &spec, &span(), dec!(10)).unwrap_err();
        assert_eq!(err, ProjectionError::shape_mismatch("income", 5, 2));
    }

    #[test]
    fn test_range_total_inside_span() {
        let spec = LineItemSpec::RangeTotal {
            total_amount: dec!(900),
            start_year: 2026,
            end_year: 2028,
        };
        let values = distribute("maintenance", &spec, &span(), dec!(10)).unwrap();
        assert_eq!(
            values,
            vec![dec!(0), dec!(300), dec!(300), dec!(300), dec!(0)]
        );
    }

    #[test]
    fn test_range_total_clamped_to_span() {
        let spec = LineItemSpec::RangeTotal {
            total_amount: dec!(200),
            start_year: 2020,
            end_year: 2026,
        };
        let values = distribute("rent", &spec, &span(), dec!(10)).unwrap();
        assert_eq!(values, vec![dec!(100), dec!(100), dec!(0), dec!(0), dec!(0)]);
    }

    #[test]
    fn test_range_outside_span_is_zero() {
        let spec = LineItemSpec::RangeTotal {
            total_amount: dec!(500),
            start_year: 2040,
            end_year: 2045,
        };
        let values = distribute("rent", &spec, &span(), dec!(10)).unwrap();
        assert!(values.iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_range_reversed_is_invalid() {
        let spec = LineItemSpec::RangeTotal {
            total_amount: dec!(500),
            start_year: 2028,
            end_year: 2026,
        };
        let err = distribute("insurance", &spec, &span(), dec!(10)).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidRange { .. }));
    }

    #[test]
    fn test_capacity_based() {
        let spec = LineItemSpec::CapacityBased {
            price_per_kw: dec!(250),
            start_year: 2027,
            end_year: 2029,
        };
        let values = distribute("recycling", &spec, &span(), dec!(100)).unwrap();
        assert_eq!(
            values,
            vec![dec!(0), dec!(0), dec!(25000), dec!(25000), dec!(25000)]
        );
    }

    #[test]
    fn test_capacity_based_reversed_is_invalid() {
        let spec = LineItemSpec::CapacityBased {
            price_per_kw: dec!(250),
            start_year: 2029,
            end_year: 2027,
        };
        let err = distribute("recycling", &spec, &span(), dec!(100)).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidRange { start_year: 2029, end_year: 2027, .. }
        ));
    }

    #[test]
    fn test_capacity_based_overflow_is_an_error() {
        let spec = LineItemSpec::CapacityBased {
            price_per_kw: dec!(1e15),
            start_year: 2025,
            end_year: 2029,
        };
        let err = distribute("income", &spec, &span(), dec!(1e15)).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidParameter { name: "price_per_kw", .. }
        ));
    }

    #[test]
    fn test_zero_item() {
        let values = distribute("rent", &LineItemSpec::zero(&span()), &span(), dec!(1)).unwrap();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| v.is_zero()));
    }
}
