use crate::core::error::{EngineResult, ProjectionError};
use serde::Serialize;
use std::fmt;

/// Earliest fiscal year a projection may start in.
pub const MIN_YEAR: i32 = 1900;

/// The inclusive range of fiscal years covered by a projection.
///
/// Index `i` of every per-year array produced by the engine corresponds
/// to year `start_year + i`.
///
/// # Examples
///
/// ```
/// use pv_irr_engine::core::span::ProjectSpan;
///
/// let span = ProjectSpan::new(2025, 2044).unwrap();
/// assert_eq!(span.len(), 20);
/// assert_eq!(span.index_of(2030), Some(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectSpan {
    start_year: i32,
    end_year: i32,
}

impl ProjectSpan {
    /// Create a span, rejecting reversed, empty or pre-1900 ranges.
    pub fn new(start_year: i32, end_year: i32) -> EngineResult<Self> {
        if start_year < MIN_YEAR {
            return Err(ProjectionError::invalid_parameter(
                "start_year",
                format!("must be at least {MIN_YEAR}, got {start_year}"),
            ));
        }
        if end_year <= start_year {
            return Err(ProjectionError::invalid_parameter(
                "end_year",
                format!("must be after start_year {start_year}, got {end_year}"),
            ));
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of projection years.
    pub fn len(&self) -> usize {
        (self.end_year - self.start_year + 1) as usize
    }

    /// Always false: a valid span has at least two years.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    /// Zero-based array index of `year`, if it falls inside the span.
    pub fn index_of(&self, year: i32) -> Option<usize> {
        self.contains(year)
            .then(|| (year - self.start_year) as usize)
    }

    /// All years of the span in order.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }
}

impl fmt::Display for ProjectSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}
