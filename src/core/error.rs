use thiserror::Error;

/// Errors arising while validating or projecting a single request.
///
/// Every variant is request-scoped. An unsolvable IRR is not an error:
/// the solver reports it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// A scalar input is malformed or out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A year sub-range has its bounds reversed.
    #[error("invalid year range {start_year}..={end_year} for {item}")]
    InvalidRange {
        item: String,
        start_year: i32,
        end_year: i32,
    },

    /// An array does not match the declared project span.
    #[error("{item} has {actual} values, expected {expected}")]
    ShapeMismatch {
        item: String,
        expected: usize,
        actual: usize,
    },

    /// The wire request combines fields inconsistently.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProjectionError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch(item: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            item: item.into(),
            expected,
            actual,
        }
    }
}

pub type EngineResult<T> = Result<T, ProjectionError>;
