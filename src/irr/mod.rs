//! Internal rate of return: the root finder and the cost-method and
//! equity-method series it is applied to.

pub mod analysis;
pub mod solver;
