//! Foundational inputs: project span, equipment pricing, line-item
//! distribution, financing and the error taxonomy.

pub mod equipment;
pub mod error;
pub mod financing;
pub mod line_item;
pub mod span;
