//! Low-order moments: partial accumulator and finalization kernel.

/// Mergeable raw aggregates.
pub mod partial;

/// Derived statistics and the finalization kernel.
pub mod result;

pub use partial::{MomentsPartial, MomentsWire};
pub use result::{EstimatesToCompute, MomentsResult, finalize_moments};
