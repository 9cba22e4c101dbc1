//! # moments-rs — Mergeable partial-result statistics for Rust
//!
//! Low-order moments, covariance and tall-skinny QR computed through one
//! protocol: accumulate locally, merge partial results, finalize once. The
//! same code path serves a single in-memory table, a stream of chunks, and
//! a cluster of workers reporting to a master.
//!
//! ## What is a partial result?
//!
//! A partial result is the smallest state from which a statistic can be
//! finished and which can be combined with another partial of the same kind.
//! For low-order moments it is, per feature:
//!
//! - the observation count `n`,
//! - the sum and the sum of squares,
//! - the sum of squared deviations from the mean (`M2`),
//! - the running minimum and maximum.
//!
//! Two partials merge with the Chan-Golub-LeVeque formula
//! `M2 = M2a + M2b + delta^2 * na * nb / n`, which stays accurate where the
//! textbook `sum_squares - sum^2 / n` collapses (large means, small spread).
//!
//! **Execution modes:**
//! - **Batch**: one source, one pass, finalized statistics.
//! - **Online**: chunks over time, finalize whenever needed.
//! - **Distributed**: workers emit raw partials, a master merges and finalizes.
//!
//! ## Quick Start
//!
//! ### Batch
//!
//! ```rust
//! use moments_rs::prelude::*;
//!
//! let data = DenseTable::from_rows(&[
//!     [1.0, 10.0],
//!     [2.0, 20.0],
//!     [3.0, 30.0],
//!     [4.0, 40.0],
//! ])?;
//!
//! let mut engine = LowOrderMoments::<f64>::new()
//!     .block_size(1024)
//!     .adapter(Batch)
//!     .build()?;
//!
//! let result = engine.compute(&data)?;
//! assert_eq!(result.mean, vec![2.5, 25.0]);
//! assert!((result.variance[0] - 1.25).abs() < 1e-12);
//! assert!((result.variance[1] - 125.0).abs() < 1e-9);
//!
//! println!("{}", result);
//! # Result::<(), MomentsError>::Ok(())
//! ```
//!
//! ```text
//! Summary:
//!   Observations: 4
//!   Features:     2
//!   Estimates:    All
//!
//!  Feature          Min          Max         Mean     Variance    Variation
//! --------------------------------------------------------------------------
//!        0       1.0000       4.0000       2.5000       1.2500       0.4472
//!        1      10.0000      40.0000      25.0000     125.0000       0.4472
//! ```
//!
//! ### Distributed
//!
//! ```rust
//! use moments_rs::prelude::*;
//!
//! let builder = LowOrderMoments::<f64>::new().adapter(Distributed);
//!
//! // Step 1: each worker folds its local rows.
//! let mut worker_a = builder.clone().build_worker()?;
//! worker_a.update(&DenseTable::new(vec![1.0, 2.0, 3.0], 1)?)?;
//! let mut worker_b = builder.clone().build_worker()?;
//! worker_b.update(&DenseTable::new(vec![4.0, 5.0], 1)?)?;
//!
//! // Step 2: the master merges whatever arrives and finalizes once.
//! let mut master = builder.build_master()?;
//! master.add_encoded(&worker_a.snapshot()?)?;
//! master.add_encoded(&worker_b.snapshot()?)?;
//! master.compute()?;
//!
//! let result = master.finalize_compute()?;
//! assert_eq!(result.observations, 5);
//! assert!((result.mean[0] - 3.0).abs() < 1e-12);
//! assert!((result.variance[0] - 2.0).abs() < 1e-12);
//! # Result::<(), MomentsError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Structural problems (a zero column count, mismatched widths, no data)
//! abort the call with a [`MomentsError`](prelude::MomentsError).
//! Per-feature numeric problems do not: a feature whose mean is zero has an
//! undefined coefficient of variation, which is recorded in
//! `MomentsResult::issues` while every other feature is computed normally.
//!
//! ```rust
//! use moments_rs::prelude::*;
//!
//! let data = DenseTable::from_rows(&[[-1.0, 2.0], [1.0, 4.0]])?;
//! let mut engine = LowOrderMoments::<f64>::new().adapter(Batch).build()?;
//! let result = engine.compute(&data)?;
//!
//! assert_eq!(
//!     result.variation_at(0),
//!     Err(MomentsError::DivisionByZero { feature: 0, statistic: "variation" })
//! );
//! assert!((result.variation_at(1)? - 1.0 / 3.0).abs() < 1e-12);
//! # Result::<(), MomentsError>::Ok(())
//! ```
//!
//! ## Other Algorithms
//!
//! - [`Covariance`](prelude::Covariance): sample covariance or Pearson
//!   correlation from a centered cross-product partial.
//! - [`Qr`](prelude::Qr): the `R` factor of a tall matrix via tall-skinny QR.
//! - [`ZScore`](prelude::ZScore): standardization using finalized moments.
//!
//! ## Feature Flags
//!
//! - **`std`** (default): standard library support. Without it the crate is
//!   `no_std` and requires `alloc`.
//! - **`dev`**: exposes internal modules for testing and experimentation.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, numeric sources (dense, slice, CSR), reusable
// block buffers and the execution context.
mod primitives;

// Layer 2: Math - pure numerical kernels.
//
// Contains the scalar and SIMD accumulation loops and the nalgebra-backed
// QR factorization.
mod math;

// Layer 3: Algorithms - the statistics as partial results.
//
// Contains low-order moments, covariance, tall-skinny QR and z-score
// normalization.
mod algorithms;

// Layer 4: Engine - shared machinery.
//
// Contains the partial-result protocol, the block executor, validation and
// the snapshot codec.
mod engine;

// Layer 5: Adapters - execution modes.
//
// Contains the batch, online and distributed (worker / master) engines.
mod adapters;

// High-level fluent API.
//
// Provides the `LowOrderMoments`, `Covariance` and `Qr` builders.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use moments_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Adapter::{Batch, Distributed, Online},
        Backend, BatchEngine, Covariance, CovarianceOutput, CovariancePartial, CovarianceResult,
        CsrTable,
        DenseTable, DistributedMaster, DistributedWorker, EstimatesToCompute, KernelPath,
        LowOrderMoments, MomentsError, MomentsPartial, MomentsResult, NumericSource,
        OnlineEngine, OnlineState, PartialResult, Qr, QrPartial, QrResult, SliceTable, ZScore,
        ZScoreResult, decode_partial, encode_partial,
    };
}

pub use crate::api::*;

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math kernels.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
