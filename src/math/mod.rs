//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the pure numeric building blocks used by every
//! algorithm:
//! - Block accumulation kernels (scalar and SIMD)
//! - Per-type kernel dispatch
//! - QR factorization through nalgebra
//!
//! These are reusable mathematical building blocks with no engine logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

// External dependencies
use core::fmt::{Debug, Display};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Scalar and SIMD block accumulation loops.
pub mod accumulators;

/// Kernel selection per float type.
pub mod kernel;

/// nalgebra-backed factorizations.
pub mod linalg;

use self::kernel::AccumulateKernel;
use self::linalg::FloatLinalg;

/// Float types the crate computes in (`f32` and `f64`).
pub trait StatsFloat:
    FloatLinalg
    + AccumulateKernel
    + Debug
    + Display
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
{
}

impl<T> StatsFloat for T where
    T: FloatLinalg
        + AccumulateKernel
        + Debug
        + Display
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
{
}
