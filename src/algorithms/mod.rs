//! Layer 3: Algorithms
//!
//! ## Purpose
//!
//! This layer implements the statistics themselves as partial results:
//! how raw observations are accumulated, how two partials merge, and how a
//! partial is finalized. Each algorithm is independent of the engine that
//! drives it.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Low-order moments.
pub mod moments;

/// Covariance and correlation.
pub mod covariance;

/// Tall-skinny QR.
pub mod qr;

/// Z-score normalization.
pub mod zscore;
