//! Layer 4: Engine
//!
//! ## Purpose
//!
//! This layer holds the machinery shared by all algorithms and adapters:
//! the partial-result protocol, the block executor, input validation and
//! the snapshot codec.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// The mergeable partial-result contract.
pub mod protocol;

/// Block-wise folding of sources into partials.
pub mod executor;

/// Configuration and input validation.
pub mod validator;

/// Versioned JSON encoding of partials.
pub mod snapshot;
