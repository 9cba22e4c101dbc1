//! Layer 1: Primitives
//!
//! # Purpose
//!
//! Data structures and utilities every other layer builds on: the error
//! type, numeric tables, reusable buffers and the execution context.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error type shared by all layers.
pub mod errors;

/// Dense and sparse numeric tables.
pub mod table;

/// Reusable block scratch buffers.
pub mod buffer;

/// Backend, kernel path and block size selection.
pub mod backend;
