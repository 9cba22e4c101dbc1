//! Reusable scratch buffers for block-wise accumulation.
//!
//! ## Purpose
//!
//! This module provides the scratch space engines keep between calls so that
//! reading a source block by block does not allocate per block.
//!
//! ## Design notes
//!
//! * **Lazy Expansion**: Buffers grow on demand via `ensure_capacity` and are
//!   never shrunk, stabilizing at the largest block seen.
//! * **Owned per engine**: Each engine owns one `BlockBuffer`; nothing is
//!   shared across engines.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared (`vec.clear()`), never deallocated,
//!   between blocks.
//!
//! ## Non-goals
//!
//! * Thread-local caching or memory reclamation.

// Feature-gated dependencies
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use core::ops::{Deref, DerefMut};

// ============================================================================
// Slot - Unified Vector Abstraction
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Ensure the slot has at least the given capacity.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.len());
        }
    }

    /// Clear the slot (sets length to 0, preserves capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Get a mutable reference to the underlying vector.
    #[inline]
    pub fn as_vec_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ============================================================================
// Block Buffer
// ============================================================================

/// Per-feature working vectors used by the accumulation kernels.
#[derive(Debug, Clone, Default)]
pub struct Scratch<T> {
    /// Per-feature running means inside the block (Welford state).
    pub means: Slot<T>,
    /// Per-feature deviations of the current row (cross-product updates).
    pub deltas: Slot<T>,
}

impl<T> Scratch<T> {
    /// Create scratch vectors for `columns` features.
    pub fn new(columns: usize) -> Self {
        Self {
            means: Slot::new(columns),
            deltas: Slot::new(columns),
        }
    }
}

/// Scratch space used while folding one source into a partial result.
#[derive(Debug, Clone, Default)]
pub struct BlockBuffer<T> {
    /// Row-major values of the block currently being folded.
    pub values: Slot<T>,
    /// Kernel working vectors.
    pub scratch: Scratch<T>,
}

impl<T: Debug> BlockBuffer<T> {
    /// Create a buffer sized for `block_rows x columns` blocks.
    pub fn new(block_rows: usize, columns: usize) -> Self {
        Self {
            values: Slot::new(block_rows.saturating_mul(columns)),
            scratch: Scratch::new(columns),
        }
    }

    /// Ensure capacity for a block of the given shape.
    pub fn ensure_capacity(&mut self, block_rows: usize, columns: usize) {
        self.values
            .ensure_capacity(block_rows.saturating_mul(columns));
        self.scratch.means.ensure_capacity(columns);
        self.scratch.deltas.ensure_capacity(columns);
    }
}
