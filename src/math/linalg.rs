//! Linear algebra backend abstraction.
//!
//! ## Purpose
//!
//! This module provides the QR factorization used by the tall-skinny QR
//! partial result, standardizing on the nalgebra backend.
//!
//! ## Design notes
//!
//! * Householder QR via nalgebra; only the triangular factor is returned.
//! * Generic over `FloatLinalg` types (f32 and f64) which delegate to nalgebra.
//! * Matrices cross this boundary as row-major slices.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + 'static {
    /// Upper-trapezoidal R factor of a row-major `rows x cols` matrix.
    ///
    /// Returns `min(rows, cols) x cols` values, row-major.
    fn qr_r(a: &[Self], rows: usize, cols: usize) -> Vec<Self>;
}

impl FloatLinalg for f64 {
    #[inline]
    fn qr_r(a: &[Self], rows: usize, cols: usize) -> Vec<Self> {
        nalgebra_backend::qr_r_factor(a, rows, cols)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn qr_r(a: &[Self], rows: usize, cols: usize) -> Vec<Self> {
        nalgebra_backend::qr_r_factor(a, rows, cols)
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::*;
    use nalgebra::{DMatrix, RealField};

    /// R factor of a row-major matrix.
    pub fn qr_r_factor<T: RealField + Copy>(a: &[T], rows: usize, cols: usize) -> Vec<T> {
        let matrix = DMatrix::from_row_slice(rows, cols, a);
        let r = matrix.qr().r();
        let k = r.nrows();
        let mut out = Vec::with_capacity(k * cols);
        for i in 0..k {
            for j in 0..cols {
                out.push(r[(i, j)]);
            }
        }
        out
    }
}
