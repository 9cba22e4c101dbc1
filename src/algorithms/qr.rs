//! Tall-skinny QR (R factor) as a partial result.
//!
//! ## Purpose
//!
//! This module computes the upper-triangular factor `R` of `A = QR` for a
//! tall data matrix `A` without ever holding `A` in memory.
//!
//! ## Design notes
//!
//! * **TSQR**: The partial is the `R` factor of the rows seen so far. A new
//!   block is folded by factoring `[R; block]`; two partials merge by
//!   factoring `[R_a; R_b]`. Both keep at most `columns` rows.
//! * **Sign convention**: `R` is unique only up to row signs; finalization
//!   flips rows so the diagonal is non-negative, making results from
//!   different partitionings comparable.
//! * Factorization is delegated to nalgebra through `FloatLinalg`.
//!
//! ## Invariants
//!
//! * `r.len() == min(count, columns) * columns`.
//! * `R^T R == A^T A` for the rows folded in, up to rounding.
//!
//! ## Non-goals
//!
//! * The orthogonal factor `Q` (it needs a second pass over the data).
//! * Column pivoting.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use log::debug;
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::engine::protocol::PartialResult;
use crate::engine::validator::Validator;
use crate::math::StatsFloat;
use crate::primitives::backend::ExecutionContext;
use crate::primitives::buffer::Scratch;
use crate::primitives::errors::MomentsError;

/// Finalization parameters for QR (none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QrParams;

/// Mergeable triangular factor of the rows seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPartial<T> {
    columns: usize,
    count: usize,
    r: Vec<T>,
}

/// Finalized `R` factor.
#[derive(Debug, Clone, PartialEq)]
pub struct QrResult<T> {
    /// Number of observations (rows of `A`).
    pub observations: usize,

    /// Number of features (columns of `A`).
    pub columns: usize,

    /// `columns x columns` upper-triangular factor with non-negative
    /// diagonal, row-major.
    pub r: Vec<T>,
}

impl<T: Copy> QrResult<T> {
    /// Entry `(i, j)` of `R`, or `None` when out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.columns && j < self.columns {
            self.r.get(i * self.columns + j).copied()
        } else {
            None
        }
    }
}

impl<T: StatsFloat> QrPartial<T> {
    /// Create an empty partial for `columns` features.
    pub fn new(columns: usize) -> Result<Self, MomentsError> {
        Validator::validate_columns(columns)?;
        Ok(Self {
            columns,
            count: 0,
            r: Vec::new(),
        })
    }

    /// Current (unnormalized) triangular rows, row-major.
    pub fn r(&self) -> &[T] {
        &self.r
    }

    fn r_rows(&self) -> usize {
        self.r.len() / self.columns
    }

    /// Replace `R` by the factor of `[R; rows]`.
    fn absorb(&mut self, rows: &[T], row_count: usize) {
        let p = self.columns;
        let stacked_rows = self.r_rows() + row_count;
        let mut stacked = Vec::with_capacity(stacked_rows * p);
        stacked.extend_from_slice(&self.r);
        stacked.extend_from_slice(rows);
        self.r = T::qr_r(&stacked, stacked_rows, p);
    }
}

/// Serialized body of a [`QrPartial`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrWire<T> {
    /// Number of features.
    pub columns: usize,
    /// Observation count.
    pub count: usize,
    /// Triangular rows, row-major.
    pub r: Vec<T>,
}

impl<T: StatsFloat> PartialResult for QrPartial<T> {
    type Scalar = T;
    type Params = QrParams;
    type Output = QrResult<T>;
    type Wire = QrWire<T>;

    const ALGORITHM: &'static str = "qr";

    fn empty(columns: usize) -> Result<Self, MomentsError> {
        Self::new(columns)
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn observations(&self) -> usize {
        self.count
    }

    fn update_block(
        &mut self,
        block: &[T],
        rows: usize,
        _ctx: &ExecutionContext,
        _scratch: &mut Scratch<T>,
    ) -> Result<(), MomentsError> {
        if rows == 0 {
            return Ok(());
        }
        if block.len() != rows * self.columns {
            return Err(MomentsError::DimensionMismatch {
                expected: self.columns,
                got: block.len() / rows,
            });
        }
        self.absorb(block, rows);
        self.count += rows;
        Ok(())
    }

    fn merge(&mut self, other: &Self) -> Result<(), MomentsError> {
        Validator::validate_dimensions(self.columns, other.columns)?;

        if other.count == 0 {
            return Ok(());
        }
        if self.count == 0 {
            self.clone_from(other);
            return Ok(());
        }

        self.absorb(&other.r, other.r_rows());
        self.count += other.count;
        Ok(())
    }

    fn finalize(&self, _params: &QrParams) -> Result<QrResult<T>, MomentsError> {
        if self.count == 0 {
            return Err(MomentsError::EmptySource);
        }
        if self.count < self.columns {
            return Err(MomentsError::TooFewObservations {
                got: self.count,
                min: self.columns,
            });
        }

        let p = self.columns;
        let mut r = self.r.clone();
        for i in 0..p {
            if r[i * p + i] < T::zero() {
                for v in &mut r[i * p..(i + 1) * p] {
                    *v = -*v;
                }
            }
        }

        debug!("finalized R factor: {} observations, {} features", self.count, p);

        Ok(QrResult {
            observations: self.count,
            columns: p,
            r,
        })
    }

    fn to_wire(&self) -> QrWire<T> {
        QrWire {
            columns: self.columns,
            count: self.count,
            r: self.r.clone(),
        }
    }

    fn from_wire(wire: QrWire<T>) -> Result<Self, MomentsError> {
        let columns = wire.columns;
        if columns == 0 {
            return Err(MomentsError::InvalidSnapshot(
                "column count must be positive".into(),
            ));
        }
        let expected = wire.count.min(columns) * columns;
        if wire.r.len() != expected {
            return Err(MomentsError::InvalidSnapshot(format!(
                "R factor has {} entries, expected {}",
                wire.r.len(),
                expected
            )));
        }
        Ok(Self {
            columns,
            count: wire.count,
            r: wire.r,
        })
    }
}
