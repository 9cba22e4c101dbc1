//! Covariance and correlation as a partial result.
//!
//! ## Purpose
//!
//! This module implements the variance-covariance matrix on the same
//! accumulate / merge / finalize protocol as low-order moments.
//!
//! ## Design notes
//!
//! * **Co-moment**: The partial keeps the centered cross-product matrix
//!   `C = sum (x - mean)(x - mean)^T`, updated row by row with
//!   `C += (n - 1) / n * d d^T`.
//! * **Merge**: `C = C_a + C_b + (n_a n_b / N) d d^T`, `d = mean_b - mean_a`.
//! * **Output**: Sample covariance (`C / (N - 1)`) or Pearson correlation.
//!
//! ## Invariants
//!
//! * `cross_product` is `columns x columns`, row-major and symmetric.
//!
//! ## Non-goals
//!
//! * Weighted or robust covariance estimators.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};
#[cfg(feature = "std")]
use std::{vec, vec::Vec};

// External dependencies
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::engine::protocol::PartialResult;
use crate::engine::validator::Validator;
use crate::math::StatsFloat;
use crate::primitives::backend::ExecutionContext;
use crate::primitives::buffer::Scratch;
use crate::primitives::errors::MomentsError;

// ============================================================================
// Output Selection
// ============================================================================

/// Matrix produced by covariance finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceOutput {
    /// Sample covariance, `C / (N - 1)`.
    #[default]
    Covariance,

    /// Pearson correlation, `C_ij / sqrt(C_ii C_jj)`.
    Correlation,
}

// ============================================================================
// Partial
// ============================================================================

/// Mergeable state of the covariance computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CovariancePartial<T> {
    columns: usize,
    count: usize,
    sum: Vec<T>,
    cross_product: Vec<T>,
}

impl<T: StatsFloat> CovariancePartial<T> {
    /// Create an empty partial for `columns` features.
    pub fn new(columns: usize) -> Result<Self, MomentsError> {
        Validator::validate_columns(columns)?;
        Ok(Self {
            columns,
            count: 0,
            sum: vec![T::zero(); columns],
            cross_product: vec![T::zero(); columns * columns],
        })
    }

    /// Number of observations folded in.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-feature sums.
    pub fn sum(&self) -> &[T] {
        &self.sum
    }

    /// Centered cross-product matrix, row-major.
    pub fn cross_product(&self) -> &[T] {
        &self.cross_product
    }

    fn means(&self) -> Vec<T> {
        let n = T::from(self.count).unwrap_or_else(T::one);
        self.sum.iter().map(|&s| s / n).collect()
    }
}

// ============================================================================
// Result
// ============================================================================

/// Finalized covariance or correlation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceResult<T> {
    /// Number of observations.
    pub observations: usize,

    /// Number of features.
    pub columns: usize,

    /// Kind of matrix in `matrix`.
    pub output: CovarianceOutput,

    /// Per-feature mean.
    pub mean: Vec<T>,

    /// `columns x columns` matrix, row-major.
    pub matrix: Vec<T>,

    /// Features for which correlation is undefined (zero variance).
    pub issues: Vec<MomentsError>,
}

impl<T: Copy> CovarianceResult<T> {
    /// Entry `(i, j)` of the matrix, or `None` when out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.columns && j < self.columns {
            self.matrix.get(i * self.columns + j).copied()
        } else {
            None
        }
    }
}

// ============================================================================
// Wire Representation
// ============================================================================

/// Serialized body of a [`CovariancePartial`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceWire<T> {
    /// Number of features.
    pub columns: usize,
    /// Observation count.
    pub count: usize,
    /// Per-feature sums.
    pub sum: Vec<T>,
    /// Centered cross products, row-major.
    pub cross_product: Vec<T>,
}

// ============================================================================
// Protocol
// ============================================================================

impl<T: StatsFloat> PartialResult for CovariancePartial<T> {
    type Scalar = T;
    type Params = CovarianceOutput;
    type Output = CovarianceResult<T>;
    type Wire = CovarianceWire<T>;

    const ALGORITHM: &'static str = "covariance";

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
        scratch: &mut Scratch<T>,
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

        let means = scratch.means.as_vec_mut();
        means.clear();
        means.resize(self.columns, T::zero());
        let deltas = scratch.deltas.as_vec_mut();
        deltas.clear();
        deltas.resize(self.columns, T::zero());

        T::accumulate_cross_products(
            block,
            rows,
            self.columns,
            self.count,
            &mut self.sum,
            &mut self.cross_product,
            means,
            deltas,
        );
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

        let n_a = T::from(self.count).unwrap_or_else(T::one);
        let n_b = T::from(other.count).unwrap_or_else(T::one);
        let weight = n_a * n_b / (n_a + n_b);
        let mean_a = self.means();
        let mean_b = other.means();
        let p = self.columns;

        for i in 0..p {
            let di = weight * (mean_b[i] - mean_a[i]);
            for j in i..p {
                let dj = mean_b[j] - mean_a[j];
                let k = i * p + j;
                self.cross_product[k] = self.cross_product[k] + other.cross_product[k] + di * dj;
            }
            self.sum[i] = self.sum[i] + other.sum[i];
        }
        for i in 0..p {
            for j in 0..i {
                self.cross_product[i * p + j] = self.cross_product[j * p + i];
            }
        }
        self.count += other.count;

        Ok(())
    }

    fn finalize(&self, output: &CovarianceOutput) -> Result<CovarianceResult<T>, MomentsError> {
        if self.count == 0 {
            return Err(MomentsError::EmptySource);
        }
        if self.count < 2 {
            return Err(MomentsError::TooFewObservations {
                got: self.count,
                min: 2,
            });
        }

        let p = self.columns;
        let mut issues = Vec::new();
        let matrix = match output {
            CovarianceOutput::Covariance => {
                let denom = T::from(self.count - 1).unwrap_or_else(T::one);
                self.cross_product.iter().map(|&c| c / denom).collect()
            }
            CovarianceOutput::Correlation => {
                let scale: Vec<T> = (0..p).map(|i| self.cross_product[i * p + i].sqrt()).collect();
                for (f, s) in scale.iter().enumerate() {
                    if *s == T::zero() {
                        warn!("correlation undefined for feature {}: zero variance", f);
                        issues.push(MomentsError::DivisionByZero {
                            feature: f,
                            statistic: "correlation",
                        });
                    }
                }
                let mut m = vec![T::zero(); p * p];
                for i in 0..p {
                    for j in 0..p {
                        m[i * p + j] = if i == j {
                            T::one()
                        } else if scale[i] == T::zero() || scale[j] == T::zero() {
                            T::zero()
                        } else {
                            let r = self.cross_product[i * p + j] / (scale[i] * scale[j]);
                            r.max(-T::one()).min(T::one())
                        };
                    }
                }
                m
            }
        };

        debug!(
            "finalized {:?}: {} observations, {} features",
            output, self.count, p
        );

        Ok(CovarianceResult {
            observations: self.count,
            columns: p,
            output: *output,
            mean: self.means(),
            matrix,
            issues,
        })
    }

    fn to_wire(&self) -> CovarianceWire<T> {
        CovarianceWire {
            columns: self.columns,
            count: self.count,
            sum: self.sum.clone(),
            cross_product: self.cross_product.clone(),
        }
    }

    fn from_wire(wire: CovarianceWire<T>) -> Result<Self, MomentsError> {
        let columns = wire.columns;
        let empty = Self::new(columns)
            .map_err(|_| MomentsError::InvalidSnapshot("column count must be positive".into()))?;
        if wire.count == 0 {
            return Ok(empty);
        }
        if wire.sum.len() != columns || wire.cross_product.len() != columns * columns {
            return Err(MomentsError::InvalidSnapshot(format!(
                "covariance body has {} sums and {} cross products for {} columns",
                wire.sum.len(),
                wire.cross_product.len(),
                columns
            )));
        }
        Ok(Self {
            columns,
            count: wire.count,
            sum: wire.sum,
            cross_product: wire.cross_product,
        })
    }
}
