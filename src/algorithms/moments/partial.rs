//! Partial accumulator for low-order moments.
//!
//! ## Purpose
//!
//! This module implements the mergeable intermediate state of the low-order
//! moments computation: observation count plus per-feature sum, sum of
//! squares, centered sum of squares, minimum and maximum.
//!
//! ## Design notes
//!
//! * **Welford update**: Rows are folded one at a time around the running
//!   mean (see `math::accumulators`), so the centered sum never suffers the
//!   cancellation of the naive `sum_squares - sum^2 / n` form.
//! * **Chan merge**: Two accumulators combine with
//!   `M2 = M2a + M2b + delta^2 * n_a * n_b / N`, `delta = mean_b - mean_a`.
//! * **Identity**: An empty accumulator has zero sums, `min = +inf` and
//!   `max = -inf`. Merging it is a no-op; merging into it copies the other.
//!
//! ## Invariants
//!
//! * Every per-feature vector has exactly `columns` entries.
//! * `count == 0` implies the accumulator equals the identity.
//! * For `count > 0`: `min[f] <= max[f]` and `sum_squares_centered[f] >= 0`
//!   up to rounding.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};
#[cfg(feature = "std")]
use std::{vec, vec::Vec};

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::moments::result::{EstimatesToCompute, MomentsResult, finalize_moments};
use crate::engine::protocol::PartialResult;
use crate::engine::validator::Validator;
use crate::math::StatsFloat;
use crate::math::accumulators::MomentSums;
use crate::primitives::backend::ExecutionContext;
use crate::primitives::buffer::Scratch;
use crate::primitives::errors::MomentsError;

// ============================================================================
// MomentsPartial
// ============================================================================

/// Raw, mergeable aggregates for low-order moments.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentsPartial<T> {
    columns: usize,
    count: usize,
    sum: Vec<T>,
    sum_squares: Vec<T>,
    sum_squares_centered: Vec<T>,
    min: Vec<T>,
    max: Vec<T>,
}

impl<T: StatsFloat> MomentsPartial<T> {
    /// Create an empty accumulator for `columns` features.
    pub fn new(columns: usize) -> Result<Self, MomentsError> {
        Validator::validate_columns(columns)?;
        Ok(Self {
            columns,
            count: 0,
            sum: vec![T::zero(); columns],
            sum_squares: vec![T::zero(); columns],
            sum_squares_centered: vec![T::zero(); columns],
            min: vec![T::infinity(); columns],
            max: vec![T::neg_infinity(); columns],
        })
    }

    /// Return to the identity state, possibly with a new column count.
    pub fn reset(&mut self, columns: usize) -> Result<(), MomentsError> {
        *self = Self::new(columns)?;
        Ok(())
    }

    /// Fold row-major observations (`values.len()` must be a multiple of the
    /// column count).
    ///
    /// Non-finite values are rejected before anything is folded.
    pub fn update(&mut self, values: &[T]) -> Result<(), MomentsError> {
        if values.len() % self.columns != 0 {
            return Err(MomentsError::InvalidArgument(format!(
                "{} values do not form whole rows of {} columns",
                values.len(),
                self.columns
            )));
        }
        Validator::validate_block(values, self.columns, 0)?;
        let rows = values.len() / self.columns;
        let mut scratch = Scratch::new(self.columns);
        self.fold(values, rows, &ExecutionContext::default(), &mut scratch);
        Ok(())
    }

    /// Merge another accumulator into this one.
    pub fn merge(&mut self, other: &Self) -> Result<(), MomentsError> {
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
        let total = n_a + n_b;
        let weight = n_a * n_b / total;

        for f in 0..self.columns {
            let delta = other.sum[f] / n_b - self.sum[f] / n_a;
            self.sum_squares_centered[f] = self.sum_squares_centered[f]
                + other.sum_squares_centered[f]
                + delta * delta * weight;
            self.sum[f] = self.sum[f] + other.sum[f];
            self.sum_squares[f] = self.sum_squares[f] + other.sum_squares[f];
            self.min[f] = self.min[f].min(other.min[f]);
            self.max[f] = self.max[f].max(other.max[f]);
        }
        self.count += other.count;

        Ok(())
    }

    /// Finalize into derived statistics.
    pub fn finalize(&self, estimates: EstimatesToCompute) -> Result<MomentsResult<T>, MomentsError> {
        finalize_moments(self, estimates)
    }

    fn fold(&mut self, block: &[T], rows: usize, ctx: &ExecutionContext, scratch: &mut Scratch<T>) {
        let means = scratch.means.as_vec_mut();
        means.clear();
        means.resize(self.columns, T::zero());

        T::accumulate_moments(
            block,
            rows,
            self.columns,
            self.count,
            MomentSums {
                sum: &mut self.sum,
                sum_squares: &mut self.sum_squares,
                sum_squares_centered: &mut self.sum_squares_centered,
                min: &mut self.min,
                max: &mut self.max,
            },
            means,
            ctx.kernel,
        );
        self.count += rows;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of features.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of observations folded in.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether no observation has been folded in.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Per-feature sums.
    pub fn sum(&self) -> &[T] {
        &self.sum
    }

    /// Per-feature sums of squares.
    pub fn sum_squares(&self) -> &[T] {
        &self.sum_squares
    }

    /// Per-feature sums of squared deviations from the mean.
    pub fn sum_squares_centered(&self) -> &[T] {
        &self.sum_squares_centered
    }

    /// Per-feature minima (`+inf` while empty).
    pub fn min(&self) -> &[T] {
        &self.min
    }

    /// Per-feature maxima (`-inf` while empty).
    pub fn max(&self) -> &[T] {
        &self.max
    }
}

// ============================================================================
// Wire Representation
// ============================================================================

/// Serialized body of a [`MomentsPartial`].
///
/// `min` and `max` are empty while `count == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentsWire<T> {
    /// Number of features.
    pub columns: usize,
    /// Observation count.
    pub count: usize,
    /// Per-feature sums.
    pub sum: Vec<T>,
    /// Per-feature sums of squares.
    pub sum_squares: Vec<T>,
    /// Per-feature centered sums of squares.
    pub sum_squares_centered: Vec<T>,
    /// Per-feature minima.
    pub min: Vec<T>,
    /// Per-feature maxima.
    pub max: Vec<T>,
}

fn check_len(name: &str, got: usize, expected: usize) -> Result<(), MomentsError> {
    if got != expected {
        return Err(MomentsError::InvalidSnapshot(format!(
            "field '{}' has {} entries, expected {}",
            name, got, expected
        )));
    }
    Ok(())
}

// ============================================================================
// Protocol
// ============================================================================

impl<T: StatsFloat> PartialResult for MomentsPartial<T> {
    type Scalar = T;
    type Params = EstimatesToCompute;
    type Output = MomentsResult<T>;
    type Wire = MomentsWire<T>;

    const ALGORITHM: &'static str = "low_order_moments";

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
        ctx: &ExecutionContext,
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
        self.fold(block, rows, ctx, scratch);
        Ok(())
    }

    fn merge(&mut self, other: &Self) -> Result<(), MomentsError> {
        MomentsPartial::merge(self, other)
    }

    fn finalize(&self, params: &EstimatesToCompute) -> Result<MomentsResult<T>, MomentsError> {
        finalize_moments(self, *params)
    }

    fn to_wire(&self) -> MomentsWire<T> {
        let (min, max) = if self.count == 0 {
            (Vec::new(), Vec::new())
        } else {
            (self.min.clone(), self.max.clone())
        };
        MomentsWire {
            columns: self.columns,
            count: self.count,
            sum: self.sum.clone(),
            sum_squares: self.sum_squares.clone(),
            sum_squares_centered: self.sum_squares_centered.clone(),
            min,
            max,
        }
    }

    fn from_wire(wire: MomentsWire<T>) -> Result<Self, MomentsError> {
        let mut partial = Self::new(wire.columns)
            .map_err(|_| MomentsError::InvalidSnapshot("column count must be positive".into()))?;
        if wire.count == 0 {
            return Ok(partial);
        }

        let columns = wire.columns;
        check_len("sum", wire.sum.len(), columns)?;
        check_len("sum_squares", wire.sum_squares.len(), columns)?;
        check_len("sum_squares_centered", wire.sum_squares_centered.len(), columns)?;
        check_len("min", wire.min.len(), columns)?;
        check_len("max", wire.max.len(), columns)?;

        partial.count = wire.count;
        partial.sum = wire.sum;
        partial.sum_squares = wire.sum_squares;
        partial.sum_squares_centered = wire.sum_squares_centered;
        partial.min = wire.min;
        partial.max = wire.max;
        Ok(partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_empty_copies_other() {
        let mut a = MomentsPartial::<f64>::new(2).unwrap();
        let mut b = MomentsPartial::<f64>::new(2).unwrap();
        b.update(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_rejects_partial_rows() {
        let mut a = MomentsPartial::<f64>::new(3).unwrap();
        assert!(matches!(
            a.update(&[1.0, 2.0]),
            Err(MomentsError::InvalidArgument(_))
        ));
        assert!(a.is_empty());
    }

    #[test]
    fn test_empty_wire_has_no_extrema() {
        let a = MomentsPartial::<f64>::new(2).unwrap();
        let wire = a.to_wire();
        assert!(wire.min.is_empty() && wire.max.is_empty());
        assert_eq!(MomentsPartial::from_wire(wire).unwrap(), a);
    }
}
