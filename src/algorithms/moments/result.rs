//! Finalization of low-order moments.
//!
//! ## Purpose
//!
//! This module turns a `MomentsPartial` into the user-facing statistics. The
//! same pure function serves the batch, online and distributed engines, so
//! the three execution modes cannot disagree on the derived values.
//!
//! ## Key concepts
//!
//! * **Population variance**: `variance = sum_squares_centered / count`.
//! * **Coefficient of variation**: `variation = std / mean`; undefined when
//!   the mean is exactly zero.
//! * **Per-feature issues**: A feature whose variation is undefined is
//!   reported in `issues` as `DivisionByZero`; every other feature is
//!   computed normally.
//!
//! ## Invariants
//!
//! * Finalization never mutates the partial.
//! * `variance[f] >= 0` and `standard_deviation[f] == sqrt(variance[f])`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{self, Display, Formatter};
use log::{debug, warn};

// Internal dependencies
use crate::algorithms::moments::partial::MomentsPartial;
use crate::math::StatsFloat;
use crate::primitives::errors::MomentsError;

// ============================================================================
// Estimates Selection
// ============================================================================

/// Which derived statistics finalization produces.
///
/// The partial always carries every raw aggregate, so partials computed with
/// different selections still merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatesToCompute {
    /// Every statistic.
    #[default]
    All,

    /// Minimum and maximum only.
    MinMax,

    /// Mean and variance only.
    MeanVariance,
}

impl EstimatesToCompute {
    fn extrema(self) -> bool {
        matches!(self, Self::All | Self::MinMax)
    }

    fn mean_variance(self) -> bool {
        matches!(self, Self::All | Self::MeanVariance)
    }

    fn full(self) -> bool {
        matches!(self, Self::All)
    }
}

// ============================================================================
// Result
// ============================================================================

/// Finalized low-order moments.
///
/// Statistics not selected by `estimates` are left empty. Raw sums are
/// always republished.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentsResult<T> {
    /// Number of observations the statistics cover.
    pub observations: usize,

    /// Number of features.
    pub columns: usize,

    /// Selection the result was finalized with.
    pub estimates: EstimatesToCompute,

    /// Per-feature minimum.
    pub minimum: Vec<T>,

    /// Per-feature maximum.
    pub maximum: Vec<T>,

    /// Per-feature sum.
    pub sum: Vec<T>,

    /// Per-feature sum of squares.
    pub sum_squares: Vec<T>,

    /// Per-feature sum of squared deviations from the mean.
    pub sum_squares_centered: Vec<T>,

    /// Per-feature mean.
    pub mean: Vec<T>,

    /// Per-feature second raw moment, `sum_squares / count`.
    pub second_order_raw_moment: Vec<T>,

    /// Per-feature population variance.
    pub variance: Vec<T>,

    /// Per-feature standard deviation.
    pub standard_deviation: Vec<T>,

    /// Per-feature coefficient of variation (NaN where undefined).
    pub variation: Vec<T>,

    /// Per-feature numeric problems encountered during finalization.
    pub issues: Vec<MomentsError>,
}

impl<T: StatsFloat> MomentsResult<T> {
    /// Coefficient of variation of feature `f`.
    ///
    /// Returns the recorded `DivisionByZero` for features whose mean is zero.
    pub fn variation_at(&self, f: usize) -> Result<T, MomentsError> {
        if f >= self.columns {
            return Err(MomentsError::InvalidArgument(format!(
                "feature {} out of range for {} columns",
                f, self.columns
            )));
        }
        if self.variation.is_empty() {
            return Err(MomentsError::InvalidArgument(
                "variation was not requested".into(),
            ));
        }
        if let Some(issue) = self.issues.iter().find(
            |e| matches!(e, MomentsError::DivisionByZero { feature, .. } if *feature == f),
        ) {
            return Err(issue.clone());
        }
        Ok(self.variation[f])
    }

    /// Whether any feature reported a numeric problem.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

impl<T: StatsFloat> Display for MomentsResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Observations: {}", self.observations)?;
        writeln!(f, "  Features:     {}", self.columns)?;
        writeln!(f, "  Estimates:    {:?}", self.estimates)?;
        if !self.issues.is_empty() {
            writeln!(f, "  Issues:       {}", self.issues.len())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Feature", "Min", "Max", "Mean", "Variance", "Variation"
        )?;
        writeln!(f, "{:-<74}", "")?;

        let cell = |v: &[T], i: usize| -> f64 {
            v.get(i).and_then(|x| x.to_f64()).unwrap_or(f64::NAN)
        };
        for i in 0..self.columns {
            writeln!(
                f,
                "{:>8} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                i,
                cell(&self.minimum, i),
                cell(&self.maximum, i),
                cell(&self.mean, i),
                cell(&self.variance, i),
                cell(&self.variation, i),
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Finalization Kernel
// ============================================================================

/// Derive the final statistics from a partial.
///
/// Fails with `EmptySource` when the partial holds no observations.
pub fn finalize_moments<T: StatsFloat>(
    partial: &MomentsPartial<T>,
    estimates: EstimatesToCompute,
) -> Result<MomentsResult<T>, MomentsError> {
    if partial.is_empty() {
        return Err(MomentsError::EmptySource);
    }

    let columns = partial.columns();
    let n = T::from(partial.count()).unwrap_or_else(T::one);

    let mut result = MomentsResult {
        observations: partial.count(),
        columns,
        estimates,
        minimum: Vec::new(),
        maximum: Vec::new(),
        sum: partial.sum().to_vec(),
        sum_squares: partial.sum_squares().to_vec(),
        sum_squares_centered: partial.sum_squares_centered().to_vec(),
        mean: Vec::new(),
        second_order_raw_moment: Vec::new(),
        variance: Vec::new(),
        standard_deviation: Vec::new(),
        variation: Vec::new(),
        issues: Vec::new(),
    };

    if estimates.extrema() {
        result.minimum = partial.min().to_vec();
        result.maximum = partial.max().to_vec();
    }

    if estimates.mean_variance() {
        result.mean = partial.sum().iter().map(|&s| s / n).collect();
        result.variance = partial
            .sum_squares_centered()
            .iter()
            .map(|&m2| (m2 / n).max(T::zero()))
            .collect();
    }

    if estimates.full() {
        result.standard_deviation = result.variance.iter().map(|v| v.sqrt()).collect();
        result.second_order_raw_moment = partial.sum_squares().iter().map(|&s| s / n).collect();
        result.variation = Vec::with_capacity(columns);
        for f in 0..columns {
            let mean = result.mean[f];
            if mean == T::zero() {
                warn!("variation undefined for feature {}: mean is zero", f);
                result.issues.push(MomentsError::DivisionByZero {
                    feature: f,
                    statistic: "variation",
                });
                result.variation.push(T::nan());
            } else {
                result.variation.push(result.standard_deviation[f] / mean);
            }
        }
    }

    debug!(
        "finalized low-order moments: {} observations, {} features, {} issues",
        result.observations,
        columns,
        result.issues.len()
    );

    Ok(result)
}
