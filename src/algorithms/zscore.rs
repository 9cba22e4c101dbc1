//! Z-score normalization driven by finalized moments.
//!
//! ## Purpose
//!
//! This module standardizes a source feature by feature,
//! `z = (x - mean[f]) / std[f]`, using a `MomentsResult` computed by any of
//! the engines (typically a distributed master that saw all of the data).
//!
//! ## Design notes
//!
//! * The source is read in blocks, like every other consumer of
//!   `NumericSource`.
//! * A feature with zero standard deviation is only centered; it is
//!   reported as a `DivisionByZero` issue rather than failing the call.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use log::{debug, warn};

// Internal dependencies
use crate::algorithms::moments::MomentsResult;
use crate::engine::validator::Validator;
use crate::math::StatsFloat;
use crate::primitives::backend::DEFAULT_BLOCK_SIZE;
use crate::primitives::errors::MomentsError;
use crate::primitives::table::{DenseTable, NumericSource};

/// Normalized data together with per-feature issues.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreResult<T> {
    /// Standardized values, same shape as the input.
    pub data: DenseTable<T>,

    /// Features that were centered but not scaled.
    pub issues: Vec<MomentsError>,
}

/// Z-score normalization.
pub struct ZScore;

impl ZScore {
    /// Standardize `source` with the means and standard deviations in
    /// `moments`.
    ///
    /// `moments` must have been finalized with `EstimatesToCompute::All`.
    pub fn normalize<T, S>(source: &S, moments: &MomentsResult<T>) -> Result<ZScoreResult<T>, MomentsError>
    where
        T: StatsFloat,
        S: NumericSource<T> + ?Sized,
    {
        let columns = source.column_count();
        Validator::validate_dimensions(moments.columns, columns)?;
        if moments.mean.len() != columns || moments.standard_deviation.len() != columns {
            return Err(MomentsError::InvalidArgument(
                "moments must include mean and standard deviation".into(),
            ));
        }

        let mut issues = Vec::new();
        let scale: Vec<T> = moments
            .standard_deviation
            .iter()
            .enumerate()
            .map(|(f, &s)| {
                if s == T::zero() {
                    warn!("feature {} has zero standard deviation; centering only", f);
                    issues.push(MomentsError::DivisionByZero {
                        feature: f,
                        statistic: "z-score",
                    });
                    T::one()
                } else {
                    T::one() / s
                }
            })
            .collect();

        let total = source.row_count();
        let mut out = DenseTable::zeros(total, columns)?;
        let mut block = Vec::with_capacity(DEFAULT_BLOCK_SIZE.min(total) * columns);
        let mut start = 0;
        while start < total {
            let rows = source.read_block(start, DEFAULT_BLOCK_SIZE, &mut block)?;
            if rows == 0 {
                break;
            }
            Validator::validate_block(&block, columns, start)?;
            for row in block.chunks_exact_mut(columns) {
                for (f, x) in row.iter_mut().enumerate() {
                    *x = (*x - moments.mean[f]) * scale[f];
                }
            }
            out.write_block(start, &block)?;
            start += rows;
        }

        debug!("z-score normalized {} rows x {} features", total, columns);

        Ok(ZScoreResult { data: out, issues })
    }
}
