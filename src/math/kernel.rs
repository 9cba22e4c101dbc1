//! Per-type kernel dispatch.
//!
//! ## Purpose
//!
//! This module binds the generic float types to their accumulation kernels:
//! `f64` gets the `wide::f64x2` SIMD loop when the execution context allows
//! it, `f32` always uses the portable scalar loop.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::accumulators::{
    MomentSums, accumulate_cross_products_scalar, accumulate_moments_scalar,
    accumulate_moments_simd,
};
use crate::primitives::backend::KernelPath;

// ============================================================================
// AccumulateKernel Trait
// ============================================================================

/// Trait selecting the accumulation kernel for a float type.
pub trait AccumulateKernel: Float + 'static {
    /// Fold a row-major block into running moment aggregates.
    fn accumulate_moments(
        block: &[Self],
        rows: usize,
        columns: usize,
        count: usize,
        sums: MomentSums<'_, Self>,
        means: &mut [Self],
        path: KernelPath,
    );

    /// Fold a row-major block into a running sum and centered cross-product.
    #[allow(clippy::too_many_arguments)]
    fn accumulate_cross_products(
        block: &[Self],
        rows: usize,
        columns: usize,
        count: usize,
        sum: &mut [Self],
        cross_product: &mut [Self],
        means: &mut [Self],
        deltas: &mut [Self],
    ) {
        accumulate_cross_products_scalar(
            block,
            rows,
            columns,
            count,
            sum,
            cross_product,
            means,
            deltas,
        );
    }
}

impl AccumulateKernel for f64 {
    #[inline]
    fn accumulate_moments(
        block: &[f64],
        rows: usize,
        columns: usize,
        count: usize,
        sums: MomentSums<'_, f64>,
        means: &mut [f64],
        path: KernelPath,
    ) {
        if path.wants_simd() && columns >= 2 {
            accumulate_moments_simd(block, rows, columns, count, sums, means);
        } else {
            accumulate_moments_scalar(block, rows, columns, count, sums, means);
        }
    }
}

impl AccumulateKernel for f32 {
    #[inline]
    fn accumulate_moments(
        block: &[f32],
        rows: usize,
        columns: usize,
        count: usize,
        sums: MomentSums<'_, f32>,
        means: &mut [f32],
        _path: KernelPath,
    ) {
        accumulate_moments_scalar(block, rows, columns, count, sums, means);
    }
}
