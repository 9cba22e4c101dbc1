//! Block accumulation kernels.
//!
//! ## Purpose
//!
//! This module provides the scalar and SIMD loops that fold one row-major
//! block of observations into running per-feature aggregates: count, sum,
//! sum of squares, extrema and the Welford centered sum of squares. It also
//! provides the co-moment (centered cross-product) update used by covariance.
//!
//! ## Design notes
//!
//! * **Welford centering**: The centered sum is always taken around the
//!   running mean, so prior observations are never revisited.
//! * **Running means** live in caller-provided scratch and are seeded from
//!   `sum / count` at the start of every block.
//! * **SIMD**: The f64 kernel processes features in pairs with `wide::f64x2`;
//!   an odd trailing feature goes through the scalar loop.
//!
//! ## Invariants
//!
//! * `block.len() == rows * columns` and every aggregate slice has length
//!   `columns` (`columns * columns` for cross products).
//! * Inputs are finite; callers validate before folding.

// External dependencies
use num_traits::Float;
use wide::f64x2;

/// Mutable view over per-feature running aggregates.
pub struct MomentSums<'a, T> {
    /// Sum of raw values.
    pub sum: &'a mut [T],
    /// Sum of squared values.
    pub sum_squares: &'a mut [T],
    /// Sum of squared deviations from the running mean.
    pub sum_squares_centered: &'a mut [T],
    /// Running minimum.
    pub min: &'a mut [T],
    /// Running maximum.
    pub max: &'a mut [T],
}

#[inline]
fn seed_means<T: Float>(sum: &[T], count: usize, means: &mut [T]) {
    let n = T::from(count).unwrap_or_else(T::one);
    for (m, &s) in means.iter_mut().zip(sum.iter()) {
        *m = if count == 0 { T::zero() } else { s / n };
    }
}

// ============================================================================
// Low-Order Moments
// ============================================================================

/// Fold a block into the running aggregates (scalar).
///
/// `count` is the number of observations already folded in.
pub fn accumulate_moments_scalar<T: Float>(
    block: &[T],
    rows: usize,
    columns: usize,
    count: usize,
    sums: MomentSums<'_, T>,
    means: &mut [T],
) {
    seed_means(sums.sum, count, means);
    accumulate_moments_range(block, rows, columns, 0, columns, count, sums, means);
}

/// Scalar Welford loop over features `[from, to)`.
#[allow(clippy::too_many_arguments)]
#[inline]
fn accumulate_moments_range<T: Float>(
    block: &[T],
    rows: usize,
    columns: usize,
    from: usize,
    to: usize,
    count: usize,
    sums: MomentSums<'_, T>,
    means: &mut [T],
) {
    for r in 0..rows {
        let n = T::from(count + r + 1).unwrap_or_else(T::one);
        let row = &block[r * columns..(r + 1) * columns];
        for f in from..to {
            let x = row[f];
            let delta = x - means[f];
            means[f] = means[f] + delta / n;
            sums.sum_squares_centered[f] = sums.sum_squares_centered[f] + delta * (x - means[f]);
            sums.sum[f] = sums.sum[f] + x;
            sums.sum_squares[f] = sums.sum_squares[f] + x * x;
            if x < sums.min[f] {
                sums.min[f] = x;
            }
            if x > sums.max[f] {
                sums.max[f] = x;
            }
        }
    }
}

/// Fold a block into the running aggregates (f64, two features per lane).
pub fn accumulate_moments_simd(
    block: &[f64],
    rows: usize,
    columns: usize,
    count: usize,
    sums: MomentSums<'_, f64>,
    means: &mut [f64],
) {
    seed_means(sums.sum, count, means);

    let pairs = columns / 2;
    for p in 0..pairs {
        let f = p * 2;
        let mut mean = f64x2::new([means[f], means[f + 1]]);
        let mut m2 = f64x2::new([sums.sum_squares_centered[f], sums.sum_squares_centered[f + 1]]);
        let mut s = f64x2::new([sums.sum[f], sums.sum[f + 1]]);
        let mut s2 = f64x2::new([sums.sum_squares[f], sums.sum_squares[f + 1]]);
        let mut lo = f64x2::new([sums.min[f], sums.min[f + 1]]);
        let mut hi = f64x2::new([sums.max[f], sums.max[f + 1]]);

        for r in 0..rows {
            let inv_n = f64x2::splat(1.0 / (count + r + 1) as f64);
            let base = r * columns + f;
            let x = f64x2::new([block[base], block[base + 1]]);
            let delta = x - mean;
            mean += delta * inv_n;
            m2 += delta * (x - mean);
            s += x;
            s2 += x * x;
            lo = lo.min(x);
            hi = hi.max(x);
        }

        let [m0, m1] = mean.to_array();
        means[f] = m0;
        means[f + 1] = m1;
        let [c0, c1] = m2.to_array();
        sums.sum_squares_centered[f] = c0;
        sums.sum_squares_centered[f + 1] = c1;
        let [a0, a1] = s.to_array();
        sums.sum[f] = a0;
        sums.sum[f + 1] = a1;
        let [q0, q1] = s2.to_array();
        sums.sum_squares[f] = q0;
        sums.sum_squares[f + 1] = q1;
        let [l0, l1] = lo.to_array();
        sums.min[f] = l0;
        sums.min[f + 1] = l1;
        let [h0, h1] = hi.to_array();
        sums.max[f] = h0;
        sums.max[f + 1] = h1;
    }

    if columns % 2 == 1 {
        accumulate_moments_range(block, rows, columns, columns - 1, columns, count, sums, means);
    }
}

// ============================================================================
// Cross Products
// ============================================================================

/// Fold a block into a running sum and centered cross-product matrix.
///
/// `cross_product` is `columns x columns`, row-major. Uses the Welford
/// co-moment update `C += (n - 1) / n * d d^T` with `d = x - mean_old`.
#[allow(clippy::too_many_arguments)]
pub fn accumulate_cross_products_scalar<T: Float>(
    block: &[T],
    rows: usize,
    columns: usize,
    count: usize,
    sum: &mut [T],
    cross_product: &mut [T],
    means: &mut [T],
    deltas: &mut [T],
) {
    seed_means(sum, count, means);

    for r in 0..rows {
        let n = T::from(count + r + 1).unwrap_or_else(T::one);
        let scale = (n - T::one()) / n;
        let row = &block[r * columns..(r + 1) * columns];

        for f in 0..columns {
            let x = row[f];
            deltas[f] = x - means[f];
            means[f] = means[f] + deltas[f] / n;
            sum[f] = sum[f] + x;
        }

        for i in 0..columns {
            let di = deltas[i] * scale;
            for j in i..columns {
                cross_product[i * columns + j] = cross_product[i * columns + j] + di * deltas[j];
            }
        }
    }

    // Mirror the upper triangle.
    for i in 0..columns {
        for j in 0..i {
            cross_product[i * columns + j] = cross_product[j * columns + i];
        }
    }
}
