//! Tests for the batch adapter and builder validation.
//!
//! ## Test Organization
//!
//! 1. **Builder validation** - Invalid configurations fail at `build()`
//! 2. **Computation** - Results, block sizes and kernels
//! 3. **Errors** - Empty and non-finite sources

use approx::assert_relative_eq;
use moments_rs::prelude::*;

fn wide_table(rows: usize, columns: usize) -> DenseTable<f64> {
    let data = (0..rows * columns)
        .map(|k| {
            let (r, c) = (k / columns, k % columns);
            (r as f64 * 0.5 + c as f64).sin() * (c as f64 + 1.0) + 10.0 * c as f64
        })
        .collect();
    DenseTable::new(data, columns).unwrap()
}

// ============================================================================
// Builder Validation
// ============================================================================

#[test]
fn test_zero_block_size_is_rejected() {
    let result = LowOrderMoments::<f64>::new().block_size(0).adapter(Batch).build();
    assert_eq!(result.unwrap_err(), MomentsError::InvalidBlockSize(0));
}

#[test]
fn test_gpu_backend_is_rejected() {
    let result = LowOrderMoments::<f64>::new()
        .backend(Backend::GPU)
        .adapter(Batch)
        .build();
    assert_eq!(result.unwrap_err(), MomentsError::UnsupportedBackend("gpu"));
}

#[test]
fn test_duplicate_parameters_are_rejected() {
    let result = LowOrderMoments::<f64>::new()
        .block_size(10)
        .block_size(20)
        .adapter(Batch)
        .build();
    assert_eq!(
        result.unwrap_err(),
        MomentsError::DuplicateParameter {
            parameter: "block_size"
        }
    );

    let result = LowOrderMoments::<f64>::new()
        .estimates(EstimatesToCompute::MinMax)
        .estimates(EstimatesToCompute::All)
        .adapter(Online)
        .build();
    assert_eq!(
        result.unwrap_err(),
        MomentsError::DuplicateParameter {
            parameter: "estimates"
        }
    );

    let result = Covariance::<f64>::new()
        .output(CovarianceOutput::Correlation)
        .output(CovarianceOutput::Covariance)
        .adapter(Distributed)
        .build_master();
    assert_eq!(
        result.unwrap_err(),
        MomentsError::DuplicateParameter { parameter: "output" }
    );
}

#[test]
fn test_adapter_setters_override_builder() {
    let engine = LowOrderMoments::<f64>::new()
        .block_size(10)
        .adapter(Batch)
        .block_size(7)
        .kernel(KernelPath::Scalar)
        .build()
        .unwrap();
    assert_eq!(engine.context().block_size, 7);
    assert_eq!(engine.context().kernel, KernelPath::Scalar);
    assert_eq!(engine.params(), &EstimatesToCompute::All);
}

// ============================================================================
// Computation
// ============================================================================

#[test]
fn test_block_size_does_not_change_results() {
    let table = wide_table(101, 5);
    let reference = LowOrderMoments::<f64>::new()
        .adapter(Batch)
        .build()
        .unwrap()
        .compute(&table)
        .unwrap();

    for block_size in [1, 2, 7, 100, 101, 1000] {
        let r = LowOrderMoments::<f64>::new()
            .block_size(block_size)
            .adapter(Batch)
            .build()
            .unwrap()
            .compute(&table)
            .unwrap();
        assert_eq!(r.observations, 101);
        assert_eq!(r.minimum, reference.minimum);
        assert_eq!(r.maximum, reference.maximum);
        for f in 0..5 {
            assert_relative_eq!(r.mean[f], reference.mean[f], max_relative = 1e-12);
            assert_relative_eq!(r.variance[f], reference.variance[f], max_relative = 1e-10);
        }
    }
}

#[test]
fn test_scalar_and_vectorized_kernels_agree() {
    let table = wide_table(64, 7);
    let run = |kernel| {
        LowOrderMoments::<f64>::new()
            .kernel(kernel)
            .adapter(Batch)
            .build()
            .unwrap()
            .compute(&table)
            .unwrap()
    };
    let scalar = run(KernelPath::Scalar);
    let simd = run(KernelPath::Vectorized);

    assert_eq!(scalar.minimum, simd.minimum);
    assert_eq!(scalar.maximum, simd.maximum);
    for f in 0..7 {
        assert_relative_eq!(scalar.sum[f], simd.sum[f], max_relative = 1e-12);
        assert_relative_eq!(scalar.variance[f], simd.variance[f], max_relative = 1e-10);
    }
}

#[test]
fn test_engine_is_reusable() {
    let mut engine = LowOrderMoments::<f64>::new().adapter(Batch).build().unwrap();
    let a = engine.compute(&wide_table(10, 2)).unwrap();
    let b = engine.compute(&DenseTable::new(vec![5.0, 7.0], 1).unwrap()).unwrap();
    let c = engine.compute(&wide_table(10, 2)).unwrap();

    assert_eq!(b.observations, 2);
    assert_eq!(b.mean, vec![6.0]);
    assert_eq!(a, c);
}

#[test]
fn test_slice_source() {
    let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
    let view = SliceTable::new(&data, 3).unwrap();
    let r = LowOrderMoments::<f64>::new()
        .adapter(Batch)
        .build()
        .unwrap()
        .compute(&view)
        .unwrap();
    assert_eq!(r.minimum, vec![1.0, 1.0, 4.0]);
    assert_eq!(r.maximum, vec![3.0, 5.0, 9.0]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_source() {
    let table = DenseTable::<f64>::new(Vec::new(), 3).unwrap();
    let mut engine = LowOrderMoments::<f64>::new().adapter(Batch).build().unwrap();
    assert_eq!(engine.compute(&table).unwrap_err(), MomentsError::EmptySource);
    assert_eq!(
        engine.compute_partial(&table).unwrap_err(),
        MomentsError::EmptySource
    );
}

#[test]
fn test_non_finite_value_names_its_location() {
    let table = DenseTable::from_rows(&[[1.0, 2.0], [3.0, f64::NAN], [5.0, 6.0]]).unwrap();
    let err = LowOrderMoments::<f64>::new()
        .block_size(2)
        .adapter(Batch)
        .build()
        .unwrap()
        .compute(&table)
        .unwrap_err();

    match err {
        MomentsError::InvalidNumericValue(msg) => {
            assert!(msg.contains("row 1"), "{}", msg);
            assert!(msg.contains("feature 1"), "{}", msg);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
