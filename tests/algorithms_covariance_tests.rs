//! Tests for covariance and correlation partial results.

use approx::assert_relative_eq;
use moments_rs::prelude::*;

fn batch(output: CovarianceOutput, data: &DenseTable<f64>) -> Result<CovarianceResult<f64>, MomentsError> {
    Covariance::<f64>::new()
        .output(output)
        .adapter(Batch)
        .build()?
        .compute(data)
}

fn reference_covariance(rows: &[[f64; 3]]) -> [[f64; 3]; 3] {
    let n = rows.len() as f64;
    let mut mean = [0.0; 3];
    for r in rows {
        for j in 0..3 {
            mean[j] += r[j] / n;
        }
    }
    let mut c = [[0.0; 3]; 3];
    for r in rows {
        for i in 0..3 {
            for j in 0..3 {
                c[i][j] += (r[i] - mean[i]) * (r[j] - mean[j]) / (n - 1.0);
            }
        }
    }
    c
}

fn sample_rows() -> Vec<[f64; 3]> {
    (0..25)
        .map(|i| {
            let t = i as f64;
            [t, 2.0 * t + (t * 0.7).sin(), 100.0 - 0.5 * t + (t * 1.3).cos()]
        })
        .collect()
}

#[test]
fn test_covariance_matches_two_pass_reference() {
    let rows = sample_rows();
    let table = DenseTable::from_rows(&rows).unwrap();
    let r = batch(CovarianceOutput::Covariance, &table).unwrap();
    let expected = reference_covariance(&rows);

    assert_eq!(r.observations, 25);
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(
                r.get(i, j).unwrap(),
                expected[i][j],
                max_relative = 1e-10
            );
        }
    }
    assert!(r.issues.is_empty());
}

#[test]
fn test_covariance_matrix_is_symmetric() {
    let table = DenseTable::from_rows(&sample_rows()).unwrap();
    let r = batch(CovarianceOutput::Covariance, &table).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(r.get(i, j).unwrap(), r.get(j, i).unwrap());
        }
    }
}

#[test]
fn test_correlation_of_linear_features() {
    let table = DenseTable::from_rows(&[[1.0, 2.0, 5.0], [2.0, 4.0, 4.0], [3.0, 6.0, 3.0], [4.0, 8.0, 2.0]]).unwrap();
    let r = batch(CovarianceOutput::Correlation, &table).unwrap();

    for i in 0..3 {
        assert_eq!(r.get(i, i).unwrap(), 1.0);
    }
    assert_relative_eq!(r.get(0, 1).unwrap(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(r.get(0, 2).unwrap(), -1.0, epsilon = 1e-12);
    assert_relative_eq!(r.get(1, 2).unwrap(), -1.0, epsilon = 1e-12);
    assert_eq!(r.mean, vec![2.5, 5.0, 3.5]);
}

#[test]
fn test_correlation_with_constant_feature_reports_issue() {
    let table = DenseTable::from_rows(&[[1.0, 7.0], [2.0, 7.0], [4.0, 7.0]]).unwrap();
    let r = batch(CovarianceOutput::Correlation, &table).unwrap();

    assert_eq!(
        r.issues,
        vec![MomentsError::DivisionByZero {
            feature: 1,
            statistic: "correlation"
        }]
    );
    assert_eq!(r.get(0, 1).unwrap(), 0.0);
    assert_eq!(r.get(1, 1).unwrap(), 1.0);
    assert_eq!(r.get(0, 0).unwrap(), 1.0);
    assert_eq!(r.get(2, 0), None);
    assert_eq!(r.get(0, 2), None);
}

#[test]
fn test_covariance_needs_two_observations() {
    let table = DenseTable::from_rows(&[[1.0, 2.0]]).unwrap();
    assert_eq!(
        batch(CovarianceOutput::Covariance, &table),
        Err(MomentsError::TooFewObservations { got: 1, min: 2 })
    );
}

#[test]
fn test_merged_partials_match_whole() {
    let rows = sample_rows();
    let whole = DenseTable::from_rows(&rows).unwrap();
    let left = DenseTable::from_rows(&rows[..9]).unwrap();
    let right = DenseTable::from_rows(&rows[9..]).unwrap();

    let mut engine = Covariance::<f64>::new().adapter(Batch).build().unwrap();
    let expected = engine.compute(&whole).unwrap();

    let mut a = engine.compute_partial(&left).unwrap();
    let b = engine.compute_partial(&right).unwrap();
    a.merge(&b).unwrap();
    let merged = a.finalize(&CovarianceOutput::Covariance).unwrap();

    for k in 0..9 {
        assert_relative_eq!(merged.matrix[k], expected.matrix[k], max_relative = 1e-10);
    }
}

#[test]
fn test_merge_rejects_other_width() {
    let mut a = CovariancePartial::<f64>::empty(2).unwrap();
    let b = CovariancePartial::<f64>::empty(3).unwrap();
    assert_eq!(
        a.merge(&b),
        Err(MomentsError::DimensionMismatch {
            expected: 2,
            got: 3
        })
    );
}

#[test]
fn test_empty_covariance_partial_cannot_finalize() {
    let p = CovariancePartial::<f64>::empty(2).unwrap();
    assert_eq!(
        p.finalize(&CovarianceOutput::Covariance),
        Err(MomentsError::EmptySource)
    );
}
