//! Tests for the distributed worker and master roles.
//!
//! ## Test Organization
//!
//! 1. **Workers** - Local accumulation and hand-off
//! 2. **Master protocol** - Queueing, compute, finalize
//! 3. **Master errors** - Empty queue, early finalize, mismatched inputs

use approx::assert_relative_eq;
use moments_rs::prelude::*;

type Builder = moments_rs::DistributedBuilder<MomentsPartial<f64>>;

fn builder() -> Builder {
    LowOrderMoments::<f64>::new().adapter(Distributed)
}

fn worker_partial(rows: &[[f64; 2]]) -> MomentsPartial<f64> {
    let mut w = builder().build_worker().unwrap();
    w.update(&DenseTable::from_rows(rows).unwrap()).unwrap();
    w.take_partial().unwrap()
}

// ============================================================================
// Workers
// ============================================================================

#[test]
fn test_worker_accumulates_several_sources() {
    let mut w = builder().build_worker().unwrap();
    assert!(w.partial().is_none());
    w.update(&DenseTable::from_rows(&[[1.0, 2.0]]).unwrap()).unwrap();
    w.update(&DenseTable::from_rows(&[[3.0, 4.0], [5.0, 6.0]]).unwrap())
        .unwrap();
    assert_eq!(w.observations(), 3);
    assert_eq!(w.partial().unwrap().sum(), &[9.0, 12.0]);

    w.reset();
    assert_eq!(w.observations(), 0);
}

#[test]
fn test_worker_without_data_has_no_snapshot() {
    let w = builder().build_worker().unwrap();
    assert_eq!(w.snapshot().unwrap_err(), MomentsError::EmptySource);
}

// ============================================================================
// Master Protocol
// ============================================================================

#[test]
fn test_master_matches_batch_for_concrete_table() {
    let rows = [[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];

    let mut master = builder().build_master().unwrap();
    master.add_input(worker_partial(&rows[..2])).unwrap();
    master.add_input(worker_partial(&rows[2..])).unwrap();
    assert_eq!(master.pending(), 2);

    let combined = master.compute().unwrap();
    assert_eq!(combined.count(), 4);
    assert_eq!(master.pending(), 0);

    let r = master.finalize_compute().unwrap();
    assert_eq!(r.mean, vec![2.5, 25.0]);
    assert_relative_eq!(r.variance[0], 1.25, epsilon = 1e-12);
    assert_relative_eq!(r.variance[1], 125.0, epsilon = 1e-10);
    assert_eq!(r.minimum, vec![1.0, 10.0]);
    assert_eq!(r.maximum, vec![4.0, 40.0]);
}

#[test]
fn test_master_keeps_combined_across_computes() {
    let mut master = builder().build_master().unwrap();
    master
        .compute_step([worker_partial(&[[1.0, 1.0], [2.0, 2.0]])])
        .unwrap();
    let first = master.finalize_compute().unwrap();
    assert_eq!(first.observations, 2);

    master
        .compute_step([worker_partial(&[[3.0, 3.0]]), worker_partial(&[[4.0, 4.0]])])
        .unwrap();
    let second = master.finalize_compute().unwrap();
    assert_eq!(second.observations, 4);
    assert_eq!(second.mean, vec![2.5, 2.5]);
}

#[test]
fn test_master_accepts_encoded_partials() {
    let mut w = builder().build_worker().unwrap();
    w.update(&DenseTable::from_rows(&[[0.5, -1.0], [1.5, 3.0]]).unwrap())
        .unwrap();
    let bytes = w.snapshot().unwrap();

    let mut master = builder().build_master().unwrap();
    master.add_encoded(&bytes).unwrap();
    master.compute().unwrap();
    assert_eq!(master.combined(), w.partial());
}

#[test]
fn test_empty_worker_partials_are_harmless() {
    let mut master = builder().build_master().unwrap();
    master
        .compute_step([
            MomentsPartial::new(2).unwrap(),
            worker_partial(&[[1.0, 2.0], [3.0, 4.0]]),
            MomentsPartial::new(2).unwrap(),
        ])
        .unwrap();
    let r = master.finalize_compute().unwrap();
    assert_eq!(r.observations, 2);
    assert_eq!(r.minimum, vec![1.0, 2.0]);
}

#[test]
fn test_master_reset() {
    let mut master = builder().build_master().unwrap();
    master.compute_step([worker_partial(&[[1.0, 2.0]])]).unwrap();
    master.reset();
    assert!(master.combined().is_none());
    assert_eq!(master.finalize_compute().unwrap_err(), MomentsError::NotComputed);
}

#[test]
fn test_covariance_master() {
    let b = Covariance::<f64>::new()
        .output(CovarianceOutput::Correlation)
        .adapter(Distributed);
    let mut master = b.clone().build_master().unwrap();
    for shard in [
        vec![1.0, 2.0, 2.0, 4.1],
        vec![3.0, 5.9, 4.0, 8.0, 5.0, 10.2],
    ] {
        let mut w = b.clone().build_worker().unwrap();
        w.update(&DenseTable::new(shard, 2).unwrap()).unwrap();
        master.add_encoded(&w.snapshot().unwrap()).unwrap();
    }
    master.compute().unwrap();
    let r = master.finalize_compute().unwrap();
    assert_eq!(r.observations, 5);
    assert!(r.get(0, 1).unwrap() > 0.99);
}

// ============================================================================
// Master Errors
// ============================================================================

#[test]
fn test_compute_without_inputs() {
    let mut master = builder().build_master().unwrap();
    assert_eq!(
        master.compute().unwrap_err(),
        MomentsError::EmptyInputCollection
    );
    assert_eq!(
        master.compute_step(Vec::new()).unwrap_err(),
        MomentsError::EmptyInputCollection
    );
}

#[test]
fn test_finalize_before_compute() {
    let mut master = builder().build_master().unwrap();
    master.add_input(worker_partial(&[[1.0, 2.0]])).unwrap();
    assert_eq!(
        master.finalize_compute().unwrap_err(),
        MomentsError::NotComputed
    );
}

#[test]
fn test_mismatched_input_is_rejected() {
    let mut master = builder().build_master().unwrap();
    master.add_input(worker_partial(&[[1.0, 2.0]])).unwrap();

    let narrow = MomentsPartial::<f64>::new(3).unwrap();
    assert_eq!(
        master.add_input(narrow).unwrap_err(),
        MomentsError::DimensionMismatch {
            expected: 2,
            got: 3
        }
    );
    assert_eq!(master.pending(), 1);

    // Against the combined partial after the queue is drained.
    master.compute().unwrap();
    assert!(master.add_input(MomentsPartial::new(1).unwrap()).is_err());
}

#[test]
fn test_failed_compute_step_queues_nothing() {
    let mut master = builder().build_master().unwrap();
    let err = master
        .compute_step(vec![
            worker_partial(&[[1.0, 2.0]]),
            MomentsPartial::new(3).unwrap(),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        MomentsError::DimensionMismatch {
            expected: 2,
            got: 3
        }
    );
    assert_eq!(master.pending(), 0);
    assert!(master.combined().is_none());

    master
        .compute_step(vec![worker_partial(&[[1.0, 2.0]])])
        .unwrap();
    assert_eq!(master.finalize_compute().unwrap().observations, 1);
}

#[test]
fn test_failed_compute_step_keeps_earlier_queue() {
    let mut master = builder().build_master().unwrap();
    master.add_input(worker_partial(&[[1.0, 2.0]])).unwrap();

    assert!(
        master
            .compute_step(vec![
                worker_partial(&[[3.0, 4.0]]),
                MomentsPartial::new(1).unwrap(),
            ])
            .is_err()
    );
    assert_eq!(master.pending(), 1);

    master.compute().unwrap();
    assert_eq!(master.finalize_compute().unwrap().observations, 1);
}

#[test]
fn test_wrong_algorithm_snapshot_is_rejected() {
    let mut w = Covariance::<f64>::new()
        .adapter(Distributed)
        .build_worker()
        .unwrap();
    w.update(&DenseTable::from_rows(&[[1.0, 2.0], [2.0, 1.0]]).unwrap())
        .unwrap();

    let mut master = builder().build_master().unwrap();
    assert!(matches!(
        master.add_encoded(&w.snapshot().unwrap()),
        Err(MomentsError::InvalidSnapshot(_))
    ));
    assert_eq!(master.pending(), 0);
}
