//! Tests for the online adapter.

use approx::assert_relative_eq;
use moments_rs::prelude::*;

fn engine() -> OnlineEngine<MomentsPartial<f64>> {
    LowOrderMoments::<f64>::new()
        .adapter(Online)
        .build()
        .unwrap()
}

/// Two-row blocks, so a chunk spans several blocks.
fn small_block_engine() -> OnlineEngine<MomentsPartial<f64>> {
    LowOrderMoments::<f64>::new()
        .block_size(2)
        .adapter(Online)
        .build()
        .unwrap()
}

fn column(values: &[f64]) -> DenseTable<f64> {
    DenseTable::new(values.to_vec(), 1).unwrap()
}

#[test]
fn test_lifecycle_states() {
    let mut online = engine();
    assert_eq!(online.state(), OnlineState::Empty);
    assert_eq!(online.observations(), 0);
    assert_eq!(online.finalize().unwrap_err(), MomentsError::EmptySource);
    assert_eq!(online.snapshot().unwrap_err(), MomentsError::EmptySource);

    online.update(&column(&[1.0, 2.0])).unwrap();
    assert_eq!(online.state(), OnlineState::Accumulating);
    assert_eq!(online.observations(), 2);

    online.reset();
    assert_eq!(online.state(), OnlineState::Empty);
    assert!(online.partial().is_none());
}

#[test]
fn test_chunks_match_batch() {
    let values: Vec<f64> = (0..97).map(|i| ((i * 37) % 101) as f64 * 0.25 - 3.0).collect();

    let batch = LowOrderMoments::<f64>::new()
        .adapter(Batch)
        .build()
        .unwrap()
        .compute(&column(&values))
        .unwrap();

    let mut online = engine();
    for chunk in values.chunks(10) {
        online.update(&column(chunk)).unwrap();
    }
    let streamed = online.finalize().unwrap();

    assert_eq!(streamed.observations, 97);
    assert_eq!(streamed.minimum, batch.minimum);
    assert_eq!(streamed.maximum, batch.maximum);
    assert_relative_eq!(streamed.mean[0], batch.mean[0], max_relative = 1e-12);
    assert_relative_eq!(streamed.variance[0], batch.variance[0], max_relative = 1e-12);
}

#[test]
fn test_finalize_between_updates() {
    let mut online = engine();
    online.update(&column(&[2.0, 4.0])).unwrap();
    let first = online.finalize().unwrap();
    assert_eq!(first.mean, vec![3.0]);

    // Finalizing did not consume or alter the running partial.
    assert_eq!(online.finalize().unwrap(), first);

    online.update(&column(&[6.0, 8.0])).unwrap();
    let second = online.finalize().unwrap();
    assert_eq!(second.observations, 4);
    assert_eq!(second.mean, vec![5.0]);
    assert_relative_eq!(second.variance[0], 5.0, epsilon = 1e-12);
}

#[test]
fn test_width_change_is_rejected_and_state_kept() {
    let mut online = engine();
    online.update(&column(&[1.0, 2.0, 3.0])).unwrap();
    let before = online.partial().cloned();

    let wide = DenseTable::from_rows(&[[1.0, 2.0]]).unwrap();
    assert_eq!(
        online.update(&wide).unwrap_err(),
        MomentsError::DimensionMismatch {
            expected: 1,
            got: 2
        }
    );
    assert_eq!(online.partial().cloned(), before);
}

#[test]
fn test_failed_chunk_is_all_or_nothing() {
    let mut online = small_block_engine();
    online.update(&column(&[1.0, 2.0])).unwrap();
    let before = online.partial().cloned();

    // The bad value sits in the third block of this chunk.
    let bad = column(&[3.0, 4.0, 5.0, 6.0, f64::INFINITY, 7.0]);
    assert!(matches!(
        online.update(&bad),
        Err(MomentsError::InvalidNumericValue(_))
    ));
    assert_eq!(online.partial().cloned(), before);
    assert_eq!(online.observations(), 2);
}

#[test]
fn test_empty_chunk_is_noop() {
    let mut online = engine();
    online.update(&column(&[1.0, 2.0])).unwrap();
    online.update(&column(&[])).unwrap();
    assert_eq!(online.observations(), 2);
}

#[test]
fn test_absorb_and_take() {
    let mut a = engine();
    a.update(&column(&[1.0, 2.0, 3.0])).unwrap();

    let mut b = engine();
    b.update(&column(&[10.0])).unwrap();
    let taken = b.take_partial().unwrap();
    assert_eq!(b.state(), OnlineState::Empty);

    a.absorb(&taken).unwrap();
    let r = a.finalize().unwrap();
    assert_eq!(r.observations, 4);
    assert_eq!(r.maximum, vec![10.0]);
    assert_eq!(r.mean, vec![4.0]);
}

#[test]
fn test_snapshot_restores_into_fresh_engine() {
    let mut a = engine();
    a.update(&column(&[1.5, -2.0, 8.25])).unwrap();
    let bytes = a.snapshot().unwrap();

    let mut b = engine();
    let restored: MomentsPartial<f64> = decode_partial(&bytes).unwrap();
    b.absorb(&restored).unwrap();
    assert_eq!(b.finalize().unwrap(), a.finalize().unwrap());
}
