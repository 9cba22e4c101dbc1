//! Versioned wire format for partial results.
//!
//! ## Purpose
//!
//! Workers and the master usually live in different processes. This module
//! turns any `PartialResult` into a self-describing JSON document and back:
//!
//! ```text
//! { "version": 1, "algorithm": "low_order_moments", "body": { ... } }
//! ```
//!
//! ## Design notes
//!
//! * The envelope header is checked before the body is parsed, so a newer
//!   format version is reported as such rather than as a body parse error.
//! * The algorithm tag prevents merging, say, a covariance partial into a
//!   moments master.
//! * Body validation (array lengths, counts) is delegated to
//!   `PartialResult::from_wire`.
//! * JSON has no infinities or NaN. A body holding one (an overflowed sum,
//!   say) is refused at encode time and the error names the field.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

// External dependencies
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Internal dependencies
use crate::engine::protocol::PartialResult;
use crate::primitives::errors::MomentsError;

/// Wire format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    algorithm: &'a str,
    body: Value,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    version: u32,
    algorithm: String,
}

#[derive(Deserialize)]
struct EnvelopeIn<W> {
    body: W,
}

/// Encode a partial result as a versioned JSON document.
pub fn encode<P: PartialResult>(partial: &P) -> Result<Vec<u8>, MomentsError> {
    let body = serde_json::to_value(partial.to_wire())
        .map_err(|e| MomentsError::InvalidSnapshot(format!("{}", e)))?;
    // Non-finite floats serialize as null.
    if let Some(field) = non_finite_field(&body) {
        return Err(MomentsError::InvalidSnapshot(format!(
            "non-finite value at body{}",
            field
        )));
    }

    let envelope = EnvelopeOut {
        version: SNAPSHOT_VERSION,
        algorithm: P::ALGORITHM,
        body,
    };
    serde_json::to_vec(&envelope).map_err(|e| MomentsError::InvalidSnapshot(format!("{}", e)))
}

/// Path of the first null in `value`, e.g. `.sum_squares[0]`.
fn non_finite_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Array(items) => items.iter().enumerate().find_map(|(i, item)| {
            non_finite_field(item).map(|rest| format!("[{}]{}", i, rest))
        }),
        Value::Object(fields) => fields.iter().find_map(|(name, field)| {
            non_finite_field(field).map(|rest| format!(".{}{}", name, rest))
        }),
        _ => None,
    }
}

/// Decode a partial result previously produced by [`encode`].
pub fn decode<P: PartialResult>(bytes: &[u8]) -> Result<P, MomentsError> {
    let header: EnvelopeHeader = serde_json::from_slice(bytes)
        .map_err(|e| MomentsError::InvalidSnapshot(format!("{}", e)))?;

    if header.version != SNAPSHOT_VERSION {
        return Err(MomentsError::UnsupportedSnapshotVersion {
            found: header.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    if header.algorithm != P::ALGORITHM {
        return Err(MomentsError::InvalidSnapshot(format!(
            "expected algorithm '{}', found '{}'",
            P::ALGORITHM,
            header.algorithm
        )));
    }

    let envelope: EnvelopeIn<P::Wire> = serde_json::from_slice(bytes)
        .map_err(|e| MomentsError::InvalidSnapshot(format!("{}", e)))?;
    P::from_wire(envelope.body)
}
