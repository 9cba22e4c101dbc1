//! Error types for partial-result statistics.
//!
//! ## Purpose
//!
//! This module defines the single error enum shared by every layer of the
//! crate: builder validation, block accumulation, merging, finalization and
//! the partial-result codec.
//!
//! ## Design notes
//!
//! * **no_std friendly**: `Display` is hand-written; `std::error::Error` is
//!   implemented only with the `std` feature.
//! * **Cheap to clone**: Payloads are indices, counts and short messages.
//! * **Two propagation styles**: Structural errors abort the operation and are
//!   returned as `Err`. Per-feature numeric problems (`DivisionByZero`) are
//!   collected on the finalized result instead.
//!
//! ## Key concepts
//!
//! * **Structural errors**: `InvalidArgument`, `DimensionMismatch`,
//!   `EmptySource`, `EmptyInputCollection`, `NotComputed`, codec errors.
//! * **Per-feature errors**: `DivisionByZero { feature, statistic }`.
//!
//! ## Non-goals
//!
//! * This module does not map errors to numeric status codes.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt;

/// Error type for moments, covariance and QR computations.
#[derive(Debug, Clone, PartialEq)]
pub enum MomentsError {
    /// Malformed construction or call parameter.
    InvalidArgument(String),

    /// An operand's column count disagrees with the established column count.
    DimensionMismatch {
        /// Column count the accumulator was created with.
        expected: usize,
        /// Column count of the offending operand.
        got: usize,
    },

    /// No observations are available to compute or finalize over.
    EmptySource,

    /// The distributed master was asked to merge an empty collection of partials.
    EmptyInputCollection,

    /// A per-feature statistic divides by zero.
    DivisionByZero {
        /// Feature (column) index.
        feature: usize,
        /// Name of the statistic that could not be computed.
        statistic: &'static str,
    },

    /// A NaN or infinite value was found in the input.
    InvalidNumericValue(String),

    /// Fewer observations than the statistic requires.
    TooFewObservations {
        /// Observations available.
        got: usize,
        /// Observations required.
        min: usize,
    },

    /// Block size must be at least one row.
    InvalidBlockSize(usize),

    /// A builder parameter was set more than once.
    DuplicateParameter {
        /// Name of the parameter.
        parameter: &'static str,
    },

    /// The requested execution backend is not available in this crate.
    UnsupportedBackend(&'static str),

    /// `finalize_compute` was called before any successful `compute`.
    NotComputed,

    /// A rows-of-rows input has a row of the wrong width.
    RaggedInput {
        /// Offending row index.
        row: usize,
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// An encoded partial result could not be decoded.
    InvalidSnapshot(String),

    /// An encoded partial result uses an unknown format version.
    UnsupportedSnapshotVersion {
        /// Version found in the envelope.
        found: u32,
        /// Version this build understands.
        supported: u32,
    },
}

impl fmt::Display for MomentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::DimensionMismatch { expected, got } => write!(
                f,
                "Dimension mismatch: expected {} columns, got {}",
                expected, got
            ),
            Self::EmptySource => write!(f, "Input source contains no observations"),
            Self::EmptyInputCollection => {
                write!(f, "No partial results were provided to merge")
            }
            Self::DivisionByZero { feature, statistic } => write!(
                f,
                "Division by zero computing {} for feature {}",
                statistic, feature
            ),
            Self::InvalidNumericValue(msg) => write!(f, "Invalid numeric value: {}", msg),
            Self::TooFewObservations { got, min } => write!(
                f,
                "Too few observations: got {}, need at least {}",
                got, min
            ),
            Self::InvalidBlockSize(size) => {
                write!(f, "Invalid block_size: {} (must be at least 1)", size)
            }
            Self::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                parameter
            ),
            Self::UnsupportedBackend(backend) => {
                write!(f, "Backend '{}' is not supported by this build", backend)
            }
            Self::NotComputed => write!(
                f,
                "finalize_compute called before any partial results were merged"
            ),
            Self::RaggedInput { row, expected, got } => write!(
                f,
                "Ragged input: row {} has {} values, expected {}",
                row, got, expected
            ),
            Self::InvalidSnapshot(msg) => write!(f, "Invalid partial result snapshot: {}", msg),
            Self::UnsupportedSnapshotVersion { found, supported } => write!(
                f,
                "Unsupported snapshot version {} (this build reads version {})",
                found, supported
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MomentsError {}
