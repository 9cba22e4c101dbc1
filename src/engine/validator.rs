//! Input validation for engine configuration and data.
//!
//! ## Purpose
//!
//! This module provides the validation functions shared by builders and
//! engines: column counts, block sizes, backend availability, operand
//! widths and finiteness of incoming blocks.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or filter input data.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::backend::Backend;
use crate::primitives::errors::MomentsError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for engine configuration and input data.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Data Validation
    // ========================================================================

    /// Validate a feature count.
    pub fn validate_columns(columns: usize) -> Result<(), MomentsError> {
        if columns == 0 {
            return Err(MomentsError::InvalidArgument(
                "column count must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Validate that an operand has the established column count.
    pub fn validate_dimensions(expected: usize, got: usize) -> Result<(), MomentsError> {
        if expected != got {
            return Err(MomentsError::DimensionMismatch { expected, got });
        }
        Ok(())
    }

    /// Validate that every value of a row-major block is finite.
    ///
    /// `first_row` is the source row index of the block's first row, used in
    /// the error message.
    pub fn validate_block<T: Float>(
        block: &[T],
        columns: usize,
        first_row: usize,
    ) -> Result<(), MomentsError> {
        if let Some(i) = block.iter().position(|v| !v.is_finite()) {
            return Err(MomentsError::InvalidNumericValue(format!(
                "row {} feature {} = {}",
                first_row + i / columns,
                i % columns,
                block[i].to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the number of rows read per block.
    pub fn validate_block_size(block_size: usize) -> Result<(), MomentsError> {
        if block_size == 0 {
            return Err(MomentsError::InvalidBlockSize(block_size));
        }
        Ok(())
    }

    /// Validate that the requested backend is available.
    pub fn validate_backend(backend: Backend) -> Result<(), MomentsError> {
        match backend {
            Backend::CPU => Ok(()),
            other => Err(MomentsError::UnsupportedBackend(other.name())),
        }
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), MomentsError> {
        if let Some(param) = duplicate_param {
            return Err(MomentsError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
