//! Block-wise execution of a partial result over a numeric source.
//!
//! ## Purpose
//!
//! This module provides the single pass every engine uses to fold a
//! `NumericSource` into a `PartialResult`: blocks of `block_size` rows are
//! read into a reusable buffer, validated, and handed to the partial.
//!
//! ## Design notes
//!
//! * **Bounded memory**: Only one block is resident at a time; memory use is
//!   independent of source size.
//! * **Staged fold**: A source is folded into a fresh partial which is merged
//!   into the target only after the whole source was read. A source that
//!   fails half-way (non-finite value, short read) leaves the target
//!   untouched.
//! * **Read-only source**: Sources are taken by shared reference.
//!
//! ## Invariants
//!
//! * The source's column count equals the target partial's column count.
//! * The target's observation count grows by exactly `source.row_count()`
//!   on success and is unchanged on error.
//!
//! ## Non-goals
//!
//! * This module does not finalize; engines decide when to do so.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use log::trace;

// Internal dependencies
use crate::engine::protocol::PartialResult;
use crate::engine::validator::Validator;
use crate::primitives::backend::ExecutionContext;
use crate::primitives::buffer::BlockBuffer;
use crate::primitives::errors::MomentsError;
use crate::primitives::table::NumericSource;

// ============================================================================
// Block Executor
// ============================================================================

/// Drives block-wise accumulation for the engines.
pub struct BlockExecutor;

impl BlockExecutor {
    /// Fold every row of `source` into a new partial.
    pub fn fold_new<P, S>(
        source: &S,
        ctx: &ExecutionContext,
        buffer: &mut BlockBuffer<P::Scalar>,
    ) -> Result<P, MomentsError>
    where
        P: PartialResult,
        S: NumericSource<P::Scalar> + ?Sized,
    {
        let columns = source.column_count();
        let mut partial = P::empty(columns)?;
        Self::fold_blocks(source, &mut partial, ctx, buffer)?;
        Ok(partial)
    }

    /// Fold every row of `source` into `target`.
    ///
    /// Returns the number of rows folded.
    pub fn fold_into<P, S>(
        source: &S,
        target: &mut P,
        ctx: &ExecutionContext,
        buffer: &mut BlockBuffer<P::Scalar>,
    ) -> Result<usize, MomentsError>
    where
        P: PartialResult,
        S: NumericSource<P::Scalar> + ?Sized,
    {
        Validator::validate_dimensions(target.columns(), source.column_count())?;
        let staged: P = Self::fold_new(source, ctx, buffer)?;
        let rows = staged.observations();
        target.merge(&staged)?;
        Ok(rows)
    }

    fn fold_blocks<P, S>(
        source: &S,
        partial: &mut P,
        ctx: &ExecutionContext,
        buffer: &mut BlockBuffer<P::Scalar>,
    ) -> Result<(), MomentsError>
    where
        P: PartialResult,
        S: NumericSource<P::Scalar> + ?Sized,
    {
        let total = source.row_count();
        let columns = source.column_count();
        let block_size = ctx.block_size.max(1);
        buffer.ensure_capacity(block_size.min(total), columns);

        let mut start = 0;
        while start < total {
            let want = block_size.min(total - start);
            let rows = source.read_block(start, want, buffer.values.as_vec_mut())?;
            if rows != want || buffer.values.len() != rows * columns {
                return Err(MomentsError::InvalidArgument(format!(
                    "source returned {} rows ({} values) for a block of {} rows at row {}",
                    rows,
                    buffer.values.len(),
                    want,
                    start
                )));
            }
            Validator::validate_block(&buffer.values, columns, start)?;
            partial.update_block(&buffer.values, rows, ctx, &mut buffer.scratch)?;
            trace!(
                "{}: folded rows {}..{} ({} columns)",
                P::ALGORITHM,
                start,
                start + rows,
                columns
            );
            start += rows;
        }

        Ok(())
    }
}
