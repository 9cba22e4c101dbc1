//! Batch adapter: one source in, finalized statistics out.
//!
//! ## Purpose
//!
//! This module provides the batch execution mode. `compute` starts from the
//! identity partial, folds the whole source in a single block-wise pass and
//! finalizes.
//!
//! ## Design notes
//!
//! * **Stateless between calls**: Each `compute` starts from scratch; only
//!   the block buffer is reused.
//! * **Read-only source**: The source is borrowed immutably.
//! * **Generics**: Generic over any `PartialResult`.
//!
//! ## Invariants
//!
//! * A source with zero rows yields `EmptySource`.
//!
//! ## Non-goals
//!
//! * Retaining state across calls (use the online adapter).

// External dependencies
use log::debug;

// Internal dependencies
use crate::adapters::{EngineCore, EngineSettings};
use crate::engine::executor::BlockExecutor;
use crate::engine::protocol::PartialResult;
use crate::primitives::backend::{Backend, ExecutionContext, KernelPath};
use crate::primitives::buffer::BlockBuffer;
use crate::primitives::errors::MomentsError;
use crate::primitives::table::NumericSource;

// ============================================================================
// Batch Builder
// ============================================================================

/// Builder for the batch engine.
#[derive(Debug, Clone)]
pub struct BatchBuilder<P: PartialResult> {
    /// Shared engine configuration.
    pub settings: EngineSettings<P>,
}

impl<P: PartialResult> Default for BatchBuilder<P> {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
        }
    }
}

impl<P: PartialResult> BatchBuilder<P> {
    /// Set the number of rows read per block.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.settings.block_size = block_size;
        self
    }

    /// Set the accumulation kernel.
    pub fn kernel(mut self, kernel: KernelPath) -> Self {
        self.settings.kernel = kernel;
        self
    }

    /// Set the execution backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.settings.backend = backend;
        self
    }

    /// Build the batch engine.
    pub fn build(self) -> Result<BatchEngine<P>, MomentsError> {
        let core = EngineCore::from_settings(self.settings)?;
        debug!(
            "built batch {} engine: block_size={}, kernel={:?}",
            P::ALGORITHM,
            core.ctx.block_size,
            core.ctx.kernel
        );
        Ok(BatchEngine {
            core,
            buffer: BlockBuffer::new(0, 0),
        })
    }
}

// ============================================================================
// Batch Engine
// ============================================================================

/// Single-pass engine.
#[derive(Debug, Clone)]
pub struct BatchEngine<P: PartialResult> {
    core: EngineCore<P>,
    buffer: BlockBuffer<P::Scalar>,
}

impl<P: PartialResult> BatchEngine<P> {
    /// Compute finalized statistics over every row of `source`.
    pub fn compute<S>(&mut self, source: &S) -> Result<P::Output, MomentsError>
    where
        S: NumericSource<P::Scalar> + ?Sized,
    {
        let partial = self.compute_partial(source)?;
        partial.finalize(&self.core.params)
    }

    /// Fold every row of `source` into a fresh partial without finalizing.
    pub fn compute_partial<S>(&mut self, source: &S) -> Result<P, MomentsError>
    where
        S: NumericSource<P::Scalar> + ?Sized,
    {
        if source.row_count() == 0 {
            return Err(MomentsError::EmptySource);
        }
        let partial: P = BlockExecutor::fold_new(source, &self.core.ctx, &mut self.buffer)?;
        debug!(
            "batch {}: {} observations x {} features",
            P::ALGORITHM,
            partial.observations(),
            partial.columns()
        );
        Ok(partial)
    }

    /// Execution context the engine was built with.
    pub fn context(&self) -> &ExecutionContext {
        &self.core.ctx
    }

    /// Finalization parameters.
    pub fn params(&self) -> &P::Params {
        &self.core.params
    }
}
