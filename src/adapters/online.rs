//! Online adapter for incremental accumulation.
//!
//! ## Purpose
//!
//! This module provides the online execution mode: sources (chunks) arrive
//! over time, each is folded into a persistent partial, and the current
//! statistics can be finalized at any point.
//!
//! ## Design notes
//!
//! * **Lazy shape**: The column count is fixed by the first chunk.
//! * **Atomic updates**: A chunk that fails validation leaves the engine
//!   exactly as it was.
//! * **Pure finalize**: `finalize` reads the partial; updates may continue
//!   afterwards.
//!
//! ## Key concepts
//!
//! * **States**: `Empty` until the first chunk, `Accumulating` afterwards.
//!
//! ## Invariants
//!
//! * After `update(c1); ...; update(ck)` the partial equals the batch partial
//!   over the concatenation `c1 ++ ... ++ ck` (up to rounding).
//!
//! ## Non-goals
//!
//! * Sliding windows or forgetting factors.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use log::debug;

// Internal dependencies
use crate::adapters::{EngineCore, EngineSettings};
use crate::engine::executor::BlockExecutor;
use crate::engine::protocol::PartialResult;
use crate::engine::snapshot;
use crate::primitives::backend::{Backend, ExecutionContext, KernelPath};
use crate::primitives::buffer::BlockBuffer;
use crate::primitives::errors::MomentsError;
use crate::primitives::table::NumericSource;

// ============================================================================
// Online Builder
// ============================================================================

/// Builder for the online engine.
#[derive(Debug, Clone)]
pub struct OnlineBuilder<P: PartialResult> {
    /// Shared engine configuration.
    pub settings: EngineSettings<P>,
}

impl<P: PartialResult> Default for OnlineBuilder<P> {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
        }
    }
}

impl<P: PartialResult> OnlineBuilder<P> {
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

    /// Build the online engine.
    pub fn build(self) -> Result<OnlineEngine<P>, MomentsError> {
        let core = EngineCore::from_settings(self.settings)?;
        debug!(
            "built online {} engine: block_size={}, kernel={:?}",
            P::ALGORITHM,
            core.ctx.block_size,
            core.ctx.kernel
        );
        Ok(OnlineEngine {
            core,
            partial: None,
            buffer: BlockBuffer::new(0, 0),
        })
    }
}

// ============================================================================
// Online Engine
// ============================================================================

/// Lifecycle state of an online engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineState {
    /// No chunk has been folded in yet.
    Empty,

    /// At least one chunk has been folded in.
    Accumulating,
}

/// Incremental engine holding a persistent partial.
#[derive(Debug, Clone)]
pub struct OnlineEngine<P: PartialResult> {
    core: EngineCore<P>,
    partial: Option<P>,
    buffer: BlockBuffer<P::Scalar>,
}

impl<P: PartialResult> OnlineEngine<P> {
    /// Fold every row of `chunk` into the running partial.
    ///
    /// The first chunk fixes the column count; later chunks of a different
    /// width fail with `DimensionMismatch`.
    pub fn update<S>(&mut self, chunk: &S) -> Result<(), MomentsError>
    where
        S: NumericSource<P::Scalar> + ?Sized,
    {
        match self.partial.as_mut() {
            Some(partial) => {
                BlockExecutor::fold_into(chunk, partial, &self.core.ctx, &mut self.buffer)?;
            }
            None => {
                let partial: P = BlockExecutor::fold_new(chunk, &self.core.ctx, &mut self.buffer)?;
                self.partial = Some(partial);
            }
        }
        Ok(())
    }

    /// Merge a partial computed elsewhere into the running partial.
    pub fn absorb(&mut self, other: &P) -> Result<(), MomentsError> {
        match self.partial.as_mut() {
            Some(partial) => partial.merge(other),
            None => {
                self.partial = Some(other.clone());
                Ok(())
            }
        }
    }

    /// Finalize the observations seen so far.
    ///
    /// Does not modify the engine; further updates may follow.
    pub fn finalize(&self) -> Result<P::Output, MomentsError> {
        match &self.partial {
            Some(partial) if partial.observations() > 0 => partial.finalize(&self.core.params),
            _ => Err(MomentsError::EmptySource),
        }
    }

    /// Encode the running partial with the snapshot codec.
    pub fn snapshot(&self) -> Result<Vec<u8>, MomentsError> {
        match &self.partial {
            Some(partial) => snapshot::encode(partial),
            None => Err(MomentsError::EmptySource),
        }
    }

    /// The running partial, once a chunk has been folded in.
    pub fn partial(&self) -> Option<&P> {
        self.partial.as_ref()
    }

    /// Take the running partial, returning the engine to `Empty`.
    pub fn take_partial(&mut self) -> Option<P> {
        self.partial.take()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OnlineState {
        if self.partial.is_some() {
            OnlineState::Accumulating
        } else {
            OnlineState::Empty
        }
    }

    /// Number of observations folded in.
    pub fn observations(&self) -> usize {
        self.partial.as_ref().map_or(0, |p| p.observations())
    }

    /// Discard all accumulated state.
    pub fn reset(&mut self) {
        self.partial = None;
    }

    /// Execution context the engine was built with.
    pub fn context(&self) -> &ExecutionContext {
        &self.core.ctx
    }
}
