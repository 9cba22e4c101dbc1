//! Distributed adapter: worker and master roles.
//!
//! ## Purpose
//!
//! This module splits a computation across nodes. Each worker folds its local
//! data into a raw partial and ships it (in memory or encoded); the master
//! merges every partial it receives and finalizes once.
//!
//! ## Design notes
//!
//! * **Workers never finalize**: They only expose raw partials, so nothing
//!   lossy happens before the merge.
//! * **Master is incremental**: `compute` merges the queued partials into a
//!   retained combined partial, so inputs may arrive over several rounds.
//! * **Order independence**: The merge is commutative and associative, so
//!   the arrival order of partials does not matter up to rounding.
//!
//! ## Key concepts
//!
//! * **Step 1 (local)**: `DistributedWorker::update` / `partial` / `snapshot`.
//! * **Step 2 (master)**: `add_input` / `compute` (or `compute_step`).
//! * **Finalize**: `finalize_compute` on the master.
//!
//! ## Invariants
//!
//! * Every queued partial has the master's column count.
//! * `finalize_compute` never mutates the master.
//!
//! ## Non-goals
//!
//! * Transport, retries or de-duplication of partials delivered twice.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use log::debug;

// Internal dependencies
use crate::adapters::online::{OnlineBuilder, OnlineEngine};
use crate::adapters::{EngineCore, EngineSettings};
use crate::engine::protocol::PartialResult;
use crate::engine::snapshot;
use crate::engine::validator::Validator;
use crate::primitives::backend::{Backend, KernelPath};
use crate::primitives::errors::MomentsError;
use crate::primitives::table::NumericSource;

// ============================================================================
// Distributed Builder
// ============================================================================

/// Builder for distributed workers and masters.
#[derive(Debug, Clone)]
pub struct DistributedBuilder<P: PartialResult> {
    /// Shared engine configuration.
    pub settings: EngineSettings<P>,
}

impl<P: PartialResult> Default for DistributedBuilder<P> {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
        }
    }
}

impl<P: PartialResult> DistributedBuilder<P> {
    /// Set the number of rows read per block (workers).
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.settings.block_size = block_size;
        self
    }

    /// Set the accumulation kernel (workers).
    pub fn kernel(mut self, kernel: KernelPath) -> Self {
        self.settings.kernel = kernel;
        self
    }

    /// Set the execution backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.settings.backend = backend;
        self
    }

    /// Build a worker.
    pub fn build_worker(self) -> Result<DistributedWorker<P>, MomentsError> {
        let engine = OnlineBuilder {
            settings: self.settings,
        }
        .build()?;
        Ok(DistributedWorker { engine })
    }

    /// Build a master.
    pub fn build_master(self) -> Result<DistributedMaster<P>, MomentsError> {
        let core = EngineCore::from_settings(self.settings)?;
        debug!("built distributed {} master", P::ALGORITHM);
        Ok(DistributedMaster {
            core,
            pending: Vec::new(),
            combined: None,
        })
    }
}

// ============================================================================
// Worker
// ============================================================================

/// Local role: accumulates and emits raw partials.
#[derive(Debug, Clone)]
pub struct DistributedWorker<P: PartialResult> {
    engine: OnlineEngine<P>,
}

impl<P: PartialResult> DistributedWorker<P> {
    /// Fold the rows of a local source into the worker's partial.
    pub fn update<S>(&mut self, source: &S) -> Result<(), MomentsError>
    where
        S: NumericSource<P::Scalar> + ?Sized,
    {
        self.engine.update(source)
    }

    /// The raw partial accumulated so far.
    pub fn partial(&self) -> Option<&P> {
        self.engine.partial()
    }

    /// Hand over the partial and start again from `Empty`.
    pub fn take_partial(&mut self) -> Option<P> {
        self.engine.take_partial()
    }

    /// Encode the partial for transport to the master.
    pub fn snapshot(&self) -> Result<Vec<u8>, MomentsError> {
        self.engine.snapshot()
    }

    /// Number of local observations folded in.
    pub fn observations(&self) -> usize {
        self.engine.observations()
    }

    /// Discard the local partial.
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

// ============================================================================
// Master
// ============================================================================

/// Combining role: merges partials from workers and finalizes.
#[derive(Debug, Clone)]
pub struct DistributedMaster<P: PartialResult> {
    core: EngineCore<P>,
    pending: Vec<P>,
    combined: Option<P>,
}

impl<P: PartialResult> DistributedMaster<P> {
    fn columns(&self) -> Option<usize> {
        self.combined
            .as_ref()
            .or_else(|| self.pending.first())
            .map(|p| p.columns())
    }

    /// Queue one worker partial for the next `compute`.
    pub fn add_input(&mut self, partial: P) -> Result<(), MomentsError> {
        if let Some(columns) = self.columns() {
            Validator::validate_dimensions(columns, partial.columns())?;
        }
        self.pending.push(partial);
        Ok(())
    }

    /// Decode and queue a partial produced by [`DistributedWorker::snapshot`].
    pub fn add_encoded(&mut self, bytes: &[u8]) -> Result<(), MomentsError> {
        let partial: P = snapshot::decode(bytes)?;
        self.add_input(partial)
    }

    /// Merge every queued partial into the combined partial.
    ///
    /// Fails with `EmptyInputCollection` when nothing is queued. On error the
    /// queue and the combined partial are left unchanged.
    pub fn compute(&mut self) -> Result<&P, MomentsError> {
        if self.pending.is_empty() {
            return Err(MomentsError::EmptyInputCollection);
        }

        let mut inputs = self.pending.iter();
        let mut combined = match &self.combined {
            Some(c) => c.clone(),
            None => match inputs.next() {
                Some(first) => first.clone(),
                None => return Err(MomentsError::EmptyInputCollection),
            },
        };
        for partial in inputs {
            combined.merge(partial)?;
        }

        debug!(
            "master {}: merged {} partials, {} observations total",
            P::ALGORITHM,
            self.pending.len(),
            combined.observations()
        );

        self.pending.clear();
        Ok(&*self.combined.insert(combined))
    }

    /// Queue `partials` and merge them in one call.
    ///
    /// On error none of `partials` stays queued.
    pub fn compute_step<I>(&mut self, partials: I) -> Result<&P, MomentsError>
    where
        I: IntoIterator<Item = P>,
    {
        let queued = self.pending.len();
        let outcome = partials
            .into_iter()
            .try_for_each(|partial| self.add_input(partial))
            .and_then(|()| self.compute().map(|_| ()));
        if let Err(e) = outcome {
            self.pending.truncate(queued);
            return Err(e);
        }
        self.combined.as_ref().ok_or(MomentsError::NotComputed)
    }

    /// Finalize the combined partial.
    ///
    /// Fails with `NotComputed` before the first successful `compute`.
    pub fn finalize_compute(&self) -> Result<P::Output, MomentsError> {
        match &self.combined {
            Some(combined) => combined.finalize(&self.core.params),
            None => Err(MomentsError::NotComputed),
        }
    }

    /// The combined partial, after at least one `compute`.
    pub fn combined(&self) -> Option<&P> {
        self.combined.as_ref()
    }

    /// Number of partials waiting for the next `compute`.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drop the queue and the combined partial.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.combined = None;
    }
}
