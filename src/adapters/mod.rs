//! Layer 5: Adapters
//!
//! ## Purpose
//!
//! This layer provides the three execution modes over any `PartialResult`:
//!
//! * **Batch**: one source in, finalized statistics out.
//! * **Online**: many sources in over time, finalize whenever needed.
//! * **Distributed**: workers emit raw partials, a master merges and
//!   finalizes.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

// Internal dependencies
use crate::engine::protocol::PartialResult;
use crate::engine::validator::Validator;
use crate::primitives::backend::{Backend, DEFAULT_BLOCK_SIZE, ExecutionContext, KernelPath};
use crate::primitives::errors::MomentsError;

/// Single-pass computation over one source.
pub mod batch;

/// Incremental computation over a sequence of sources.
pub mod online;

/// Worker and master roles for multi-node computation.
pub mod distributed;

// ============================================================================
// Shared Settings
// ============================================================================

/// Configuration shared by every adapter builder.
#[derive(Debug, Clone)]
pub struct EngineSettings<P: PartialResult> {
    /// Rows read from a source per block.
    pub block_size: usize,

    /// Accumulation kernel selection.
    pub kernel: KernelPath,

    /// Execution backend.
    pub backend: Backend,

    /// Algorithm parameters used at finalization.
    pub params: P::Params,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<P: PartialResult> Default for EngineSettings<P> {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            kernel: KernelPath::default(),
            backend: Backend::default(),
            params: P::Params::default(),
            duplicate_param: None,
        }
    }
}

impl<P: PartialResult> EngineSettings<P> {
    /// Validate the settings and produce the execution context.
    pub(crate) fn validate(&self) -> Result<ExecutionContext, MomentsError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        Validator::validate_block_size(self.block_size)?;
        Validator::validate_backend(self.backend)?;

        Ok(ExecutionContext {
            backend: self.backend,
            kernel: self.kernel,
            block_size: self.block_size,
        })
    }
}

/// Fold-time settings carried by a built engine.
#[derive(Debug, Clone)]
pub(crate) struct EngineCore<P: PartialResult> {
    pub(crate) ctx: ExecutionContext,
    pub(crate) params: P::Params,
}

impl<P: PartialResult> EngineCore<P> {
    pub(crate) fn from_settings(settings: EngineSettings<P>) -> Result<Self, MomentsError> {
        let ctx = settings.validate()?;
        Ok(Self {
            ctx,
            params: settings.params,
        })
    }
}
