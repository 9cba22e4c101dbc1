//! High-level API for partial-result statistics.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for configuring an estimator and choosing an execution
//! adapter (Batch, Online, or Distributed).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to specialized adapter builders.
//! * **Validated**: Parameters are validated when `.build()` is called on the adapter.
//! * **One builder per algorithm**: `LowOrderMoments`, `Covariance` and `Qr`
//!   are the same generic builder specialized to a partial-result type.
//!
//! ## Key concepts
//!
//! * **Execution Adapters**: Batch, Online, and Distributed modes.
//! * **Configuration Flow**: Builder pattern ending in `.adapter(Adapter::Type)`.
//!
//! ### Configuration Flow
//!
//! 1. Create a builder via `LowOrderMoments::new()` (or `Covariance::new()`,
//!    `Qr::new()`).
//! 2. Chain configuration methods (`.block_size()`, `.estimates()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Batch)` and call `.build()`.

// Publicly re-exported types
pub use crate::adapters::EngineSettings;
pub use crate::adapters::batch::{BatchBuilder, BatchEngine};
pub use crate::adapters::distributed::{DistributedBuilder, DistributedMaster, DistributedWorker};
pub use crate::adapters::online::{OnlineBuilder, OnlineEngine, OnlineState};
pub use crate::algorithms::covariance::{CovarianceOutput, CovariancePartial, CovarianceResult};
pub use crate::algorithms::moments::{
    EstimatesToCompute, MomentsPartial, MomentsResult, finalize_moments,
};
pub use crate::algorithms::qr::{QrParams, QrPartial, QrResult};
pub use crate::algorithms::zscore::{ZScore, ZScoreResult};
pub use crate::engine::protocol::PartialResult;
pub use crate::engine::snapshot::{
    SNAPSHOT_VERSION, decode as decode_partial, encode as encode_partial,
};
pub use crate::math::StatsFloat;
pub use crate::primitives::backend::{Backend, DEFAULT_BLOCK_SIZE, ExecutionContext, KernelPath};
pub use crate::primitives::errors::MomentsError;
pub use crate::primitives::table::{CsrTable, DenseTable, NumericSource, SliceTable};

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Batch, Distributed, Online};
}

/// Builder for low-order moments.
pub type LowOrderMoments<T> = EstimatorBuilder<MomentsPartial<T>>;

/// Builder for covariance and correlation.
pub type Covariance<T> = EstimatorBuilder<CovariancePartial<T>>;

/// Builder for the QR `R` factor.
pub type Qr<T> = EstimatorBuilder<QrPartial<T>>;

// ============================================================================
// Estimator Builder
// ============================================================================

/// Fluent builder for configuring an estimator and its execution mode.
#[derive(Debug, Clone)]
pub struct EstimatorBuilder<P: PartialResult> {
    /// Rows read from a source per block.
    pub block_size: Option<usize>,

    /// Accumulation kernel selection.
    pub kernel: Option<KernelPath>,

    /// Execution backend.
    pub backend: Option<Backend>,

    /// Algorithm-specific finalization parameters.
    pub params: Option<P::Params>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<P: PartialResult> Default for EstimatorBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PartialResult> EstimatorBuilder<P> {
    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: EstimatorAdapter<P>,
    {
        A::convert(self)
    }

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            block_size: None,
            kernel: None,
            backend: None,
            params: None,
            duplicate_param: None,
        }
    }

    /// Set the number of rows read from a source per block.
    pub fn block_size(mut self, block_size: usize) -> Self {
        if self.block_size.is_some() {
            self.duplicate_param = Some("block_size");
        }
        self.block_size = Some(block_size);
        self
    }

    /// Set the accumulation kernel.
    pub fn kernel(mut self, kernel: KernelPath) -> Self {
        if self.kernel.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.kernel = Some(kernel);
        self
    }

    /// Set the execution backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        if self.backend.is_some() {
            self.duplicate_param = Some("backend");
        }
        self.backend = Some(backend);
        self
    }

    fn set_params(mut self, params: P::Params, name: &'static str) -> Self {
        if self.params.is_some() {
            self.duplicate_param = Some(name);
        }
        self.params = Some(params);
        self
    }

    fn into_settings(self) -> EngineSettings<P> {
        let mut settings = EngineSettings::default();
        if let Some(bs) = self.block_size {
            settings.block_size = bs;
        }
        if let Some(k) = self.kernel {
            settings.kernel = k;
        }
        if let Some(b) = self.backend {
            settings.backend = b;
        }
        if let Some(p) = self.params {
            settings.params = p;
        }
        settings.duplicate_param = self.duplicate_param;
        settings
    }
}

impl<T: StatsFloat> EstimatorBuilder<MomentsPartial<T>> {
    /// Select which statistics finalization produces.
    pub fn estimates(self, estimates: EstimatesToCompute) -> Self {
        self.set_params(estimates, "estimates")
    }
}

impl<T: StatsFloat> EstimatorBuilder<CovariancePartial<T>> {
    /// Select covariance or correlation output.
    pub fn output(self, output: CovarianceOutput) -> Self {
        self.set_params(output, "output")
    }
}

// ============================================================================
// Adapters
// ============================================================================

/// Trait for transitioning from a generic builder to an execution builder.
pub trait EstimatorAdapter<P: PartialResult> {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`EstimatorBuilder`] into a specialized execution builder.
    fn convert(builder: EstimatorBuilder<P>) -> Self::Output;
}

/// Marker for single-pass batch processing.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl<P: PartialResult> EstimatorAdapter<P> for Batch {
    type Output = BatchBuilder<P>;

    fn convert(builder: EstimatorBuilder<P>) -> Self::Output {
        BatchBuilder {
            settings: builder.into_settings(),
        }
    }
}

/// Marker for incremental online processing.
#[derive(Debug, Clone, Copy)]
pub struct Online;

impl<P: PartialResult> EstimatorAdapter<P> for Online {
    type Output = OnlineBuilder<P>;

    fn convert(builder: EstimatorBuilder<P>) -> Self::Output {
        OnlineBuilder {
            settings: builder.into_settings(),
        }
    }
}

/// Marker for distributed worker / master processing.
#[derive(Debug, Clone, Copy)]
pub struct Distributed;

impl<P: PartialResult> EstimatorAdapter<P> for Distributed {
    type Output = DistributedBuilder<P>;

    fn convert(builder: EstimatorBuilder<P>) -> Self::Output {
        DistributedBuilder {
            settings: builder.into_settings(),
        }
    }
}
