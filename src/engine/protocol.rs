//! The partial-result protocol shared by every algorithm.
//!
//! ## Purpose
//!
//! This module defines `PartialResult`, the contract that lets one set of
//! engines (batch, online, distributed) drive any statistic that can be
//! decomposed into local accumulation, merge, and finalization.
//!
//! ## Key concepts
//!
//! * **Accumulate**: `update_block` folds a row-major block of observations.
//! * **Merge**: `merge` combines two independently populated partials so the
//!   result equals processing the union of their observations.
//! * **Finalize**: `finalize` is a pure read producing the derived output.
//! * **Wire**: `to_wire` / `from_wire` move a partial across a process
//!   boundary through the snapshot codec.
//!
//! ## Invariants
//!
//! * The column count is fixed when a partial is created.
//! * Merging a partial with zero observations leaves `self` unchanged.
//! * `merge` is commutative and associative up to floating-point rounding.

// External dependencies
use core::fmt::Debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

// Internal dependencies
use crate::math::StatsFloat;
use crate::primitives::backend::ExecutionContext;
use crate::primitives::buffer::Scratch;
use crate::primitives::errors::MomentsError;

/// A mergeable intermediate result.
pub trait PartialResult: Clone + Debug + Send + Sync + Sized {
    /// Float type the partial accumulates in.
    type Scalar: StatsFloat;

    /// Parameters consulted at finalization.
    type Params: Clone + Debug + Default + PartialEq + Send + Sync;

    /// Finalized output.
    type Output;

    /// Serializable body written by the snapshot codec.
    type Wire: Serialize + DeserializeOwned;

    /// Stable algorithm tag written into snapshots.
    const ALGORITHM: &'static str;

    /// Create the identity partial for `columns` features.
    fn empty(columns: usize) -> Result<Self, MomentsError>;

    /// Number of features.
    fn columns(&self) -> usize;

    /// Number of observations folded in so far.
    fn observations(&self) -> usize;

    /// Fold a row-major block of `rows` observations.
    fn update_block(
        &mut self,
        block: &[Self::Scalar],
        rows: usize,
        ctx: &ExecutionContext,
        scratch: &mut Scratch<Self::Scalar>,
    ) -> Result<(), MomentsError>;

    /// Merge `other` into `self`.
    fn merge(&mut self, other: &Self) -> Result<(), MomentsError>;

    /// Derive the final output without mutating the partial.
    fn finalize(&self, params: &Self::Params) -> Result<Self::Output, MomentsError>;

    /// Convert to the wire body.
    fn to_wire(&self) -> Self::Wire;

    /// Rebuild from a wire body, validating shapes.
    fn from_wire(wire: Self::Wire) -> Result<Self, MomentsError>;
}
