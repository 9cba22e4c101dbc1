//! Execution context: device backend, kernel path and block size.
//!
//! ## Purpose
//!
//! This module defines the explicit execution context handed to every engine
//! at build time. Nothing in the crate consults global state to decide how a
//! kernel runs; the context travels with the engine.
//!
//! ## Design notes
//!
//! * **Explicit**: Device and kernel selection are plain fields, visible in
//!   `Debug` output and settable from the builder.
//! * **CPU only**: `Backend::GPU` exists so extension crates can route work,
//!   but this crate rejects it at build time.
//! * **Kernel path**: `Auto` picks the vectorized kernel where the float type
//!   has one (f64), scalar otherwise.
//!
//! ## Non-goals
//!
//! * This module does not detect CPU features at runtime beyond what the
//!   `wide` crate already does at compile time.

/// Execution backend hint for extension crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    /// CPU execution.
    #[default]
    CPU,

    /// GPU execution (requires an extension crate with device support).
    GPU,
}

impl Backend {
    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Backend::CPU => "cpu",
            Backend::GPU => "gpu",
        }
    }
}

/// Which accumulation kernel the engine should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelPath {
    /// Vectorized where the float type provides one, scalar otherwise.
    #[default]
    Auto,

    /// Always use the portable scalar kernel.
    Scalar,

    /// Prefer the SIMD kernel (falls back to scalar for types without one).
    Vectorized,
}

impl KernelPath {
    /// Whether the vectorized kernel should be attempted.
    #[inline]
    pub fn wants_simd(self) -> bool {
        !matches!(self, KernelPath::Scalar)
    }
}

/// Default number of rows read from a source per block.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Execution context shared by all engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Device backend.
    pub backend: Backend,

    /// Accumulation kernel selection.
    pub kernel: KernelPath,

    /// Rows per block when reading from a source.
    pub block_size: usize,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            kernel: KernelPath::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}
