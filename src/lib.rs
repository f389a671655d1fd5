//! Streaming chunk-wise analytical kernels for multi-dimensional array
//! reads.
//!
//! The storage middleware retrieves a dataset piecewise and drives this
//! crate once per chunk: [`compute_chunk`] either rewrites the chunk's
//! elements under a pointwise function or folds them into a lightweight
//! per-chunk accumulator, and [`merge_chunk`] folds that accumulator into
//! a caller-owned running aggregate whose up-to-date value always sits in
//! the output buffer. The caller never needs the whole array resident at
//! once.

pub mod element;
pub mod error;
mod merge;
pub mod ops;
pub mod runtime;
pub mod types;
pub mod walker;

pub use error::KernelError;
pub use ops::{OpKind, ReduceOp, ScalarOp, StatMask, Threshold, ThresholdDir, UnaryFunc};
pub use runtime::{classify_is_reduction, compute_chunk, merge_chunk};
pub use types::{
    ArrayDescriptor, ChunkAccumulator, ElementType, OperationRequest, RunningAccumulator,
};
