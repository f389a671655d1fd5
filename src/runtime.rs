//! Public entry points driven by the storage middleware, once per chunk:
//! classify, compute, merge.

use crate::element::{decode_fill, with_element, ChunkView, ChunkViewMut};
use crate::error::KernelError;
use crate::merge;
use crate::ops::args::{parse_scalar, ScalarArg, StatMask, Threshold};
use crate::ops::catalog;
use crate::ops::spec::{OpKind, ReduceOp};
use crate::ops::{map, reduce};
use crate::types::{ArrayDescriptor, ChunkAccumulator, OperationRequest, RunningAccumulator};

/// Pure query: how many merged scalar results the operation produces, so
/// the caller can decide whether cross-chunk merging applies at all.
/// Unknown names answer 0 rather than erroring.
pub fn classify_is_reduction(name: &str, args: Option<&str>) -> usize {
    catalog::reduction_arity(name, args)
}

/// Runs the requested operation over one chunk.
///
/// Elementwise kinds rewrite `chunk` in place and return `Ok(None)`;
/// reduction kinds leave it untouched and return a per-chunk accumulator.
/// A declared no-op (pass-through, zero statistic mask, missing threshold,
/// absent or malformed scalar) leaves the buffer byte-identical and
/// returns `Ok(None)`.
pub fn compute_chunk(
    descriptor: &ArrayDescriptor,
    chunk: &mut [u8],
    request: &OperationRequest,
    fill: Option<&[u8]>,
) -> Result<Option<ChunkAccumulator>, KernelError> {
    let kind = catalog::classify(request.operation())?;
    if chunk.len() != descriptor.total_bytes() {
        return Err(KernelError::BufferSizeMismatch {
            expected: descriptor.total_bytes(),
            got: chunk.len(),
        });
    }
    let extents = descriptor.extents();
    let n = descriptor.element_count();

    with_element!(descriptor.element_type(), T => {
        let fill = decode_fill::<T>(fill)?;
        match kind {
            OpKind::PassThrough => Ok(None),
            OpKind::MapUnary(func) => {
                let mut view = ChunkViewMut::<T>::new(chunk, n)?;
                map::apply_unary(extents, &mut view, func, fill);
                Ok(None)
            }
            OpKind::MapScalar(op) => {
                let scalar = match parse_scalar(request.args()) {
                    ScalarArg::Value(v) => Some(v),
                    ScalarArg::Absent => op.default_scalar(),
                    ScalarArg::Malformed => None,
                };
                let Some(scalar) = scalar else {
                    return Ok(None);
                };
                let mut view = ChunkViewMut::<T>::new(chunk, n)?;
                map::apply_scalar(extents, &mut view, op, scalar, fill);
                Ok(None)
            }
            OpKind::Reduce(op) => {
                let view = ChunkView::<T>::new(chunk, n)?;
                let acc = match op {
                    ReduceOp::Max => reduce::reduce_extreme(extents, &view, true, fill),
                    ReduceOp::Min => reduce::reduce_extreme(extents, &view, false, fill),
                    ReduceOp::Sum | ReduceOp::Avg => reduce::reduce_total(extents, &view, fill),
                    ReduceOp::Std | ReduceOp::Var => reduce::reduce_moments(extents, &view, fill),
                };
                Ok(Some(acc))
            }
            OpKind::MultiStat => {
                let mask = StatMask::parse(request.args());
                if mask.is_empty() {
                    return Ok(None);
                }
                let view = ChunkView::<T>::new(chunk, n)?;
                Ok(Some(reduce::reduce_stats(extents, &view, mask, fill)))
            }
            OpKind::Outlier => {
                let Some(threshold) = Threshold::parse(request.args()) else {
                    return Ok(None);
                };
                let view = ChunkView::<T>::new(chunk, n)?;
                Ok(Some(reduce::count_outliers(extents, &view, threshold, fill)))
            }
        }
    })
}

/// Folds one chunk's accumulator into the running aggregate and refreshes
/// the output buffer. Consumes the accumulator; an accumulator whose count
/// is zero merges as a no-op, leaving both the running state and the
/// output untouched.
pub fn merge_chunk(
    descriptor: &ArrayDescriptor,
    running: &mut RunningAccumulator,
    accumulator: ChunkAccumulator,
    output: &mut [u8],
    request: &OperationRequest,
) -> Result<(), KernelError> {
    let kind = catalog::classify(request.operation())?;
    if matches!(
        kind,
        OpKind::PassThrough | OpKind::MapScalar(_) | OpKind::MapUnary(_)
    ) {
        return Ok(());
    }
    if accumulator.count() == 0 {
        return Ok(());
    }
    with_element!(descriptor.element_type(), T => {
        merge::merge_typed::<T>(kind, request.args(), running, accumulator, output)
    })
}
