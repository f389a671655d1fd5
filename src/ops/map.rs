//! Elementwise chunk kernels.
//!
//! Rewrite the chunk buffer in place, element by element, in walker order.
//! Fill-valued elements are preserved verbatim regardless of the function's
//! mathematical image; all other elements widen to `f64`, go through the
//! function, and narrow back to the native width at the same offset.

use crate::element::{ChunkViewMut, Element};
use crate::ops::spec::{ScalarOp, UnaryFunc};
use crate::walker::OffsetWalker;

pub fn apply_unary<T: Element>(
    extents: &[usize],
    view: &mut ChunkViewMut<'_, T>,
    func: UnaryFunc,
    fill: Option<T>,
) {
    for offset in OffsetWalker::new(extents) {
        let elem = view.get(offset);
        if fill == Some(elem) {
            continue;
        }
        view.set(offset, T::narrow(func.apply(elem.widen())));
    }
}

pub fn apply_scalar<T: Element>(
    extents: &[usize],
    view: &mut ChunkViewMut<'_, T>,
    op: ScalarOp,
    scalar: f64,
    fill: Option<T>,
) {
    // The scalar is narrowed once so integer element types see an integer
    // operand, matching the native-typed arithmetic of the storage layer.
    let scalar = T::narrow(scalar).widen();
    for offset in OffsetWalker::new(extents) {
        let elem = view.get(offset);
        if fill == Some(elem) {
            continue;
        }
        view.set(offset, T::narrow(op.apply(elem.widen(), scalar)));
    }
}
