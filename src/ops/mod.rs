pub mod args;
pub mod catalog;
pub mod map;
pub mod reduce;
pub mod spec;

pub use args::{parse_scalar, ScalarArg, StatMask, Threshold, ThresholdDir};
pub use catalog::{classify, reduction_arity, OpMeta};
pub use spec::{OpKind, ReduceOp, ScalarOp, UnaryFunc};
