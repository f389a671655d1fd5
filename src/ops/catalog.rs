//! Operation name registry.
//!
//! A static metadata table maps every supported operation name onto its
//! classified [`OpKind`]; a lazily built index serves name lookups. Several
//! names alias one function table entry (`round`/`nint`, `int`/`floor`).

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::KernelError;
use crate::ops::args::StatMask;
use crate::ops::spec::{OpKind, ReduceOp, ScalarOp, UnaryFunc};

#[derive(Debug, Clone, Copy)]
pub struct OpMeta {
    pub name: &'static str,
    pub kind: OpKind,
}

const fn meta(name: &'static str, kind: OpKind) -> OpMeta {
    OpMeta { name, kind }
}

const OP_METAS: [OpMeta; 35] = [
    meta("nop", OpKind::PassThrough),
    meta("stream", OpKind::PassThrough),
    meta("max", OpKind::Reduce(ReduceOp::Max)),
    meta("min", OpKind::Reduce(ReduceOp::Min)),
    meta("sum", OpKind::Reduce(ReduceOp::Sum)),
    meta("avg", OpKind::Reduce(ReduceOp::Avg)),
    meta("std", OpKind::Reduce(ReduceOp::Std)),
    meta("var", OpKind::Reduce(ReduceOp::Var)),
    meta("stat", OpKind::MultiStat),
    meta("outlier", OpKind::Outlier),
    meta("sum_scalar", OpKind::MapScalar(ScalarOp::Add)),
    meta("mul_scalar", OpKind::MapScalar(ScalarOp::Mul)),
    meta("pow", OpKind::MapScalar(ScalarOp::Pow)),
    meta("abs", OpKind::MapUnary(UnaryFunc::Abs)),
    meta("sqr", OpKind::MapUnary(UnaryFunc::Sqr)),
    meta("sqrt", OpKind::MapUnary(UnaryFunc::Sqrt)),
    meta("ceil", OpKind::MapUnary(UnaryFunc::Ceil)),
    meta("floor", OpKind::MapUnary(UnaryFunc::Floor)),
    // `int` aliases floor, which is not truncation toward zero for
    // negatives; kept as-is, see DESIGN.md.
    meta("int", OpKind::MapUnary(UnaryFunc::Floor)),
    meta("round", OpKind::MapUnary(UnaryFunc::Round)),
    meta("nint", OpKind::MapUnary(UnaryFunc::Round)),
    meta("exp", OpKind::MapUnary(UnaryFunc::Exp)),
    meta("log", OpKind::MapUnary(UnaryFunc::Log)),
    meta("log10", OpKind::MapUnary(UnaryFunc::Log10)),
    meta("sin", OpKind::MapUnary(UnaryFunc::Sin)),
    meta("cos", OpKind::MapUnary(UnaryFunc::Cos)),
    meta("tan", OpKind::MapUnary(UnaryFunc::Tan)),
    meta("asin", OpKind::MapUnary(UnaryFunc::Asin)),
    meta("acos", OpKind::MapUnary(UnaryFunc::Acos)),
    meta("atan", OpKind::MapUnary(UnaryFunc::Atan)),
    meta("sinh", OpKind::MapUnary(UnaryFunc::Sinh)),
    meta("cosh", OpKind::MapUnary(UnaryFunc::Cosh)),
    meta("tanh", OpKind::MapUnary(UnaryFunc::Tanh)),
    meta("reci", OpKind::MapUnary(UnaryFunc::Reci)),
    meta("not", OpKind::MapUnary(UnaryFunc::Not)),
];

static NAME_INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();

fn name_index() -> &'static HashMap<&'static str, usize> {
    NAME_INDEX.get_or_init(|| {
        let mut by_name = HashMap::with_capacity(OP_METAS.len());
        for (idx, m) in OP_METAS.iter().enumerate() {
            if by_name.insert(m.name, idx).is_some() {
                panic!("duplicate operation name in registry: {}", m.name);
            }
        }
        by_name
    })
}

/// Classifies an operation name into its kernel kind.
pub fn classify(name: &str) -> Result<OpKind, KernelError> {
    if name.is_empty() {
        return Err(KernelError::MissingOperation);
    }
    name_index()
        .get(name)
        .map(|idx| OP_METAS[*idx].kind)
        .ok_or_else(|| KernelError::UnknownOperation {
            name: name.to_owned(),
        })
}

/// Number of merged scalar results the operation produces per read: 1 for
/// simple reductions and outlier counting, the enabled-flag count for the
/// multi-statistic operation (0 degenerates to a no-op), 0 for everything
/// else including unknown names.
pub fn reduction_arity(name: &str, args: Option<&str>) -> usize {
    match classify(name) {
        Ok(OpKind::Reduce(_)) | Ok(OpKind::Outlier) => 1,
        Ok(OpKind::MultiStat) => StatMask::parse(args).enabled(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_classifies() {
        for m in OP_METAS {
            assert_eq!(classify(m.name).unwrap(), m.kind, "name {}", m.name);
        }
    }

    #[test]
    fn unknown_and_missing_names() {
        assert!(matches!(
            classify("median"),
            Err(KernelError::UnknownOperation { .. })
        ));
        assert!(matches!(classify(""), Err(KernelError::MissingOperation)));
    }

    #[test]
    fn aliases_share_kinds() {
        assert_eq!(classify("int").unwrap(), classify("floor").unwrap());
        assert_eq!(classify("nint").unwrap(), classify("round").unwrap());
    }

    #[test]
    fn arity_counts_merged_results() {
        assert_eq!(reduction_arity("max", None), 1);
        assert_eq!(reduction_arity("outlier", Some(">3")), 1);
        assert_eq!(reduction_arity("stat", Some("111")), 3);
        assert_eq!(reduction_arity("stat", Some("010")), 1);
        assert_eq!(reduction_arity("stat", Some("000")), 0);
        assert_eq!(reduction_arity("sqrt", None), 0);
        assert_eq!(reduction_arity("unheard_of", None), 0);
    }
}
