//! Cross-chunk merge kernel.
//!
//! Folds one chunk's accumulator into the caller-owned running accumulator
//! and refreshes the output buffer, so after every merge the output holds
//! the aggregate over all chunks seen so far in the element's native
//! encoding. Extremes compare against the value already written in the
//! output slot; running totals live in the running accumulator and are
//! lazily reset when the first non-empty chunk arrives.

use crate::element::Element;
use crate::error::KernelError;
use crate::ops::args::StatMask;
use crate::ops::spec::{OpKind, ReduceOp};
use crate::types::{ChunkAccumulator, RunningAccumulator};

/// Typed view over the caller's output buffer. Unlike a chunk view the
/// buffer may be larger than required; only a minimum size is enforced.
struct OutputSlots<'a, T: Element> {
    bytes: &'a mut [u8],
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: Element> OutputSlots<'a, T> {
    fn new(bytes: &'a mut [u8], required_elements: usize) -> Result<Self, KernelError> {
        let required = required_elements * std::mem::size_of::<T>();
        if bytes.len() < required {
            return Err(KernelError::OutputTooSmall {
                required,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            _marker: std::marker::PhantomData,
        })
    }

    #[inline]
    fn get(&self, slot: usize) -> T {
        let step = std::mem::size_of::<T>();
        bytemuck::pod_read_unaligned(&self.bytes[slot * step..slot * step + step])
    }

    #[inline]
    fn set(&mut self, slot: usize, value: T) {
        let step = std::mem::size_of::<T>();
        self.bytes[slot * step..slot * step + step].copy_from_slice(bytemuck::bytes_of(&value));
    }
}

fn mismatch(kind: OpKind) -> KernelError {
    let operation = match kind {
        OpKind::Reduce(ReduceOp::Max) => "max",
        OpKind::Reduce(ReduceOp::Min) => "min",
        OpKind::Reduce(ReduceOp::Sum) => "sum",
        OpKind::Reduce(ReduceOp::Avg) => "avg",
        OpKind::Reduce(ReduceOp::Std) => "std",
        OpKind::Reduce(ReduceOp::Var) => "var",
        OpKind::MultiStat => "stat",
        OpKind::Outlier => "outlier",
        OpKind::PassThrough | OpKind::MapScalar(_) | OpKind::MapUnary(_) => "elementwise",
    };
    KernelError::AccumulatorMismatch { operation }
}

/// Merges one chunk accumulator for a reduction kind. The caller has
/// already skipped pass-through/elementwise kinds and empty accumulators.
pub(crate) fn merge_typed<T: Element>(
    kind: OpKind,
    args: Option<&str>,
    running: &mut RunningAccumulator,
    acc: ChunkAccumulator,
    output: &mut [u8],
) -> Result<(), KernelError> {
    match kind {
        OpKind::Reduce(ReduceOp::Max) | OpKind::Reduce(ReduceOp::Min) => {
            let ChunkAccumulator::Extreme { value, .. } = acc else {
                return Err(mismatch(kind));
            };
            let want_max = kind == OpKind::Reduce(ReduceOp::Max);
            let mut out = OutputSlots::<T>::new(output, 1)?;
            let candidate = T::narrow(value);
            if !running.valid {
                running.valid = true;
                out.set(0, candidate);
            } else {
                let current = out.get(0);
                let improves = if want_max {
                    candidate > current
                } else {
                    candidate < current
                };
                if improves {
                    out.set(0, candidate);
                }
            }
        }
        OpKind::Reduce(ReduceOp::Sum) | OpKind::Reduce(ReduceOp::Avg) => {
            let ChunkAccumulator::Total { sum, count } = acc else {
                return Err(mismatch(kind));
            };
            let mut out = OutputSlots::<T>::new(output, 1)?;
            if !running.valid {
                running.valid = true;
                running.acc1 = 0.0;
                running.count = 0;
            }
            running.acc1 += sum;
            if kind == OpKind::Reduce(ReduceOp::Avg) {
                running.count += count;
            } else {
                // A running total is never averaged.
                running.count = 1;
            }
            out.set(0, T::narrow(running.acc1 / running.count as f64));
        }
        OpKind::Outlier => {
            let ChunkAccumulator::Outliers { hits } = acc else {
                return Err(mismatch(kind));
            };
            let mut out = OutputSlots::<T>::new(output, 1)?;
            if !running.valid {
                running.valid = true;
                running.acc1 = 0.0;
            }
            running.acc1 += hits as f64;
            running.count = 1;
            out.set(0, T::narrow(running.acc1));
        }
        OpKind::Reduce(ReduceOp::Std) | OpKind::Reduce(ReduceOp::Var) => {
            let ChunkAccumulator::Moments { sum, sum_sq, count } = acc else {
                return Err(mismatch(kind));
            };
            let mut out = OutputSlots::<T>::new(output, 1)?;
            if !running.valid {
                running.valid = true;
                running.acc1 = 0.0;
                running.acc2 = 0.0;
                running.count = 0;
            }
            running.acc1 += sum;
            running.acc2 += sum_sq;
            running.count += count;

            let n = running.count as f64;
            let mut variance = (running.acc2 - running.acc1 * running.acc1 / n) / n;
            if running.count > 1 {
                // Bessel's correction: population to sample variance.
                variance *= n / (n - 1.0);
            }
            let result = if kind == OpKind::Reduce(ReduceOp::Std) {
                variance.sqrt()
            } else {
                variance
            };
            out.set(0, T::narrow(result));
        }
        OpKind::MultiStat => {
            let ChunkAccumulator::Stats {
                min,
                max,
                sum,
                count,
            } = acc
            else {
                return Err(mismatch(kind));
            };
            let mask = StatMask::parse(args);
            if mask.is_empty() {
                return Ok(());
            }
            let mut out = OutputSlots::<T>::new(output, mask.enabled())?;
            let was_valid = running.valid;
            running.valid = true;

            // Enabled fields pack at consecutive slots in fixed order:
            // min, then max, then avg.
            let mut slot = 0;
            if mask.min() {
                let candidate = T::narrow(min);
                if !was_valid || candidate < out.get(slot) {
                    out.set(slot, candidate);
                }
                slot += 1;
            }
            if mask.max() {
                let candidate = T::narrow(max);
                if !was_valid || candidate > out.get(slot) {
                    out.set(slot, candidate);
                }
                slot += 1;
            }
            if mask.avg() {
                if !was_valid {
                    running.acc1 = 0.0;
                    running.count = 0;
                }
                running.acc1 += sum;
                running.count += count;
                out.set(slot, T::narrow(running.acc1 / running.count as f64));
            }
        }
        OpKind::PassThrough | OpKind::MapScalar(_) | OpKind::MapUnary(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extreme(value: f64, count: u64) -> ChunkAccumulator {
        ChunkAccumulator::Extreme { value, count }
    }

    #[test]
    fn max_overwrites_only_on_improvement() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0u8; 4];
        merge_typed::<i32>(
            OpKind::Reduce(ReduceOp::Max),
            None,
            &mut running,
            extreme(7.0, 3),
            &mut out,
        )
        .unwrap();
        assert_eq!(i32::from_ne_bytes(out[..4].try_into().unwrap()), 7);

        merge_typed::<i32>(
            OpKind::Reduce(ReduceOp::Max),
            None,
            &mut running,
            extreme(5.0, 2),
            &mut out,
        )
        .unwrap();
        assert_eq!(i32::from_ne_bytes(out[..4].try_into().unwrap()), 7);

        merge_typed::<i32>(
            OpKind::Reduce(ReduceOp::Max),
            None,
            &mut running,
            extreme(11.0, 1),
            &mut out,
        )
        .unwrap();
        assert_eq!(i32::from_ne_bytes(out[..4].try_into().unwrap()), 11);
    }

    #[test]
    fn avg_accumulates_count_sum_pins_it() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0u8; 8];
        merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Avg),
            None,
            &mut running,
            ChunkAccumulator::Total { sum: 6.0, count: 3 },
            &mut out,
        )
        .unwrap();
        merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Avg),
            None,
            &mut running,
            ChunkAccumulator::Total { sum: 4.0, count: 1 },
            &mut out,
        )
        .unwrap();
        assert_eq!(f64::from_ne_bytes(out[..8].try_into().unwrap()), 2.5);

        let mut running = RunningAccumulator::new();
        merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Sum),
            None,
            &mut running,
            ChunkAccumulator::Total { sum: 6.0, count: 3 },
            &mut out,
        )
        .unwrap();
        merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Sum),
            None,
            &mut running,
            ChunkAccumulator::Total { sum: 4.0, count: 1 },
            &mut out,
        )
        .unwrap();
        assert_eq!(f64::from_ne_bytes(out[..8].try_into().unwrap()), 10.0);
        assert_eq!(running.count, 1);
    }

    #[test]
    fn variance_single_element_is_zero() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0u8; 8];
        merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Var),
            None,
            &mut running,
            ChunkAccumulator::Moments {
                sum: 3.0,
                sum_sq: 9.0,
                count: 1,
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(f64::from_ne_bytes(out[..8].try_into().unwrap()), 0.0);
    }

    #[test]
    fn stat_mask_packs_enabled_slots_only() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0xAAu8; 12];
        merge_typed::<i32>(
            OpKind::MultiStat,
            Some("110"),
            &mut running,
            ChunkAccumulator::Stats {
                min: 1.0,
                max: 9.0,
                sum: 0.0,
                count: 4,
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(i32::from_ne_bytes(out[0..4].try_into().unwrap()), 1);
        assert_eq!(i32::from_ne_bytes(out[4..8].try_into().unwrap()), 9);
        // Third slot untouched.
        assert_eq!(&out[8..12], &[0xAA; 4]);
    }

    #[test]
    fn wrong_accumulator_variant_is_rejected() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0u8; 8];
        let err = merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Sum),
            None,
            &mut running,
            ChunkAccumulator::Outliers { hits: 2 },
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KernelError::AccumulatorMismatch { operation: "sum" }
        ));
    }

    #[test]
    fn output_too_small_is_rejected() {
        let mut running = RunningAccumulator::new();
        let mut out = vec![0u8; 4];
        let err = merge_typed::<f64>(
            OpKind::Reduce(ReduceOp::Max),
            None,
            &mut running,
            extreme(1.0, 1),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KernelError::OutputTooSmall {
                required: 8,
                got: 4
            }
        ));
    }
}
