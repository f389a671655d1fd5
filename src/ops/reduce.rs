//! Reduction chunk kernels.
//!
//! Each kernel makes a single pass in walker order, skips fill-valued
//! elements, and folds the rest into a [`ChunkAccumulator`]. Comparisons
//! run on the native element type; scalar accumulation widens to `f64`.

use crate::element::{ChunkView, Element};
use crate::ops::args::{StatMask, Threshold, ThresholdDir};
use crate::types::ChunkAccumulator;
use crate::walker::OffsetWalker;

/// Shared traversal: calls `visit` for every contributing (non-fill)
/// element and returns how many there were.
fn fold_valid<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    fill: Option<T>,
    mut visit: impl FnMut(T),
) -> u64 {
    let mut count = 0u64;
    for offset in OffsetWalker::new(extents) {
        let elem = view.get(offset);
        if fill == Some(elem) {
            continue;
        }
        visit(elem);
        count += 1;
    }
    count
}

pub fn reduce_extreme<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    want_max: bool,
    fill: Option<T>,
) -> ChunkAccumulator {
    let mut best: Option<T> = None;
    let count = fold_valid(extents, view, fill, |elem| {
        let improves = match best {
            None => true,
            Some(b) => {
                if want_max {
                    elem > b
                } else {
                    elem < b
                }
            }
        };
        if improves {
            best = Some(elem);
        }
    });
    ChunkAccumulator::Extreme {
        value: best.map(Element::widen).unwrap_or(0.0),
        count,
    }
}

pub fn reduce_total<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    fill: Option<T>,
) -> ChunkAccumulator {
    let mut sum = 0.0f64;
    let count = fold_valid(extents, view, fill, |elem| sum += elem.widen());
    ChunkAccumulator::Total { sum, count }
}

pub fn reduce_moments<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    fill: Option<T>,
) -> ChunkAccumulator {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let count = fold_valid(extents, view, fill, |elem| {
        let v = elem.widen();
        sum += v;
        sum_sq += v * v;
    });
    ChunkAccumulator::Moments { sum, sum_sq, count }
}

pub fn reduce_stats<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    mask: StatMask,
    fill: Option<T>,
) -> ChunkAccumulator {
    let mut min: Option<T> = None;
    let mut max: Option<T> = None;
    let mut sum = 0.0f64;
    let count = fold_valid(extents, view, fill, |elem| {
        if mask.min() && min.map_or(true, |b| elem < b) {
            min = Some(elem);
        }
        if mask.max() && max.map_or(true, |b| elem > b) {
            max = Some(elem);
        }
        if mask.avg() {
            sum += elem.widen();
        }
    });
    ChunkAccumulator::Stats {
        min: min.map(Element::widen).unwrap_or(0.0),
        max: max.map(Element::widen).unwrap_or(0.0),
        sum,
        count,
    }
}

pub fn count_outliers<T: Element>(
    extents: &[usize],
    view: &ChunkView<'_, T>,
    threshold: Threshold,
    fill: Option<T>,
) -> ChunkAccumulator {
    // Compare in the native type so integer thresholds behave like the
    // stored elements do.
    let bound = T::narrow(threshold.value);
    let mut hits = 0u64;
    fold_valid(extents, view, fill, |elem| {
        let hit = match threshold.dir {
            ThresholdDir::Greater => elem > bound,
            ThresholdDir::Less => elem < bound,
        };
        if hit {
            hits += 1;
        }
    });
    ChunkAccumulator::Outliers { hits }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: Element>(vals: &[T]) -> Vec<u8> {
        vals.iter()
            .flat_map(|v| bytemuck::bytes_of(v).to_vec())
            .collect()
    }

    #[test]
    fn extreme_seeds_from_first_contributing() {
        let bytes = encode(&[5i32, 3, 9, 1]);
        let view = ChunkView::<i32>::new(&bytes, 4).unwrap();
        let acc = reduce_extreme(&[4], &view, true, None);
        assert_eq!(
            acc,
            ChunkAccumulator::Extreme {
                value: 9.0,
                count: 4
            }
        );
        let acc = reduce_extreme(&[4], &view, false, None);
        assert_eq!(
            acc,
            ChunkAccumulator::Extreme {
                value: 1.0,
                count: 4
            }
        );
    }

    #[test]
    fn all_fill_chunk_counts_zero() {
        let bytes = encode(&[5i16, 5, 5]);
        let view = ChunkView::<i16>::new(&bytes, 3).unwrap();
        let acc = reduce_extreme(&[3], &view, true, Some(5));
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn total_excludes_fill() {
        let bytes = encode(&[1.0f64, -1.0, 2.5, -1.0]);
        let view = ChunkView::<f64>::new(&bytes, 4).unwrap();
        let acc = reduce_total(&[4], &view, Some(-1.0));
        assert_eq!(
            acc,
            ChunkAccumulator::Total {
                sum: 3.5,
                count: 2
            }
        );
    }

    #[test]
    fn moments_collects_sum_and_squares() {
        let bytes = encode(&[2i64, 3, 4]);
        let view = ChunkView::<i64>::new(&bytes, 3).unwrap();
        let acc = reduce_moments(&[3], &view, None);
        assert_eq!(
            acc,
            ChunkAccumulator::Moments {
                sum: 9.0,
                sum_sq: 29.0,
                count: 3
            }
        );
    }

    #[test]
    fn stats_tracks_only_enabled_flags() {
        let bytes = encode(&[4i32, 1, 7, 2]);
        let view = ChunkView::<i32>::new(&bytes, 4).unwrap();
        let acc = reduce_stats(&[4], &view, StatMask::parse(Some("110")), None);
        // Avg flag off: sum stays zero.
        assert_eq!(
            acc,
            ChunkAccumulator::Stats {
                min: 1.0,
                max: 7.0,
                sum: 0.0,
                count: 4
            }
        );
    }

    #[test]
    fn outlier_counts_both_directions() {
        let bytes = encode(&[1i32, 2, 3, 4, 5]);
        let view = ChunkView::<i32>::new(&bytes, 5).unwrap();
        let above = count_outliers(&[5], &view, Threshold::parse(Some(">3")).unwrap(), None);
        assert_eq!(above, ChunkAccumulator::Outliers { hits: 2 });
        let below = count_outliers(&[5], &view, Threshold::parse(Some("<3")).unwrap(), None);
        assert_eq!(below, ChunkAccumulator::Outliers { hits: 2 });
    }
}
