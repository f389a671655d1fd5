//! Row-major dimensional walker.
//!
//! Enumerates the linear element offsets of an N-dimensional array by
//! carry-propagating increment from the last dimension backward, so the
//! last dimension varies fastest. Re-created fresh for each chunk
//! traversal; holds no cross-chunk state.

/// Lazy, finite iterator over linear offsets of the full cross product.
#[derive(Debug, Clone)]
pub struct OffsetWalker {
    extents: Vec<usize>,
    coords: Vec<usize>,
    remaining: usize,
}

impl OffsetWalker {
    pub fn new(extents: &[usize]) -> Self {
        Self {
            extents: extents.to_vec(),
            coords: vec![0; extents.len()],
            remaining: extents.iter().product(),
        }
    }
}

impl Iterator for OffsetWalker {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let mut offset = 0;
        for (extent, coord) in self.extents.iter().zip(&self.coords) {
            offset = offset * extent + coord;
        }

        for dim in (0..self.coords.len()).rev() {
            self.coords[dim] += 1;
            if self.coords[dim] < self.extents[dim] {
                break;
            }
            self.coords[dim] = 0;
        }

        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OffsetWalker {}
