use crate::error::KernelError;

/// Element kind of one array cell, as tagged by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ElementType {
    #[inline]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

/// Shape and element kind of one retrieved chunk.
///
/// Extents are row-major: the last dimension varies fastest in the backing
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDescriptor {
    extents: Vec<usize>,
    element_type: ElementType,
}

impl ArrayDescriptor {
    pub fn new(extents: Vec<usize>, element_type: ElementType) -> Result<Self, KernelError> {
        if extents.is_empty() {
            return Err(KernelError::EmptyExtents);
        }
        Ok(Self {
            extents,
            element_type,
        })
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.extents.len()
    }

    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.extents.iter().product()
    }

    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.element_count() * self.element_type.size_bytes()
    }
}

/// Operation name plus raw argument string, immutable for a whole logical
/// read. Arguments are comma-separated; only the first token is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    operation: String,
    args: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>, args: Option<&str>) -> Self {
        Self {
            operation: operation.into(),
            args: args.map(str::to_owned),
        }
    }

    #[inline]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[inline]
    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }
}

/// Per-chunk partial aggregate, produced by the chunk kernel and consumed
/// exactly once by the merge kernel.
///
/// Scalars are carried as `f64` regardless of element type; the merge kernel
/// narrows back to the element's native encoding when it writes the output.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkAccumulator {
    /// Running extreme for `max`/`min`. `count` tallies contributing
    /// (non-fill) elements and is read downstream only as a has-data flag.
    Extreme { value: f64, count: u64 },
    /// Sum of contributing elements for `sum`/`avg`.
    Total { sum: f64, count: u64 },
    /// Sum and sum of squares for `std`/`var`.
    Moments { sum: f64, sum_sq: f64, count: u64 },
    /// One-pass min/max/sum for the multi-statistic operation.
    Stats {
        min: f64,
        max: f64,
        sum: f64,
        count: u64,
    },
    /// Threshold hit count for `outlier`. The logical count is pinned to 1:
    /// a chunk with zero hits still merges, and the running tally is never
    /// averaged.
    Outliers { hits: u64 },
}

impl ChunkAccumulator {
    /// Operation-specific contribution count. Zero iff the chunk carried no
    /// valid element, in which case the merge kernel skips it.
    #[inline]
    pub fn count(&self) -> u64 {
        match *self {
            Self::Extreme { count, .. } => count,
            Self::Total { count, .. } => count,
            Self::Moments { count, .. } => count,
            Self::Stats { count, .. } => count,
            Self::Outliers { .. } => 1,
        }
    }
}

/// Whole-read aggregate state, owned by the caller for the duration of one
/// logical (multi-chunk) read.
///
/// `valid` stays false until the first non-empty chunk has merged, then
/// stays true for the remainder of the read. The scalar accumulators are
/// lazily reset on that first merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningAccumulator {
    pub valid: bool,
    pub acc1: f64,
    pub acc2: f64,
    pub count: u64,
}

impl RunningAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}
