/// Simple single-statistic reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    Max,
    Min,
    Sum,
    Avg,
    Std,
    Var,
}

/// Argument-parameterized elementwise transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarOp {
    Add,
    Mul,
    Pow,
}

impl ScalarOp {
    /// Identity applied when the argument string is absent. `Pow` has no
    /// entry here: absent arguments degrade it to a pass-through instead
    /// (observed legacy behavior, kept as-is).
    #[inline]
    pub fn default_scalar(self) -> Option<f64> {
        match self {
            Self::Add => Some(0.0),
            Self::Mul => Some(1.0),
            Self::Pow => None,
        }
    }

    #[inline]
    pub fn apply(self, x: f64, scalar: f64) -> f64 {
        match self {
            Self::Add => x + scalar,
            Self::Mul => x * scalar,
            Self::Pow => x.powf(scalar),
        }
    }
}

/// Fixed elementwise math-function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunc {
    Abs,
    Sqr,
    Sqrt,
    Ceil,
    /// Also serves `int`, which the legacy kernels defined as floor rather
    /// than truncation toward zero; preserved, see DESIGN.md.
    Floor,
    /// Round half up: `floor(x + 0.5)`, also serving `nint`.
    Round,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Reci,
    Not,
}

impl UnaryFunc {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Abs => x.abs(),
            Self::Sqr => x * x,
            Self::Sqrt => x.sqrt(),
            Self::Ceil => x.ceil(),
            Self::Floor => x.floor(),
            Self::Round => (x + 0.5).floor(),
            Self::Exp => x.exp(),
            Self::Log => x.ln(),
            Self::Log10 => x.log10(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Reci => 1.0 / x,
            Self::Not => {
                if x == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Classified operation kind; decides which kernel runs over a chunk and
/// whether cross-chunk merging applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    PassThrough,
    Reduce(ReduceOp),
    MultiStat,
    Outlier,
    MapScalar(ScalarOp),
    MapUnary(UnaryFunc),
}
