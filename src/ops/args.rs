//! Operation argument mini-parser.
//!
//! Three decode modes, selected by the classified operation kind: a single
//! numeric scalar, a 3-bit statistic flag mask, and a comparison threshold.
//! Arguments are comma-separated and every mode decodes only the first
//! token. Malformed or empty input never errors; it degrades the chunk to
//! a declared no-op so one degenerate request cannot poison a multi-chunk
//! read.

/// Outcome of parsing a scalar argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarArg {
    Value(f64),
    Absent,
    Malformed,
}

pub fn parse_scalar(args: Option<&str>) -> ScalarArg {
    let Some(raw) = args else {
        return ScalarArg::Absent;
    };
    let token = raw.split(',').next().unwrap_or("").trim();
    if token.is_empty() {
        return ScalarArg::Absent;
    }
    match token.parse::<f64>() {
        Ok(v) => ScalarArg::Value(v),
        Err(_) => ScalarArg::Malformed,
    }
}

/// Enabled-statistic flags for the multi-statistic operation, decoded from
/// up to three leading characters read positionally: `'1'` at position p
/// sets bit p. Anything shorter or without a `'1'` yields an empty mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatMask(u8);

impl StatMask {
    const MIN: u8 = 1;
    const MAX: u8 = 2;
    const AVG: u8 = 4;

    pub fn parse(args: Option<&str>) -> Self {
        let mut bits = 0u8;
        if let Some(raw) = args {
            let token = raw.split(',').next().unwrap_or("");
            for (pos, ch) in token.chars().take(3).enumerate() {
                if ch == '1' {
                    bits |= 1 << pos;
                }
            }
        }
        Self(bits)
    }

    #[inline]
    pub fn min(self) -> bool {
        self.0 & Self::MIN != 0
    }

    #[inline]
    pub fn max(self) -> bool {
        self.0 & Self::MAX != 0
    }

    #[inline]
    pub fn avg(self) -> bool {
        self.0 & Self::AVG != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of enabled statistics, which is also the number of packed
    /// output slots the merge writes.
    #[inline]
    pub fn enabled(self) -> usize {
        self.0.count_ones() as usize
    }
}

/// Comparison direction for outlier counting. Greater-than is the default;
/// only an explicit `<` selects less-than.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDir {
    Greater,
    Less,
}

/// Parsed outlier threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub dir: ThresholdDir,
    pub value: f64,
}

impl Threshold {
    /// One optional leading non-digit character is consumed as the
    /// comparison selector; the remainder is the numeric threshold. An
    /// empty or unparseable remainder means the operation is a declared
    /// no-op for the chunk.
    pub fn parse(args: Option<&str>) -> Option<Self> {
        let token = args?.split(',').next().unwrap_or("");
        let mut chars = token.chars();
        let (dir, rest) = match chars.clone().next() {
            Some(c) if !c.is_ascii_digit() => {
                chars.next();
                let dir = if c == '<' {
                    ThresholdDir::Less
                } else {
                    ThresholdDir::Greater
                };
                (dir, chars.as_str())
            }
            _ => (ThresholdDir::Greater, token),
        };
        let value = rest.trim().parse::<f64>().ok()?;
        Some(Self { dir, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_takes_first_comma_token() {
        assert_eq!(parse_scalar(Some("2.5,99")), ScalarArg::Value(2.5));
        assert_eq!(parse_scalar(Some("7")), ScalarArg::Value(7.0));
    }

    #[test]
    fn scalar_absent_and_malformed() {
        assert_eq!(parse_scalar(None), ScalarArg::Absent);
        assert_eq!(parse_scalar(Some("")), ScalarArg::Absent);
        assert_eq!(parse_scalar(Some(",3")), ScalarArg::Absent);
        assert_eq!(parse_scalar(Some("two")), ScalarArg::Malformed);
    }

    #[test]
    fn mask_reads_positions() {
        let m = StatMask::parse(Some("110"));
        assert!(m.min() && m.max() && !m.avg());
        assert_eq!(m.enabled(), 2);

        let m = StatMask::parse(Some("001"));
        assert!(!m.min() && !m.max() && m.avg());

        assert!(StatMask::parse(Some("000")).is_empty());
        assert!(StatMask::parse(Some("abc")).is_empty());
        assert!(StatMask::parse(None).is_empty());
    }

    #[test]
    fn mask_ignores_trailing_characters() {
        let m = StatMask::parse(Some("1111"));
        assert_eq!(m.enabled(), 3);
    }

    #[test]
    fn mask_reads_first_comma_token_only() {
        let m = StatMask::parse(Some("1,1"));
        assert!(m.min() && !m.max() && !m.avg());

        let m = StatMask::parse(Some("11,0"));
        assert!(m.min() && m.max() && !m.avg());
    }

    #[test]
    fn threshold_directions() {
        let t = Threshold::parse(Some(">3")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Greater);
        assert_eq!(t.value, 3.0);

        let t = Threshold::parse(Some("<3")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Less);

        // Bare number keeps the greater-than default.
        let t = Threshold::parse(Some("42")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Greater);
        assert_eq!(t.value, 42.0);

        // Any non-digit lead is consumed; only `<` flips the direction.
        let t = Threshold::parse(Some("=5")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Greater);
        assert_eq!(t.value, 5.0);
    }

    #[test]
    fn threshold_reads_first_comma_token_only() {
        let t = Threshold::parse(Some(">3,5")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Greater);
        assert_eq!(t.value, 3.0);

        let t = Threshold::parse(Some("<2,whatever")).unwrap();
        assert_eq!(t.dir, ThresholdDir::Less);
        assert_eq!(t.value, 2.0);
    }

    #[test]
    fn threshold_degrades_on_bad_input() {
        assert_eq!(Threshold::parse(None), None);
        assert_eq!(Threshold::parse(Some("")), None);
        assert_eq!(Threshold::parse(Some("<")), None);
        assert_eq!(Threshold::parse(Some(">high")), None);
    }
}
