use regex::Regex;

use crate::error::RecodeError;

/// Substituted for window positions that fall outside the sequence. Never
/// part of the amino acid alphabet, so padded positions cannot satisfy a
/// residue class, while negated classes like `[^P]` still accept them.
const PAD: char = '#';

/// A windowed rule that confirms a candidate cleavage site and tells where to
/// cut relative to it.
///
/// The rule looks at a fixed window of `left` residues before and `right`
/// residues after the candidate position and reports its cut offset when the
/// pattern matches anywhere in that window. An offset of 0 cuts before the
/// candidate residue, 1 cuts after it.
///
/// # Examples
///
/// Trypsin cleaves after K or R not followed by P, and at WKP and MRP:
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let rule = CleavageRule::new("(WKP)|(MRP)|[KR][^P]", 1, 1, 1).unwrap();
///
/// // YRP does not cleave on R followed by P
/// assert_eq!(rule.matches("TYRPT", 2), None);
/// // MRP cleaves, and the configured offset cuts after the R
/// assert_eq!(rule.matches("TMRPT", 2), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct CleavageRule {
    pattern: Regex,
    left: usize,
    right: usize,
    offset: usize,
}

impl CleavageRule {
    /// Compile a rule from its pattern, window radii and cut offset.
    ///
    /// # Errors
    /// [`RecodeError::InvalidPattern`] when the pattern does not compile.
    pub fn new(
        pattern: &str,
        left: usize,
        right: usize,
        offset: usize,
    ) -> Result<Self, RecodeError> {
        Ok(Self {
            pattern: compile(pattern)?,
            left,
            right,
            offset,
        })
    }

    /// The offset at which this rule cuts from a confirmed candidate site.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Test a candidate site, returning the cut offset when the window around
    /// it matches the rule pattern.
    pub fn matches(&self, sequence: &str, site: usize) -> Option<usize> {
        self.pattern
            .is_match(&window(sequence, site, self.left, self.right))
            .then_some(self.offset)
    }
}

/// A windowed rule that vetoes a candidate cleavage site entirely.
///
/// # Examples
///
/// Trypsin does not cleave the K in a [CD]KD context:
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let exception = CleavageException::new("[CD]KD", 1, 1).unwrap();
/// assert!(exception.matches("TCKDT", 2));
/// assert!(!exception.matches("TAKDT", 2));
/// ```
#[derive(Clone, Debug)]
pub struct CleavageException {
    pattern: Regex,
    left: usize,
    right: usize,
}

impl CleavageException {
    /// Compile an exception from its pattern and window radii.
    ///
    /// # Errors
    /// [`RecodeError::InvalidPattern`] when the pattern does not compile.
    pub fn new(pattern: &str, left: usize, right: usize) -> Result<Self, RecodeError> {
        Ok(Self {
            pattern: compile(pattern)?,
            left,
            right,
        })
    }

    /// Test whether the window around a candidate site matches this
    /// exception, in which case the site must not cleave.
    pub fn matches(&self, sequence: &str, site: usize) -> bool {
        self.pattern
            .is_match(&window(sequence, site, self.left, self.right))
    }
}

fn compile(pattern: &str) -> Result<Regex, RecodeError> {
    Regex::new(pattern).map_err(|source| RecodeError::InvalidPattern {
        pattern: pattern.to_string(),
        source: Box::new(source),
    })
}

/// Extract the window of `left + 1 + right` characters around `site`,
/// substituting [`PAD`] for positions outside the sequence. Out of bounds is
/// padding, not an error.
fn window(sequence: &str, site: usize, left: usize, right: usize) -> String {
    let bytes = sequence.as_bytes();
    let first = site as isize - left as isize;
    let last = site as isize + right as isize;
    (first..=last)
        .map(|position| {
            usize::try_from(position)
                .ok()
                .and_then(|position| bytes.get(position))
                .map_or(PAD, |&byte| byte as char)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_padded_at_both_ends() {
        assert_eq!(window("AKTRL", 0, 2, 2), "##AKT");
        assert_eq!(window("AKTRL", 4, 2, 2), "TRL##");
        assert_eq!(window("AKTRL", 2, 1, 1), "KTR");
        assert_eq!(window("AK", 0, 3, 3), "###AK##");
    }

    #[test]
    fn matcher_reports_configured_offset() {
        let rule = CleavageRule::new("DRI", 1, 1, 0).unwrap();
        assert_eq!(rule.matches("TTTDRIYYY", 4), Some(0));
        assert_eq!(rule.matches("TTTGRIYYY", 4), None);
    }

    #[test]
    fn exception_window_spans_asymmetrically() {
        let exception = CleavageException::new("YYRYTI", 2, 3).unwrap();
        assert!(exception.matches("TTTYYRYTITTT", 5));
        assert!(!exception.matches("TTTZYRYTITTT", 5));
    }

    #[test]
    fn boundary_sites_never_panic() {
        let rule = CleavageRule::new("[KR][^P]", 1, 1, 1).unwrap();
        assert_eq!(rule.matches("K", 0), Some(1));
        let exception = CleavageException::new("[CD]KD", 1, 1).unwrap();
        assert!(!exception.matches("K", 0));
    }

    #[test]
    fn malformed_pattern_fails_at_construction() {
        assert!(matches!(
            CleavageRule::new("[KR", 1, 1, 1),
            Err(RecodeError::InvalidPattern { .. })
        ));
        assert!(matches!(
            CleavageException::new("(K", 1, 1),
            Err(RecodeError::InvalidPattern { .. })
        ));
    }
}
