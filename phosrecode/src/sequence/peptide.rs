use serde::{Deserialize, Serialize};

/// A peptide fragment of a digested protein.
///
/// Peptides are immutable value objects. Positions are 0-based offsets into
/// the full protein sequence, so a peptide knows where it came from without
/// holding a reference to its parent. The end offset and length are derived
/// from the sequence (`end == start + len - 1`), never stored separately.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Peptide {
    sequence: String,
    start: usize,
}

impl Peptide {
    /// Create a peptide from its amino acid sequence and the offset of its
    /// first residue within the full protein.
    pub fn new(sequence: impl Into<String>, start: usize) -> Self {
        Self {
            sequence: sequence.into(),
            start,
        }
    }

    /// The amino acid sequence.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The offset of the first residue within the full protein.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// The offset of the last residue within the full protein (inclusive).
    pub fn end(&self) -> usize {
        self.start + self.sequence.len().saturating_sub(1)
    }

    /// The length in amino acids.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// True for a zero-length peptide.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// True when this peptide sits at the protein N terminus and starts with
    /// methionine, the condition under which [`Self::cleave_n_term`] applies.
    pub fn has_n_terminal_methionine(&self) -> bool {
        self.start == 0 && self.sequence.starts_with('M')
    }

    /// Remove the N-terminal residue, producing a new peptide shifted one
    /// position into the protein. Intended for cleaving N-terminal
    /// methionine, but no check restricts it to other residues.
    #[must_use]
    pub fn cleave_n_term(&self) -> Self {
        Self::new(&self.sequence[1..], self.start + 1)
    }

    /// Whether the sequence is likely to exhibit water loss under
    /// fragmentation (N-terminal Glu, or any Ser/Thr).
    pub fn probable_water_loss(&self) -> bool {
        self.sequence.starts_with('E') || self.sequence.chars().any(|r| matches!(r, 'S' | 'T'))
    }

    /// Whether the sequence is likely to exhibit ammonia loss under
    /// fragmentation (any of Arg, Lys, Gln, Asn).
    pub fn probable_ammonia_loss(&self) -> bool {
        self.sequence.chars().any(|r| matches!(r, 'R' | 'K' | 'Q' | 'N'))
    }
}

impl std::fmt::Display for Peptide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_bounds() {
        let peptide = Peptide::new("AKTRL", 10);
        assert_eq!(peptide.len(), 5);
        assert_eq!(peptide.start(), 10);
        assert_eq!(peptide.end(), 14);
        assert_eq!(peptide.end(), peptide.start() + peptide.len() - 1);
    }

    #[test]
    fn cleave_n_term_shifts_start() {
        let peptide = Peptide::new("MKTAYIAK", 0);
        assert!(peptide.has_n_terminal_methionine());
        let trimmed = peptide.cleave_n_term();
        assert_eq!(trimmed.sequence(), "KTAYIAK");
        assert_eq!(trimmed.start(), 1);
        assert!(!trimmed.has_n_terminal_methionine());
    }

    #[test]
    fn neutral_loss_heuristics() {
        assert!(Peptide::new("EAAA", 0).probable_water_loss());
        assert!(Peptide::new("AATA", 0).probable_water_loss());
        assert!(!Peptide::new("AAGA", 0).probable_water_loss());
        assert!(Peptide::new("AQAA", 0).probable_ammonia_loss());
        assert!(!Peptide::new("AGAA", 0).probable_ammonia_loss());
    }
}
