use itertools::Itertools;

use crate::sites::ModificationSite;

/// The result of translating a recoded sequence back to standard residues: a
/// sequence without substitution codes, plus the modification sites those
/// codes encoded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReverseRecoded {
    sequence: String,
    sites: Vec<ModificationSite>,
}

impl ReverseRecoded {
    /// The translated sequence. Residues decoded from substitution codes are
    /// lowercase (s, t, y) so they stay distinguishable from residues that
    /// were never recoded.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The modification sites the substitution codes encoded, in sequence
    /// order, with absolute 1-based protein positions.
    pub fn sites(&self) -> &[ModificationSite] {
        &self.sites
    }

    /// The site labels joined with semicolons, e.g. `S12;T20`.
    pub fn site_labels(&self) -> String {
        self.sites.iter().map(ToString::to_string).join(";")
    }
}

/// Translate a recoded peptide sequence back to standard residues.
///
/// `start` is the peptide's 0-based offset within the full protein; each
/// decoded substitution code yields a [`ModificationSite`] carrying the same
/// 1-based absolute position the forward recoding labeled it with, so
/// decoding a recoded peptide recovers exactly the sites that were selected.
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let decoded = reverse_recode("HUL", 0);
/// assert_eq!(decoded.sequence(), "HtL");
/// assert_eq!(decoded.site_labels(), "T2");
/// ```
pub fn reverse_recode(sequence: &str, start: usize) -> ReverseRecoded {
    let mut decoded = ReverseRecoded::default();
    for (index, residue) in sequence.chars().enumerate() {
        let translated = match residue {
            'B' => Some(('s', 'S')),
            'U' => Some(('t', 'T')),
            'Z' => Some(('y', 'Y')),
            _ => None,
        };
        match translated {
            Some((lower, standard)) => {
                decoded
                    .sites
                    .push(ModificationSite::new(standard, index + start + 1));
                decoded.sequence.push(lower);
            }
            None => decoded.sequence.push(residue),
        }
    }
    decoded
}
