use serde::{Deserialize, Serialize};

use crate::sequence::Peptide;

/// A modification-capable residue at a position within its parent protein.
///
/// Positions are 1-based, matching how sites are numbered in the scientific
/// literature, and the `Display` form is the site label used everywhere
/// downstream (accessions, reference databases): residue then position, e.g.
/// `S120`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ModificationSite {
    residue: char,
    position: usize,
}

impl ModificationSite {
    /// Create a site from its residue code and 1-based protein position.
    pub const fn new(residue: char, position: usize) -> Self {
        Self { residue, position }
    }

    /// The amino acid code of the modifiable residue.
    pub const fn residue(&self) -> char {
        self.residue
    }

    /// The 1-based position within the parent protein.
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl std::fmt::Display for ModificationSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.residue, self.position)
    }
}

/// The candidate modification sites of one peptide.
///
/// Two parallel lists kept in one-to-one correspondence: the sites themselves
/// (absolute, 1-based positions) and their 0-based indices relative to the
/// peptide sequence, so sites can be addressed both for labeling and for
/// in-place sequence edits. Order follows the candidate scan: all S sites
/// left to right, then all T, then all Y.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ModificationSites {
    sites: Vec<ModificationSite>,
    indices: Vec<usize>,
}

impl ModificationSites {
    /// Append a site and its index relative to the parent sequence.
    pub fn push(&mut self, site: ModificationSite, index: usize) {
        self.sites.push(site);
        self.indices.push(index);
    }

    /// The sites, in scan order.
    pub fn sites(&self) -> &[ModificationSite] {
        &self.sites
    }

    /// The 0-based indices of the sites relative to the parent sequence, in
    /// one-to-one correspondence with [`Self::sites`].
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over `(relative index, site)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ModificationSite)> + '_ {
        self.indices.iter().copied().zip(self.sites.iter().copied())
    }

    /// How many sites are stored.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no sites are stored.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Find all candidate phosphorylation sites (S, T and Y residues) of a
/// peptide.
///
/// Positions in the returned sites are absolute and 1-based (relative index
/// plus peptide start plus one, shifting string indexing to literature
/// numbering).
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let sites = find_phosphorylation_sites(&Peptide::new("HTL", 0));
/// assert_eq!(sites.sites()[0].to_string(), "T2");
/// assert_eq!(sites.indices(), [1]);
/// ```
pub fn find_phosphorylation_sites(peptide: &Peptide) -> ModificationSites {
    const RESIDUES: [char; 3] = ['S', 'T', 'Y'];
    let mut sites = ModificationSites::default();
    for residue in RESIDUES {
        for (index, _) in peptide
            .sequence()
            .char_indices()
            .filter(|(_, found)| *found == residue)
        {
            sites.push(
                ModificationSite::new(residue, index + peptide.start() + 1),
                index,
            );
        }
    }
    sites
}

/// Count the sentinel recode residues (B, U or Z) in a sequence.
pub fn recode_count(sequence: &str) -> usize {
    sequence
        .chars()
        .filter(|residue| matches!(residue, 'B' | 'U' | 'Z'))
        .count()
}
