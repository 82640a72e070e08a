use std::collections::{HashMap, HashSet};

use super::site::{ModificationSite, ModificationSites};
use crate::error::RecodeError;

/// Candidate sites split into "known" (present in a reference collection of
/// previously observed sites) and "unknown".
#[derive(Clone, Debug, Default)]
pub struct AnnotatedSites {
    known: ModificationSites,
    unknown: ModificationSites,
}

impl AnnotatedSites {
    /// Record a site as known, with its index relative to the parent
    /// sequence.
    pub fn add_known(&mut self, site: ModificationSite, index: usize) {
        self.known.push(site, index);
    }

    /// Record a site as unknown, with its index relative to the parent
    /// sequence.
    pub fn add_unknown(&mut self, site: ModificationSite, index: usize) {
        self.unknown.push(site, index);
    }

    /// The known sites.
    pub const fn known(&self) -> &ModificationSites {
        &self.known
    }

    /// The unknown sites.
    pub const fn unknown(&self) -> &ModificationSites {
        &self.unknown
    }
}

/// Capability interface that separates candidate modification sites into
/// known and unknown against some reference collection.
///
/// Storage-backed implementations (an imported site database, a remote
/// service) live outside this crate; the engine only needs the split and the
/// emptiness signal that relaxes the known-site filter.
pub trait SiteAnnotator {
    /// Split `candidates` into known and unknown sites for the protein with
    /// this accession.
    ///
    /// # Errors
    /// Implementations backed by fallible storage may report failure, which
    /// aborts the digestion run for the current input.
    fn annotate(
        &self,
        accession: &str,
        candidates: &ModificationSites,
    ) -> Result<AnnotatedSites, RecodeError>;

    /// True when the annotator holds no reference sites at all, in which
    /// case every peptide passes the known-site filter.
    fn is_empty(&self) -> bool;
}

/// An annotator without any reference sites.
///
/// Classifies every candidate as unknown and reports itself empty, so all
/// peptides pass the known-site filter. The collaborator to use when only
/// digesting.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnnotator;

impl SiteAnnotator for NullAnnotator {
    fn annotate(
        &self,
        _accession: &str,
        candidates: &ModificationSites,
    ) -> Result<AnnotatedSites, RecodeError> {
        let mut annotated = AnnotatedSites::default();
        for (index, site) in candidates.iter() {
            annotated.add_unknown(site, index);
        }
        Ok(annotated)
    }

    fn is_empty(&self) -> bool {
        true
    }
}

/// An in-memory reference site collection keyed by protein accession.
///
/// A candidate is known when its label (e.g. `S120`) was registered for the
/// candidate's protein, mirroring how an imported site database is queried
/// by `(accession, site)` pairs.
#[derive(Clone, Debug, Default)]
pub struct MemoryAnnotator {
    sites: HashMap<String, HashSet<String>>,
}

impl MemoryAnnotator {
    /// Create an empty annotator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known site for a protein.
    pub fn insert(&mut self, accession: impl Into<String>, site: &ModificationSite) {
        self.sites
            .entry(accession.into())
            .or_default()
            .insert(site.to_string());
    }

    /// How many known sites are registered for a protein.
    pub fn site_count(&self, accession: &str) -> usize {
        self.sites.get(accession).map_or(0, HashSet::len)
    }
}

impl SiteAnnotator for MemoryAnnotator {
    fn annotate(
        &self,
        accession: &str,
        candidates: &ModificationSites,
    ) -> Result<AnnotatedSites, RecodeError> {
        let known = self.sites.get(accession);
        let mut annotated = AnnotatedSites::default();
        for (index, site) in candidates.iter() {
            if known.is_some_and(|labels| labels.contains(&site.to_string())) {
                annotated.add_known(site, index);
            } else {
                annotated.add_unknown(site, index);
            }
        }
        Ok(annotated)
    }

    fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Peptide;
    use crate::sites::find_phosphorylation_sites;

    #[test]
    fn null_annotator_reports_everything_unknown() {
        let candidates = find_phosphorylation_sites(&Peptide::new("ASTY", 0));
        let annotated = NullAnnotator.annotate("P1", &candidates).unwrap();
        assert!(annotated.known().is_empty());
        assert_eq!(annotated.unknown().len(), 3);
        assert!(NullAnnotator.is_empty());
    }

    #[test]
    fn memory_annotator_splits_by_registered_labels() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('S', 2));
        annotator.insert("P1", &ModificationSite::new('Y', 4));
        assert!(!annotator.is_empty());
        assert_eq!(annotator.site_count("P1"), 2);

        let candidates = find_phosphorylation_sites(&Peptide::new("ASTY", 0));
        let annotated = annotator.annotate("P1", &candidates).unwrap();
        let known: Vec<_> = annotated
            .known()
            .sites()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(known, ["S2", "Y4"]);
        assert_eq!(annotated.unknown().sites()[0].to_string(), "T3");
    }

    #[test]
    fn annotations_are_scoped_per_accession() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('S', 2));
        let candidates = find_phosphorylation_sites(&Peptide::new("ASTY", 0));
        let annotated = annotator.annotate("P2", &candidates).unwrap();
        assert!(annotated.known().is_empty());
    }
}
