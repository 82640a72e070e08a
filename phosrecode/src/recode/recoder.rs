use log::{debug, warn};

use super::combinatorics::Combinations;
use crate::config::RecodeConfig;
use crate::error::RecodeError;
use crate::output::{RecodedRecord, RecordSink};
use crate::sequence::{MissedCleavageFilter, Peptide, PeptideFactory};
use crate::sites::{SiteAnnotator, find_phosphorylation_sites, recode_count};

/// Translate an amino acid to its substitution code (S→B, T→U, Y→Z).
///
/// # Errors
/// [`RecodeError::InvalidRecodeResidue`] for any other amino acid; only the
/// three modifiable residues have substitution codes.
pub fn recode_residue(residue: char) -> Result<char, RecodeError> {
    let recoded = match residue {
        'S' => 'B',
        'T' => 'U',
        'Y' => 'Z',
        other => return Err(RecodeError::InvalidRecodeResidue(other)),
    };
    Ok(recoded)
}

/// Recode the residues of `sequence` selected by one combination.
///
/// `selection` holds combination members that index into `site_indices`,
/// which in turn holds the 0-based residue positions within `sequence`. With
/// `selection = [0, 2]` and `site_indices = [15, 22, 106]` the residues at
/// positions 15 and 106 are recoded.
///
/// # Errors
/// [`RecodeError::InvalidRecodeResidue`] when a selected residue has no
/// substitution code.
pub fn recode_sequence(
    sequence: &str,
    selection: &[usize],
    site_indices: &[usize],
) -> Result<String, RecodeError> {
    let mut residues: Vec<char> = sequence.chars().collect();
    for &member in selection {
        let index = site_indices[member];
        residues[index] = recode_residue(residues[index])?;
    }
    Ok(residues.into_iter().collect())
}

/// Recodes the known modification sites of digested peptides to substitution
/// codes, one site combination at a time.
///
/// For every peptide that passes the skip rules, each way of choosing `k`
/// known sites (for `k` from 1 up to the configured maximum number of
/// concurrent modifications) yields one output record whose identity is the
/// peptide bounds plus the selected site labels in combination order.
/// Peptides at the protein N terminus that start with methionine are
/// additionally reprocessed with the initiator methionine removed.
///
/// Skip rules, applied before any combination is generated:
/// * length outside the configured bounds,
/// * a sequence that already contains one of the substitution codes (it
///   would be indistinguishable from recoded output),
/// * no known sites while the annotator holds reference sites (only
///   peptides overlapping the reference collection are of interest; an
///   empty annotator passes everything).
///
/// Skipped peptides are logged and excluded; they are not errors.
#[derive(Clone, Debug)]
pub struct SiteRecoder {
    config: RecodeConfig,
}

impl SiteRecoder {
    /// Create a recoder with the given configuration.
    pub const fn new(config: RecodeConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &RecodeConfig {
        &self.config
    }

    /// Digest a protein sequence and recode every reported peptide, writing
    /// the records to `sink`.
    ///
    /// # Errors
    /// Configuration-class failures from the annotator or the sink; skip
    /// conditions and scan anomalies never abort the run.
    pub fn recode_protein<A, S>(
        &self,
        accession: &str,
        sequence: &str,
        annotator: &A,
        sink: &mut S,
    ) -> Result<(), RecodeError>
    where
        A: SiteAnnotator + ?Sized,
        S: RecordSink + ?Sized,
    {
        debug!(
            "digesting {accession} ({} residues) with {}",
            sequence.len(),
            self.config.protease,
        );
        let mut factory = PeptideFactory::for_id(
            self.config.protease,
            self.config.rules,
            self.config.missed_cleavages,
        );
        factory.start(sequence);
        while let Some(batch) = factory.next_batch(MissedCleavageFilter::All) {
            self.recode_peptides(accession, annotator, &batch, sink)?;
        }
        Ok(())
    }

    /// Recode a batch of peptides, writing one record per site combination
    /// (or per peptide in digest-only mode) to `sink`.
    ///
    /// # Errors
    /// Configuration-class failures from the annotator or the sink.
    pub fn recode_peptides<A, S>(
        &self,
        accession: &str,
        annotator: &A,
        peptides: &[Peptide],
        sink: &mut S,
    ) -> Result<(), RecodeError>
    where
        A: SiteAnnotator + ?Sized,
        S: RecordSink + ?Sized,
    {
        for peptide in peptides {
            let mut peptide = peptide.clone();
            loop {
                self.recode_peptide(accession, annotator, &peptide, sink)?;
                // a peptide at the protein N terminus is reconsidered with
                // its initiator methionine removed; the trimmed peptide
                // starts at position 1, so this runs at most once
                if peptide.has_n_terminal_methionine() {
                    debug!("cleaving N-terminal methionine of {peptide}");
                    peptide = peptide.cleave_n_term();
                } else {
                    break;
                }
            }
        }
        Ok(())
    }

    fn recode_peptide<A, S>(
        &self,
        accession: &str,
        annotator: &A,
        peptide: &Peptide,
        sink: &mut S,
    ) -> Result<(), RecodeError>
    where
        A: SiteAnnotator + ?Sized,
        S: RecordSink + ?Sized,
    {
        if peptide.len() < self.config.min_peptide_length
            || peptide.len() > self.config.max_peptide_length
        {
            debug!(
                "skipping peptide {peptide} with length {} outside [{}, {}]",
                peptide.len(),
                self.config.min_peptide_length,
                self.config.max_peptide_length,
            );
            return Ok(());
        }

        if recode_count(peptide.sequence()) > 0 {
            warn!("skipping peptide {peptide} that contains conflicting non-standard amino acids");
            return Ok(());
        }

        // digest-only output is exempt from the known-site filter below
        if self.config.digest_only {
            return sink.write(&RecodedRecord::new(
                accession,
                peptide.start(),
                peptide.end(),
                Vec::new(),
                peptide.sequence(),
            ));
        }

        let candidates = find_phosphorylation_sites(peptide);
        let annotated = annotator.annotate(accession, &candidates)?;
        let known = annotated.known();
        if known.is_empty() && !annotator.is_empty() {
            debug!("no annotated sites on peptide {peptide}");
            return Ok(());
        }

        let concurrent = self.config.max_modifications.min(known.len());
        for chosen in 1..=concurrent {
            debug!("recoding {} sites {chosen} at a time", known.len());
            for selection in Combinations::new(known.len(), chosen) {
                let sequence = recode_sequence(peptide.sequence(), &selection, known.indices())?;
                let labels = selection
                    .iter()
                    .map(|&member| known.sites()[member].to_string())
                    .collect();
                sink.write(&RecodedRecord::new(
                    accession,
                    peptide.start(),
                    peptide.end(),
                    labels,
                    sequence,
                ))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{ProteaseId, RuleSet};
    use crate::sites::{MemoryAnnotator, ModificationSite, NullAnnotator};

    fn config() -> RecodeConfig {
        RecodeConfig::default()
            .protease(ProteaseId::Trypsin)
            .rules(RuleSet::Relaxed)
            .missed_cleavages(0)
            .min_peptide_length(1)
            .max_peptide_length(50)
            .max_modifications(2)
    }

    #[test]
    fn residue_substitution_codes() {
        assert_eq!(recode_residue('S').unwrap(), 'B');
        assert_eq!(recode_residue('T').unwrap(), 'U');
        assert_eq!(recode_residue('Y').unwrap(), 'Z');
        assert!(matches!(
            recode_residue('A'),
            Err(RecodeError::InvalidRecodeResidue('A'))
        ));
    }

    #[test]
    fn single_known_site_produces_one_record() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 2));
        let recoder = SiteRecoder::new(config().max_modifications(1));

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("HTL", 0)], &mut records)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "HUL");
        assert_eq!(records[0].labels, ["T2"]);
        assert_eq!(records[0].unique_accession(), "P1_0_2_T2");
    }

    #[test]
    fn combinations_enumerate_up_to_the_concurrent_bound() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('S', 1));
        annotator.insert("P1", &ModificationSite::new('S', 3));
        annotator.insert("P1", &ModificationSite::new('T', 4));
        let recoder = SiteRecoder::new(config());

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("SASTA", 0)], &mut records)
            .unwrap();

        // choose(3,1) + choose(3,2) records, in combination order
        let sequences: Vec<_> = records
            .iter()
            .map(|record| record.sequence.as_str())
            .collect();
        assert_eq!(
            sequences,
            ["BASTA", "SABTA", "SASUA", "BABTA", "BASUA", "SABUA"],
        );
        assert_eq!(records[3].unique_accession(), "P1_0_4_S1_S3");
        assert_eq!(records[5].unique_accession(), "P1_0_4_S3_T4");
    }

    #[test]
    fn length_bounds_skip_silently() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 2));
        let recoder = SiteRecoder::new(config().min_peptide_length(4));

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("HTL", 0)], &mut records)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn conflicting_residues_skip_with_warning() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 2));
        let recoder = SiteRecoder::new(config());

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("HUL", 0)], &mut records)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn peptides_without_known_sites_skip_when_reference_sites_exist() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 100));
        let recoder = SiteRecoder::new(config());

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("HTL", 0)], &mut records)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn digest_only_emits_unmodified_peptides() {
        let recoder = SiteRecoder::new(config().digest_only(true));
        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &NullAnnotator, &[Peptide::new("HTL", 0)], &mut records)
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "HTL");
        assert!(records[0].labels.is_empty());
        assert_eq!(records[0].unique_accession(), "P1_0_2");
    }

    #[test]
    fn digest_only_is_exempt_from_the_known_site_filter() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 100));
        let recoder = SiteRecoder::new(config().digest_only(true));

        // no known site overlaps this peptide, but digest-only still emits it
        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("HTL", 0)], &mut records)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "HTL");
    }

    #[test]
    fn n_terminal_methionine_is_reprocessed_once() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 2));
        let recoder = SiteRecoder::new(config().max_modifications(1));

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_peptides("P1", &annotator, &[Peptide::new("MTL", 0)], &mut records)
            .unwrap();

        // the full peptide and its methionine-trimmed form both carry T2
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, "MUL");
        assert_eq!(records[0].unique_accession(), "P1_0_2_T2");
        assert_eq!(records[1].sequence, "UL");
        assert_eq!(records[1].unique_accession(), "P1_1_2_T2");
    }

    #[test]
    fn recode_protein_drives_digestion_end_to_end() {
        let mut annotator = MemoryAnnotator::new();
        annotator.insert("P1", &ModificationSite::new('T', 3));
        let recoder = SiteRecoder::new(config().max_modifications(1));

        let mut records: Vec<RecodedRecord> = Vec::new();
        recoder
            .recode_protein("P1", "AKTRL", &annotator, &mut records)
            .unwrap();

        // trypsin fragments AK / TR / L; only TR overlaps the known site T3
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "UR");
        assert_eq!(records[0].unique_accession(), "P1_2_3_T3");
    }
}
