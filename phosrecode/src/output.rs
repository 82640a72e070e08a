use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::RecodeError;

/// One emitted peptide variant: a recoded (or, in digest-only mode,
/// unmodified) peptide together with everything needed to identify it.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RecodedRecord {
    /// Accession of the parent protein.
    pub accession: String,
    /// Offset of the first peptide residue within the parent (0-based).
    pub start: usize,
    /// Offset of the last peptide residue within the parent (inclusive).
    pub end: usize,
    /// The selected site labels in combination order; empty in digest-only
    /// mode.
    pub labels: Vec<String>,
    /// The peptide sequence, with the selected sites recoded.
    pub sequence: String,
}

impl RecodedRecord {
    /// Create a record.
    pub fn new(
        accession: impl Into<String>,
        start: usize,
        end: usize,
        labels: Vec<String>,
        sequence: impl Into<String>,
    ) -> Self {
        Self {
            accession: accession.into(),
            start,
            end,
            labels,
            sequence: sequence.into(),
        }
    }

    /// The unique accession of this variant: parent accession, peptide
    /// bounds and the selected site labels joined by underscores, in
    /// combination order. Allows easy post-processing and aggregation of
    /// peptides from the same parent protein.
    ///
    /// ```rust
    /// # use phosrecode::prelude::*;
    /// let record = RecodedRecord::new("P04637", 120, 128, vec!["S121".to_string()], "BASTAAKGR");
    /// assert_eq!(record.unique_accession(), "P04637_120_128_S121");
    /// ```
    pub fn unique_accession(&self) -> String {
        let mut accession = format!("{}_{}_{}", self.accession, self.start, self.end);
        for label in &self.labels {
            accession.push('_');
            accession.push_str(label);
        }
        accession
    }

    /// Render this record as a FASTA entry, `>{unique accession}` followed
    /// by the sequence.
    pub fn to_fasta(&self) -> String {
        format!(">{}\n{}\n", self.unique_accession(), self.sequence)
    }
}

/// Capability interface consuming the stream of output records.
///
/// The engine writes each record exactly once, in emission order; storage
/// and formatting live behind implementations of this trait.
pub trait RecordSink {
    /// Accept one record.
    ///
    /// # Errors
    /// Implementation defined; a sink failure aborts the digestion run.
    fn write(&mut self, record: &RecodedRecord) -> Result<(), RecodeError>;
}

/// Collects records in memory.
impl RecordSink for Vec<RecodedRecord> {
    fn write(&mut self, record: &RecodedRecord) -> Result<(), RecodeError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as FASTA entries to an underlying writer.
#[derive(Debug)]
pub struct FastaSink<W: Write> {
    out: W,
}

impl<W: Write> FastaSink<W> {
    /// Wrap a writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for FastaSink<W> {
    fn write(&mut self, record: &RecodedRecord) -> Result<(), RecodeError> {
        self.out.write_all(record.to_fasta().as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_accession_joins_labels_in_order() {
        let record = RecodedRecord::new(
            "P1",
            0,
            4,
            vec!["S1".to_string(), "T4".to_string()],
            "BASUA",
        );
        assert_eq!(record.unique_accession(), "P1_0_4_S1_T4");
    }

    #[test]
    fn digest_only_records_have_bare_accessions() {
        let record = RecodedRecord::new("P1", 2, 3, Vec::new(), "TR");
        assert_eq!(record.unique_accession(), "P1_2_3");
    }

    #[test]
    fn fasta_sink_renders_entries() {
        let mut sink = FastaSink::new(Vec::new());
        sink.write(&RecodedRecord::new(
            "P1",
            0,
            2,
            vec!["T2".to_string()],
            "HUL",
        ))
        .unwrap();
        sink.write(&RecodedRecord::new("P1", 4, 4, Vec::new(), "L"))
            .unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            ">P1_0_2_T2\nHUL\n>P1_4_4\nL\n",
        );
    }
}
