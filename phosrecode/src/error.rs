use thiserror::Error;

/// The errors that can arise while configuring or running digestion and
/// recoding.
///
/// Only configuration-class problems surface here. Transient scan anomalies
/// (vetoed candidate sites, cut events that produce no fragments) are
/// recovered internally and logged, and skip conditions (peptide length
/// bounds, conflicting residues, absent known sites) are silent exclusions
/// from the output, not failures.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// The requested protease name is not in the built-in table.
    #[error("unknown protease `{0}`")]
    UnknownProtease(String),
    /// A cleavage rule pattern failed to compile.
    #[error("invalid cleavage pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The offending pattern as configured.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: Box<regex::Error>,
    },
    /// An amino acid without a substitution code was selected for recoding.
    #[error("amino acid `{0}` has no substitution code and cannot be recoded")]
    InvalidRecodeResidue(char),
    /// choose(n, k) does not fit in a `u64`.
    #[error("choose({n}, {k}) overflows, too many possibilities")]
    CombinationOverflow {
        /// The number of symbols available.
        n: u64,
        /// The number of symbols taken at a time.
        k: u64,
    },
    /// An output sink failed to accept a record.
    #[error("output sink error: {0}")]
    Sink(#[from] std::io::Error),
}
