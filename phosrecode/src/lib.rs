#![doc = include_str!("../README.md")]

/// Runtime configuration for digestion and recoding.
pub mod config;
/// The crate error type.
pub mod error;
/// Output records and the sinks that consume them.
pub mod output;
/// Combinatorial enumeration and modification-site recoding.
pub mod recode;
/// Peptides, proteases and the digestion engine.
pub mod sequence;
/// Modification sites and known/unknown annotation.
pub mod sites;

pub use config::RecodeConfig;
pub use error::RecodeError;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::config::RecodeConfig;
    pub use crate::error::RecodeError;
    pub use crate::output::{FastaSink, RecodedRecord, RecordSink};
    pub use crate::recode::{
        Combinations, ReverseRecoded, SiteRecoder, n_choose_k, recode_residue, recode_sequence,
        reverse_recode,
    };
    pub use crate::sequence::{
        CleavageException, CleavageRule, MissedCleavageFilter, Peptide, PeptideFactory, Protease,
        ProteaseId, RuleSet,
    };
    pub use crate::sites::{
        AnnotatedSites, MemoryAnnotator, ModificationSite, ModificationSites, NullAnnotator,
        SiteAnnotator, find_phosphorylation_sites, recode_count,
    };
}
