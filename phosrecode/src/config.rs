use serde::{Deserialize, Serialize};

use crate::sequence::{ProteaseId, RuleSet};

/// All parameters controlling how proteins are digested and how modification
/// sites are recoded.
///
/// Built with consuming setters so configurations read as one expression:
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let config = RecodeConfig::default()
///     .protease(ProteaseId::LysC)
///     .rules(RuleSet::Strict)
///     .missed_cleavages(1)
///     .max_modifications(2);
/// assert_eq!(config.protease, ProteaseId::LysC);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RecodeConfig {
    /// The protease performing the in-silico digest.
    pub protease: ProteaseId,
    /// Whether to apply the Expasy rules verbatim or the relaxed
    /// single-residue rules.
    pub rules: RuleSet,
    /// Maximum number of missed cleavages to model.
    pub missed_cleavages: usize,
    /// Peptides shorter than this many residues are skipped.
    pub min_peptide_length: usize,
    /// Peptides longer than this many residues are skipped.
    pub max_peptide_length: usize,
    /// Maximum number of sites recoded concurrently on one peptide.
    pub max_modifications: usize,
    /// Emit each peptide once, unmodified, instead of recoding site
    /// combinations.
    pub digest_only: bool,
}

impl Default for RecodeConfig {
    fn default() -> Self {
        Self {
            protease: ProteaseId::Trypsin,
            rules: RuleSet::Relaxed,
            missed_cleavages: 2,
            min_peptide_length: 5,
            max_peptide_length: 50,
            max_modifications: 3,
            digest_only: false,
        }
    }
}

impl RecodeConfig {
    /// Set the protease.
    #[must_use]
    pub const fn protease(mut self, protease: ProteaseId) -> Self {
        self.protease = protease;
        self
    }

    /// Set the cleavage rule set.
    #[must_use]
    pub const fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the maximum number of missed cleavages.
    #[must_use]
    pub const fn missed_cleavages(mut self, missed_cleavages: usize) -> Self {
        self.missed_cleavages = missed_cleavages;
        self
    }

    /// Set the minimum peptide length.
    #[must_use]
    pub const fn min_peptide_length(mut self, min_peptide_length: usize) -> Self {
        self.min_peptide_length = min_peptide_length;
        self
    }

    /// Set the maximum peptide length.
    #[must_use]
    pub const fn max_peptide_length(mut self, max_peptide_length: usize) -> Self {
        self.max_peptide_length = max_peptide_length;
        self
    }

    /// Set the maximum number of concurrent modifications.
    #[must_use]
    pub const fn max_modifications(mut self, max_modifications: usize) -> Self {
        self.max_modifications = max_modifications;
        self
    }

    /// Toggle digest-only mode.
    #[must_use]
    pub const fn digest_only(mut self, digest_only: bool) -> Self {
        self.digest_only = digest_only;
        self
    }

    /// Serialize this configuration as JSON, for storing alongside the
    /// output it produced.
    ///
    /// # Errors
    /// Passes through the underlying serialization error.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load a configuration previously written by [`Self::to_json`].
    ///
    /// # Errors
    /// Passes through the underlying deserialization error, including
    /// unknown protease or rule set names.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
