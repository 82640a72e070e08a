use std::str::FromStr;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::cleavage::{CleavageException, CleavageRule};
use crate::error::RecodeError;

/// A named cleavage policy: a coarse anchor pattern that finds candidate
/// cleavage sites, a default cut offset, and optional windowed rules that
/// refine or veto each candidate.
///
/// With an empty rule set the protease is "predictable": every anchor match
/// cleaves at the default offset. Matcher rules each contribute their own
/// offset when satisfied, so a single candidate site can produce more than
/// one simultaneous cut (pepsin cleaves on both sides of its anchor), and
/// exception rules veto a candidate site outright.
///
/// The standard proteases are available through [`ProteaseId`]; this type is
/// public so custom cleavage policies can be handed straight to
/// [`PeptideFactory::new`](super::PeptideFactory::new).
///
/// ```rust
/// # use phosrecode::prelude::*;
/// // Cleave after H, except when the H is preceded by G
/// let protease = Protease::new("H", 1)
///     .unwrap()
///     .with_exception("GH", 1, 0)
///     .unwrap();
/// assert_eq!(protease.resolve("AHA", 1), vec![1]);
/// assert_eq!(protease.resolve("GHA", 1), Vec::<usize>::new());
/// ```
#[derive(Clone, Debug)]
pub struct Protease {
    anchor: Regex,
    offset: usize,
    matchers: Vec<CleavageRule>,
    exceptions: Vec<CleavageException>,
}

impl Protease {
    /// Define a protease that finds candidate sites with `anchor` and, in the
    /// absence of further rules, cleaves each of them at `offset` (0 cuts
    /// before the anchor residue, 1 after).
    ///
    /// # Errors
    /// [`RecodeError::InvalidPattern`] when the anchor pattern does not
    /// compile.
    pub fn new(anchor: &str, offset: usize) -> Result<Self, RecodeError> {
        Ok(Self {
            anchor: Regex::new(anchor).map_err(|source| RecodeError::InvalidPattern {
                pattern: anchor.to_string(),
                source: Box::new(source),
            })?,
            offset,
            matchers: Vec::new(),
            exceptions: Vec::new(),
        })
    }

    /// Add a windowed matcher rule refining the candidate sites.
    ///
    /// # Errors
    /// [`RecodeError::InvalidPattern`] when the pattern does not compile.
    pub fn with_matcher(
        mut self,
        pattern: &str,
        left: usize,
        right: usize,
        offset: usize,
    ) -> Result<Self, RecodeError> {
        self.matchers.push(CleavageRule::new(pattern, left, right, offset)?);
        Ok(self)
    }

    /// Add a windowed exception rule vetoing candidate sites.
    ///
    /// # Errors
    /// [`RecodeError::InvalidPattern`] when the pattern does not compile.
    pub fn with_exception(
        mut self,
        pattern: &str,
        left: usize,
        right: usize,
    ) -> Result<Self, RecodeError> {
        self.exceptions.push(CleavageException::new(pattern, left, right)?);
        Ok(self)
    }

    /// The default cut offset, used when no matcher rules are configured.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// How many matcher rules are configured.
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// How many exception rules are configured.
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Find the next candidate cleavage site at or after `from`.
    pub fn next_anchor(&self, sequence: &str, from: usize) -> Option<usize> {
        if from > sequence.len() {
            return None;
        }
        self.anchor.find_at(sequence, from).map(|found| found.start())
    }

    /// Resolve the cut offsets implied by a candidate site.
    ///
    /// An empty result means the site is vetoed (by an exception, or because
    /// no matcher confirmed it) and the caller must resume scanning from the
    /// next position. Offsets are reported in matcher order and duplicates
    /// are kept; coinciding cuts collapse later, when the fragments are
    /// extracted.
    pub fn resolve(&self, sequence: &str, site: usize) -> Vec<usize> {
        if self
            .exceptions
            .iter()
            .any(|exception| exception.matches(sequence, site))
        {
            return Vec::new();
        }
        if self.matchers.is_empty() {
            return vec![self.offset];
        }
        self.matchers
            .iter()
            .filter_map(|matcher| matcher.matches(sequence, site))
            .collect_vec()
    }
}

/// The built-in proteases.
///
/// A closed set resolved against a static table, so a protease selection
/// that parses is guaranteed to have a definition; unknown names fail at
/// configuration time with [`RecodeError::UnknownProtease`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ProteaseId {
    /// Asp-N, cleaves before D.
    AspN,
    /// Asp-N with N→D conversion, cleaves before D or E.
    AspNGlu,
    /// Chymotrypsin, cleaves after F, Y or W.
    Chymotrypsin,
    /// Glu-C, cleaves after E.
    GluC,
    /// Lys-C, cleaves after K.
    LysC,
    /// Pepsin at pH 1.3, cleaves around F and L.
    PepsinPh13,
    /// Pepsin at pH 2.0 and above, cleaves around F, L, W and Y.
    PepsinPh20,
    /// Trypsin, cleaves after R or K.
    Trypsin,
    /// Cleaves after every residue.
    NonSpecific,
}

impl ProteaseId {
    /// All built-in proteases, in table order.
    pub const ALL: [Self; 9] = [
        Self::AspN,
        Self::AspNGlu,
        Self::Chymotrypsin,
        Self::GluC,
        Self::LysC,
        Self::PepsinPh13,
        Self::PepsinPh20,
        Self::Trypsin,
        Self::NonSpecific,
    ];

    /// Look up the definition of this protease under the given rule set.
    pub fn protease(self, rules: RuleSet) -> &'static Protease {
        let table = match rules {
            RuleSet::Strict => &STRICT,
            RuleSet::Relaxed => &RELAXED,
        };
        &table[self as usize]
    }
}

impl std::fmt::Display for ProteaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::AspN => "AspN",
                Self::AspNGlu => "AspN/N->D",
                Self::Chymotrypsin => "Chymotrypsin",
                Self::GluC => "GluC",
                Self::LysC => "LysC",
                Self::PepsinPh13 => "Pepsin, pH=1.3",
                Self::PepsinPh20 => "Pepsin, pH=2.0",
                Self::Trypsin => "Trypsin",
                Self::NonSpecific => "Non-specific",
            }
        )
    }
}

impl FromStr for ProteaseId {
    type Err = RecodeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "AspN" => Ok(Self::AspN),
            "AspN/N->D" => Ok(Self::AspNGlu),
            "Chymotrypsin" => Ok(Self::Chymotrypsin),
            "GluC" => Ok(Self::GluC),
            "LysC" => Ok(Self::LysC),
            "Pepsin, pH=1.3" => Ok(Self::PepsinPh13),
            "Pepsin, pH=2.0" => Ok(Self::PepsinPh20),
            "Trypsin" => Ok(Self::Trypsin),
            "Non-specific" => Ok(Self::NonSpecific),
            unknown => Err(RecodeError::UnknownProtease(unknown.to_string())),
        }
    }
}

/// Which cleavage rule table to apply.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RuleSet {
    /// Expasy rules verbatim: windowed matcher and exception rules for the
    /// proteases whose cleavage depends on context.
    Strict,
    /// Cleave predictably on single amino acid codes, as many wet-bench
    /// scientists expect. Pepsin still cuts both before and after its
    /// anchor residues.
    #[default]
    Relaxed,
}

static STRICT: LazyLock<Vec<Protease>> =
    LazyLock::new(|| build_table(RuleSet::Strict).expect("built-in protease table is valid"));
static RELAXED: LazyLock<Vec<Protease>> =
    LazyLock::new(|| build_table(RuleSet::Relaxed).expect("built-in protease table is valid"));

/// Build the protease definitions for one rule set, in [`ProteaseId::ALL`]
/// order.
fn build_table(rules: RuleSet) -> Result<Vec<Protease>, RecodeError> {
    let mut chymotrypsin = Protease::new("[FYW]", 1)?;
    let mut pepsin_13 = Protease::new("[FL]", 0)?;
    let mut pepsin_20 = Protease::new("[FLWY]", 0)?;
    let mut trypsin = Protease::new("[RK]", 1)?;

    match rules {
        RuleSet::Strict => {
            chymotrypsin = chymotrypsin.with_matcher("([FY][^P])|(W[^MP])", 0, 1, 1)?;
            // Expasy also lists a Pro/Asp context rule for GluC, but
            // PeptideCutter cleaves predictably on every E, so none is
            // installed here.
            pepsin_13 = pepsin_13
                .with_matcher("[^HKR][^P][^R][FL][^P]", 3, 1, 0)?
                .with_matcher("[^HKR][^P][FL].[^P]", 2, 2, 1)?;
            pepsin_20 = pepsin_20
                .with_matcher("[^HKR][^P][^R][FLWY][^P]", 3, 1, 0)?
                .with_matcher("[^HKR][^P][FLWY].[^P]", 2, 2, 1)?;
            trypsin = trypsin
                .with_matcher("(WKP)|(MRP)|[KR][^P]", 1, 1, 1)?
                .with_exception("([CD]KD)|(CK[HY])|(CRK)|(RR[HR])", 1, 1)?;
        }
        RuleSet::Relaxed => {
            // Pepsin cuts both before and after its anchor residues, so the
            // relaxed table still needs the secondary cut sites.
            pepsin_13 = pepsin_13
                .with_matcher("[FL]", 0, 0, 0)?
                .with_matcher("[FL]", 0, 0, 1)?;
            pepsin_20 = pepsin_20
                .with_matcher("[FLWY]", 0, 0, 0)?
                .with_matcher("[FLWY]", 0, 0, 1)?;
        }
    }

    Ok(vec![
        Protease::new("D", 0)?,
        Protease::new("[DE]", 0)?,
        chymotrypsin,
        Protease::new("[E]", 1)?,
        Protease::new("K", 1)?,
        pepsin_13,
        pepsin_20,
        trypsin,
        Protease::new(".", 1)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_resolves_in_both_tables() {
        for id in ProteaseId::ALL {
            let _ = id.protease(RuleSet::Strict);
            let _ = id.protease(RuleSet::Relaxed);
        }
    }

    #[test]
    fn names_round_trip() {
        for id in ProteaseId::ALL {
            assert_eq!(id.to_string().parse::<ProteaseId>().unwrap(), id);
        }
        assert!(matches!(
            "Papain".parse::<ProteaseId>(),
            Err(RecodeError::UnknownProtease(name)) if name == "Papain"
        ));
    }

    #[test]
    fn predictable_protease_resolves_default_offset() {
        let trypsin = ProteaseId::Trypsin.protease(RuleSet::Relaxed);
        assert_eq!(trypsin.matcher_count(), 0);
        assert_eq!(trypsin.resolve("AKTRL", 1), vec![1]);
        assert_eq!(trypsin.resolve("AKTRL", 3), vec![1]);
    }

    #[test]
    fn strict_trypsin_vetoes_proline_context() {
        let trypsin = ProteaseId::Trypsin.protease(RuleSet::Strict);
        // KP does not cleave
        assert_eq!(trypsin.resolve("AKPA", 1), Vec::<usize>::new());
        // WKP does
        assert_eq!(trypsin.resolve("WKPA", 1), vec![1]);
        // exception context [CD]KD vetoes even though the matcher passes
        assert_eq!(trypsin.resolve("CKDA", 1), Vec::<usize>::new());
    }

    #[test]
    fn custom_rules_follow_matcher_order() {
        let protease = Protease::new("[RK]", 1)
            .unwrap()
            .with_matcher("DRI", 1, 1, 0)
            .unwrap();
        assert_eq!(protease.resolve("TTTDRIYYY", 4), vec![0]);
        assert_eq!(protease.resolve("TTTGRIYYY", 4), Vec::<usize>::new());
    }

    #[test]
    fn relaxed_pepsin_cuts_both_sides() {
        let pepsin = ProteaseId::PepsinPh13.protease(RuleSet::Relaxed);
        assert_eq!(pepsin.resolve("AFA", 1), vec![0, 1]);
    }

    #[test]
    fn anchor_scan_advances_and_terminates() {
        let trypsin = ProteaseId::Trypsin.protease(RuleSet::Relaxed);
        assert_eq!(trypsin.next_anchor("AKTRL", 0), Some(1));
        assert_eq!(trypsin.next_anchor("AKTRL", 2), Some(3));
        assert_eq!(trypsin.next_anchor("AKTRL", 4), None);
        assert_eq!(trypsin.next_anchor("AKTRL", 9), None);
    }
}
