use std::collections::VecDeque;

use log::warn;
use serde::{Deserialize, Serialize};

use super::peptide::Peptide;
use super::protease::{Protease, ProteaseId, RuleSet};

/// Restricts which assembled peptides a digestion batch reports.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MissedCleavageFilter {
    /// Report peptides with any number of missed cleavages.
    #[default]
    All,
    /// Report only peptides with exactly this many missed cleavages.
    Exactly(usize),
}

impl MissedCleavageFilter {
    fn admits(self, missed: usize) -> bool {
        match self {
            Self::All => true,
            Self::Exactly(wanted) => wanted == missed,
        }
    }
}

/// Streaming protein digestion engine.
///
/// Produces the peptides implied by a protease's cleavage rules and a
/// missed-cleavage bound, one cleavage event at a time, so callers can
/// process digests far too large to hold in memory. After [`Self::start`],
/// each call to [`Self::next_batch`] scans for the next candidate site that
/// actually cleaves and returns the peptides completed by that event;
/// exhaustion is reported as `None` and is sticky until the next `start`.
///
/// Two properties of protease cleavage shape the algorithm:
///
/// 1. a single cleavage event may cut the sequence more than once (pepsin
///    cuts before and after its anchor), and
/// 2. any cut may fail to happen in the real sample (a "missed cleavage").
///
/// Missed cleavages are modeled with `missed + 1` FIFO queues over the raw
/// fragment stream. Every raw fragment is pushed onto every queue; queue `i`
/// is complete when it holds `i + 1` fragments, at which point their
/// concatenation is reported as the peptide with `i` missed cleavages and
/// the queue drops its oldest entry. The queues thus act as sliding windows
/// of width `i + 1` advancing in lock step.
///
/// ```rust
/// # use phosrecode::prelude::*;
/// let mut factory = PeptideFactory::for_id(ProteaseId::Trypsin, RuleSet::Relaxed, 2);
/// factory.start("AKTRL");
///
/// let batches: Vec<Vec<String>> = std::iter::from_fn(|| {
///     factory
///         .next_batch(MissedCleavageFilter::All)
///         .map(|batch| batch.iter().map(ToString::to_string).collect())
/// })
/// .collect();
///
/// assert_eq!(
///     batches,
///     [
///         vec!["AK".to_string()],
///         vec!["TR".to_string(), "AKTR".to_string()],
///         vec!["L".to_string(), "TRL".to_string(), "AKTRL".to_string()],
///     ],
/// );
/// ```
#[derive(Clone, Debug)]
pub struct PeptideFactory {
    protease: Protease,
    missed_cleavages: usize,
    sequence: String,
    /// Pending raw fragments per missed-cleavage count; queue `i` never
    /// holds more than `i + 1` entries.
    queues: Vec<VecDeque<Peptide>>,
    /// Position the next fragment starts from; `None` once the terminal
    /// fragment has been emitted.
    fragment_start: Option<usize>,
    /// Position candidate-site scanning resumes from.
    search: usize,
    /// Raw fragments found so far.
    found: u64,
}

impl PeptideFactory {
    /// Create a factory for a protease and a maximum number of missed
    /// cleavages. Call [`Self::start`] to begin digesting a sequence.
    pub fn new(protease: Protease, missed_cleavages: usize) -> Self {
        Self {
            protease,
            missed_cleavages,
            sequence: String::new(),
            queues: Vec::new(),
            fragment_start: None,
            search: 0,
            found: 0,
        }
    }

    /// Create a factory for one of the built-in proteases.
    pub fn for_id(id: ProteaseId, rules: RuleSet, missed_cleavages: usize) -> Self {
        Self::new(id.protease(rules).clone(), missed_cleavages)
    }

    /// (Re)initialize the factory to digest `sequence` from the beginning.
    /// The sequence is uppercased; all cursor state and pending fragments
    /// are reset, so digesting the same sequence twice yields identical
    /// output.
    pub fn start(&mut self, sequence: &str) {
        self.sequence = sequence.to_uppercase();
        self.queues = (0..=self.missed_cleavages)
            .map(|missed| VecDeque::with_capacity(missed + 1))
            .collect();
        self.fragment_start = Some(0);
        self.search = 0;
        self.found = 0;
    }

    /// The sequence currently being digested.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The configured maximum number of missed cleavages.
    pub const fn missed_cleavages(&self) -> usize {
        self.missed_cleavages
    }

    /// The protease in use.
    pub const fn protease(&self) -> &Protease {
        &self.protease
    }

    /// How many raw fragments have been found so far. Updated on every call
    /// to [`Self::next_batch`].
    pub const fn peptide_count(&self) -> u64 {
        self.found
    }

    /// Produce the peptides completed by the next cleavage event.
    ///
    /// Scans from the current cursor for the next candidate site, skipping
    /// vetoed candidates one position at a time, cuts the pending fragment
    /// at every resolved offset, and reports the assembled missed-cleavage
    /// peptides that `filter` admits. When no candidate site remains the
    /// stretch up to the end of the sequence is emitted as the final
    /// fragment. Returns `None` once the sequence is exhausted, on this and
    /// every later call.
    pub fn next_batch(&mut self, filter: MissedCleavageFilter) -> Option<Vec<Peptide>> {
        let mut fragment_start = self.fragment_start?;
        if self.search > self.sequence.len() {
            return None;
        }

        let raw = loop {
            let Some(site) = self.protease.next_anchor(&self.sequence, self.search) else {
                // no candidate sites remain, emit whatever is left
                let mut fragments = Vec::new();
                if fragment_start < self.sequence.len() {
                    fragments.push(Peptide::new(
                        &self.sequence[fragment_start..],
                        fragment_start,
                    ));
                    self.found += 1;
                }
                self.fragment_start = None;
                break fragments;
            };

            let offsets = self.protease.resolve(&self.sequence, site);
            if offsets.is_empty() {
                // vetoed candidate, resume scanning one position further
                self.search = site + 1;
                continue;
            }

            let fragments = self.cut(&offsets, site, &mut fragment_start);
            self.fragment_start = Some(fragment_start);
            self.search = site + 1;
            if fragments.is_empty() {
                warn!(
                    "no fragments cut at site {site} of {} despite {} cut offset(s), continuing past the site",
                    self.sequence,
                    offsets.len(),
                );
                continue;
            }
            self.found += fragments.len() as u64;
            break fragments;
        };

        Some(self.assemble(raw, filter))
    }

    /// Cut the pending fragment at every offset from the candidate site, in
    /// rule order. Cuts that coincide with the current fragment start would
    /// yield an empty fragment and are collapsed silently, but still advance
    /// the fragment start.
    fn cut(&self, offsets: &[usize], site: usize, fragment_start: &mut usize) -> Vec<Peptide> {
        let mut fragments = Vec::new();
        for &offset in offsets {
            let cut = (site + offset).min(self.sequence.len());
            if cut > *fragment_start {
                fragments.push(Peptide::new(
                    &self.sequence[*fragment_start..cut],
                    *fragment_start,
                ));
            }
            *fragment_start = cut;
        }
        fragments
    }

    /// Feed raw fragments through the missed-cleavage queues and collect the
    /// completed peptides, in queue order (fewest missed cleavages first).
    fn assemble(&mut self, raw: Vec<Peptide>, filter: MissedCleavageFilter) -> Vec<Peptide> {
        let mut assembled = Vec::new();
        for fragment in raw {
            let mut complete = 0;
            for (index, queue) in self.queues.iter_mut().enumerate() {
                queue.push_back(fragment.clone());
                if queue.len() == index + 1 {
                    complete += 1;
                }
            }
            // the queues fill front to back, so the first `complete` queues
            // each hold a full run of consecutive fragments
            for missed in 0..complete {
                let queue = &mut self.queues[missed];
                if filter.admits(missed) {
                    let start = queue[0].start();
                    let merged: String = queue.iter().map(Peptide::sequence).collect();
                    assembled.push(Peptide::new(merged, start));
                }
                queue.pop_front();
            }
        }
        assembled
    }

    /// Iterate over single peptides, flattening batches as they are
    /// produced. The iterator drains the factory.
    pub fn peptides(&mut self, filter: MissedCleavageFilter) -> Peptides<'_> {
        Peptides {
            factory: self,
            filter,
            pending: Vec::new().into_iter(),
        }
    }

    /// Digest `sequence` to completion and count the peptides that would be
    /// reported under `filter`.
    pub fn how_many(&mut self, sequence: &str, filter: MissedCleavageFilter) -> usize {
        self.start(sequence);
        self.peptides(filter).count()
    }
}

/// Draining iterator over the peptides of a [`PeptideFactory`], see
/// [`PeptideFactory::peptides`].
#[derive(Debug)]
pub struct Peptides<'a> {
    factory: &'a mut PeptideFactory,
    filter: MissedCleavageFilter,
    pending: std::vec::IntoIter<Peptide>,
}

impl Iterator for Peptides<'_> {
    type Item = Peptide;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(peptide) = self.pending.next() {
                return Some(peptide);
            }
            self.pending = self.factory.next_batch(self.filter)?.into_iter();
        }
    }
}
