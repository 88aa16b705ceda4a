//! Eligibility gate, voter deduplication and vote aggregation.
//!
//! The `BallotBox` owns all state of a run: the set of voters seen so far,
//! the running totals and the manifest. Records are cast one at a time in
//! the order the comment source produced them.

use crate::models::{Ballot, Candidate, CommentRecord, SkipReason, TallyOptions, TallySummary};
use crate::tally::extractor::CandidateExtractor;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Accumulated weight per candidate.
pub type Tally = BTreeMap<Candidate, i64>;

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastOutcome {
    /// The record passed the gate and produced this many ballots (possibly zero).
    Counted { ballots: usize },
    /// The record was ignored.
    Skipped(SkipReason),
}

/// Final state of a run.
#[derive(Debug, Clone, Default)]
pub struct TallyResult {
    pub tally: Tally,
    pub manifest: Vec<Ballot>,
    pub summary: TallySummary,
}

/// Single-pass vote accumulator.
pub struct BallotBox {
    options: TallyOptions,
    extractor: CandidateExtractor,
    voters: HashSet<String>,
    tally: Tally,
    manifest: Vec<Ballot>,
    summary: TallySummary,
}

impl BallotBox {
    /// Create an empty ballot box.
    pub fn new(options: TallyOptions) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor: CandidateExtractor::new(options.max_candidate)?,
            options,
            voters: HashSet::new(),
            tally: Tally::new(),
            manifest: Vec::new(),
            summary: TallySummary::default(),
        })
    }

    /// Decide whether a record may vote, without changing any state.
    fn check_eligibility<'a>(&self, record: &'a CommentRecord) -> Result<&'a str, SkipReason> {
        let name = record.author.identity().ok_or(SkipReason::Anonymous)?;

        if self.voters.contains(name) {
            return Err(SkipReason::AlreadyVoted);
        }

        if self.options.only_top_level && !record.is_top_level {
            return Err(SkipReason::NotTopLevel);
        }

        Ok(name)
    }

    /// Cast one record.
    ///
    /// A record that passes the gate always consumes its author's ballot,
    /// even when its body names no valid candidate.
    pub fn cast(&mut self, record: &CommentRecord) -> CastOutcome {
        self.summary.records_seen += 1;

        let name = match self.check_eligibility(record) {
            Ok(name) => name.to_string(),
            Err(reason) => {
                debug!("Skipping comment by {}: {}", record.author, reason);
                self.summary.record_skip(reason);
                return CastOutcome::Skipped(reason);
            }
        };

        self.voters.insert(name.clone());
        self.summary.counted += 1;

        let candidates = self.extractor.extract(&record.body);
        if candidates.is_empty() {
            debug!("Comment by {} names no valid candidate", name);
            self.summary.empty_ballots += 1;
            return CastOutcome::Counted { ballots: 0 };
        }

        let weight = if self.options.weigh_comments {
            record.score
        } else {
            1
        };

        for &candidate in &candidates {
            let total = self.tally.entry(candidate).or_insert(0);
            match total.checked_add(weight) {
                Some(sum) => *total = sum,
                None => {
                    warn!("Total for candidate {} saturated at its limit", candidate);
                    *total = total.saturating_add(weight);
                }
            }
            self.manifest.push(Ballot {
                author: name.clone(),
                body: record.body.clone(),
                candidate,
                score: record.score,
            });
        }

        debug!("Counted {} for {:?} with weight {}", name, candidates, weight);
        self.summary.ballots += candidates.len();

        CastOutcome::Counted {
            ballots: candidates.len(),
        }
    }

    /// Cast every record in order.
    pub fn cast_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a CommentRecord>,
    {
        for record in records {
            self.cast(record);
        }
    }

    /// Whether `name` has already voted.
    #[cfg(test)]
    pub fn has_voted(&self, name: &str) -> bool {
        self.voters.contains(name)
    }

    /// Consume the ballot box and return its final state.
    pub fn finish(self) -> TallyResult {
        TallyResult {
            tally: self.tally,
            manifest: self.manifest,
            summary: self.summary,
        }
    }
}

/// Run a complete tally over `records`.
pub fn tally_votes(
    records: &[CommentRecord],
    options: TallyOptions,
) -> Result<TallyResult, regex::Error> {
    let mut ballot_box = BallotBox::new(options)?;
    ballot_box.cast_all(records);
    Ok(ballot_box.finish())
}
