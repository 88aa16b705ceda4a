//! Ranking of the final tally.

use crate::models::Candidate;
use crate::tally::ballot_box::Tally;
use std::cmp::Reverse;

/// A candidate and its final total, as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub candidate: Candidate,
    pub total: i64,
}

/// Rank candidates by total, highest first.
///
/// Equal totals are ordered by ascending candidate id, so the ranking is
/// the same on every run.
pub fn rank(tally: &Tally) -> Vec<Standing> {
    let mut standings: Vec<Standing> = tally
        .iter()
        .map(|(&candidate, &total)| Standing { candidate, total })
        .collect();

    standings.sort_by_key(|s| (Reverse(s.total), s.candidate));
    standings
}
