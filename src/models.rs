//! Data models for the vote tally.
//!
//! This module contains the records handed over by a comment source,
//! the ballots written to the manifest, and the counters describing a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate identifier written as a numeral in a comment.
pub type Candidate = u32;

/// Who wrote a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Author {
    /// A resolvable voter identity.
    Identity(String),
    /// Deleted or removed account; never votes.
    Anonymous,
}

impl Author {
    /// Build an author from an optional platform name.
    ///
    /// Missing names and the platform's deletion markers map to `Anonymous`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None => Author::Anonymous,
            Some(name) if matches!(name.trim(), "" | "[deleted]" | "[removed]") => {
                Author::Anonymous
            }
            Some(name) => Author::Identity(name.to_string()),
        }
    }

    /// Returns the voter identity, if any.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Author::Identity(name) => Some(name),
            Author::Anonymous => None,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Identity(name) => write!(f, "{}", name),
            Author::Anonymous => write!(f, "[anonymous]"),
        }
    }
}

/// One comment of the thread, as supplied by a comment source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Author of the comment.
    pub author: Author,
    /// Raw comment text.
    pub body: String,
    /// Platform score (upvotes minus downvotes).
    pub score: i64,
    /// Whether the comment replies directly to the submission.
    pub is_top_level: bool,
}

impl CommentRecord {
    /// Convenience constructor for a comment by a named author.
    #[cfg(test)]
    pub fn new(author: &str, body: &str, score: i64, is_top_level: bool) -> Self {
        Self {
            author: Author::from_name(Some(author)),
            body: body.to_string(),
            score,
            is_top_level,
        }
    }
}

/// One (voter, candidate) entry of the manifest.
///
/// Field order matches the manifest layout: author, body, candidate, score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub author: String,
    pub body: String,
    pub candidate: Candidate,
    pub score: i64,
}

/// Settings that drive the tally itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyOptions {
    /// Count only direct replies to the submission.
    pub only_top_level: bool,
    /// Use the comment score as weight instead of 1.
    pub weigh_comments: bool,
    /// Exclusive upper bound for candidate numerals.
    pub max_candidate: Candidate,
}

impl Default for TallyOptions {
    fn default() -> Self {
        Self {
            only_top_level: false,
            weigh_comments: false,
            max_candidate: 25,
        }
    }
}

/// Why a record did not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Author could not be resolved.
    Anonymous,
    /// Author already cast a ballot earlier in the thread.
    AlreadyVoted,
    /// Reply to another comment while only top-level comments count.
    NotTopLevel,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Anonymous => write!(f, "anonymous author"),
            SkipReason::AlreadyVoted => write!(f, "author already voted"),
            SkipReason::NotTopLevel => write!(f, "not a top-level comment"),
        }
    }
}

/// Counters describing one tally run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallySummary {
    /// Records handed to the ballot box.
    pub records_seen: usize,
    /// Records that passed the eligibility gate.
    pub counted: usize,
    /// Counted records that named no valid candidate.
    pub empty_ballots: usize,
    pub skipped_anonymous: usize,
    pub skipped_repeat: usize,
    pub skipped_nested: usize,
    /// Ballots appended to the manifest.
    pub ballots: usize,
}

impl TallySummary {
    /// Record a skipped comment under its reason.
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Anonymous => self.skipped_anonymous += 1,
            SkipReason::AlreadyVoted => self.skipped_repeat += 1,
            SkipReason::NotTopLevel => self.skipped_nested += 1,
        }
    }

    /// Total number of skipped records.
    pub fn skipped(&self) -> usize {
        self.skipped_anonymous + self.skipped_repeat + self.skipped_nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_from_name() {
        assert_eq!(
            Author::from_name(Some("alice")),
            Author::Identity("alice".to_string())
        );
        assert_eq!(Author::from_name(Some("[deleted]")), Author::Anonymous);
        assert_eq!(Author::from_name(Some("[removed]")), Author::Anonymous);
        assert_eq!(Author::from_name(Some("  ")), Author::Anonymous);
        assert_eq!(Author::from_name(None), Author::Anonymous);
    }

    #[test]
    fn test_author_name_kept_verbatim() {
        assert_eq!(
            Author::from_name(Some(" alice")),
            Author::Identity(" alice".to_string())
        );
        assert_ne!(
            Author::from_name(Some(" alice")),
            Author::from_name(Some("alice"))
        );
        assert_eq!(Author::from_name(Some(" [deleted] ")), Author::Anonymous);
    }

    #[test]
    fn test_author_identity() {
        assert_eq!(Author::Identity("bob".to_string()).identity(), Some("bob"));
        assert_eq!(Author::Anonymous.identity(), None);
    }

    #[test]
    fn test_ballot_field_order() {
        let ballot = Ballot {
            author: "alice".to_string(),
            body: "1".to_string(),
            candidate: 1,
            score: 3,
        };
        let json = serde_json::to_string(&ballot).unwrap();
        assert_eq!(
            json,
            r#"{"author":"alice","body":"1","candidate":1,"score":3}"#
        );
    }

    #[test]
    fn test_summary_skips() {
        let mut summary = TallySummary::default();
        summary.record_skip(SkipReason::Anonymous);
        summary.record_skip(SkipReason::AlreadyVoted);
        summary.record_skip(SkipReason::AlreadyVoted);
        summary.record_skip(SkipReason::NotTopLevel);

        assert_eq!(summary.skipped_anonymous, 1);
        assert_eq!(summary.skipped_repeat, 2);
        assert_eq!(summary.skipped_nested, 1);
        assert_eq!(summary.skipped(), 4);
    }

    #[test]
    fn test_default_options() {
        let options = TallyOptions::default();
        assert!(!options.only_top_level);
        assert!(!options.weigh_comments);
        assert_eq!(options.max_candidate, 25);
    }
}
