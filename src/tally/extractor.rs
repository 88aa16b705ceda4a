//! Candidate extraction from comment text.
//!
//! A vote is any free-standing run of ASCII digits in a comment body.
//! Numerals at or above the configured bound are dropped, which keeps
//! inline emoji codes and similar incidental numbers out of the tally.

use crate::models::Candidate;
use regex::Regex;
use std::collections::BTreeSet;

/// Free-standing numeral: digits bounded by non-word characters or text edges.
const NUMERAL_PATTERN: &str = r"\b[0-9]+\b";

/// Extracts candidate identifiers from comment bodies.
#[derive(Debug, Clone)]
pub struct CandidateExtractor {
    numeral: Regex,
    max_candidate: Candidate,
}

impl CandidateExtractor {
    /// Create an extractor accepting candidates in `[0, max_candidate)`.
    pub fn new(max_candidate: Candidate) -> Result<Self, regex::Error> {
        Ok(Self {
            numeral: Regex::new(NUMERAL_PATTERN)?,
            max_candidate,
        })
    }

    /// Extract the set of valid candidates named in `body`.
    ///
    /// Repeated numerals collapse into one entry. Digit runs too long to
    /// parse are treated as out of range.
    pub fn extract(&self, body: &str) -> BTreeSet<Candidate> {
        self.numeral
            .find_iter(body)
            .filter_map(|m| m.as_str().parse::<Candidate>().ok())
            .filter(|candidate| *candidate < self.max_candidate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(body: &str, max: Candidate) -> Vec<Candidate> {
        CandidateExtractor::new(max)
            .unwrap()
            .extract(body)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_extract_plain_numerals() {
        assert_eq!(extract("I vote 1 and 2", 25), vec![1, 2]);
        assert_eq!(extract("3!!", 25), vec![3]);
        assert_eq!(extract("0", 25), vec![0]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(extract("7, 7 and 7 again", 25), vec![7]);
        assert_eq!(extract("07 and 7", 25), vec![7]);
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        assert_eq!(extract("24 25 26", 25), vec![24]);
        assert!(extract("100", 25).is_empty());
        assert_eq!(extract("100", 101), vec![100]);
    }

    #[test]
    fn test_no_partial_matches() {
        assert!(extract("abc123", 1000).is_empty());
        assert!(extract("v2 and 4th", 25).is_empty());
        assert!(extract("x1y", 25).is_empty());
    }

    #[test]
    fn test_punctuation_bounds_numerals() {
        assert_eq!(extract("(5)", 25), vec![5]);
        assert_eq!(extract("#12.", 25), vec![12]);
        assert_eq!(extract("1,2;3", 25), vec![1, 2, 3]);
    }

    #[test]
    fn test_no_negatives_or_fractions() {
        // The minus sign is not part of the numeral, the digits still count.
        assert_eq!(extract("-4", 25), vec![4]);
        // Both sides of a decimal point are separate numerals.
        assert_eq!(extract("2.5", 25), vec![2, 5]);
    }

    #[test]
    fn test_overflow_fails_closed() {
        let body = "99999999999999999999999999999 and 3";
        assert_eq!(extract(body, 25), vec![3]);
        assert!(extract("99999999999999999999999999999", Candidate::MAX).is_empty());
    }

    #[test]
    fn test_empty_body() {
        assert!(extract("", 25).is_empty());
        assert!(extract("no numbers here", 25).is_empty());
    }
}
