//! Vote extraction, deduplication, aggregation and ranking.

pub mod ballot_box;
pub mod extractor;
pub mod ranking;

pub use ballot_box::tally_votes;
pub use ranking::{rank, Standing};
