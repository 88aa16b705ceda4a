//! Flat records source.
//!
//! Accepts an already flattened JSON array of comments:
//!
//! ```json
//! [{"author": "alice", "body": "I vote 3", "score": 12, "is_top_level": true}]
//! ```
//!
//! `author` may be `null` for deleted accounts. `is_top_level` defaults to
//! `true` when omitted.

use crate::error::SourceError;
use crate::models::{Author, CommentRecord};
use crate::source::{CommentSource, SourceOptions, Thread};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    author: Option<String>,
    body: String,
    #[serde(default)]
    score: i64,
    #[serde(default = "default_top_level")]
    is_top_level: bool,
}

fn default_top_level() -> bool {
    true
}

/// Comment source over a flat record array.
pub struct RecordsSource {
    document: Value,
}

impl RecordsSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }
}

impl CommentSource for RecordsSource {
    fn load(&self, options: &SourceOptions) -> Result<Thread, SourceError> {
        if !self.document.is_array() {
            return Err(SourceError::UnrecognizedFormat(
                "records file must be a JSON array".to_string(),
            ));
        }

        let raw: Vec<RawRecord> = serde_json::from_value(self.document.clone())?;

        // Only "top-level or not" is known here, so depth limits above 0 are moot.
        let top_level_only = options.max_depth == Some(0);

        let records: Vec<CommentRecord> = raw
            .into_iter()
            .filter(|record| !top_level_only || record.is_top_level)
            .map(|record| CommentRecord {
                author: Author::from_name(record.author.as_deref()),
                body: record.body,
                score: record.score,
                is_top_level: record.is_top_level,
            })
            .collect();

        debug!("Parsed {} comment records", records.len());

        Ok(Thread {
            records,
            ..Thread::default()
        })
    }
}
