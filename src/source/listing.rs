//! Listing dump source.
//!
//! Reads the document a discussion platform serves for a thread: an array
//! holding the submission listing followed by the comment listing. Comments
//! nest through their `replies` field and collapsed branches appear as
//! `more` placeholders.

use crate::error::SourceError;
use crate::models::{Author, CommentRecord};
use crate::source::{CommentSource, SourceOptions, Thread};
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

const KIND_LISTING: &str = "Listing";
const KIND_COMMENT: &str = "t1";
const KIND_SUBMISSION: &str = "t3";
const KIND_MORE: &str = "more";

/// Prefix of a parent id that points at the submission itself.
const SUBMISSION_PREFIX: &str = "t3_";

/// A generic `{kind, data}` wrapper.
#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    parent_id: Option<String>,
    /// A nested listing, or an empty string when there are no replies.
    #[serde(default)]
    replies: Value,
}

#[derive(Debug, Default, Deserialize)]
struct MoreData {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    children: Vec<String>,
}

/// Comment source over a listing dump.
pub struct ListingSource {
    document: Value,
}

impl ListingSource {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Split the document into the optional submission and the comment listing.
    fn split(&self) -> Result<(Option<SubmissionData>, ListingData), SourceError> {
        let things: Vec<Thing> = match &self.document {
            Value::Array(_) => serde_json::from_value(self.document.clone())?,
            Value::Object(_) => vec![serde_json::from_value(self.document.clone())?],
            _ => {
                return Err(SourceError::UnrecognizedFormat(
                    "listing dump must be an array or a listing object".to_string(),
                ))
            }
        };

        let mut listings = Vec::with_capacity(things.len());
        for thing in things {
            if thing.kind != KIND_LISTING {
                return Err(SourceError::UnrecognizedFormat(format!(
                    "expected a {} but found kind '{}'",
                    KIND_LISTING, thing.kind
                )));
            }
            listings.push(serde_json::from_value::<ListingData>(thing.data)?);
        }

        match listings.len() {
            1 => Ok((None, listings.remove(0))),
            2 => {
                let comments = listings.remove(1);
                let submission = listings
                    .remove(0)
                    .children
                    .into_iter()
                    .find(|thing| thing.kind == KIND_SUBMISSION)
                    .map(|thing| serde_json::from_value::<SubmissionData>(thing.data))
                    .transpose()?;
                Ok((submission, comments))
            }
            n => Err(SourceError::UnrecognizedFormat(format!(
                "expected 1 or 2 listings, found {}",
                n
            ))),
        }
    }
}

impl CommentSource for ListingSource {
    fn load(&self, options: &SourceOptions) -> Result<Thread, SourceError> {
        let (submission, comments) = self.split()?;
        let submission = submission.unwrap_or_default();

        let mut thread = Thread {
            id: submission.id,
            title: submission.title,
            ..Thread::default()
        };

        // Breadth-first: every top-level comment first, then each level of replies.
        let mut queue: VecDeque<(Thing, usize)> =
            comments.children.into_iter().map(|thing| (thing, 0)).collect();

        while let Some((thing, depth)) = queue.pop_front() {
            match thing.kind.as_str() {
                KIND_COMMENT => {
                    let comment: CommentData = serde_json::from_value(thing.data)?;
                    let is_top_level = match comment.parent_id.as_deref() {
                        Some(parent) => parent.starts_with(SUBMISSION_PREFIX),
                        None => depth == 0,
                    };

                    if let Some(replies) = parse_replies(comment.replies)? {
                        let next = depth + 1;
                        if options.allows_depth(next) {
                            queue.extend(replies.children.into_iter().map(|r| (r, next)));
                        }
                    }

                    thread.records.push(CommentRecord {
                        author: Author::from_name(comment.author.as_deref()),
                        body: comment.body,
                        score: comment.score,
                        is_top_level,
                    });
                }
                KIND_MORE => {
                    let more: MoreData = serde_json::from_value(thing.data)?;
                    let hidden = more.count.max(more.children.len());
                    debug!("Collapsed placeholder at depth {} hides {} comments", depth, hidden);
                    thread.unresolved += hidden;
                }
                other => {
                    debug!("Ignoring listing child of kind '{}'", other);
                }
            }
        }

        Ok(thread)
    }
}

/// Decode a `replies` field, which is either a listing or an empty string.
fn parse_replies(replies: Value) -> Result<Option<ListingData>, SourceError> {
    match replies {
        Value::Object(_) => {
            let thing: Thing = serde_json::from_value(replies)?;
            if thing.kind != KIND_LISTING {
                return Ok(None);
            }
            Ok(Some(serde_json::from_value(thing.data)?))
        }
        _ => Ok(None),
    }
}
