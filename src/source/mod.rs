//! Comment sources.
//!
//! A comment source turns a thread reference into an ordered, flattened
//! list of `CommentRecord`s. Two document shapes are understood: the raw
//! listing dump a discussion platform serves for a thread, and a flat
//! array of records produced by other tools.

pub mod listing;
pub mod records;

use crate::error::SourceError;
use crate::models::CommentRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

pub use listing::ListingSource;
pub use records::RecordsSource;

/// Input document format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Detect from the document shape (default)
    #[default]
    Auto,
    /// Platform listing dump: `[submission, comments]`
    Listing,
    /// Flat array of comment records
    Records,
}

/// Options passed down to a comment source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Deepest nesting level to emit; 0 keeps only top-level comments.
    /// `None` emits the whole tree.
    pub max_depth: Option<usize>,
}

impl SourceOptions {
    /// Whether a comment at `depth` should be emitted.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

/// A loaded thread.
#[derive(Debug, Clone, Default)]
pub struct Thread {
    /// Submission id, when the document carries one.
    pub id: Option<String>,
    /// Submission title, when the document carries one.
    pub title: Option<String>,
    /// Comments in processing order.
    pub records: Vec<CommentRecord>,
    /// Comments hidden behind collapsed placeholders that could not be loaded.
    pub unresolved: usize,
}

/// Something that can produce the comment records of a thread.
pub trait CommentSource {
    /// Load the thread, honoring the depth limit in `options`.
    fn load(&self, options: &SourceOptions) -> Result<Thread, SourceError>;
}

/// Where the thread document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadInput {
    Stdin,
    File(PathBuf),
}

impl ThreadInput {
    /// Resolve a thread reference given on the command line.
    ///
    /// `-` reads from standard input; anything else must be an existing file.
    pub fn parse(reference: &str) -> Result<Self, SourceError> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(SourceError::InvalidReference(
                "thread reference is empty".to_string(),
            ));
        }

        if reference == "-" {
            return Ok(ThreadInput::Stdin);
        }

        let path = PathBuf::from(reference);
        if !path.is_file() {
            return Err(SourceError::InvalidReference(format!(
                "{} is not a readable file",
                path.display()
            )));
        }

        Ok(ThreadInput::File(path))
    }

    /// Read the whole document.
    pub fn read(&self) -> Result<String, SourceError> {
        match self {
            ThreadInput::Stdin => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .map_err(|source| SourceError::Read {
                        path: PathBuf::from("<stdin>"),
                        source,
                    })?;
                Ok(content)
            }
            ThreadInput::File(path) => {
                std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Guess the format of a parsed document.
pub fn detect_format(document: &Value) -> Result<SourceFormat, SourceError> {
    match document {
        Value::Object(_) if is_listing(document) => Ok(SourceFormat::Listing),
        Value::Array(items) => match items.first() {
            None => Ok(SourceFormat::Records),
            Some(first) if is_listing(first) => Ok(SourceFormat::Listing),
            Some(_) if items.iter().all(|item| item.get("body").is_some()) => {
                Ok(SourceFormat::Records)
            }
            Some(_) => Err(SourceError::UnrecognizedFormat(
                "array is neither a listing dump nor a list of comment records".to_string(),
            )),
        },
        _ => Err(SourceError::UnrecognizedFormat(
            "expected a JSON array or listing object".to_string(),
        )),
    }
}

fn is_listing(value: &Value) -> bool {
    value.get("kind").and_then(Value::as_str) == Some("Listing")
}

/// Build the comment source for an already parsed document.
pub fn open_source(
    document: Value,
    format: SourceFormat,
) -> Result<Box<dyn CommentSource>, SourceError> {
    match format {
        SourceFormat::Listing => Ok(Box::new(ListingSource::new(document))),
        SourceFormat::Records => Ok(Box::new(RecordsSource::new(document))),
        SourceFormat::Auto => {
            let detected = detect_format(&document)?;
            debug!("Detected thread format: {:?}", detected);
            open_source(document, detected)
        }
    }
}

/// Read, parse and flatten a thread in one step.
pub fn load_thread(
    input: &ThreadInput,
    format: SourceFormat,
    options: &SourceOptions,
) -> Result<Thread, SourceError> {
    let content = input.read()?;
    let document: Value = serde_json::from_str(&content)?;

    let source = open_source(document, format)?;
    let thread = source.load(options)?;

    info!("Loaded {} comments", thread.records.len());
    Ok(thread)
}
