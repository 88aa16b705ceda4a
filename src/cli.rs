//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::source::SourceFormat;
use clap::Parser;
use std::path::PathBuf;

/// ThreadTally - count numeric votes posted in a comment thread
///
/// Reads a saved comment thread, counts one ballot per commenter, prints
/// the ranked totals and writes every ballot to a JSON manifest.
///
/// Examples:
///   threadtally thread.json
///   threadtally thread.json --only-top-level --max-candidate 40
///   threadtally thread.json --weigh-comments -o audit.json
///   curl -s "$THREAD_URL.json" | threadtally -
///   threadtally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Thread to tally: path to a saved thread JSON document, or `-` for stdin
    #[arg(value_name = "THREAD", required_unless_present = "init_config")]
    pub thread: Option<String>,

    /// Only count direct replies to the submission
    #[arg(long)]
    pub only_top_level: bool,

    /// Weigh each vote by the comment's score instead of 1
    #[arg(long)]
    pub weigh_comments: bool,

    /// Exclusive upper bound for candidate numbers
    ///
    /// Larger numerals are ignored (inline emoji codes render as digits).
    /// Default: from config or 25.
    #[arg(long, value_name = "N", env = "THREADTALLY_MAX_CANDIDATE")]
    pub max_candidate: Option<u32>,

    /// Output file path for the vote manifest
    ///
    /// Default: from config or votes.json.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Thread document format (auto, listing, records)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<SourceFormat>,

    /// Deepest reply level to read (0 = top-level comments only)
    ///
    /// Default: 0 with --only-top-level, otherwise the whole tree.
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .threadtally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .threadtally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The thread reference, empty if not set (should be validated first).
    pub fn thread_ref(&self) -> &str {
        self.thread.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.thread_ref().trim().is_empty() {
            return Err("A thread reference is required".to_string());
        }

        if self.max_candidate == Some(0) {
            return Err("Max candidate must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path must not be empty".to_string());
            }
            if output.is_dir() {
                return Err(format!(
                    "Output path is a directory: {}",
                    output.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            thread: Some("thread.json".to_string()),
            only_top_level: false,
            weigh_comments: false,
            max_candidate: None,
            output: None,
            format: None,
            max_depth: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "threadtally",
            "thread.json",
            "--only-top-level",
            "--weigh-comments",
            "--max-candidate",
            "40",
            "-o",
            "audit.json",
            "--format",
            "listing",
            "--max-depth",
            "2",
        ])
        .unwrap();

        assert_eq!(args.thread_ref(), "thread.json");
        assert!(args.only_top_level);
        assert!(args.weigh_comments);
        assert_eq!(args.max_candidate, Some(40));
        assert_eq!(args.output, Some(PathBuf::from("audit.json")));
        assert_eq!(args.format, Some(SourceFormat::Listing));
        assert_eq!(args.max_depth, Some(2));
    }

    #[test]
    fn test_thread_required_unless_init_config() {
        assert!(Args::try_parse_from(["threadtally"]).is_err());
        let args = Args::try_parse_from(["threadtally", "--init-config"]).unwrap();
        assert!(args.init_config);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_max_candidate() {
        let mut args = make_args();
        args.max_candidate = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_thread() {
        let mut args = make_args();
        args.thread = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = make_args();
        args.output = Some(dir.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
