//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.threadtally.toml` files.

use crate::models::{Candidate, TallyOptions};
use crate::source::{SourceFormat, SourceOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".threadtally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Ballot counting settings.
    #[serde(default)]
    pub ballot: BallotConfig,

    /// Comment source settings.
    #[serde(default)]
    pub source: SourceConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Manifest output path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "votes.json".to_string()
}

/// How ballots are counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotConfig {
    /// Count only direct replies to the submission.
    #[serde(default)]
    pub only_top_level: bool,

    /// Weigh votes by comment score.
    #[serde(default)]
    pub weigh_comments: bool,

    /// Exclusive upper bound for candidate numbers.
    #[serde(default = "default_max_candidate")]
    pub max_candidate: Candidate,
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            only_top_level: false,
            weigh_comments: false,
            max_candidate: default_max_candidate(),
        }
    }
}

fn default_max_candidate() -> Candidate {
    25
}

/// Where and how comments are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Thread document format.
    #[serde(default)]
    pub format: SourceFormat,

    /// Deepest reply level to read. Unset derives it from `only_top_level`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Switches only ever turn a setting on.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.only_top_level {
            self.ballot.only_top_level = true;
        }
        if args.weigh_comments {
            self.ballot.weigh_comments = true;
        }
        if let Some(max_candidate) = args.max_candidate {
            self.ballot.max_candidate = max_candidate;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(format) = args.format {
            self.source.format = format;
        }
        if let Some(max_depth) = args.max_depth {
            self.source.max_depth = Some(max_depth);
        }
    }

    /// Check values the CLI cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.ballot.max_candidate == 0 {
            anyhow::bail!("max_candidate must be at least 1");
        }
        if self.general.output.trim().is_empty() {
            anyhow::bail!("output path must not be empty");
        }
        Ok(())
    }

    /// Options for the tally core.
    pub fn tally_options(&self) -> TallyOptions {
        TallyOptions {
            only_top_level: self.ballot.only_top_level,
            weigh_comments: self.ballot.weigh_comments,
            max_candidate: self.ballot.max_candidate,
        }
    }

    /// Options for the comment source.
    ///
    /// Without an explicit depth, top-level mode reads no replies at all and
    /// the default mode reads the whole tree.
    pub fn source_options(&self) -> SourceOptions {
        let max_depth = match self.source.max_depth {
            Some(depth) => Some(depth),
            None if self.ballot.only_top_level => Some(0),
            None => None,
        };
        SourceOptions { max_depth }
    }

    /// Manifest output path.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.general.output)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
