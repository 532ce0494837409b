//! Subcommands and the options they share

pub mod compare;
pub mod tree;

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use structdiff_core::config::ListModeConfig;
use structdiff_core::logging_facility::{self, Profile};
use structdiff_core::{CompareProfile, Comparer, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per difference
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// Markdown summary grouped by kind
    Markdown,
}

/// Inputs and comparison options common to every subcommand
#[derive(Debug, Args)]
pub struct ComparisonArgs {
    /// Left-hand JSON document
    pub left: PathBuf,

    /// Right-hand JSON document
    pub right: PathBuf,

    /// Comparison profile (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Compare lists by key, trying these members in order
    #[arg(long = "key", value_name = "MEMBER")]
    pub keys: Vec<String>,

    /// Path segment for keyed elements, with {key} and {index} placeholders
    #[arg(long)]
    pub key_template: Option<String>,

    /// Keep comparing elements of lists whose lengths differ
    #[arg(long)]
    pub compare_unequal_lists: bool,

    /// Never report this member
    #[arg(long = "ignore", value_name = "MEMBER")]
    pub ignored: Vec<String>,

    /// Compare this member without regard to case
    #[arg(long = "ignore-case", value_name = "MEMBER")]
    pub ignore_case: Vec<String>,

    /// Treat empty collections and null as equal
    #[arg(long)]
    pub empty_null_equal: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log comparison internals to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl ComparisonArgs {
    /// Profile from `--config`, extended by the command-line flags
    pub fn profile(&self) -> Result<CompareProfile, Box<dyn std::error::Error>> {
        let mut profile = match &self.config {
            Some(path) => CompareProfile::from_path(path)?,
            None => CompareProfile::default(),
        };
        if !self.keys.is_empty() {
            profile.lists.mode = ListModeConfig::Key;
            profile.lists.key_members.extend(self.keys.iter().cloned());
        }
        if let Some(template) = &self.key_template {
            profile.lists.mode = ListModeConfig::Key;
            profile.lists.key_template = Some(template.clone());
        }
        if self.compare_unequal_lists {
            profile.lists.compare_unequal_lists = true;
        }
        if self.empty_null_equal {
            profile.empty_and_null_collections_equal = true;
        }
        profile.ignored_members.extend(self.ignored.iter().cloned());
        profile.ignore_case_members.extend(self.ignore_case.iter().cloned());
        Ok(profile)
    }

    /// Set up logging, then build the comparer and load both documents
    pub fn prepare(&self) -> Result<(Comparer, Value, Value), Box<dyn std::error::Error>> {
        if self.verbose {
            logging_facility::init(Profile::Development);
        }
        let comparer = self.profile()?.build_comparer()?;
        let left = load(&self.left)?;
        let right = load(&self.right)?;
        Ok((comparer, left, right))
    }
}

fn load(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "document loaded");
    Ok(Value::from_json(&json))
}
