use crate::log_debug;
use crate::types::IdSet;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Heading line that opens the changelog section of a rendered description
pub const DEFAULT_START_MARKER: &str = "<h2>Changelog Description";
/// Any following second-level heading closes the section
pub const DEFAULT_END_MARKER: &str = "<h2>";

/// Configuration for changelog extraction and the record's taxonomy
///
/// Built once per run (defaults, then an optional TOML file, then command-line
/// overrides) and passed by reference into the pipeline.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Lines starting with this text open the changelog section
    pub start_marker: String,
    /// Lines starting with this text close the changelog section
    pub end_marker: String,
    /// Append a link back to the pull request when the fragment lacks one
    pub append_self_link: bool,
    /// Tags attached to every record
    pub tag_ids: IdSet,
    pub category_ids: IdSet,
    /// Release channels attached to every record
    pub channel_ids: IdSet,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            append_self_link: true,
            tag_ids: IdSet::new(),
            category_ids: IdSet::new(),
            channel_ids: IdSet::new(),
        }
    }
}

impl ChangelogConfig {
    /// Load the configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })?;

        config.validate()?;
        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Empty markers would match every line
    pub fn validate(&self) -> Result<()> {
        if self.start_marker.is_empty() {
            return Err(anyhow!("start_marker must not be empty"));
        }
        if self.end_marker.is_empty() {
            return Err(anyhow!("end_marker must not be empty"));
        }
        Ok(())
    }
}

/// Parse a comma-separated id list, dropping empty entries
///
/// Used as a clap value parser, so `"1,,2,"` becomes `{1, 2}`.
pub fn parse_id_list(s: &str) -> Result<IdSet, String> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<u64>()
                .map_err(|_| format!("Invalid id '{entry}': expected a positive integer"))
        })
        .collect()
}
