use crate::config::{ChangelogConfig, parse_id_list};
use crate::github::DEFAULT_API_URL;
use crate::publish::DEFAULT_POST_STATUS;
use crate::types::IdSet;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Flags shared by every subcommand
#[derive(Args, Clone, Default, Debug)]
pub struct CommonParams {
    /// TOML file with extraction and taxonomy settings
    #[arg(long, help = "Load settings from a TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Repository owner
    #[arg(
        long,
        env = "CIRCLE_PROJECT_USERNAME",
        help = "GitHub user or organization that owns the repository"
    )]
    pub owner: String,

    /// Repository name
    #[arg(long, env = "CIRCLE_PROJECT_REPONAME", help = "GitHub repository name")]
    pub repo: String,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token for private repositories and higher rate limits"
    )]
    pub github_token: Option<String>,

    #[arg(
        long,
        default_value = DEFAULT_API_URL,
        help = "GitHub API base URL"
    )]
    pub github_api_url: String,

    /// Line prefix that opens the changelog section
    #[arg(long, help = "Rendered line that opens the changelog section")]
    pub start_marker: Option<String>,

    /// Line prefix that closes the changelog section
    #[arg(long, help = "Rendered line that closes the changelog section")]
    pub end_marker: Option<String>,

    #[arg(long, help = "Do not append a link back to the pull request")]
    pub no_link_to_pr: bool,

    /// Endpoint that creates changelog posts
    #[arg(
        long,
        required_unless_present = "print",
        help = "WordPress endpoint that creates changelog posts"
    )]
    pub wp_endpoint: Option<String>,

    #[arg(
        long,
        env = "CHANGELOG_POST_TOKEN",
        hide_env_values = true,
        required_unless_present = "print",
        help = "Bearer token for the changelog endpoint"
    )]
    pub post_token: Option<String>,

    #[arg(long, default_value = DEFAULT_POST_STATUS, help = "Status of the created post")]
    pub wp_status: String,

    #[arg(long, value_parser = parse_id_list, help = "Comma-separated tag ids added to every post")]
    pub wp_tag_ids: Option<IdSet>,

    #[arg(long, value_parser = parse_id_list, help = "Comma-separated category ids")]
    pub wp_category_ids: Option<IdSet>,

    #[arg(long, value_parser = parse_id_list, help = "Comma-separated release channel ids")]
    pub wp_channel_ids: Option<IdSet>,

    /// Print the record as JSON instead of posting it
    #[arg(short, long, help = "Print the changelog record to stdout instead of posting it")]
    pub print: bool,
}

impl CommonParams {
    /// Overlay command-line values onto a loaded configuration
    ///
    /// Returns whether anything changed.
    pub fn apply_to_config(&self, config: &mut ChangelogConfig) -> Result<bool> {
        let mut changes_made = false;

        if let Some(start_marker) = &self.start_marker
            && config.start_marker != *start_marker
        {
            config.start_marker.clone_from(start_marker);
            changes_made = true;
        }

        if let Some(end_marker) = &self.end_marker
            && config.end_marker != *end_marker
        {
            config.end_marker.clone_from(end_marker);
            changes_made = true;
        }

        if self.no_link_to_pr && config.append_self_link {
            config.append_self_link = false;
            changes_made = true;
        }

        for (ids, target) in [
            (&self.wp_tag_ids, &mut config.tag_ids),
            (&self.wp_category_ids, &mut config.category_ids),
            (&self.wp_channel_ids, &mut config.channel_ids),
        ] {
            if let Some(ids) = ids
                && !target.iter().eq(ids.iter())
            {
                target.clone_from(ids);
                changes_made = true;
            }
        }

        config.validate()?;
        Ok(changes_made)
    }

    /// Configuration file (if any) with the command-line overrides applied
    pub fn resolve_config(&self) -> Result<ChangelogConfig> {
        let mut config = ChangelogConfig::load_or_default(self.config.as_deref())?;
        self.apply_to_config(&mut config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_config_overrides_file_values() {
        let mut config = ChangelogConfig {
            tag_ids: [1, 2].into_iter().collect(),
            channel_ids: [5].into_iter().collect(),
            ..ChangelogConfig::default()
        };
        let params = CommonParams {
            end_marker: Some("<h2>Notes".to_string()),
            no_link_to_pr: true,
            wp_tag_ids: Some([9].into_iter().collect()),
            ..CommonParams::default()
        };

        assert!(params.apply_to_config(&mut config).expect("valid overrides"));
        assert_eq!(config.end_marker, "<h2>Notes");
        assert_eq!(config.start_marker, crate::config::DEFAULT_START_MARKER);
        assert!(!config.append_self_link);
        assert_eq!(config.tag_ids.into_iter().collect::<Vec<_>>(), vec![9]);
        assert_eq!(config.channel_ids.into_iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_apply_to_config_without_overrides() {
        let mut config = ChangelogConfig::default();
        let changed = CommonParams::default()
            .apply_to_config(&mut config)
            .expect("defaults are valid");
        assert!(!changed);
        assert_eq!(config, ChangelogConfig::default());
    }

    #[test]
    fn test_empty_marker_override_is_rejected() {
        let mut config = ChangelogConfig::default();
        let params = CommonParams {
            start_marker: Some(String::new()),
            ..CommonParams::default()
        };
        assert!(params.apply_to_config(&mut config).is_err());
    }
}
