use crate::commands::{self, CommitCheck, RunSettings};
use crate::common::CommonParams;
use crate::{log_debug, logger, ui};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};

/// CLI structure defining the available commands and global arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version = crate_version!(),
    about = "Publish GitHub changelogs to WordPress",
    long_about = "Extracts the changelog section from merged pull requests or releases, merges the \
                  sections of every pull request they reference, and posts the result to a \
                  WordPress changelog endpoint.",
    styles = get_styles(),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug messages to stderr
    #[arg(long, global = true, help = "Log debug messages to stderr")]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true, help = "Suppress non-essential output")]
    pub quiet: bool,
}

/// Enumeration of available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the changelog of the last merged pull request
    #[command(
        about = "Publish the changelog of the last merged pull request",
        long_about = "Publish the changelog section of the most recently merged pull request, merged \
                      with the sections of every pull request its commits reference."
    )]
    Pr {
        #[command(flatten)]
        common: CommonParams,

        /// Publish even when the build was not triggered by the merge commit
        #[arg(long, help = "Do not require the build commit to be the merge commit")]
        no_verify_commit_hash: bool,

        /// Commit the build runs on
        #[arg(long, env = "CIRCLE_SHA1", help = "Commit the build was triggered from")]
        commit_sha: Option<String>,
    },

    /// Publish the changelog of the latest release
    #[command(
        about = "Publish the changelog of the latest release",
        long_about = "Publish one changelog combining the sections of every pull request the latest \
                      release notes link to."
    )]
    Release {
        #[command(flatten)]
        common: CommonParams,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    logger::init(cli.debug).map_err(|e| anyhow::anyhow!("{e}"))?;

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    handle_command(cli.command).await
}

pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let outcome = match command {
        Commands::Pr {
            common,
            no_verify_commit_hash,
            commit_sha,
        } => {
            log_debug!(
                "Handling 'pr' command for {}/{} (verify commit: {})",
                common.owner,
                common.repo,
                !no_verify_commit_hash
            );
            let settings = RunSettings::from_params(&common)?;
            let check = if no_verify_commit_hash {
                CommitCheck::Disabled
            } else {
                CommitCheck::Expect(commit_sha)
            };
            commands::run_pull_request(&settings, &check).await?
        }
        Commands::Release { common } => {
            log_debug!(
                "Handling 'release' command for {}/{}",
                common.owner,
                common.repo
            );
            let settings = RunSettings::from_params(&common)?;
            commands::run_release(&settings).await?
        }
    };

    commands::report(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pr_command() {
        let cli = Cli::try_parse_from([
            "github-changelog",
            "pr",
            "--owner",
            "acme",
            "--repo",
            "app",
            "--print",
            "--wp-tag-ids",
            "4,,2",
            "--no-link-to-pr",
            "--no-verify-commit-hash",
        ])
        .expect("valid arguments");

        let Commands::Pr {
            common,
            no_verify_commit_hash,
            ..
        } = cli.command
        else {
            panic!("expected pr command");
        };
        assert!(no_verify_commit_hash);
        assert!(common.print);
        assert!(common.no_link_to_pr);
        assert_eq!(
            common
                .wp_tag_ids
                .map(|ids| ids.into_iter().collect::<Vec<_>>()),
            Some(vec![4, 2])
        );
        assert_eq!(common.wp_status, "draft");
    }

    #[test]
    fn test_publishing_requires_endpoint() {
        let result = Cli::try_parse_from([
            "github-changelog",
            "release",
            "--owner",
            "acme",
            "--repo",
            "app",
            "--post-token",
            "secret",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_numeric_ids() {
        let result = Cli::try_parse_from([
            "github-changelog",
            "release",
            "--owner",
            "acme",
            "--repo",
            "app",
            "--print",
            "--wp-channel-ids",
            "beta",
        ]);
        assert!(result.is_err());
    }
}
