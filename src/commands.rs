//! Command handlers for the `pr` and `release` subcommands

use crate::changes::{ChangelogPipeline, PipelineOutcome};
use crate::common::CommonParams;
use crate::config::ChangelogConfig;
use crate::github::GitHubClient;
use crate::publish::WordPressPublisher;
use crate::types::{ChangelogRecord, join_ids};
use crate::{log_debug, log_info, ui};
use anyhow::{Context, Result, anyhow};

pub const NO_CHANGELOG_TEXT: &str = "No changelog text found.";
pub const NOT_FROM_MERGED_PULL_REQUEST: &str = "Build not triggered from a merged pull request.";

/// Where a finished record goes
#[derive(Clone, Debug)]
pub enum Delivery {
    /// Write the record to stdout as JSON
    Print,
    Publish(WordPressPublisher),
}

/// Everything a run needs, resolved from flags, environment and config file
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub config: ChangelogConfig,
    pub github: GitHubClient,
    pub delivery: Delivery,
}

impl RunSettings {
    pub fn from_params(common: &CommonParams) -> Result<Self> {
        let config = common.resolve_config()?;
        let github = GitHubClient::new(
            &common.github_api_url,
            &common.owner,
            &common.repo,
            common.github_token.clone(),
        )
        .context("Invalid GitHub API URL")?;

        let delivery = if common.print {
            Delivery::Print
        } else {
            let endpoint = common
                .wp_endpoint
                .as_deref()
                .ok_or_else(|| anyhow!("--wp-endpoint is required unless --print is given"))?;
            let token = common
                .post_token
                .as_deref()
                .ok_or_else(|| anyhow!("CHANGELOG_POST_TOKEN is required unless --print is given"))?;
            Delivery::Publish(
                WordPressPublisher::new(endpoint, token, &common.wp_status)
                    .context("Invalid WordPress endpoint")?,
            )
        };

        log_debug!("Resolved configuration: {:?}", config);
        Ok(Self {
            config,
            github,
            delivery,
        })
    }
}

/// Merge-commit check for pull request runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitCheck {
    Disabled,
    /// The build commit; `None` when the CI did not provide one
    Expect(Option<String>),
}

/// How a run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Published(ChangelogRecord),
    Printed(ChangelogRecord),
    /// Nothing was posted, with the reason
    Skipped(String),
}

/// Publish the changelog of the most recently merged pull request
pub async fn run_pull_request(settings: &RunSettings, check: &CommitCheck) -> Result<RunOutcome> {
    let pr = settings
        .github
        .last_merged_pull_request()
        .await?
        .ok_or_else(|| anyhow!("Failed to retrieve last closed pull request"))?;
    log_info!("Last merged pull request: #{} {}", pr.number, pr.html_url);

    if let CommitCheck::Expect(build_sha) = check
        && pr.merge_commit_sha.as_deref() != build_sha.as_deref()
    {
        log_debug!(
            "Merge commit {:?} does not match build commit {:?}",
            pr.merge_commit_sha,
            build_sha
        );
        return Ok(RunOutcome::Skipped(NOT_FROM_MERGED_PULL_REQUEST.to_string()));
    }

    let pipeline = ChangelogPipeline::new(&settings.config, &settings.github);
    let outcome = pipeline.for_pull_request(&pr).await?;
    deliver(settings, outcome).await
}

/// Publish the changelog of the latest release
pub async fn run_release(settings: &RunSettings) -> Result<RunOutcome> {
    let release = settings
        .github
        .latest_release()
        .await?
        .ok_or_else(|| anyhow!("Failed to retrieve latest release"))?;
    log_info!("Latest release: {}", release.html_url);

    let pipeline = ChangelogPipeline::new(&settings.config, &settings.github);
    let outcome = pipeline.for_release(&release).await?;
    deliver(settings, outcome).await
}

async fn deliver(settings: &RunSettings, outcome: PipelineOutcome) -> Result<RunOutcome> {
    let PipelineOutcome::Ready(record) = outcome else {
        return Ok(RunOutcome::Skipped(NO_CHANGELOG_TEXT.to_string()));
    };

    match &settings.delivery {
        Delivery::Print => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(RunOutcome::Printed(record))
        }
        Delivery::Publish(publisher) => {
            publisher.publish(&record).await?;
            Ok(RunOutcome::Published(record))
        }
    }
}

/// Report a finished run on the terminal
pub fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Published(record) => {
            ui::print_success("Changelog post created");
            print_summary(record);
        }
        RunOutcome::Printed(record) => log_debug!("Printed changelog '{}'", record.title),
        RunOutcome::Skipped(reason) => ui::print_warning(&format!("Skipping post. {reason}")),
    }
}

fn print_summary(record: &ChangelogRecord) {
    ui::print_field("Title", &record.title);
    if !record.tags.is_empty() {
        ui::print_field("Tags", &join_ids(&record.tags));
    }
    ui::print_bordered_content(&record.content);
}
