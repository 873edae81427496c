//! Orchestration of extraction, aggregation and titling
//!
//! A run starts from either a merged pull request or a release. Both gather
//! one changelog fragment per contributing pull request, concatenate them in
//! first-seen order, merge headings when needed and finally derive a title.

use super::aggregate::{AggregationMode, aggregate_headings};
use super::references::{ReferenceSet, extract_all_references, extract_references};
use super::render::changelog_html;
use super::tags::{label_tag_ids, merge_tags};
use super::title::{format_title_timestamp, resolve_title};
use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::{log_debug, log_warn};
use crate::types::{ChangelogRecord, CommitInfo, IdSet, PullRequest, Release};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of pull requests referenced from commits and releases
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// `Ok(None)` when the pull request does not exist
    async fn fetch_pull_request(&self, number: u64)
    -> Result<Option<PullRequest>, ChangelogError>;

    /// Commits of a pull request, oldest first
    async fn fetch_commits(&self, number: u64) -> Result<Vec<CommitInfo>, ChangelogError>;
}

/// What a pipeline run produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
    Ready(ChangelogRecord),
    /// No contributing pull request had changelog text
    NothingToPublish,
}

/// One pull request's share of the changelog
#[derive(Clone, Debug)]
struct Contribution {
    number: u64,
    fragment: String,
    tags: IdSet,
}

impl Contribution {
    fn from_pull_request(pr: &PullRequest, config: &ChangelogConfig, self_link: bool) -> Option<Self> {
        let fragment = changelog_html(&pr.body, &pr.html_url, config, self_link)?;
        Some(Self {
            number: pr.number,
            fragment,
            tags: label_tag_ids(pr),
        })
    }
}

/// Builds a [`ChangelogRecord`] for a pull request or a release
pub struct ChangelogPipeline<'a, F: SourceFetcher + ?Sized> {
    config: &'a ChangelogConfig,
    fetcher: &'a F,
}

impl<'a, F: SourceFetcher + ?Sized> ChangelogPipeline<'a, F> {
    pub fn new(config: &'a ChangelogConfig, fetcher: &'a F) -> Self {
        Self { config, fetcher }
    }

    /// Changelog for a merged pull request and the pull requests its commits reference
    pub async fn for_pull_request(
        &self,
        pr: &PullRequest,
    ) -> Result<PipelineOutcome, ChangelogError> {
        let mut contributions = Vec::new();
        match Contribution::from_pull_request(pr, self.config, self.config.append_self_link) {
            Some(primary) => contributions.push(primary),
            None => log_debug!("Pull request #{} has no changelog section", pr.number),
        }

        let commits = self.fetcher.fetch_commits(pr.number).await?;
        let mut references =
            extract_all_references(commits.iter().map(|commit| commit.message.as_str()));
        references.shift_remove(&pr.number);
        log_debug!(
            "Pull request #{} references {:?} through {} commits",
            pr.number,
            references,
            commits.len()
        );

        contributions.extend(self.fetch_contributions(&references).await?);

        let fallback = format_title_timestamp(&Utc::now());
        Ok(self.assemble(&contributions, AggregationMode::Auto, &fallback))
    }

    /// Changelog for a release made of the pull requests its notes link to
    pub async fn for_release(&self, release: &Release) -> Result<PipelineOutcome, ChangelogError> {
        let references = extract_references(&release.body);
        log_debug!("Release {} references {:?}", release.html_url, references);

        let contributions = self.fetch_contributions(&references).await?;
        let mode = if contributions.len() > 1 {
            AggregationMode::Forced
        } else {
            AggregationMode::Auto
        };

        Ok(self.assemble(&contributions, mode, &release_fallback_title(release)))
    }

    /// Fetch each referenced pull request once, in order, skipping unknown numbers
    async fn fetch_contributions(
        &self,
        references: &ReferenceSet,
    ) -> Result<Vec<Contribution>, ChangelogError> {
        let mut contributions = Vec::with_capacity(references.len());

        for &number in references {
            let Some(pr) = self.fetcher.fetch_pull_request(number).await? else {
                log_warn!("Referenced pull request #{} not found, skipping", number);
                continue;
            };

            match Contribution::from_pull_request(&pr, self.config, false) {
                Some(contribution) => contributions.push(contribution),
                None => log_debug!("Referenced pull request #{} has no changelog section", number),
            }
        }

        Ok(contributions)
    }

    fn assemble(
        &self,
        contributions: &[Contribution],
        mode: AggregationMode,
        fallback_title: &str,
    ) -> PipelineOutcome {
        let concatenated = contributions
            .iter()
            .map(|c| c.fragment.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let merged = aggregate_headings(&concatenated, mode).into_fragment();
        if merged.trim().is_empty() {
            return PipelineOutcome::NothingToPublish;
        }

        log_debug!(
            "Assembled changelog from pull requests {:?}",
            contributions.iter().map(|c| c.number).collect::<Vec<_>>()
        );

        let changelog = resolve_title(&merged, fallback_title);
        let tags = merge_tags(&self.config.tag_ids, contributions.iter().map(|c| &c.tags));

        PipelineOutcome::Ready(ChangelogRecord::new(
            changelog,
            tags,
            self.config.category_ids.clone(),
            self.config.channel_ids.clone(),
        ))
    }
}

/// Release name, else its creation time, for releases without a title heading
fn release_fallback_title(release: &Release) -> String {
    if let Some(name) = release.display_name() {
        return name.to_string();
    }

    DateTime::parse_from_rfc3339(&release.created_at).map_or_else(
        |_| release.created_at.clone(),
        |created| format_title_timestamp(&created.with_timezone(&Utc)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory pull requests, recording every fetch
    #[derive(Default)]
    struct FakeFetcher {
        pulls: HashMap<u64, PullRequest>,
        commits: HashMap<u64, Vec<CommitInfo>>,
        fetched: Mutex<Vec<u64>>,
    }

    impl FakeFetcher {
        fn with_pull(mut self, pr: PullRequest) -> Self {
            self.pulls.insert(pr.number, pr);
            self
        }

        fn with_commits(mut self, number: u64, messages: &[&str]) -> Self {
            let commits = messages
                .iter()
                .enumerate()
                .map(|(i, message)| CommitInfo {
                    sha: format!("sha{i}"),
                    message: (*message).to_string(),
                })
                .collect();
            self.commits.insert(number, commits);
            self
        }

        fn fetched(&self) -> Vec<u64> {
            self.fetched.lock().clone()
        }
    }

    #[async_trait]
    impl SourceFetcher for FakeFetcher {
        async fn fetch_pull_request(
            &self,
            number: u64,
        ) -> Result<Option<PullRequest>, ChangelogError> {
            self.fetched.lock().push(number);
            Ok(self.pulls.get(&number).cloned())
        }

        async fn fetch_commits(&self, number: u64) -> Result<Vec<CommitInfo>, ChangelogError> {
            Ok(self.commits.get(&number).cloned().unwrap_or_default())
        }
    }

    fn pull(number: u64, changelog: Option<&str>) -> PullRequest {
        let body = changelog.map_or_else(
            || "## Description\n\nNo changelog.".to_string(),
            |text| format!("## Description\n\nStuff\n\n## Changelog Description\n\n{text}\n"),
        );
        PullRequest {
            number,
            id: number * 100,
            body,
            html_url: format!("https://github.com/acme/app/pull/{number}"),
            merged_at: Some("2024-01-01T00:00:00Z".to_string()),
            merge_commit_sha: Some(format!("merge{number}")),
            labels: Vec::new(),
        }
    }

    fn config() -> ChangelogConfig {
        ChangelogConfig {
            append_self_link: false,
            tag_ids: [1].into_iter().collect(),
            category_ids: [4].into_iter().collect(),
            channel_ids: [6].into_iter().collect(),
            ..ChangelogConfig::default()
        }
    }

    fn ready(outcome: PipelineOutcome) -> ChangelogRecord {
        match outcome {
            PipelineOutcome::Ready(record) => record,
            PipelineOutcome::NothingToPublish => panic!("expected a record"),
        }
    }

    #[tokio::test]
    async fn test_single_pull_request_with_title() {
        let config = config();
        let fetcher = FakeFetcher::default();
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let pr = pull(10, Some("### Faster search\n\nSearch is faster."));
        let record = ready(pipeline.for_pull_request(&pr).await.expect("pipeline"));

        assert_eq!(record.title, "Faster search");
        assert_eq!(record.content, "\n<p>Search is faster.</p>");
        assert_eq!(record.tags.into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(record.categories.into_iter().collect::<Vec<_>>(), vec![4]);
        assert_eq!(record.channels.into_iter().collect::<Vec<_>>(), vec![6]);
    }

    #[tokio::test]
    async fn test_referenced_pull_requests_are_merged_in_first_seen_order() {
        let config = config();
        let mut tagged = pull(3, Some("### Fixed\n\n* Fixed from three"));
        tagged.labels.push(crate::types::Label {
            name: "bug".to_string(),
            description: Some("ChangelogTagID: 30".to_string()),
        });
        let fetcher = FakeFetcher::default()
            .with_pull(pull(2, Some("### Fixed\n\n* Fixed from two")))
            .with_pull(tagged)
            .with_commits(
                10,
                &["Fix two (#2)", "Fix three (#3)", "Fix two again (#2)", "Self (#10)"],
            );
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let primary = pull(10, Some("### Fixed\n\n* Fixed from ten"));
        let record = ready(pipeline.for_pull_request(&primary).await.expect("pipeline"));

        assert_eq!(fetcher.fetched(), vec![2, 3]);
        assert_eq!(
            record.content,
            "<h3>Fixed</h3>\n<ul>\n<li>Fixed from ten</li>\n<li>Fixed from two</li>\n<li>Fixed from three</li>\n</ul>"
        );
        assert_eq!(record.tags.into_iter().collect::<Vec<_>>(), vec![1, 30]);
        // Reserved first heading, so the title is a timestamp
        assert_eq!(record.title.len(), "2024-01-01 00:00".len());
    }

    #[tokio::test]
    async fn test_unresolved_references_are_skipped() {
        let config = config();
        let fetcher = FakeFetcher::default()
            .with_pull(pull(5, Some("### Added\n\n* Thing")))
            .with_commits(1, &["Merge pull request #404 from x", "Add (#5)"]);
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let record = ready(
            pipeline
                .for_pull_request(&pull(1, None))
                .await
                .expect("pipeline"),
        );
        assert_eq!(fetcher.fetched(), vec![404, 5]);
        assert_eq!(record.content, "<h3>Added</h3>\n<ul>\n<li>Thing</li>\n</ul>");
    }

    #[tokio::test]
    async fn test_nothing_to_publish() {
        let config = config();
        let fetcher = FakeFetcher::default().with_commits(1, &["Tidy up"]);
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let outcome = pipeline
            .for_pull_request(&pull(1, None))
            .await
            .expect("pipeline");
        assert_eq!(outcome, PipelineOutcome::NothingToPublish);
    }

    #[tokio::test]
    async fn test_release_forces_aggregation_across_pull_requests() {
        let config = config();
        let fetcher = FakeFetcher::default()
            .with_pull(pull(7, Some("### Added\n\n* Dark mode")))
            .with_pull(pull(8, Some("### Fixed\n\n* Login loop")));
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let release = Release {
            body: "## What's Changed\n* Dark mode in https://github.com/acme/app/pull/7\n* Login in https://github.com/acme/app/pull/8\n* Again https://github.com/acme/app/pull/7".to_string(),
            html_url: "https://github.com/acme/app/releases/tag/v2.0.0".to_string(),
            name: Some("v2.0.0".to_string()),
            created_at: "2024-02-03T04:05:06Z".to_string(),
        };

        let record = ready(pipeline.for_release(&release).await.expect("pipeline"));
        assert_eq!(fetcher.fetched(), vec![7, 8]);
        assert_eq!(record.title, "v2.0.0");
        assert_eq!(
            record.content,
            "<h3>Added</h3>\n<ul>\n<li>Dark mode</li>\n</ul>\n<h3>Fixed</h3>\n<ul>\n<li>Login loop</li>\n</ul>"
        );
    }

    #[tokio::test]
    async fn test_release_title_falls_back_to_creation_time() {
        let config = config();
        let fetcher = FakeFetcher::default().with_pull(pull(7, Some("### Fixed\n\n* One")));
        let pipeline = ChangelogPipeline::new(&config, &fetcher);

        let release = Release {
            body: "(#7)".to_string(),
            html_url: String::new(),
            name: Some("  ".to_string()),
            created_at: "2024-02-03T04:05:06+02:00".to_string(),
        };

        let record = ready(pipeline.for_release(&release).await.expect("pipeline"));
        assert_eq!(record.title, "2024-02-03 02:05");
        assert_eq!(record.content, "<h3>Fixed</h3>\n<ul>\n<li>One</li>\n</ul>");
    }

    #[test]
    fn test_release_fallback_title_with_unparseable_date() {
        let release = Release {
            created_at: "yesterday".to_string(),
            ..Release::default()
        };
        assert_eq!(release_fallback_title(&release), "yesterday");
    }
}
