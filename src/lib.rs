//! github-changelog - publish GitHub changelogs to WordPress
//!
//! This library extracts the changelog section from pull request and release
//! descriptions, merges the sections of related pull requests under shared
//! headings, titles the result and posts it to a WordPress changelog endpoint.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod changes;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod github;
pub mod logger;
pub mod publish;
pub mod types;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use changes::{ChangelogPipeline, PipelineOutcome, SourceFetcher};
pub use config::ChangelogConfig;
pub use error::ChangelogError;
pub use github::GitHubClient;
pub use publish::WordPressPublisher;

// Re-exports from types module
pub use types::{ChangelogRecord, CommitInfo, PullRequest, Release, TitledChangelog};
