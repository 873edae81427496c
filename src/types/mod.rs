//! Source and output types for the changelog pipeline
//!
//! This module consolidates the records the pipeline reads and produces:
//! - Pull requests, their labels and commits (as returned by GitHub)
//! - Releases
//! - The final changelog record handed to the publisher

mod changelog;
mod pr;
mod release;

// Source types
pub use pr::{CommitInfo, Label, PullRequest};
pub use release::Release;

// Output types
pub use changelog::{ChangelogRecord, IdSet, ReservedHeading, TitledChangelog, join_ids};
