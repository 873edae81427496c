//! Changelog extraction and aggregation
//!
//! This module turns rendered pull request and release descriptions into a
//! single changelog record. The record *types* are in the `types` module.

pub mod aggregate;
pub mod pipeline;
pub mod references;
pub mod render;
pub mod section;
pub mod tags;
pub mod title;

pub use aggregate::{AggregationMode, HeadingGroups, MergeOutcome, aggregate_headings};
pub use pipeline::{ChangelogPipeline, PipelineOutcome, SourceFetcher};
pub use references::{ReferenceSet, extract_all_references, extract_references};
pub use render::{changelog_html, markdown_to_html, strip_html_comments};
pub use section::extract_section;
pub use title::{resolve_title, resolve_title_now};
