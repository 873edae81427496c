//! Changelog output types
//!
//! The pipeline produces a [`TitledChangelog`] from merged markup and wraps it,
//! together with the taxonomy ids, into a [`ChangelogRecord`] for publishing.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion-ordered, deduplicated set of WordPress taxonomy ids
pub type IdSet = IndexSet<u64>;

/// Section headings with a fixed meaning across every contributor
///
/// These follow the Keep a Changelog vocabulary (<https://keepachangelog.com>/).
/// A fragment that repeats one of them comes from several sources and needs
/// merging; a fragment whose first heading is one of them has no title of its own.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum ReservedHeading {
    Fixed,
    Added,
    Changed,
    Removed,
}

impl ReservedHeading {
    pub const ALL: &'static [ReservedHeading] = &[
        ReservedHeading::Fixed,
        ReservedHeading::Added,
        ReservedHeading::Changed,
        ReservedHeading::Removed,
    ];

    /// Heading text as authors write it
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Removed => "Removed",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_heading(text: &str) -> Option<Self> {
        Self::ALL.iter().find(|h| h.name() == text).copied()
    }

    pub fn is_reserved(text: &str) -> bool {
        Self::from_heading(text).is_some()
    }
}

impl fmt::Display for ReservedHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fragment split into its title and the remaining body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitledChangelog {
    pub title: String,
    pub content: String,
}

/// The final document handed to the publisher
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ChangelogRecord {
    pub title: String,
    /// Rendered HTML body
    pub content: String,
    pub tags: IdSet,
    pub categories: IdSet,
    pub channels: IdSet,
}

impl ChangelogRecord {
    pub fn new(changelog: TitledChangelog, tags: IdSet, categories: IdSet, channels: IdSet) -> Self {
        Self {
            title: changelog.title,
            content: changelog.content,
            tags,
            categories,
            channels,
        }
    }
}

/// Join ids the way WordPress expects them in form fields
pub fn join_ids(ids: &IdSet) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
