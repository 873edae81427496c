//! Pull request types as delivered by the GitHub REST API

use serde::{Deserialize, Serialize};

/// A pull request, reduced to the fields the changelog pipeline reads
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// Repository-scoped number (the `#123` users refer to)
    pub number: u64,
    /// Global GitHub identifier
    pub id: u64,
    /// Author-written markdown description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// Link to the pull request page
    pub html_url: String,
    /// Merge timestamp, absent for closed-but-unmerged pull requests
    #[serde(default)]
    pub merged_at: Option<String>,
    /// Commit created by the merge
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    /// Labels in the order GitHub lists them
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl PullRequest {
    /// Whether the pull request was merged (not just closed)
    pub fn is_merged(&self) -> bool {
        self.merged_at.as_deref().is_some_and(|at| !at.is_empty())
    }

    /// Label descriptions, skipping labels without one
    pub fn label_descriptions(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter_map(|label| label.description.as_deref())
    }
}

/// A repository label attached to a pull request
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One commit belonging to a pull request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "WireCommit")]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

/// GitHub nests the message under `commit`
#[derive(Deserialize)]
struct WireCommit {
    sha: String,
    commit: WireCommitDetail,
}

#[derive(Deserialize)]
struct WireCommitDetail {
    #[serde(default)]
    message: String,
}

impl From<WireCommit> for CommitInfo {
    fn from(wire: WireCommit) -> Self {
        Self {
            sha: wire.sha,
            message: wire.commit.message,
        }
    }
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
