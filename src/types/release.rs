//! Release type as delivered by the GitHub REST API

use super::pr::null_as_empty;
use serde::{Deserialize, Serialize};

/// A published release
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    /// Release notes; usually a list of merged pull request links
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl Release {
    /// Release name, treating a blank name as absent
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
