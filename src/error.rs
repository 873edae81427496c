//! Errors raised while talking to GitHub or WordPress
//!
//! Missing changelog sections, unresolved references and unparseable markup
//! are not errors; they are reported through return values instead.

/// Transport and API failures that abort a run
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to create changelog post ({status}): {body}")]
    Publish { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ChangelogError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Publish { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) => None,
        }
    }
}
