//! Posting changelog records to the WordPress changelog endpoint

use crate::error::ChangelogError;
use crate::log_debug;
use crate::types::{ChangelogRecord, join_ids};

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Post status used when none is configured
pub const DEFAULT_POST_STATUS: &str = "draft";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates changelog posts through an authenticated form endpoint
#[derive(Clone, Debug)]
pub struct WordPressPublisher {
    client: Client,
    endpoint: Url,
    token: String,
    status: String,
}

impl WordPressPublisher {
    pub fn new(endpoint: &str, token: &str, status: &str) -> Result<Self, ChangelogError> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
            token: token.to_string(),
            status: status.to_string(),
        })
    }

    /// Form fields sent for `record`
    ///
    /// The excerpt repeats the title. Categories and release channels are only
    /// sent when there are any.
    pub fn form_fields(&self, record: &ChangelogRecord) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", record.title.clone()),
            ("content", record.content.clone()),
            ("excerpt", record.title.clone()),
            ("status", self.status.clone()),
            ("tags", join_ids(&record.tags)),
        ];

        if !record.categories.is_empty() {
            fields.push(("categories", join_ids(&record.categories)));
        }
        if !record.channels.is_empty() {
            fields.push(("release-channel", join_ids(&record.channels)));
        }

        fields
    }

    /// Create the post, returning the response body
    pub async fn publish(&self, record: &ChangelogRecord) -> Result<String, ChangelogError> {
        log_debug!("Posting changelog '{}' to {}", record.title, self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .form(&self.form_fields(record))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log_debug!("Changelog endpoint responded {}: {}", status, body);

        if status.as_u16() >= 400 {
            return Err(ChangelogError::Publish {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
