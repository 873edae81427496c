//! GitHub REST client for pull requests, commits and releases

use crate::changes::SourceFetcher;
use crate::error::ChangelogError;
use crate::log_debug;
use crate::types::{CommitInfo, PullRequest, Release};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("github-changelog/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub API error payload
#[derive(Debug, Deserialize)]
struct GitHubError {
    message: String,
}

/// Client scoped to a single repository
#[derive(Clone, Debug)]
pub struct GitHubClient {
    client: Client,
    repo_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `owner/repo` against `api_url`
    ///
    /// `api_url` is normally [`DEFAULT_API_URL`]; tests and GitHub Enterprise
    /// installations point it elsewhere.
    pub fn new(
        api_url: &str,
        owner: &str,
        repo: &str,
        token: Option<String>,
    ) -> Result<Self, ChangelogError> {
        let base = Url::parse(api_url)?;
        let repo_url = format!(
            "{}/repos/{}/{}",
            base.as_str().trim_end_matches('/'),
            owner,
            repo
        );

        Ok(Self {
            client: Client::new(),
            repo_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Most recently updated closed pull request that was actually merged
    pub async fn last_merged_pull_request(&self) -> Result<Option<PullRequest>, ChangelogError> {
        let pulls: Vec<PullRequest> = self
            .get_json("/pulls?per_page=10&sort=updated&direction=desc&state=closed")
            .await?;
        Ok(pulls.into_iter().find(PullRequest::is_merged))
    }

    /// A single pull request; `None` when it does not exist
    pub async fn pull_request(&self, number: u64) -> Result<Option<PullRequest>, ChangelogError> {
        self.get_optional_json(&format!("/pulls/{number}")).await
    }

    pub async fn pull_request_commits(&self, number: u64) -> Result<Vec<CommitInfo>, ChangelogError> {
        self.get_json(&format!("/pulls/{number}/commits?per_page=100"))
            .await
    }

    /// Latest published release; `None` when the repository has none
    pub async fn latest_release(&self) -> Result<Option<Release>, ChangelogError> {
        self.get_optional_json("/releases/latest").await
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.repo_url, path);
        log_debug!("GET {}", url);

        let request = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .timeout(REQUEST_TIMEOUT);

        match &self.token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChangelogError> {
        let response = check_status(self.request(path).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ChangelogError> {
        let response = self.request(path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }
}

/// Turn a non-success response into [`ChangelogError::Api`]
async fn check_status(response: Response) -> Result<Response, ChangelogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<GitHubError>(&text).map_or(text, |e| e.message);
    Err(ChangelogError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SourceFetcher for GitHubClient {
    async fn fetch_pull_request(
        &self,
        number: u64,
    ) -> Result<Option<PullRequest>, ChangelogError> {
        self.pull_request(number).await
    }

    async fn fetch_commits(&self, number: u64) -> Result<Vec<CommitInfo>, ChangelogError> {
        self.pull_request_commits(number).await
    }
}
