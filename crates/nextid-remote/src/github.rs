//! GitHub REST implementation of [`ProposalHost`]
//!
//! - Open pull requests: `GET /repos/{owner}/{repo}/pulls?state=open`
//! - Artifact at a head: `GET /repos/{owner}/{repo}/contents/{path}?ref={sha}`

use crate::error::TransportError;
use crate::host::{Listing, ProposalHost};
use crate::slug::RepoSlug;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nextid_core::{HeadRef, Proposal};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, IntoUrl, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Public GitHub API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size for pull request listing (GitHub maximum)
pub const PER_PAGE: usize = 100;

const USER_AGENT: &str = concat!("nextid/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    head: PullHead,
}

#[derive(Debug, Deserialize)]
struct PullHead {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    encoding: Option<String>,
}

/// GitHub-backed proposal host
#[derive(Debug, Clone)]
pub struct GitHubHost {
    client: Client,
    api_base: String,
    repo: RepoSlug,
    token: Option<String>,
    max_pages: usize,
}

impl GitHubHost {
    /// Create host for `repo` with a per-request timeout
    ///
    /// # Errors
    /// `TransportError::Network` if the HTTP client cannot be built
    pub fn new(repo: RepoSlug, request_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            repo,
            token: None,
            max_pages: 10,
        })
    }

    /// Use a different API endpoint (GitHub Enterprise, test servers)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Authenticate requests with `token`
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Cap the number of listing pages fetched
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Repository this host talks to
    #[inline]
    #[must_use]
    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{suffix}",
            self.api_base,
            self.repo.owner(),
            self.repo.name()
        )
    }

    /// `contents/{path}` with every path segment percent-encoded
    fn contents_url(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.repo_url("contents");
        let mut url = Url::parse(&base)
            .map_err(|e| TransportError::Network(format!("invalid API URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| TransportError::Network(format!("invalid API URL {base}")))?
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Send `request` and decode the JSON body; `Ok(None)` on 404
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, TransportError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(status.as_u16(), error_message(&body)));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProposalHost for GitHubHost {
    async fn list_open_proposals(&self) -> Result<Listing, TransportError> {
        let url = self.repo_url("pulls");
        let mut proposals = Vec::new();
        let mut truncated = None;

        for page in 1..=self.max_pages {
            let request = self.get(&url).query(&[
                ("state", "open".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);

            let pulls: Vec<PullRequest> = self.send_json(request).await?.ok_or_else(|| {
                TransportError::from_status(404, format!("repository {} not found", self.repo))
            })?;
            let fetched = pulls.len();

            proposals.extend(pulls.into_iter().filter_map(|pr| match pr.head.sha {
                Some(sha) if !sha.is_empty() => Some(Proposal::new(pr.number, pr.title, sha)),
                _ => {
                    tracing::debug!(number = pr.number, "skipping pull request without head sha");
                    None
                }
            }));

            if fetched < PER_PAGE {
                break;
            }
            // A full last page means more may follow
            if page == self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    "open pull request listing truncated at page cap"
                );
                truncated = Some(format!(
                    "open pull request listing truncated at {} pages",
                    self.max_pages
                ));
            }
        }

        tracing::info!(repo = %self.repo, count = proposals.len(), "listed open pull requests");
        Ok(Listing {
            proposals,
            truncated,
        })
    }

    async fn fetch_artifact(
        &self,
        head: &HeadRef,
        path: &str,
    ) -> Result<Option<String>, TransportError> {
        let request = self
            .get(self.contents_url(path)?)
            .query(&[("ref", head.as_str())]);

        let Some(contents) = self.send_json::<ContentsResponse>(request).await? else {
            return Ok(None);
        };
        decode_contents(contents).map(Some)
    }
}

fn decode_contents(contents: ContentsResponse) -> Result<String, TransportError> {
    match contents.encoding.as_deref() {
        Some("base64") | None => {}
        Some(other) => {
            return Err(TransportError::Decode(format!(
                "unsupported content encoding '{other}'"
            )))
        }
    }

    let encoded = contents
        .content
        .ok_or_else(|| TransportError::Decode("response has no content field".into()))?;
    // GitHub wraps base64 at 60 columns
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| TransportError::Decode(format!("base64 decode failed: {e}")))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Pull `message` out of a GitHub error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_string())
}
