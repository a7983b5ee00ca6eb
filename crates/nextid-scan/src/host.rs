//! Building the GitHub host from configuration

use crate::config::ScanConfig;
use nextid_remote::{token_from_env, GitHubHost, RepoSlug, TransportError};

/// Connect to the repository named by `config`
///
/// An explicit `repository` wins over discovery from the `origin` remote of
/// `repo_root`; an explicit `token` wins over the environment.
///
/// # Errors
/// `TransportError::NoRepository` when no GitHub repository can be resolved,
/// `TransportError::Network` if the HTTP client cannot be built
pub async fn connect(config: &ScanConfig) -> Result<GitHubHost, TransportError> {
    let repo = match &config.repository {
        Some(slug) => slug.parse::<RepoSlug>()?,
        None => RepoSlug::discover(&config.repo_root).await?,
    };
    let token = config.token.clone().or_else(token_from_env);

    tracing::info!(
        %repo,
        authenticated = token.is_some(),
        "scanning open pull requests"
    );

    Ok(GitHubHost::new(repo, config.fetch_timeout())?
        .with_api_base(config.api_base_url.clone())
        .with_token(token)
        .with_max_pages(config.max_pages))
}
