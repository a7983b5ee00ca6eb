//! Repository identification (`owner/name`)

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// `owner/name` pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Create slug from parts
    ///
    /// # Errors
    /// `TransportError::NoRepository` if either part is empty or contains `/`
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, TransportError> {
        let owner = owner.into();
        let name = name.into();
        let valid = |s: &str| !s.is_empty() && !s.contains('/') && !s.contains(char::is_whitespace);
        if !valid(&owner) || !valid(&name) {
            return Err(TransportError::NoRepository(format!(
                "invalid repository '{owner}/{name}'"
            )));
        }
        Ok(Self { owner, name })
    }

    /// Repository owner
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a GitHub remote URL
    ///
    /// Accepts `git@github.com:owner/name(.git)`,
    /// `ssh://git@github.com/owner/name(.git)` and
    /// `https://github.com/owner/name(.git)`.
    ///
    /// # Errors
    /// `TransportError::NoRepository` for non-GitHub or malformed URLs
    pub fn from_remote_url(url: &str) -> Result<Self, TransportError> {
        let url = url.trim();
        let not_github = || TransportError::NoRepository(format!("not a GitHub remote: '{url}'"));

        let path = if let Some(rest) = url.strip_prefix("git@github.com:") {
            rest
        } else {
            github_path(url).ok_or_else(not_github)?
        };

        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let mut parts = path.split('/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) => Self::new(owner, name),
            _ => Err(not_github()),
        }
    }

    /// Resolve the slug from the `origin` remote of the repository at `root`
    ///
    /// # Errors
    /// `TransportError::NoRepository` if git fails or the remote is not on GitHub
    pub async fn discover(root: &Path) -> Result<Self, TransportError> {
        let output = tokio::process::Command::new("git")
            .args(["remote", "get-url", "origin"])
            .current_dir(root)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TransportError::NoRepository(format!("cannot run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::NoRepository(format!(
                "no origin remote in {}: {}",
                root.display(),
                stderr.trim()
            )));
        }

        let url = String::from_utf8_lossy(&output.stdout);
        let slug = Self::from_remote_url(&url)?;
        tracing::debug!(%slug, "resolved repository from origin");
        Ok(slug)
    }
}

/// Path after a `github.com/` host that follows `//`, `@` or nothing
fn github_path(url: &str) -> Option<&str> {
    const HOST: &str = "github.com/";
    url.match_indices(HOST).find_map(|(at, _)| {
        let before = &url[..at];
        (before.is_empty() || before.ends_with("//") || before.ends_with('@'))
            .then(|| &url[at + HOST.len()..])
    })
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s.trim().split_once('/').ok_or_else(|| {
            TransportError::NoRepository(format!("expected OWNER/NAME, got '{s}'"))
        })?;
        Self::new(owner, name)
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = TransportError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}
