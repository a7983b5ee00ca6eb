//! API token discovery

/// Environment variables checked for a GitHub token, in order
pub const TOKEN_ENV_VARS: [&str; 3] = ["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_API_TOKEN"];

/// First non-empty token from the process environment
#[must_use]
pub fn token_from_env() -> Option<String> {
    token_from(|name| std::env::var(name).ok())
}

/// First non-empty token yielded by `lookup` for [`TOKEN_ENV_VARS`]
pub fn token_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
