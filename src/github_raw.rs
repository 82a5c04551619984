use reqwest::blocking::Client;
use tracing::debug;
use urlencoding::encode;

use crate::error::Result;

pub const GITHUB_PREFIX: &str = "https://github.com/";

/// Where and how license files are fetched for GitHub-hosted repositories
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub raw_base_url: String,
    pub branch: String,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
            branch: "master".to_string(),
            user_agent: format!("license-summary/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Raw-content URL for `file` in the repository `org_and_name` ("org/name")
    pub fn raw_url(&self, org_and_name: &str, file: &str) -> String {
        // Keep '/' separators in nested license paths, encode everything else
        let encoded_file = file
            .split('/')
            .map(|segment| encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}/{}",
            self.raw_base_url.trim_end_matches('/'),
            org_and_name,
            self.branch,
            encoded_file
        )
    }
}

/// Result of a single remote fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(String),
    Missing(u16), // Non-success HTTP status
    Failed(String), // Transport error or undecodable body
}

/// Source of remote license text. Implemented over HTTP for real runs.
pub trait LicenseFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome;
}

pub struct GithubRawFetcher {
    client: Client,
}

impl GithubRawFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent.clone()).build()?;
        Ok(GithubRawFetcher { client })
    }
}

impl LicenseFetcher for GithubRawFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) => {
                return FetchOutcome::Failed(format!("network error: {}", e));
            }
        };

        if !response.status().is_success() {
            return FetchOutcome::Missing(response.status().as_u16());
        }

        let bytes = match response.bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                return FetchOutcome::Failed(format!("failed to read response body: {}", e));
            }
        };

        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => FetchOutcome::Found(text),
            Err(e) => FetchOutcome::Failed(format!("response is not valid UTF-8: {}", e)),
        }
    }
}

/// Extract "org/name" from a GitHub web URL, or None for any other host
pub fn github_org_and_name(repository: &str) -> Option<&str> {
    let rest = repository.strip_prefix(GITHUB_PREFIX)?.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}
