//! GitHub locations and API endpoints

use tracing::{debug, warn};
use url::Url;

use super::segments;
use crate::error::{Result, download_failed, invalid_source};
use crate::fetch::{Fetcher, fetch_json};

const API_BASE: &str = "https://api.github.com";
const RAW_HOST: &str = "raw.githubusercontent.com";

/// Branch assumed when the repository info cannot be read
pub const FALLBACK_BRANCH: &str = "main";

pub(crate) fn is_github_host(host: &str) -> bool {
    matches!(host, "github.com" | "www.github.com" | RAW_HOST)
}

/// What a GitHub URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubTarget {
    /// Whole repository, at `branch` or the default branch
    Repository { branch: Option<String> },
    /// One file of the repository
    File { branch: String, path: String },
}

/// A parsed GitHub URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubLocation {
    pub owner: String,
    pub repo: String,
    pub target: GitHubTarget,
}

impl GitHubLocation {
    pub fn parse(url: &Url) -> Result<Self> {
        let parts = segments(url);
        if parts.len() < 2 {
            return Err(invalid_source(
                url.as_str(),
                "GitHub URL must name an owner and a repository",
            ));
        }
        let owner = parts[0].clone();
        let repo = parts[1].trim_end_matches(".git").to_string();

        let is_raw = url.host_str() == Some(RAW_HOST);
        let target = if is_raw {
            if parts.len() < 4 {
                return Err(invalid_source(
                    url.as_str(),
                    "raw GitHub URL must include a branch and a file path",
                ));
            }
            GitHubTarget::File {
                branch: parts[2].clone(),
                path: parts[3..].join("/"),
            }
        } else {
            match parts.get(2).map(String::as_str) {
                Some("blob") if parts.len() > 4 => GitHubTarget::File {
                    branch: parts[3].clone(),
                    path: parts[4..].join("/"),
                },
                Some("tree" | "blob") => GitHubTarget::Repository {
                    branch: parts.get(3).cloned(),
                },
                _ => GitHubTarget::Repository { branch: None },
            }
        };

        Ok(Self {
            owner,
            repo,
            target,
        })
    }

    /// `https://api.github.com/repos/{owner}/{repo}`
    pub fn repo_api_url(&self) -> String {
        format!("{API_BASE}/repos/{}/{}", self.owner, self.repo)
    }

    pub fn commit_api_url(&self, branch: &str) -> String {
        format!(
            "{}/commits/{}",
            self.repo_api_url(),
            urlencoding::encode(branch)
        )
    }

    /// Zip snapshot of `branch`
    pub fn archive_url(&self, branch: &str) -> String {
        format!(
            "https://github.com/{}/{}/archive/refs/heads/{branch}.zip",
            self.owner, self.repo
        )
    }

    pub fn raw_url(&self, branch: &str, path: &str) -> String {
        format!(
            "https://{RAW_HOST}/{}/{}/{branch}/{path}",
            self.owner, self.repo
        )
    }

    /// Explicit branch of the URL, if any
    pub fn branch(&self) -> Option<&str> {
        match &self.target {
            GitHubTarget::Repository { branch } => branch.as_deref(),
            GitHubTarget::File { branch, .. } => Some(branch),
        }
    }

    /// Repository default branch, or [`FALLBACK_BRANCH`] when the API is unavailable
    pub fn default_branch(&self, fetcher: &dyn Fetcher) -> String {
        match fetch_json(fetcher, &self.repo_api_url()) {
            Ok(info) => info
                .get("default_branch")
                .and_then(|v| v.as_str())
                .map_or_else(|| FALLBACK_BRANCH.to_string(), ToString::to_string),
            Err(e) => {
                warn!(
                    "Could not read repository info for {}/{}: {e}",
                    self.owner, self.repo
                );
                FALLBACK_BRANCH.to_string()
            }
        }
    }

    /// The URL's branch, falling back to the default branch
    pub fn resolve_branch(&self, fetcher: &dyn Fetcher) -> String {
        self.branch()
            .map_or_else(|| self.default_branch(fetcher), ToString::to_string)
    }

    /// SHA of the newest commit on `branch`
    pub fn latest_commit(&self, fetcher: &dyn Fetcher, branch: &str) -> Result<String> {
        let url = self.commit_api_url(branch);
        let info = fetch_json(fetcher, &url)?;
        let sha = info
            .get("sha")
            .and_then(|v| v.as_str())
            .ok_or_else(|| download_failed(&url, "response has no commit sha"))?;
        debug!("{}/{}@{branch} is at {sha}", self.owner, self.repo);
        Ok(sha.to_string())
    }
}
