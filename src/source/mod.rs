//! Import source classification
//!
//! Turns the user's `install` argument into an [`ImportSource`]:
//! - Local files and directories: anything that exists on disk
//! - GitHub: `https://github.com/{owner}/{repo}[/tree/{branch}|/blob/{branch}/{path}]`
//!   and `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`
//! - GitLab: any host containing `gitlab`,
//!   `https://{host}/{group}/{project}[/-]/(tree|blob)/{branch}[/{path}]`
//! - Anything else reachable over `http(s)` is a direct download
//!
//! ## Module Organization
//!
//! - `github.rs`: GitHub location parsing and API endpoints
//! - `gitlab.rs`: GitLab location parsing and API endpoints

pub mod github;
pub mod gitlab;

pub use github::{GitHubLocation, GitHubTarget};
pub use gitlab::GitLabLocation;

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Result, invalid_source};

/// Where an import reads its content from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    LocalFile(PathBuf),
    LocalDirectory(PathBuf),
    GitHub(GitHubLocation),
    GitLab(GitLabLocation),
    DirectUrl(Url),
}

impl ImportSource {
    /// Classify user input
    ///
    /// Existing paths win over URL parsing, so a local directory literally
    /// named like a URL is still treated as local.
    pub fn classify(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid_source(input, "empty source"));
        }

        let path = Path::new(input);
        if path.exists() {
            return Ok(if path.is_dir() {
                Self::LocalDirectory(path.to_path_buf())
            } else {
                Self::LocalFile(path.to_path_buf())
            });
        }

        let url = Url::parse(input)
            .map_err(|e| invalid_source(input, format!("not an existing path or URL ({e})")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid_source(
                input,
                format!("unsupported URL scheme '{}'", url.scheme()),
            ));
        }
        let Some(host) = url.host_str().map(str::to_ascii_lowercase) else {
            return Err(invalid_source(input, "URL has no host"));
        };

        if github::is_github_host(&host) {
            return Ok(Self::GitHub(GitHubLocation::parse(&url)?));
        }
        if gitlab::is_gitlab_host(&host) {
            return Ok(Self::GitLab(GitLabLocation::parse(&url)?));
        }
        Ok(Self::DirectUrl(url))
    }

    /// Provenance type recorded for bundles imported from this source
    pub fn source_type(&self) -> &'static str {
        match self {
            Self::LocalFile(_) | Self::LocalDirectory(_) => "local",
            Self::GitHub(_) => "github",
            Self::GitLab(_) => "gitlab",
            Self::DirectUrl(_) => "direct",
        }
    }

    /// Whether the source needs the network
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::LocalFile(_) | Self::LocalDirectory(_))
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile(path) | Self::LocalDirectory(path) => write!(f, "{}", path.display()),
            Self::GitHub(location) => write!(f, "github:{}/{}", location.owner, location.repo),
            Self::GitLab(location) => {
                write!(f, "gitlab:{}/{}", location.instance, location.project_path)
            }
            Self::DirectUrl(url) => write!(f, "{url}"),
        }
    }
}

/// Last path segment of `url`, without query or fragment
pub fn url_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(decode)
}

/// Non-empty, percent-decoded path segments of `url`
pub(crate) fn segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|parts| parts.filter(|segment| !segment.is_empty()).map(decode).collect())
        .unwrap_or_default()
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |s| s.into_owned())
}
