//! GitLab locations and API endpoints
//!
//! Any host whose name contains `gitlab` is treated as a GitLab instance, so
//! self-hosted instances work without configuration.

use tracing::debug;
use url::Url;

use super::segments;
use crate::error::{Result, download_failed, invalid_source};
use crate::fetch::{Fetcher, fetch_json};

/// Branch used when the URL names none
pub const DEFAULT_BRANCH: &str = "main";

pub(crate) fn is_gitlab_host(host: &str) -> bool {
    host.contains("gitlab")
}

/// A parsed GitLab URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLabLocation {
    /// `scheme://host[:port]`
    pub instance: String,
    /// `group[/subgroup...]/project`
    pub project_path: String,
    pub branch: String,
    /// Set for `blob` URLs
    pub file_path: Option<String>,
}

/// Project fields read from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLabProject {
    pub id: u64,
    pub name: String,
}

impl GitLabLocation {
    pub fn parse(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| invalid_source(url.as_str(), "URL has no host"))?;
        let instance = match url.port() {
            Some(port) => format!("{}://{host}:{port}", url.scheme()),
            None => format!("{}://{host}", url.scheme()),
        };

        let parts = segments(url);
        let marker = parts
            .iter()
            .position(|p| matches!(p.as_str(), "-" | "tree" | "blob"))
            .unwrap_or(parts.len());
        if marker < 2 {
            return Err(invalid_source(
                url.as_str(),
                "GitLab URL must name a namespace and a project",
            ));
        }
        let mut project: Vec<&str> = parts[..marker].iter().map(String::as_str).collect();
        if let Some(last) = project.last_mut() {
            *last = last.trim_end_matches(".git");
        }
        let project_path = project.join("/");

        let mut rest = &parts[marker..];
        if rest.first().is_some_and(|p| p == "-") {
            rest = &rest[1..];
        }

        let (branch, file_path) = match rest {
            [kind, branch, path @ ..] if kind == "blob" && !path.is_empty() => {
                (branch.clone(), Some(path.join("/")))
            }
            [kind, branch, ..] if kind == "tree" || kind == "blob" => (branch.clone(), None),
            _ => (DEFAULT_BRANCH.to_string(), None),
        };

        Ok(Self {
            instance,
            project_path,
            branch,
            file_path,
        })
    }

    /// `{instance}/api/v4/projects/{url-encoded project path}`
    pub fn project_api_url(&self) -> String {
        format!(
            "{}/api/v4/projects/{}",
            self.instance,
            urlencoding::encode(&self.project_path)
        )
    }

    fn project_endpoint(&self, project_id: u64, endpoint: &str) -> String {
        format!("{}/api/v4/projects/{project_id}{endpoint}", self.instance)
    }

    pub fn commit_api_url(&self, project_id: u64) -> String {
        self.project_endpoint(
            project_id,
            &format!(
                "/repository/commits/{}",
                urlencoding::encode(&self.branch)
            ),
        )
    }

    pub fn archive_url(&self, project_id: u64) -> String {
        self.project_endpoint(
            project_id,
            &format!(
                "/repository/archive.zip?sha={}",
                urlencoding::encode(&self.branch)
            ),
        )
    }

    pub fn raw_file_url(&self, project_id: u64, path: &str) -> String {
        self.project_endpoint(
            project_id,
            &format!(
                "/repository/files/{}/raw?ref={}",
                urlencoding::encode(path),
                urlencoding::encode(&self.branch)
            ),
        )
    }

    /// Look up the project id and name
    pub fn project_info(&self, fetcher: &dyn Fetcher) -> Result<GitLabProject> {
        let url = self.project_api_url();
        let info = fetch_json(fetcher, &url)?;
        let id = info
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| download_failed(&url, "response has no project id"))?;
        let name = info
            .get("name")
            .and_then(|v| v.as_str())
            .map_or_else(
                || {
                    self.project_path
                        .rsplit('/')
                        .next()
                        .unwrap_or(&self.project_path)
                        .to_string()
                },
                ToString::to_string,
            );
        debug!("GitLab project {} has id {id}", self.project_path);
        Ok(GitLabProject { id, name })
    }

    /// Id of the newest commit on the branch
    pub fn latest_commit(&self, fetcher: &dyn Fetcher, project_id: u64) -> Result<String> {
        let url = self.commit_api_url(project_id);
        let info = fetch_json(fetcher, &url)?;
        info.get("id")
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .ok_or_else(|| download_failed(&url, "response has no commit id"))
    }
}
