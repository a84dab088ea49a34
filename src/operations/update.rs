//! Update operation module
//!
//! Checks installed bundles against their recorded source and re-imports the
//! ones that changed.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::Url;

use super::ImportOperation;
use crate::domain::BundleMetadata;
use crate::domain::ProfileAccessor;
use crate::directive::normalize_path;
use crate::error::{LoaderError, Result, invalid_source};
use crate::fetch::{CachingFetcher, Fetcher, fetch_ok};
use crate::hash::{hash_bytes, matches_bytes};
use crate::installer::ModInstaller;
use crate::registry::ModRegistry;
use crate::source::{GitHubLocation, GitLabLocation};

const NO_INFORMATION: &str = "No update information";

/// Update state of one bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub name: String,
    pub has_update: bool,
    pub message: String,
    /// Latest revision marker (commit, etag, date or hash) when known
    pub latest: Option<String>,
}

impl UpdateStatus {
    fn current(meta: &BundleMetadata, latest: String) -> Self {
        Self {
            name: meta.name.clone(),
            has_update: false,
            message: "Up to date".to_string(),
            latest: Some(latest),
        }
    }

    fn available(meta: &BundleMetadata, message: String, latest: String) -> Self {
        Self {
            name: meta.name.clone(),
            has_update: true,
            message,
            latest: Some(latest),
        }
    }

    fn unknown(meta: &BundleMetadata, message: impl Into<String>) -> Self {
        Self {
            name: meta.name.clone(),
            has_update: false,
            message: message.into(),
            latest: None,
        }
    }
}

/// High-level update operation
///
/// Responses are cached for the lifetime of the operation, so applying an
/// update right after checking does not download the source twice.
pub struct UpdateOperation<'a> {
    profile: &'a dyn ProfileAccessor,
    registry: &'a ModRegistry,
    fetcher: CachingFetcher<'a>,
}

impl<'a> UpdateOperation<'a> {
    pub fn new(
        profile: &'a dyn ProfileAccessor,
        registry: &'a ModRegistry,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            profile,
            registry,
            fetcher: CachingFetcher::new(fetcher),
        }
    }

    /// Status of every registered bundle; lookup failures become statuses
    pub fn check_for_updates(&self) -> Result<Vec<UpdateStatus>> {
        Ok(self
            .registry
            .list()?
            .iter()
            .map(|meta| self.check(meta))
            .collect())
    }

    /// Status of one bundle
    pub fn check(&self, meta: &BundleMetadata) -> UpdateStatus {
        let (Some(source_url), Some(source_type)) = (meta.source_url.as_deref(), meta.source_type())
        else {
            return UpdateStatus::unknown(meta, NO_INFORMATION);
        };

        let result = match source_type {
            "github" => self.check_github(meta, source_url),
            "gitlab" => self.check_gitlab(meta, source_url),
            "direct" => self.check_direct(meta, source_url),
            _ => return UpdateStatus::unknown(meta, NO_INFORMATION),
        };
        result.unwrap_or_else(|e| {
            debug!("Update check for {} failed: {e}", meta.name);
            UpdateStatus::unknown(meta, format!("Update check failed: {e}"))
        })
    }

    fn check_github(&self, meta: &BundleMetadata, source_url: &str) -> Result<UpdateStatus> {
        let url = parse_url(source_url)?;
        let location = GitHubLocation::parse(&url)?;
        let branch = meta
            .provenance_str("branch")
            .map_or_else(|| location.resolve_branch(&self.fetcher), ToString::to_string);
        let latest = location.latest_commit(&self.fetcher, &branch)?;
        Ok(compare_commit(meta, latest))
    }

    fn check_gitlab(&self, meta: &BundleMetadata, source_url: &str) -> Result<UpdateStatus> {
        let url = parse_url(source_url)?;
        let mut location = GitLabLocation::parse(&url)?;
        if let Some(branch) = meta.provenance_str("branch") {
            location.branch = branch.to_string();
        }
        let project_id = match meta
            .provenance_str("project_id")
            .and_then(|id| id.parse::<u64>().ok())
        {
            Some(id) => id,
            None => location.project_info(&self.fetcher)?.id,
        };
        let latest = location.latest_commit(&self.fetcher, project_id)?;
        Ok(compare_commit(meta, latest))
    }

    fn check_direct(&self, meta: &BundleMetadata, source_url: &str) -> Result<UpdateStatus> {
        let response = fetch_ok(&self.fetcher, source_url)?;

        if let (Some(stored), Some(latest)) = (meta.provenance_str("etag"), response.header("etag"))
        {
            return Ok(if stored == latest {
                UpdateStatus::current(meta, latest.to_string())
            } else {
                UpdateStatus::available(meta, "ETag changed".to_string(), latest.to_string())
            });
        }

        if let (Some(stored), Some(latest)) = (
            meta.provenance_str("last_modified"),
            response.header("last-modified"),
        ) {
            return Ok(if stored == latest {
                UpdateStatus::current(meta, latest.to_string())
            } else {
                UpdateStatus::available(meta, format!("Modified {latest}"), latest.to_string())
            });
        }

        let latest = hash_bytes(&response.bytes);
        Ok(match meta.provenance_str("content_hash") {
            Some(stored) if matches_bytes(stored, &response.bytes) => {
                UpdateStatus::current(meta, latest)
            }
            Some(_) => UpdateStatus::available(meta, "Content changed".to_string(), latest),
            None => UpdateStatus::unknown(meta, NO_INFORMATION),
        })
    }

    /// Re-import `name` from its recorded source when an update is available
    ///
    /// Returns `None` when the bundle is already current. The fresh install
    /// overwrites the bundle in place, so a failed download or install leaves
    /// the old version working. Files the new version no longer ships are
    /// removed afterwards, together with their directives.
    pub fn apply_update(&self, name: &str) -> Result<Option<BundleMetadata>> {
        let meta = self
            .registry
            .get(name)?
            .ok_or_else(|| LoaderError::BundleNotFound {
                name: name.to_string(),
            })?;
        let Some(source_url) = meta.source_url.clone() else {
            return Err(invalid_source(name, "bundle has no recorded source URL"));
        };

        let status = self.check(&meta);
        if !status.has_update {
            debug!("{name}: {}", status.message);
            return Ok(None);
        }

        let updated = ImportOperation::new(self.profile, self.registry, &self.fetcher)
            .import_url(&source_url, Some(name))?;

        let kept: HashSet<String> = updated.files.iter().map(|f| normalize_path(f)).collect();
        let stale: Vec<String> = meta
            .files
            .iter()
            .filter(|file| !kept.contains(&normalize_path(file)))
            .cloned()
            .collect();
        if !stale.is_empty() {
            debug!("{name}: removing {} stale file(s)", stale.len());
            let installer = ModInstaller::new(self.profile, self.registry);
            if let Err(e) = installer.remove_stale_files(&stale) {
                warn!("Could not remove stale files of {name}: {e}");
            }
        }
        info!("Updated {name} to {}", updated.display_version());
        Ok(Some(updated))
    }
}

fn parse_url(source_url: &str) -> Result<Url> {
    Url::parse(source_url).map_err(|e| invalid_source(source_url, e.to_string()))
}

fn compare_commit(meta: &BundleMetadata, latest: String) -> UpdateStatus {
    let short: String = latest.chars().take(8).collect();
    match meta.commit_id.as_deref() {
        Some(installed) if installed == latest => UpdateStatus::current(meta, latest),
        Some(installed) => UpdateStatus::available(
            meta,
            format!(
                "New commit {short} (installed {})",
                installed.chars().take(8).collect::<String>()
            ),
            latest,
        ),
        None => UpdateStatus::available(meta, format!("Latest commit {short}"), latest),
    }
}
