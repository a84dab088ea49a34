//! Import operation module
//!
//! Brings a stylesheet bundle into a profile from a local path or a URL.
//! Every scratch file and directory the operation creates is removed again,
//! whether the install succeeds or not.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::{
    ArchiveExtractor, ContainerFormat, find_stylesheet_files, is_stylesheet,
    validate_extracted_content,
};
use crate::domain::bundle::PROVENANCE_TYPE;
use crate::domain::{BundleMetadata, ProfileAccessor};
use crate::error::{LoaderError, Result, fs_error};
use crate::fetch::{Fetcher, fetch_ok};
use crate::hash::hash_bytes;
use crate::installer::ModInstaller;
use crate::installer::file_ops::{copy_verified, remove_path_resilient, sanitize_file_name};
use crate::path_utils::relative_forward;
use crate::registry::ModRegistry;
use crate::source::{GitHubTarget, ImportSource, url_file_name};
use crate::temp::{DOWNLOAD_PREFIX, EXTRACT_PREFIX, create_scratch_dir};

/// Name used when neither the user nor the source provides one
const FALLBACK_NAME: &str = "bundle";

/// What to download for a remote source and how to record it
struct RemotePlan {
    download_url: String,
    file_name: String,
    default_name: String,
    metadata: BundleMetadata,
}

/// High-level import operation
pub struct ImportOperation<'a> {
    profile: &'a dyn ProfileAccessor,
    registry: &'a ModRegistry,
    fetcher: &'a dyn Fetcher,
    extractor: ArchiveExtractor,
}

impl<'a> ImportOperation<'a> {
    pub fn new(
        profile: &'a dyn ProfileAccessor,
        registry: &'a ModRegistry,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            profile,
            registry,
            fetcher,
            extractor: ArchiveExtractor::new(),
        }
    }

    /// Use `extractor` instead of the built-in one
    #[allow(dead_code)] // used in tests
    pub fn with_extractor(mut self, extractor: ArchiveExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    fn installer(&self) -> ModInstaller<'_> {
        ModInstaller::new(self.profile, self.registry)
    }

    /// Import from a path or URL, whichever `input` is
    pub fn import(&self, input: &str, name: Option<&str>) -> Result<BundleMetadata> {
        match ImportSource::classify(input)? {
            ImportSource::LocalFile(path) | ImportSource::LocalDirectory(path) => {
                self.import_path(&path, name)
            }
            source => self.import_remote(&source, input, name),
        }
    }

    /// Import a stylesheet, a directory of stylesheets or an archive
    ///
    /// The user's own files are never modified or deleted.
    pub fn import_path(&self, path: &Path, name: Option<&str>) -> Result<BundleMetadata> {
        let name = name.map_or_else(|| default_name(path), ToString::to_string);
        let mut metadata = BundleMetadata::new(name, None);
        metadata.set_provenance(PROVENANCE_TYPE, "local");
        metadata.set_provenance(
            "path",
            std::path::absolute(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string(),
        );
        self.install_local(path, metadata, false)
    }

    /// Import from an `http(s)` URL
    pub fn import_url(&self, url: &str, name: Option<&str>) -> Result<BundleMetadata> {
        let source = ImportSource::classify(url)?;
        if !source.is_remote() {
            return Err(crate::error::invalid_source(url, "not a URL"));
        }
        self.import_remote(&source, url, name)
    }

    fn import_remote(
        &self,
        source: &ImportSource,
        input: &str,
        name: Option<&str>,
    ) -> Result<BundleMetadata> {
        let plan = self.plan(source, input)?;
        let response = fetch_ok(self.fetcher, &plan.download_url)?;
        debug!(
            "Downloaded {} byte(s) from {}",
            response.bytes.len(),
            plan.download_url
        );

        let mut metadata = plan.metadata;
        metadata.name = name.map_or(plan.default_name, ToString::to_string);
        if matches!(source, ImportSource::DirectUrl(_)) {
            if let Some(etag) = response.header("etag") {
                metadata.set_provenance("etag", etag);
            }
            if let Some(modified) = response.header("last-modified") {
                metadata.set_provenance("last_modified", modified);
            }
            metadata.set_provenance("content_hash", hash_bytes(&response.bytes));
        }

        let scratch = create_scratch_dir(DOWNLOAD_PREFIX)?;
        let file = scratch.join(sanitize_file_name(&plan.file_name));
        let result = fs::write(&file, &response.bytes)
            .map_err(|e| fs_error(&file, &e))
            .and_then(|()| self.install_local(&file, metadata, true));
        cleanup(&scratch);
        result
    }

    /// Resolve the download URL and provenance of a remote source
    fn plan(&self, source: &ImportSource, input: &str) -> Result<RemotePlan> {
        let mut metadata = BundleMetadata::new(String::new(), Some(input.to_string()));
        metadata.set_provenance(PROVENANCE_TYPE, source.source_type());

        let plan = match source {
            ImportSource::GitHub(location) => {
                let branch = location.resolve_branch(self.fetcher);
                metadata.set_provenance("owner", location.owner.as_str());
                metadata.set_provenance("repo", location.repo.as_str());
                metadata.set_provenance("branch", branch.as_str());
                match location.latest_commit(self.fetcher, &branch) {
                    Ok(sha) => metadata.set_commit_id(&sha),
                    Err(e) => {
                        warn!("Could not read latest commit: {e}");
                        metadata.version_label = Some(branch.clone());
                    }
                }

                let (download_url, file_name) = match &location.target {
                    GitHubTarget::Repository { .. } => (
                        location.archive_url(&branch),
                        format!("{}.zip", location.repo),
                    ),
                    GitHubTarget::File { path, .. } => {
                        (location.raw_url(&branch, path), base_name(path))
                    }
                };
                RemotePlan {
                    download_url,
                    file_name,
                    default_name: location.repo.clone(),
                    metadata,
                }
            }
            ImportSource::GitLab(location) => {
                let project = location.project_info(self.fetcher)?;
                metadata.set_provenance("project_id", project.id.to_string());
                metadata.set_provenance("project_path", location.project_path.as_str());
                metadata.set_provenance("branch", location.branch.as_str());
                match location.latest_commit(self.fetcher, project.id) {
                    Ok(id) => metadata.set_commit_id(&id),
                    Err(e) => {
                        warn!("Could not read latest commit: {e}");
                        metadata.version_label = Some(location.branch.clone());
                    }
                }

                let (download_url, file_name) = match &location.file_path {
                    Some(path) => (location.raw_file_url(project.id, path), base_name(path)),
                    None => (
                        location.archive_url(project.id),
                        format!("{}.zip", project.name),
                    ),
                };
                RemotePlan {
                    download_url,
                    file_name,
                    default_name: project.name,
                    metadata,
                }
            }
            ImportSource::DirectUrl(url) => {
                let file_name = url_file_name(url).unwrap_or_else(|| FALLBACK_NAME.to_string());
                RemotePlan {
                    download_url: url.to_string(),
                    default_name: default_name(Path::new(&file_name)),
                    file_name,
                    metadata,
                }
            }
            ImportSource::LocalFile(path) | ImportSource::LocalDirectory(path) => {
                return Err(crate::error::invalid_source(
                    path.display().to_string(),
                    "not a remote source",
                ));
            }
        };
        Ok(plan)
    }

    /// Install from a local path; `owned` files may be consumed
    fn install_local(
        &self,
        path: &Path,
        metadata: BundleMetadata,
        owned: bool,
    ) -> Result<BundleMetadata> {
        if path.is_dir() {
            return self.install_directory(path, metadata);
        }
        if ContainerFormat::from_path(path).is_some() {
            return self.install_archive(path, metadata);
        }
        if is_stylesheet(path) {
            return self.install_stylesheet(path, metadata, owned);
        }
        Err(LoaderError::UnsupportedFileType {
            name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string()),
        })
    }

    fn install_archive(&self, archive: &Path, metadata: BundleMetadata) -> Result<BundleMetadata> {
        let extracted = self.extractor.extract(archive, None)?;
        let result = validate_extracted_content(&extracted).and_then(|files| {
            self.installer()
                .install_extracted_bundle_with(&files, &extracted, metadata)
        });
        if result.is_err() {
            cleanup(&extracted);
        }
        let metadata = result?;
        info!("Imported archive {}", archive.display());
        Ok(metadata)
    }

    fn install_stylesheet(
        &self,
        file: &Path,
        metadata: BundleMetadata,
        owned: bool,
    ) -> Result<BundleMetadata> {
        if owned {
            return self.installer().install_single_file_with(file, metadata);
        }

        // The installer deletes its input, so hand it a copy
        let scratch = create_scratch_dir(DOWNLOAD_PREFIX)?;
        let file_name = file
            .file_name()
            .map_or_else(|| FALLBACK_NAME.into(), |n| n.to_string_lossy().to_string());
        let copy = scratch.join(file_name);
        let result = copy_verified(file, &copy)
            .and_then(|()| self.installer().install_single_file_with(&copy, metadata));
        cleanup(&scratch);
        result
    }

    fn install_directory(&self, dir: &Path, metadata: BundleMetadata) -> Result<BundleMetadata> {
        let found = find_stylesheet_files(dir);
        if found.is_empty() {
            return Err(LoaderError::NoStylesheetFilesFound {
                path: dir.display().to_string(),
            });
        }

        let scratch = create_scratch_dir(EXTRACT_PREFIX)?;
        let result = copy_tree(&found, dir, &scratch).and_then(|copied| {
            self.installer()
                .install_extracted_bundle_with(&copied, &scratch, metadata)
        });
        if result.is_err() {
            cleanup(&scratch);
        }
        result
    }
}

/// Copy `files` from below `from` to the same relative places below `to`
fn copy_tree(files: &[PathBuf], from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(files.len());
    for file in files {
        let Some(rel) = relative_forward(file, from) else {
            continue;
        };
        let target = to.join(&rel);
        copy_verified(file, &target)?;
        copied.push(target);
    }
    Ok(copied)
}

fn cleanup(path: &Path) {
    if let Err(e) = remove_path_resilient(path) {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

fn base_name(path: &str) -> String {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map_or_else(|| FALLBACK_NAME.to_string(), ToString::to_string)
}

/// Bundle name derived from a path: the base name without a container or
/// stylesheet extension
pub fn default_name(path: &Path) -> String {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
        return FALLBACK_NAME.to_string();
    };

    let lower = file_name.to_ascii_lowercase();
    let stem = ContainerFormat::from_path(path)
        .and_then(|format| {
            format
                .suffixes()
                .iter()
                .find(|suffix| lower.ends_with(*suffix))
                .map(|suffix| &file_name[..file_name.len() - suffix.len()])
        })
        .or_else(|| {
            is_stylesheet(path)
                .then(|| path.file_stem().and_then(|s| s.to_str()))
                .flatten()
        })
        .unwrap_or(&file_name);

    if stem.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        stem.to_string()
    }
}
