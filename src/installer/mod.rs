//! Bundle installation into a profile
//!
//! [`ModInstaller`] places files under the profile's stylesheet directory,
//! edits the root stylesheet through the directive functions and records the
//! bundle in the registry:
//!
//! - Single files land directly in the stylesheet directory and get one
//!   directive for their (sanitized) name.
//! - Extracted bundles land in a namespace directory named after the bundle;
//!   only entry points get a directive.
//!
//! Root stylesheet and registry are snapshotted in a [`Transaction`] for every
//! mutating call, so a failed install or uninstall leaves both unchanged.

pub mod file_ops;
pub mod layout;


use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::{find_stylesheet_files, is_stylesheet};
use crate::directive::{
    add_directive, directive_state, has_directive, is_toggleable, list_directives,
    reference_paths, remove_directive, toggle_directive,
};
use crate::domain::directive::namespace_of;
use crate::domain::profile::ROOT_STYLESHEET;
use crate::domain::{BundleMetadata, ProfileAccessor};
use crate::error::{LoaderError, Result, file_operation};
use crate::path_utils::{clean_path, comparable_path, relative_forward};
use crate::registry::ModRegistry;
use crate::resolver::{find_cycle_where, find_entry_points};
use crate::stylesheet::{read_root, read_root_or_default, write_root};
use crate::transaction::Transaction;

use file_ops::{copy_verified, remove_path_resilient, sanitize_file_name};
use layout::{common_wrapper, strip_wrapper};

/// Result of removing a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Last directive of the namespace: files and registry record are gone
    Purged {
        namespace: String,
        bundle: Option<String>,
    },
    /// Other directives still use the namespace; files and record are kept
    Retained { namespace: String, remaining: usize },
}

/// Result of toggling several directives at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkToggle {
    pub succeeded: usize,
    /// Paths that had no directive
    pub missing: Vec<String>,
    /// Paths whose only directives sit inside another comment
    pub in_comment: Vec<String>,
}

/// Installs, removes and toggles bundles in one profile
pub struct ModInstaller<'a> {
    profile: &'a dyn ProfileAccessor,
    registry: &'a ModRegistry,
}

impl<'a> ModInstaller<'a> {
    pub fn new(profile: &'a dyn ProfileAccessor, registry: &'a ModRegistry) -> Self {
        Self { profile, registry }
    }

    fn begin(&self) -> Result<Transaction> {
        let mut transaction = Transaction::new();
        transaction.snapshot(&self.profile.root_stylesheet_path())?;
        transaction.snapshot(self.registry.path())?;
        Ok(transaction)
    }

    /// Refuse to activate `target` if its references lead back to the root
    /// stylesheet or loop through files outside `scope`
    ///
    /// Loops confined to the bundle's own files (`scope`) are left to the
    /// browser, which loads each stylesheet once.
    fn ensure_acyclic(&self, target: &Path, scope: &Path, directive_path: &str) -> Result<()> {
        let root = self.profile.root_stylesheet_path();
        let root_key = comparable_path(&root);
        let scope_key = comparable_path(scope);
        let escapes = |cycle: &[PathBuf]| {
            cycle
                .iter()
                .any(|file| *file == root_key || !file.starts_with(&scope_key))
        };

        if let Some(cycle) = find_cycle_where(target, std::slice::from_ref(&root), escapes) {
            debug!("Rejected cycle of {} file(s)", cycle.len());
            return Err(LoaderError::CircularReference {
                path: directive_path.to_string(),
            });
        }
        Ok(())
    }

    fn activate(&self, directive_paths: &[String]) -> Result<()> {
        let mut text = read_root_or_default(self.profile)?;
        for path in directive_paths {
            text = add_directive(&text, path);
        }
        write_root(self.profile, &text)
    }

    /// Install one stylesheet file
    #[allow(dead_code)] // used in tests
    pub fn install_single_file(
        &self,
        file_path: &Path,
        bundle_name: &str,
        source_url: Option<String>,
    ) -> Result<BundleMetadata> {
        self.install_single_file_with(file_path, BundleMetadata::new(bundle_name, source_url))
    }

    /// Install one stylesheet file, recording `metadata` (provenance etc.)
    ///
    /// The file is copied into the stylesheet directory under its sanitized
    /// name and the source file is deleted afterwards.
    pub fn install_single_file_with(
        &self,
        file_path: &Path,
        mut metadata: BundleMetadata,
    ) -> Result<BundleMetadata> {
        let chrome = self.profile.ensure_stylesheet_directory_exists()?;

        let raw_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| file_operation(file_path.display().to_string(), "no file name"))?;
        let file_name = sanitize_file_name(&raw_name);
        if file_name.eq_ignore_ascii_case(ROOT_STYLESHEET) {
            return Err(file_operation(
                file_path.display().to_string(),
                "a single file may not replace the root stylesheet",
            ));
        }
        let target = chrome.join(&file_name);

        let mut transaction = self.begin()?;
        transaction.snapshot(&target)?;

        copy_verified(file_path, &target)?;
        self.ensure_acyclic(&target, &target, &file_name)?;
        self.activate(std::slice::from_ref(&file_name))?;

        metadata.files.clear();
        metadata.add_file(file_name.as_str());
        self.registry.upsert(metadata.clone())?;
        transaction.commit();

        if let Err(e) = fs::remove_file(file_path) {
            warn!("Failed to remove {}: {}", file_path.display(), e);
        }
        info!("Installed {} as {}", metadata.name, file_name);
        Ok(metadata)
    }

    /// Install the stylesheets of an extracted bundle
    #[allow(dead_code)] // used in tests
    pub fn install_extracted_bundle(
        &self,
        discovered: &[PathBuf],
        scratch_dir: &Path,
        bundle_name: &str,
        source_url: Option<String>,
    ) -> Result<BundleMetadata> {
        self.install_extracted_bundle_with(
            discovered,
            scratch_dir,
            BundleMetadata::new(bundle_name, source_url),
        )
    }

    /// Install the stylesheets of an extracted bundle, recording `metadata`
    ///
    /// Files are copied below `<stylesheet dir>/<namespace>/` keeping their
    /// layout, minus a common wrapper directory. Files referenced by an entry
    /// point but not in `discovered` are pulled from `scratch_dir` as well.
    /// One directive is added per entry point, or per file when no entry
    /// point can be told apart. `scratch_dir` is removed at the end.
    pub fn install_extracted_bundle_with(
        &self,
        discovered: &[PathBuf],
        scratch_dir: &Path,
        mut metadata: BundleMetadata,
    ) -> Result<BundleMetadata> {
        if discovered.is_empty() {
            return Err(LoaderError::NoStylesheetFilesFound {
                path: scratch_dir.display().to_string(),
            });
        }

        let chrome = self.profile.ensure_stylesheet_directory_exists()?;
        let namespace = sanitize_file_name(&metadata.name);
        let namespace_dir = chrome.join(&namespace);

        let relative: Vec<String> = discovered
            .iter()
            .map(|file| {
                relative_forward(file, scratch_dir).ok_or_else(|| {
                    file_operation(
                        file.display().to_string(),
                        format!("not inside {}", scratch_dir.display()),
                    )
                })
            })
            .collect::<Result<_>>()?;
        let wrapper = common_wrapper(&relative);
        if let Some(ref w) = wrapper {
            debug!("Stripping wrapper directory {w}/");
        }

        let mut transaction = self.begin()?;
        if !namespace_dir.exists() {
            transaction.track_dir_created(&namespace_dir);
        }

        metadata.files.clear();
        let mut install = |source: &Path, rel: &str| -> Result<String> {
            let dest_rel = strip_wrapper(rel, wrapper.as_deref());
            let dest = namespace_dir.join(dest_rel);
            transaction.snapshot(&dest)?;
            copy_verified(source, &dest)?;
            let bundle_path = format!("{namespace}/{dest_rel}");
            metadata.add_file(bundle_path.as_str());
            Ok(bundle_path)
        };

        let mut installed: Vec<(PathBuf, String)> = Vec::with_capacity(discovered.len());
        for (file, rel) in discovered.iter().zip(&relative) {
            installed.push((file.clone(), install(file, rel)?));
        }

        let mut entry_points = find_entry_points(discovered);
        if entry_points.is_empty() {
            debug!("No entry point identified; activating every file");
            entry_points = discovered.to_vec();
        }

        for extra in extra_references(&entry_points, discovered, scratch_dir) {
            if let Some(rel) = relative_forward(&extra, scratch_dir) {
                debug!("Copying referenced file {rel}");
                install(&extra, &rel)?;
            }
        }

        let mut directives = Vec::with_capacity(entry_points.len());
        for entry in &entry_points {
            let Some((_, bundle_path)) = installed.iter().find(|(file, _)| file == entry) else {
                continue;
            };
            self.ensure_acyclic(&chrome.join(bundle_path), &namespace_dir, bundle_path)?;
            directives.push(bundle_path.clone());
        }
        self.activate(&directives)?;

        self.registry.upsert(metadata.clone())?;
        transaction.commit();

        if let Err(e) = remove_path_resilient(scratch_dir) {
            warn!("Failed to remove {}: {}", scratch_dir.display(), e);
        }
        info!(
            "Installed {} ({} file(s), {} directive(s))",
            metadata.name,
            metadata.files.len(),
            directives.len()
        );
        Ok(metadata)
    }

    /// Remove the directive for `directive_path`
    ///
    /// When no other directive points into the same namespace, the namespace
    /// (directory or single file) and the owning registry record are deleted.
    pub fn uninstall(&self, directive_path: &str) -> Result<UninstallOutcome> {
        let not_found = || LoaderError::DirectiveNotFound {
            path: directive_path.to_string(),
        };
        let text = read_root(self.profile)?.ok_or_else(not_found)?;
        if !has_directive(&text, directive_path) {
            return Err(not_found());
        }

        let namespace = namespace_of(directive_path);
        let transaction = self.begin()?;

        let updated = remove_directive(&text, directive_path);
        write_root(self.profile, &updated)?;

        let remaining = list_directives(&updated)
            .iter()
            .filter(|directive| directive.namespace() == namespace)
            .count();
        if remaining > 0 {
            transaction.commit();
            info!("Kept {namespace}: {remaining} directive(s) still use it");
            return Ok(UninstallOutcome::Retained {
                namespace,
                remaining,
            });
        }

        let bundle = self.owning_bundle(&namespace)?;
        if let Some(ref name) = bundle {
            self.registry.remove(name)?;
        }

        if is_deletable_namespace(&namespace) {
            let target = self.profile.stylesheet_directory_path().join(&namespace);
            remove_path_resilient(&target)?;
        } else {
            warn!("Not deleting files for namespace '{namespace}'");
        }

        transaction.commit();
        info!("Removed {namespace}");
        Ok(UninstallOutcome::Purged { namespace, bundle })
    }

    /// Registry record owning `namespace`, by file list then by exact name
    fn owning_bundle(&self, namespace: &str) -> Result<Option<String>> {
        let records = self.registry.list()?;
        Ok(records
            .iter()
            .find(|meta| meta.owns_namespace(namespace))
            .or_else(|| records.iter().find(|meta| meta.name == namespace))
            .map(|meta| meta.name.clone()))
    }

    /// Flip one directive; returns its new enabled state
    pub fn toggle(&self, directive_path: &str) -> Result<bool> {
        let not_found = || LoaderError::DirectiveNotFound {
            path: directive_path.to_string(),
        };
        let text = read_root(self.profile)?.ok_or_else(not_found)?;
        if !has_directive(&text, directive_path) {
            return Err(not_found());
        }
        if !is_toggleable(&text, directive_path) {
            return Err(LoaderError::DirectiveInComment {
                path: directive_path.to_string(),
            });
        }

        let updated = toggle_directive(&text, directive_path);
        write_root(self.profile, &updated)?;
        Ok(directive_state(&updated, directive_path).unwrap_or(false))
    }

    /// Flip several directives with one write; missing ones are reported
    pub fn toggle_many(&self, directive_paths: &[String]) -> Result<BulkToggle> {
        let mut summary = BulkToggle::default();
        let Some(mut text) = read_root(self.profile)? else {
            summary.missing = directive_paths.to_vec();
            return Ok(summary);
        };

        for path in directive_paths {
            if is_toggleable(&text, path) {
                text = toggle_directive(&text, path);
                summary.succeeded += 1;
            } else if has_directive(&text, path) {
                summary.in_comment.push(path.clone());
            } else {
                summary.missing.push(path.clone());
            }
        }

        if summary.succeeded > 0 {
            write_root(self.profile, &text)?;
        }
        Ok(summary)
    }

    /// Delete installed files a bundle no longer ships, with their directives
    ///
    /// `files` are bundle paths as recorded in the registry. Directories left
    /// empty inside the namespace are removed; the registry is not touched.
    pub fn remove_stale_files(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let chrome = self.profile.stylesheet_directory_path();
        let transaction = self.begin()?;

        if let Some(mut text) = read_root(self.profile)? {
            let before = text.clone();
            for file in files {
                if has_directive(&text, file) {
                    text = remove_directive(&text, file);
                }
            }
            if text != before {
                write_root(self.profile, &text)?;
            }
        }

        for file in files {
            let namespace = namespace_of(file);
            let namespace_dir = clean_path(&chrome.join(&namespace));
            let target = clean_path(&chrome.join(crate::directive::normalize_path(file)));
            if !is_deletable_namespace(&namespace) || !target.starts_with(&namespace_dir) {
                warn!("Not deleting {file}");
                continue;
            }

            remove_path_resilient(&target)?;
            debug!("Removed stale {file}");
            let mut dir = target.parent();
            while let Some(parent) = dir.filter(|d| d.starts_with(&namespace_dir)) {
                if fs::remove_dir(parent).is_err() {
                    break;
                }
                dir = parent.parent();
            }
        }

        transaction.commit();
        Ok(())
    }
}

/// A namespace names one entry directly inside the stylesheet directory
fn is_deletable_namespace(namespace: &str) -> bool {
    !matches!(namespace, "" | "." | "..")
        && !namespace.contains(':')
        && !namespace.eq_ignore_ascii_case(ROOT_STYLESHEET)
}

/// Files inside `scratch_dir` referenced by `entry_points` but not discovered
///
/// A reference to a directory pulls in every stylesheet below it.
fn extra_references(
    entry_points: &[PathBuf],
    discovered: &[PathBuf],
    scratch_dir: &Path,
) -> Vec<PathBuf> {
    let scratch = clean_path(scratch_dir);
    let mut known: HashSet<PathBuf> = discovered.iter().map(|p| clean_path(p)).collect();
    let mut extras = Vec::new();

    for entry in entry_points {
        let Some(text) = crate::stylesheet::read_text_lossy(entry) else {
            continue;
        };
        let base = entry.parent().unwrap_or(scratch_dir);

        for reference in reference_paths(&text) {
            let resolved = clean_path(&base.join(crate::directive::normalize_path(&reference)));
            if !resolved.starts_with(&scratch) {
                continue;
            }

            let candidates = if resolved.is_dir() {
                find_stylesheet_files(&resolved)
            } else if resolved.is_file() && is_stylesheet(&resolved) {
                vec![resolved]
            } else {
                Vec::new()
            };

            for candidate in candidates {
                let candidate = clean_path(&candidate);
                if known.insert(candidate.clone()) {
                    extras.push(candidate);
                }
            }
        }
    }
    extras
}
