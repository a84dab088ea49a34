//! File operations for bundle installation
//!
//! - File name sanitizing (sanitize_file_name)
//! - Size-verified copies (copy_verified)
//! - Resilient recursive deletion (remove_path_resilient)

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, file_operation, fs_error};

/// Characters that are invalid in file names on at least one platform
const FILE_NAME_UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are illegal in file names with `_`
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if FILE_NAME_UNSAFE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    match sanitized.trim() {
        "" | "." | ".." => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_error(parent, &e))?;
    }
    Ok(())
}

/// Copy `source` to `target` (overwriting) and compare the sizes afterwards
pub fn copy_verified(source: &Path, target: &Path) -> Result<()> {
    ensure_parent_dir(target)?;
    let written = fs::copy(source, target).map_err(|e| fs_error(target, &e))?;
    let expected = fs::metadata(source)
        .map_err(|e| fs_error(source, &e))?
        .len();
    let actual = fs::metadata(target)
        .map_err(|e| fs_error(target, &e))?
        .len();

    if written != expected || actual != expected {
        return Err(file_operation(
            target.display().to_string(),
            format!("copy size mismatch: expected {expected} bytes, found {actual}"),
        ));
    }
    debug!("Copied {} -> {}", source.display(), target.display());
    Ok(())
}

/// Delete a file or a directory tree
///
/// Directories go through [`fs::remove_dir_all`] first; if that fails, a
/// manual bottom-up walk clears read-only flags and deletes entry by entry.
pub fn remove_path_resilient(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    if !meta.is_dir() {
        clear_readonly(path);
        return fs::remove_file(path).map_err(|e| fs_error(path, &e));
    }

    match fs::remove_dir_all(path) {
        Ok(()) => return Ok(()),
        Err(e) => warn!(
            "Recursive delete of {} failed ({}); removing entries one by one",
            path.display(),
            e
        ),
    }

    for entry in WalkDir::new(path).contents_first(true) {
        let entry = entry.map_err(|e| file_operation(path.display().to_string(), e.to_string()))?;
        let entry_path = entry.path();
        clear_readonly(entry_path);
        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(entry_path)
        } else {
            fs::remove_file(entry_path)
        };
        removed.map_err(|e| fs_error(entry_path, &e))?;
    }
    Ok(())
}

#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path) {
    if let Ok(meta) = fs::symlink_metadata(path) {
        let mut permissions = meta.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            if let Err(e) = fs::set_permissions(path, permissions) {
                debug!("Could not clear read-only flag on {}: {}", path.display(), e);
            }
        }
    }
}
