//! Root stylesheet file access
//!
//! The directive functions work on text; this module moves that text between
//! memory and the profile. Files that are not valid UTF-8 are decoded as
//! ISO-8859-1, which maps every byte to the code point of the same value.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ProfileAccessor;
use crate::error::{Result, fs_error};

/// Content of a freshly created root stylesheet
pub const DEFAULT_ROOT_CONTENT: &str = "/* userChrome.css */\n\n";

/// Suffix appended to the root stylesheet name for its backup copy
const BACKUP_SUFFIX: &str = ".backup";

/// Read a text file, falling back to ISO-8859-1 when it is not UTF-8
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| fs_error(path, &e))?;
    Ok(decode(bytes))
}

/// Read a text file, `None` if it cannot be read for any reason
pub fn read_text_lossy(path: &Path) -> Option<String> {
    fs::read(path).ok().map(decode)
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!("Not UTF-8, decoding as ISO-8859-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Read the root stylesheet; `None` when it does not exist yet
pub fn read_root(profile: &dyn ProfileAccessor) -> Result<Option<String>> {
    let path = profile.root_stylesheet_path();
    if !path.exists() {
        return Ok(None);
    }
    read_text(&path).map(Some)
}

/// Read the root stylesheet, or its default content when missing
pub fn read_root_or_default(profile: &dyn ProfileAccessor) -> Result<String> {
    Ok(read_root(profile)?.unwrap_or_else(|| DEFAULT_ROOT_CONTENT.to_string()))
}

/// Write the root stylesheet, creating the stylesheet directory when needed
pub fn write_root(profile: &dyn ProfileAccessor, text: &str) -> Result<()> {
    profile.ensure_stylesheet_directory_exists()?;
    let path = profile.root_stylesheet_path();
    fs::write(&path, text).map_err(|e| fs_error(&path, &e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Path of the root stylesheet backup
pub fn backup_path(profile: &dyn ProfileAccessor) -> PathBuf {
    let root = profile.root_stylesheet_path();
    let mut name = root
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    root.with_file_name(name)
}

/// Copy the root stylesheet to its backup; `false` if there is nothing to back up
pub fn backup(profile: &dyn ProfileAccessor) -> Result<bool> {
    let root = profile.root_stylesheet_path();
    if !root.is_file() {
        return Ok(false);
    }
    let target = backup_path(profile);
    fs::copy(&root, &target).map_err(|e| fs_error(&target, &e))?;
    Ok(true)
}

/// Replace the root stylesheet with its backup; `false` if no backup exists
pub fn restore_backup(profile: &dyn ProfileAccessor) -> Result<bool> {
    let source = backup_path(profile);
    if !source.is_file() {
        return Ok(false);
    }
    profile.ensure_stylesheet_directory_exists()?;
    let root = profile.root_stylesheet_path();
    fs::copy(&source, &root).map_err(|e| fs_error(&root, &e))?;
    Ok(true)
}

/// Delete the backup if present
pub fn cleanup_backup(profile: &dyn ProfileAccessor) -> Result<()> {
    let path = backup_path(profile);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| fs_error(&path, &e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;
    use tempfile::TempDir;

    #[test]
    fn test_read_root_missing() {
        let temp = TempDir::new().unwrap();
        let profile = Profile::from_path(temp.path());
        assert!(read_root(&profile).unwrap().is_none());
        assert_eq!(read_root_or_default(&profile).unwrap(), DEFAULT_ROOT_CONTENT);
    }

    #[test]
    fn test_write_then_read_root() {
        let temp = TempDir::new().unwrap();
        let profile = Profile::from_path(temp.path());
        write_root(&profile, "@import url(\"a.css\");\n").unwrap();
        assert_eq!(
            read_root(&profile).unwrap().as_deref(),
            Some("@import url(\"a.css\");\n")
        );
    }

    #[test]
    fn test_read_text_latin1_fallback() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("old.css");
        fs::write(&path, [b'/', b'*', 0xE9, b'*', b'/']).unwrap();
        assert_eq!(read_text(&path).unwrap(), "/*\u{e9}*/");
    }

    #[test]
    fn test_backup_restore_cleanup() {
        let temp = TempDir::new().unwrap();
        let profile = Profile::from_path(temp.path());
        assert!(!backup(&profile).unwrap());

        write_root(&profile, "original\n").unwrap();
        assert!(backup(&profile).unwrap());
        assert!(backup_path(&profile).ends_with("chrome/userChrome.css.backup"));

        write_root(&profile, "changed\n").unwrap();
        assert!(restore_backup(&profile).unwrap());
        assert_eq!(read_root(&profile).unwrap().as_deref(), Some("original\n"));

        cleanup_backup(&profile).unwrap();
        assert!(!backup_path(&profile).exists());
        assert!(!restore_backup(&profile).unwrap());
    }
}
