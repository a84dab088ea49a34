//! Browser profile
//!
//! Profiles are discovered elsewhere; this crate only needs to know where the
//! stylesheet directory and the root stylesheet live.

use std::path::{Path, PathBuf};

use crate::error::{Result, fs_error};

/// Stylesheet-loading directory inside a profile
pub const STYLESHEET_DIR: &str = "chrome";

/// Root stylesheet file name
pub const ROOT_STYLESHEET: &str = "userChrome.css";

/// Access to the parts of a profile this crate may touch
pub trait ProfileAccessor {
    /// Directory holding the root stylesheet and all installed bundles
    fn stylesheet_directory_path(&self) -> PathBuf;

    /// Path of the root stylesheet
    fn root_stylesheet_path(&self) -> PathBuf;

    /// Create the stylesheet directory if missing and return it
    fn ensure_stylesheet_directory_exists(&self) -> Result<PathBuf> {
        let dir = self.stylesheet_directory_path();
        std::fs::create_dir_all(&dir).map_err(|e| fs_error(&dir, &e))?;
        Ok(dir)
    }
}

/// A browser profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub root_path: PathBuf,
    pub name: String,
    pub is_default: bool,
}

impl Profile {
    /// Create a profile; an empty name falls back to the directory name
    pub fn new(root_path: impl Into<PathBuf>, name: impl Into<String>, is_default: bool) -> Self {
        let root_path = root_path.into();
        let mut name = name.into();
        if name.is_empty() {
            name = root_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Unnamed Profile".to_string());
        }
        Self {
            root_path,
            name,
            is_default,
        }
    }

    /// Profile rooted at `path`, named after its directory
    pub fn from_path(path: &Path) -> Self {
        Self::new(path, "", false)
    }

    /// Whether the root stylesheet exists on disk
    pub fn has_root_stylesheet(&self) -> bool {
        self.root_stylesheet_path().is_file()
    }
}

impl ProfileAccessor for Profile {
    fn stylesheet_directory_path(&self) -> PathBuf {
        self.root_path.join(STYLESHEET_DIR)
    }

    fn root_stylesheet_path(&self) -> PathBuf {
        self.stylesheet_directory_path().join(ROOT_STYLESHEET)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}{})",
            self.name,
            self.root_path.display(),
            if self.is_default { ", default" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_profile_paths() {
        let profile = Profile::new("/home/u/.mozilla/firefox/abc.default", "default", true);
        assert_eq!(
            profile.stylesheet_directory_path(),
            PathBuf::from("/home/u/.mozilla/firefox/abc.default/chrome")
        );
        assert_eq!(
            profile.root_stylesheet_path(),
            PathBuf::from("/home/u/.mozilla/firefox/abc.default/chrome/userChrome.css")
        );
    }

    #[test]
    fn test_empty_name_uses_directory() {
        let profile = Profile::new("/profiles/xyz.dev", "", false);
        assert_eq!(profile.name, "xyz.dev");
    }

    #[test]
    fn test_ensure_stylesheet_directory_exists() {
        let temp = TempDir::new().unwrap();
        let profile = Profile::from_path(temp.path());
        assert!(!profile.stylesheet_directory_path().exists());

        let dir = profile.ensure_stylesheet_directory_exists().unwrap();
        assert!(dir.is_dir());
        assert!(!profile.has_root_stylesheet());
    }
}
