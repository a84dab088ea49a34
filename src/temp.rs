//! Scratch directories for extraction and downloads
//!
//! Scratch space always lives under an absolute temp base, never under the
//! current working directory (e.g. when `TMPDIR=tmp`).

use std::env;
use std::path::PathBuf;

use crate::error::{Result, fs_error};

/// Prefix of directories created for archive extraction
pub const EXTRACT_PREFIX: &str = "ucl_extract_";

/// Prefix of directories created for downloads
pub const DOWNLOAD_PREFIX: &str = "ucl_download_";

/// Absolute directory under which scratch directories are created
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create a fresh scratch directory with the given prefix
///
/// The directory is not removed automatically; callers own its cleanup.
pub fn create_scratch_dir(prefix: &str) -> Result<PathBuf> {
    let base = temp_dir_base();
    let dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(&base)
        .map_err(|e| fs_error(&base, &e))?;
    Ok(dir.keep())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }

    #[test]
    fn test_create_scratch_dir() {
        let dir = create_scratch_dir(EXTRACT_PREFIX).unwrap();
        assert!(dir.is_dir());
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(EXTRACT_PREFIX));
        std::fs::remove_dir(&dir).unwrap();
    }
}
