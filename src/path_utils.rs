//! Path helpers
//!
//! Paths stored in the registry and written into directives always use
//! forward slashes, whatever the host platform.

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Render `path` with forward slashes
///
/// # Examples
///
/// ```ignore
/// use std::path::Path;
///
/// assert_eq!(to_forward_slashes(Path::new("C:\\Users\\file.txt")), "C:/Users/file.txt");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `path` relative to `base` with forward slashes, `None` if outside `base`
pub fn relative_forward(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_forward_slashes)
}

/// Lexically resolve `.` and `..` components without touching the filesystem
///
/// A `..` that would climb above the root (or above the start of a relative
/// path) is kept.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Comparable form of `path`: normalized on disk when it exists, else
/// [`clean_path`]
pub fn comparable_path(path: &Path) -> PathBuf {
    path.normalize()
        .map(normpath::BasePathBuf::into_path_buf)
        .unwrap_or_else(|_| clean_path(path))
}
