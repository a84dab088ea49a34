//! Container extraction errors

use super::LoaderError;

/// Creates an unsupported container error
pub fn unsupported_container(path: impl Into<String>) -> LoaderError {
    LoaderError::UnsupportedContainer { path: path.into() }
}

/// Creates an unsafe entry path error
pub fn unsafe_path(entry: impl Into<String>) -> LoaderError {
    LoaderError::UnsafePath {
        entry: entry.into(),
    }
}

/// Creates a corrupt container error
pub fn corrupt_container(path: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::CorruptContainer {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an empty archive error
pub fn empty_archive(path: impl Into<String>) -> LoaderError {
    LoaderError::EmptyArchive { path: path.into() }
}
