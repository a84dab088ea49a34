//! Registry errors

use super::LoaderError;

/// Creates a registry error
pub fn registry_error(path: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::Registry {
        path: path.into(),
        reason: reason.into(),
    }
}
