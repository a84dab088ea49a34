//! File system errors

use std::path::Path;

use super::LoaderError;

/// Creates a file operation error
pub fn file_operation(path: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::FileOperation {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file operation error from an IO error on `path`
pub fn fs_error(path: &Path, err: &std::io::Error) -> LoaderError {
    file_operation(path.display().to_string(), err.to_string())
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> LoaderError {
    LoaderError::IoError {
        message: message.into(),
    }
}
