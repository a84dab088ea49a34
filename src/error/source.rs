//! Source resolution and download errors

use super::LoaderError;

/// Creates an invalid source error
pub fn invalid_source(input: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::InvalidSource {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Creates a download failure error
pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::DownloadFailed {
        url: url.into(),
        reason: reason.into(),
    }
}
