//! Error types and handling for userchrome-loader
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain, each providing
//! convenience constructors:
//! - [`archive`]: Container extraction errors
//! - [`fs`]: File system errors
//! - [`registry`]: Installed-bundle registry errors
//! - [`source`]: Source resolution and download errors

pub mod archive;
pub mod fs;
pub mod registry;
pub mod source;

pub use archive::{corrupt_container, empty_archive, unsafe_path, unsupported_container};
pub use fs::{file_operation, fs_error, io_error};
pub use registry::registry_error;
pub use source::{download_failed, invalid_source};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for loader operations
#[derive(Error, Diagnostic, Debug)]
pub enum LoaderError {
    // Archive errors
    #[error("Unsupported container format: {path}")]
    #[diagnostic(
        code(ucl::archive::unsupported),
        help("Supported formats: .zip, .xpi, .tar, .tar.gz, .tgz, .tar.bz2, .tbz2")
    )]
    UnsupportedContainer { path: String },

    #[error("Unsafe path in archive: {entry}")]
    #[diagnostic(
        code(ucl::archive::unsafe_path),
        help("The archive tries to write outside its extraction directory. Do not install it.")
    )]
    UnsafePath { entry: String },

    #[error("Invalid or corrupted archive {path}: {reason}")]
    #[diagnostic(
        code(ucl::archive::corrupt),
        help("Download the archive again or pick a different file")
    )]
    CorruptContainer { path: String, reason: String },

    #[error("Archive produced no files: {path}")]
    #[diagnostic(code(ucl::archive::empty))]
    EmptyArchive { path: String },

    #[error("No stylesheet files found in {path}")]
    #[diagnostic(
        code(ucl::archive::no_stylesheets),
        help("A bundle must contain at least one .css file")
    )]
    NoStylesheetFilesFound { path: String },

    // Directive errors
    #[error("Import not found: {path}")]
    #[diagnostic(
        code(ucl::directive::not_found),
        help("Run 'ucl list' to see the imports in userChrome.css")
    )]
    DirectiveNotFound { path: String },

    #[error("Import {path} sits inside another comment and cannot be toggled")]
    #[diagnostic(
        code(ucl::directive::in_comment),
        help("Edit userChrome.css by hand to move the import out of the comment")
    )]
    DirectiveInComment { path: String },

    #[error("Circular import detected starting at {path}")]
    #[diagnostic(
        code(ucl::directive::circular),
        help("Remove the import that points back to an already imported stylesheet")
    )]
    CircularReference { path: String },

    // File system errors
    #[error("File operation failed on {path}: {reason}")]
    #[diagnostic(code(ucl::fs::operation_failed))]
    FileOperation { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ucl::fs::io_error))]
    IoError { message: String },

    // Registry errors
    #[error("Registry error in {path}: {reason}")]
    #[diagnostic(
        code(ucl::registry::failed),
        help("The registry file may be corrupted; move it aside to start over")
    )]
    Registry { path: String, reason: String },

    #[error("Bundle '{name}' not found")]
    #[diagnostic(
        code(ucl::registry::not_found),
        help("Run 'ucl list --bundles' to see installed bundles")
    )]
    BundleNotFound { name: String },

    // Source errors
    #[error("Invalid source {input}: {reason}")]
    #[diagnostic(
        code(ucl::source::invalid),
        help(
            "Valid sources: a local .css file, directory or archive, or an http(s) URL (GitHub, GitLab or direct)"
        )
    )]
    InvalidSource { input: String, reason: String },

    #[error("Unsupported file type: {name}")]
    #[diagnostic(
        code(ucl::source::unsupported_type),
        help("Import a .css file, a directory of stylesheets or a supported archive")
    )]
    UnsupportedFileType { name: String },

    #[error("Download failed for {url}: {reason}")]
    #[diagnostic(code(ucl::source::download_failed))]
    DownloadFailed { url: String, reason: String },

    // Profile errors
    #[error("Profile not found: {path}")]
    #[diagnostic(
        code(ucl::profile::not_found),
        help("Pass the profile directory with --profile or set UCL_PROFILE")
    )]
    ProfileNotFound { path: String },
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Registry {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for LoaderError {
    fn from(err: zip::result::ZipError) -> Self {
        LoaderError::CorruptContainer {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for LoaderError {
    fn from(err: inquire::InquireError) -> Self {
        LoaderError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, LoaderError>;
