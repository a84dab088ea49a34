//! Archive extraction
//!
//! [`ArchiveExtractor`] unpacks a container into a scratch directory. Formats
//! are dispatched through an ordered handler list: the built-in zip and tar
//! handlers first, then the formats of the optional [`ExtendedExtractor`]
//! capability when it reports itself available.
//!
//! Entry names are validated before anything is written. An absolute name or
//! a `..` segment fails the whole extraction with an unsafe-path error.

mod container;
mod extended;
mod format;

#[cfg(test)]
mod tests;

pub use extended::{ExtendedExtractor, UnsupportedExtractor};
pub use format::ContainerFormat;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{LoaderError, Result, empty_archive, fs_error, unsupported_container};
use crate::temp::{EXTRACT_PREFIX, create_scratch_dir};

/// Extension of stylesheet files (compared case-insensitively)
pub const STYLESHEET_EXTENSION: &str = "css";

#[derive(Debug, Clone, Copy)]
enum Handler {
    Zip,
    Tar(ContainerFormat),
    Extended,
}

/// Extracts supported containers into scratch directories
pub struct ArchiveExtractor {
    handlers: Vec<(ContainerFormat, Handler)>,
    extended: Box<dyn ExtendedExtractor>,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    /// Extractor with the built-in formats only
    pub fn new() -> Self {
        Self::with_extended(Box::new(UnsupportedExtractor))
    }

    /// Extractor that also offers the formats of `extended` if it is available
    #[allow(dead_code)] // used in tests
    pub fn with_extended(extended: Box<dyn ExtendedExtractor>) -> Self {
        let mut handlers: Vec<(ContainerFormat, Handler)> = ContainerFormat::BUILTIN
            .into_iter()
            .map(|format| {
                let handler = match format {
                    ContainerFormat::Zip => Handler::Zip,
                    other => Handler::Tar(other),
                };
                (format, handler)
            })
            .collect();

        if extended.is_available() {
            handlers.extend(
                extended
                    .formats()
                    .iter()
                    .map(|format| (*format, Handler::Extended)),
            );
        } else {
            debug!("Extended archive formats unavailable");
        }

        Self { handlers, extended }
    }

    /// Formats this extractor accepts, in dispatch order
    pub fn supported_formats(&self) -> Vec<ContainerFormat> {
        self.handlers.iter().map(|(format, _)| *format).collect()
    }

    fn handler_for(&self, path: &Path) -> Option<Handler> {
        self.handlers
            .iter()
            .find(|(format, _)| format.matches(path))
            .map(|(_, handler)| *handler)
    }

    /// Whether `path` has the extension of a supported container
    pub fn is_supported_container(&self, path: &Path) -> bool {
        self.handler_for(path).is_some()
    }

    /// Extract `archive` into `destination`, or into a fresh scratch directory
    ///
    /// Returns the directory holding the extracted files. A directory created
    /// by this call is removed again when extraction fails.
    pub fn extract(&self, archive: &Path, destination: Option<&Path>) -> Result<PathBuf> {
        let handler = self
            .handler_for(archive)
            .ok_or_else(|| unsupported_container(archive.display().to_string()))?;

        let (dest, fresh) = match destination {
            Some(dir) => {
                let fresh = !dir.exists();
                fs::create_dir_all(dir).map_err(|e| fs_error(dir, &e))?;
                (dir.to_path_buf(), fresh)
            }
            None => (create_scratch_dir(EXTRACT_PREFIX)?, true),
        };

        debug!("Extracting {} into {}", archive.display(), dest.display());
        let outcome = self.run(handler, archive, &dest).and_then(|()| {
            if contains_file(&dest) {
                Ok(())
            } else {
                Err(empty_archive(archive.display().to_string()))
            }
        });

        if let Err(err) = outcome {
            if fresh {
                if let Err(cleanup) = fs::remove_dir_all(&dest) {
                    warn!("Failed to remove {}: {}", dest.display(), cleanup);
                }
            }
            return Err(err);
        }

        Ok(dest)
    }

    fn run(&self, handler: Handler, archive: &Path, dest: &Path) -> Result<()> {
        match handler {
            Handler::Zip => container::extract_zip(archive, dest),
            Handler::Tar(format) => container::extract_tar(archive, dest, format),
            Handler::Extended => self.extended.extract(archive, dest),
        }
    }
}

fn contains_file(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .any(|entry| entry.file_type().is_file())
}

/// Whether `path` has the stylesheet extension
pub fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(STYLESHEET_EXTENSION))
}

/// Every stylesheet file below `directory`, sorted
pub fn find_stylesheet_files(directory: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_stylesheet(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Stylesheet files of an extracted bundle; fails if there are none
pub fn validate_extracted_content(directory: &Path) -> Result<Vec<PathBuf>> {
    let files = find_stylesheet_files(directory);
    if files.is_empty() {
        return Err(LoaderError::NoStylesheetFilesFound {
            path: directory.display().to_string(),
        });
    }
    Ok(files)
}
