//! Optional extraction capability for formats without a built-in handler
//!
//! The extractor holds one [`ExtendedExtractor`]. When the capability is not
//! available the extra formats are simply not supported; nothing checks for
//! them at call time.

use std::path::Path;

use super::format::ContainerFormat;
use crate::error::{Result, unsupported_container};

/// Extraction of additional container formats (7z, rar, iso)
pub trait ExtendedExtractor {
    /// Whether the capability can be used at all
    fn is_available(&self) -> bool;

    /// Formats this capability handles
    fn formats(&self) -> &[ContainerFormat];

    /// Extract `archive` into the existing directory `dest`
    ///
    /// Implementations must reject unsafe entry paths before writing anything.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Default capability: no extra formats
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedExtractor;

impl ExtendedExtractor for UnsupportedExtractor {
    fn is_available(&self) -> bool {
        false
    }

    fn formats(&self) -> &[ContainerFormat] {
        &[]
    }

    fn extract(&self, archive: &Path, _dest: &Path) -> Result<()> {
        Err(unsupported_container(archive.display().to_string()))
    }
}
