//! Built-in zip and tar handlers
//!
//! Every handler validates all entry names before the first byte is written,
//! so a rejected archive leaves the destination untouched.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tracing::debug;

use super::format::ContainerFormat;
use crate::error::{Result, corrupt_container, fs_error, unsafe_path};

/// Whether an entry name is absolute or climbs out of the destination
pub fn is_unsafe_entry(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') {
        return true;
    }
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return true;
    }
    name.split(['/', '\\']).any(|segment| segment == "..")
}

/// Destination path for a validated entry name, `None` for the archive root
fn entry_target(dest: &Path, name: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = name
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.is_empty() {
        return None;
    }
    let mut target = dest.to_path_buf();
    target.extend(segments);
    Some(target)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| fs_error(path, &e))
}

fn write_entry(reader: &mut impl Read, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        create_dir(parent)?;
    }
    let mut out = File::create(target).map_err(|e| fs_error(target, &e))?;
    io::copy(reader, &mut out).map_err(|e| fs_error(target, &e))?;
    Ok(())
}

/// Extract a zip-family archive
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let display = archive_path.display().to_string();
    let file = File::open(archive_path).map_err(|e| fs_error(archive_path, &e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| corrupt_container(&display, e.to_string()))?;

    for i in 0..archive.len() {
        let name = archive
            .name_for_index(i)
            .ok_or_else(|| corrupt_container(&display, format!("missing entry {i}")))?;
        if is_unsafe_entry(name) {
            return Err(unsafe_path(name));
        }
    }

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| corrupt_container(&display, e.to_string()))?;
        let name = entry.name().to_string();
        let Some(target) = entry_target(dest, &name) else {
            continue;
        };

        if entry.is_dir() {
            create_dir(&target)?;
        } else {
            debug!("Extracting {name}");
            write_entry(&mut entry, &target)?;
        }
    }

    Ok(())
}

fn open_tar(archive_path: &Path, format: ContainerFormat) -> Result<tar::Archive<Box<dyn Read>>> {
    let file = File::open(archive_path).map_err(|e| fs_error(archive_path, &e))?;
    let reader = BufReader::new(file);
    let decoded: Box<dyn Read> = match format {
        ContainerFormat::TarGz => Box::new(GzDecoder::new(reader)),
        ContainerFormat::TarBz2 => Box::new(BzDecoder::new(reader)),
        _ => Box::new(reader),
    };
    Ok(tar::Archive::new(decoded))
}

fn entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    String::from_utf8_lossy(&entry.path_bytes()).into_owned()
}

/// Extract a tar-family archive, compressed as `format` says
///
/// The stream is read twice: once to validate names, once to write. Links
/// and special entries are skipped.
pub fn extract_tar(archive_path: &Path, dest: &Path, format: ContainerFormat) -> Result<()> {
    let display = archive_path.display().to_string();

    let mut archive = open_tar(archive_path, format)?;
    let entries = archive
        .entries()
        .map_err(|e| corrupt_container(&display, e.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|e| corrupt_container(&display, e.to_string()))?;
        let name = entry_name(&entry);
        if is_unsafe_entry(&name) {
            return Err(unsafe_path(name));
        }
    }

    let mut archive = open_tar(archive_path, format)?;
    let entries = archive
        .entries()
        .map_err(|e| corrupt_container(&display, e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| corrupt_container(&display, e.to_string()))?;
        let name = entry_name(&entry);
        let Some(target) = entry_target(dest, &name) else {
            continue;
        };

        let kind = entry.header().entry_type();
        if kind.is_dir() {
            create_dir(&target)?;
        } else if kind.is_file() {
            debug!("Extracting {name}");
            write_entry(&mut entry, &target)?;
        } else {
            debug!("Skipping non-regular entry {name}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unsafe_entry() {
        assert!(is_unsafe_entry("../evil.css"));
        assert!(is_unsafe_entry("a/../../evil.css"));
        assert!(is_unsafe_entry("a\\..\\evil.css"));
        assert!(is_unsafe_entry("/etc/passwd"));
        assert!(is_unsafe_entry("\\windows\\evil.css"));
        assert!(is_unsafe_entry("C:/evil.css"));

        assert!(!is_unsafe_entry("theme/userChrome.css"));
        assert!(!is_unsafe_entry("./theme/a.css"));
        assert!(!is_unsafe_entry("theme/..hidden.css"));
        assert!(!is_unsafe_entry("theme/"));
    }

    #[test]
    fn test_entry_target() {
        let dest = Path::new("/scratch");
        assert_eq!(
            entry_target(dest, "./theme//a.css"),
            Some(PathBuf::from("/scratch/theme/a.css"))
        );
        assert_eq!(entry_target(dest, "./"), None);
    }
}
