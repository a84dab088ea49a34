//! Container formats recognized by file name

use std::fmt;
use std::path::Path;

/// Container formats the extractor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Zip,
    Tar,
    TarGz,
    TarBz2,
    SevenZip,
    Rar,
    Iso,
}

impl ContainerFormat {
    /// Formats handled without any optional capability, in match order
    pub const BUILTIN: [ContainerFormat; 4] = [
        ContainerFormat::Zip,
        ContainerFormat::TarGz,
        ContainerFormat::TarBz2,
        ContainerFormat::Tar,
    ];

    /// File name suffixes (lowercase) denoting this format
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            ContainerFormat::Zip => &[".zip", ".xpi"],
            ContainerFormat::Tar => &[".tar"],
            ContainerFormat::TarGz => &[".tar.gz", ".tgz"],
            ContainerFormat::TarBz2 => &[".tar.bz2", ".tbz2"],
            ContainerFormat::SevenZip => &[".7z"],
            ContainerFormat::Rar => &[".rar"],
            ContainerFormat::Iso => &[".iso"],
        }
    }

    /// Whether `path` names a file of this format (case-insensitive)
    pub fn matches(self, path: &Path) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        self.suffixes().iter().any(|suffix| name.ends_with(suffix))
    }

    /// Detect any known format from the file name
    pub fn from_path(path: &Path) -> Option<Self> {
        [
            ContainerFormat::Zip,
            ContainerFormat::TarGz,
            ContainerFormat::TarBz2,
            ContainerFormat::Tar,
            ContainerFormat::SevenZip,
            ContainerFormat::Rar,
            ContainerFormat::Iso,
        ]
        .into_iter()
        .find(|format| format.matches(path))
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerFormat::Zip => "zip",
            ContainerFormat::Tar => "tar",
            ContainerFormat::TarGz => "tar.gz",
            ContainerFormat::TarBz2 => "tar.bz2",
            ContainerFormat::SevenZip => "7z",
            ContainerFormat::Rar => "rar",
            ContainerFormat::Iso => "iso",
        };
        write!(f, "{name}")
    }
}
