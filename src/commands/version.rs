//! Version command implementation

use crate::archive::ArchiveExtractor;
use crate::error::Result;

/// Print the version and the container formats this build can extract
pub fn run() -> Result<()> {
    let formats: Vec<String> = ArchiveExtractor::new()
        .supported_formats()
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("ucl {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Container formats: {}", formats.join(", "));
    Ok(())
}
