//! Reference resolution between the stylesheets of a bundle
//!
//! - [`graph`]: who references whom inside one extracted bundle, and which
//!   files are entry points
//! - [`cycle`]: cycle detection over references on disk

pub mod cycle;
pub mod graph;

pub use cycle::find_cycle_where;
pub use graph::find_entry_points;

use std::path::{Path, PathBuf};

use crate::directive::{list_directives, normalize_path};
use crate::path_utils::comparable_path;
use crate::stylesheet::read_text_lossy;

/// Files referenced by the directives of `file`, resolved against its directory
///
/// `None` when the file cannot be read.
pub(crate) fn referenced_files(file: &Path) -> Option<Vec<PathBuf>> {
    let text = read_text_lossy(file)?;
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    Some(
        list_directives(&text)
            .iter()
            .map(|directive| comparable_path(&base.join(normalize_path(&directive.raw_path))))
            .collect(),
    )
}
