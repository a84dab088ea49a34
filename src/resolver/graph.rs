//! Reference graph of one bundle
//!
//! Nodes are the discovered stylesheet files, edges come from the directives
//! inside each file. A reference to a file outside the discovered set is
//! ignored.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::referenced_files;
use crate::domain::profile::ROOT_STYLESHEET;
use crate::path_utils::comparable_path;

/// In-memory reference graph built once per install
#[derive(Debug, Default)]
pub struct StylesheetGraph {
    /// Files in discovery order
    files: Vec<PathBuf>,
    /// Outgoing edges by comparable path, restricted to discovered files
    edges: HashMap<PathBuf, Vec<PathBuf>>,
}

impl StylesheetGraph {
    /// Build the graph for `files`
    ///
    /// Unreadable files contribute no edges.
    pub fn build(files: &[PathBuf]) -> Self {
        let keys: Vec<PathBuf> = files.iter().map(|f| comparable_path(f)).collect();
        let known: HashSet<&PathBuf> = keys.iter().collect();

        let mut edges = HashMap::new();
        for (file, key) in files.iter().zip(&keys) {
            let Some(targets) = referenced_files(file) else {
                warn!("Could not read {}; treating it as a leaf", file.display());
                continue;
            };
            let inside: Vec<PathBuf> = targets
                .into_iter()
                .filter(|target| known.contains(target) && target != key)
                .collect();
            if !inside.is_empty() {
                debug!("{} references {} file(s)", file.display(), inside.len());
                edges.insert(key.clone(), inside);
            }
        }

        Self {
            files: files.to_vec(),
            edges,
        }
    }

    /// Files referenced by `file` within the graph
    #[allow(dead_code)] // used in tests
    pub fn references(&self, file: &Path) -> &[PathBuf] {
        self.edges
            .get(&comparable_path(file))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether another file of the graph references `file`
    pub fn is_referenced(&self, file: &Path) -> bool {
        let key = comparable_path(file);
        self.edges.values().any(|targets| targets.contains(&key))
    }

    /// Entry points of the bundle
    ///
    /// A file named like the root stylesheet (case-insensitive) is the sole
    /// entry point; with several, the shallowest wins, then lexical order.
    /// Otherwise every file that no other file references is an entry point.
    pub fn find_entry_points(&self) -> Vec<PathBuf> {
        if let Some(root) = self.root_stylesheet_candidate() {
            return vec![root];
        }

        self.files
            .iter()
            .filter(|file| !self.is_referenced(file))
            .cloned()
            .collect()
    }

    fn root_stylesheet_candidate(&self) -> Option<PathBuf> {
        self.files
            .iter()
            .filter(|file| {
                file.file_name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(ROOT_STYLESHEET))
            })
            .min_by(|a, b| {
                a.components()
                    .count()
                    .cmp(&b.components().count())
                    .then_with(|| a.cmp(b))
            })
            .cloned()
    }
}

/// Entry points among `files`
pub fn find_entry_points(files: &[PathBuf]) -> Vec<PathBuf> {
    StylesheetGraph::build(files).find_entry_points()
}
