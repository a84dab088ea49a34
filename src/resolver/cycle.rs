//! Reference cycle detection on disk
//!
//! The walk follows directives from file to file anywhere on disk, not only
//! inside one bundle. It runs on an explicit stack so deep reference chains
//! cannot exhaust the call stack. Missing or unreadable files are leaves.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::referenced_files;
use crate::path_utils::comparable_path;

/// One file on the current reference path with its pending references
struct Frame {
    path: PathBuf,
    pending: Vec<PathBuf>,
}

impl Frame {
    fn open(path: PathBuf) -> Self {
        let mut pending = referenced_files(&path).unwrap_or_default();
        // Popped from the back, so reverse to visit in text order
        pending.reverse();
        Self { path, pending }
    }
}

/// Whether following references from `start` ever comes back to a file
/// already on the current path
#[allow(dead_code)] // used in tests
pub fn detect_cycle(start: &Path) -> bool {
    detect_cycle_from(start, &[])
}

/// Like [`detect_cycle`], with `seed` files treated as already on the path
///
/// Seeding with the root stylesheet catches a bundle that references the
/// root stylesheet before its directive is added there.
#[allow(dead_code)] // used in tests
pub fn detect_cycle_from(start: &Path, seed: &[PathBuf]) -> bool {
    find_cycle_from(start, seed).is_some()
}

/// The files forming the first cycle reachable from `start`, as comparable
/// paths in reference order
///
/// A cycle closed by a `seed` file contains the whole path from `start`
/// followed by that seed file.
#[allow(dead_code)] // used in tests
pub fn find_cycle_from(start: &Path, seed: &[PathBuf]) -> Option<Vec<PathBuf>> {
    find_cycle_where(start, seed, |_| true)
}

/// Like [`find_cycle_from`], but only cycles for which `relevant` holds are
/// reported; other cycles are stepped over and the walk goes on
pub fn find_cycle_where(
    start: &Path,
    seed: &[PathBuf],
    relevant: impl Fn(&[PathBuf]) -> bool,
) -> Option<Vec<PathBuf>> {
    let seed: HashSet<PathBuf> = seed.iter().map(|p| comparable_path(p)).collect();
    let start = comparable_path(start);
    if seed.contains(&start) {
        return Some(vec![start]);
    }

    // Files on the current path (gray) and files fully explored (black)
    let mut on_path: HashSet<PathBuf> = HashSet::new();
    let mut done: HashSet<PathBuf> = HashSet::new();

    on_path.insert(start.clone());
    let mut stack = vec![Frame::open(start)];

    while let Some(frame) = stack.last_mut() {
        let Some(next) = frame.pending.pop() else {
            let finished = frame.path.clone();
            stack.pop();
            on_path.remove(&finished);
            done.insert(finished);
            continue;
        };

        if on_path.contains(&next) {
            let first = stack.iter().position(|f| f.path == next).unwrap_or(0);
            let cycle: Vec<PathBuf> = stack[first..].iter().map(|f| f.path.clone()).collect();
            if relevant(&cycle) {
                debug!("Reference cycle through {}", next.display());
                return Some(cycle);
            }
            continue;
        }
        if seed.contains(&next) {
            let mut cycle: Vec<PathBuf> = stack.iter().map(|f| f.path.clone()).collect();
            cycle.push(next);
            if relevant(&cycle) {
                debug!("Reference cycle back to a seed file");
                return Some(cycle);
            }
            continue;
        }
        if done.contains(&next) {
            continue;
        }

        on_path.insert(next.clone());
        stack.push(Frame::open(next));
    }

    None
}
