//! Transaction support for install and uninstall
//!
//! Snapshots the files an operation is about to rewrite (root stylesheet,
//! registry) and tracks the directories it creates. Unless committed, the
//! snapshots are written back and created directories are removed when the
//! transaction is dropped.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//! transaction.snapshot(&profile.root_stylesheet_path())?;
//! transaction.snapshot(registry.path())?;
//!
//! // Perform operations...
//! transaction.track_dir_created(namespace_dir);
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, fs_error};


/// Content of a file before the transaction touched it
#[derive(Debug, Clone)]
struct FileSnapshot {
    path: PathBuf,
    /// `None` if the file did not exist
    content: Option<Vec<u8>>,
}

/// A transaction over profile and registry files
#[derive(Debug, Default)]
pub struct Transaction {
    /// Files to restore on rollback
    snapshots: Vec<FileSnapshot>,

    /// Directories created during this transaction
    created_dirs: HashSet<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current content (or absence) of `path`
    ///
    /// Only the first snapshot of a path counts.
    pub fn snapshot(&mut self, path: &Path) -> Result<()> {
        if self.snapshots.iter().any(|s| s.path == path) {
            return Ok(());
        }
        let content = if path.exists() {
            Some(fs::read(path).map_err(|e| fs_error(path, &e))?)
        } else {
            None
        };
        self.snapshots.push(FileSnapshot {
            path: path.to_path_buf(),
            content,
        });
        Ok(())
    }

    /// Track a directory that was created during this transaction
    ///
    /// On rollback it is removed with everything inside.
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.insert(path.into());
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo everything tracked so far
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        let mut dirs: Vec<_> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|b| std::cmp::Reverse(b.components().count()));
        for path in dirs {
            if path.is_dir() {
                debug!("Rollback: removing {}", path.display());
                if let Err(e) = fs::remove_dir_all(path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }

        for snapshot in &self.snapshots {
            let restored = match &snapshot.content {
                Some(content) => fs::write(&snapshot.path, content),
                None if snapshot.path.exists() => fs::remove_file(&snapshot.path),
                None => Ok(()),
            };
            if let Err(e) = restored {
                warn!("Failed to restore {}: {}", snapshot.path.display(), e);
            }
        }

        self.committed = true;
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            debug!("Transaction not committed, rolling back");
            self.rollback();
        }
    }
}
