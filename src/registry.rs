//! Installed-bundle registry
//!
//! A JSON array of [`BundleMetadata`] records keyed by bundle name. Every
//! mutating call reads the whole file, changes it in memory and writes it back
//! through a temp file + rename. There is no file locking; one running
//! instance per registry is assumed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::BundleMetadata;
use crate::error::{Result, fs_error, registry_error};

/// Registry file name inside the data directory
pub const REGISTRY_FILE: &str = "mods.json";

/// Durable mapping from bundle name to installed metadata
#[derive(Debug, Clone)]
pub struct ModRegistry {
    path: PathBuf,
}

impl ModRegistry {
    /// Registry backed by `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in stored order; a missing file is an empty registry
    pub fn list(&self) -> Result<Vec<BundleMetadata>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| fs_error(&self.path, &e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| registry_error(self.path.display().to_string(), e.to_string()))
    }

    /// Record for `name` (exact, case-sensitive)
    pub fn get(&self, name: &str) -> Result<Option<BundleMetadata>> {
        Ok(self.list()?.into_iter().find(|meta| meta.name == name))
    }

    /// Insert `metadata`, replacing a record with the same name in place
    pub fn upsert(&self, metadata: BundleMetadata) -> Result<()> {
        let mut records = self.list()?;
        match records.iter_mut().find(|meta| meta.name == metadata.name) {
            Some(existing) => *existing = metadata,
            None => records.push(metadata),
        }
        self.save(&records)
    }

    /// Remove the record for `name`; `false` if there was none
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|meta| meta.name != name);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn save(&self, records: &[BundleMetadata]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| fs_error(parent, &e))?;
            }
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| registry_error(self.path.display().to_string(), e.to_string()))?;

        // Readers never observe a half-written registry
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content).map_err(|e| fs_error(&tmp_path, &e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| fs_error(&self.path, &e))?;
        debug!("Saved {} registry record(s)", records.len());
        Ok(())
    }
}
