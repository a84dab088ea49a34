//! Bundle domain types
//!
//! [`BundleMetadata`] is the record kept in the registry for every installed
//! bundle: where it came from, which version was installed and which files
//! ended up in the profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provenance key holding the source type (`github`, `gitlab`, `direct`, `local`)
pub const PROVENANCE_TYPE: &str = "type";

/// Metadata recorded for an installed bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    /// Bundle name, the registry key
    pub name: String,

    /// URL the bundle was imported from
    #[serde(default)]
    pub source_url: Option<String>,

    /// Human-readable version (short commit id or branch)
    #[serde(default)]
    pub version_label: Option<String>,

    /// Full commit id of the installed revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,

    /// Installation timestamp
    #[serde(default = "Utc::now")]
    pub installed_at: DateTime<Utc>,

    /// Installed files relative to the stylesheet directory, forward slashes, unique
    #[serde(default)]
    pub files: Vec<String>,

    /// Open key-value provenance map; unknown keys round-trip unchanged
    #[serde(default, rename = "metadata")]
    pub provenance: Map<String, Value>,
}

impl BundleMetadata {
    /// Create metadata for a bundle that is about to be installed
    pub fn new(name: impl Into<String>, source_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            source_url,
            version_label: None,
            commit_id: None,
            installed_at: Utc::now(),
            files: Vec::new(),
            provenance: Map::new(),
        }
    }

    /// Append a file unless it is already listed
    pub fn add_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        if !self.files.contains(&file) {
            self.files.push(file);
        }
    }

    /// Record the installed commit; the version label becomes its short form
    pub fn set_commit_id(&mut self, commit_id: &str) {
        self.commit_id = Some(commit_id.to_string());
        self.version_label = Some(commit_id.chars().take(8).collect());
    }

    /// Store a string provenance value
    pub fn set_provenance(&mut self, key: &str, value: impl Into<String>) {
        self.provenance
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// Read a string provenance value
    pub fn provenance_str(&self, key: &str) -> Option<&str> {
        self.provenance.get(key).and_then(Value::as_str)
    }

    /// Source type recorded at install time
    pub fn source_type(&self) -> Option<&str> {
        self.provenance_str(PROVENANCE_TYPE)
    }

    /// Display-friendly version
    pub fn display_version(&self) -> String {
        if let Some(ref commit) = self.commit_id {
            return commit.chars().take(8).collect();
        }
        self.version_label
            .clone()
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Whether any installed file lives under `namespace`
    ///
    /// Single-file installs are their own namespace.
    pub fn owns_namespace(&self, namespace: &str) -> bool {
        self.files
            .iter()
            .any(|file| crate::domain::directive::namespace_of(file) == namespace)
    }
}
