//! Common test utilities for ucl integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway profile plus data directory for one test
pub struct TestWorkspace {
    pub temp: TempDir,
    /// Browser profile root
    pub profile: PathBuf,
    /// Directory holding the registry
    pub data: PathBuf,
    /// Directory for user-provided input files
    pub input: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let profile = temp.path().join("profile");
        let data = temp.path().join("data");
        let input = temp.path().join("input");
        for dir in [&profile, &data, &input] {
            std::fs::create_dir_all(dir).expect("Failed to create directory");
        }
        Self {
            temp,
            profile,
            data,
            input,
        }
    }

    /// `ucl` with this workspace's profile and data directory, isolated from
    /// the caller's environment
    pub fn cmd(&self) -> Command {
        let mut cmd = ucl_cmd();
        cmd.env("UCL_PROFILE", &self.profile)
            .env("UCL_DATA_DIR", &self.data)
            .env_remove("UCL_REGISTRY")
            .env_remove("UCL_LOG");
        cmd
    }

    /// Write an input file below `input/`
    pub fn write_input(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.input.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write a zip archive below `input/`
    pub fn write_zip(&self, rel: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.input.join(rel);
        write_zip(&path, entries);
        path
    }

    pub fn chrome(&self) -> PathBuf {
        self.profile.join("chrome")
    }

    pub fn chrome_exists(&self, rel: &str) -> bool {
        self.chrome().join(rel).exists()
    }

    pub fn root_stylesheet(&self) -> String {
        std::fs::read_to_string(self.chrome().join("userChrome.css")).unwrap_or_default()
    }

    pub fn write_root_stylesheet(&self, content: &str) {
        std::fs::create_dir_all(self.chrome()).expect("Failed to create chrome directory");
        std::fs::write(self.chrome().join("userChrome.css"), content)
            .expect("Failed to write userChrome.css");
    }

    pub fn registry(&self) -> serde_json::Value {
        let path = self.data.join("mods.json");
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).expect("Registry is not JSON"),
            Err(_) => serde_json::Value::Array(Vec::new()),
        }
    }

    pub fn registry_names(&self) -> Vec<String> {
        self.registry()
            .as_array()
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| r["name"].as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(deprecated)]
pub fn ucl_cmd() -> Command {
    Command::cargo_bin("ucl").expect("ucl binary")
}

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    let file = std::fs::File::create(path).expect("Failed to create archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).expect("Failed to start entry");
        zip.write_all(content.as_bytes())
            .expect("Failed to write entry");
    }
    zip.finish().expect("Failed to finish archive");
}
