//! Operations module for importing and updating bundles
//!
//! This module provides high-level operations that coordinate:
//! - ImportOperation: local paths and URLs into a profile
//! - UpdateOperation: update checks and re-imports
//!
//! The operations coordinate with:
//! - Source: classification and remote locations (from source module)
//! - Fetch: byte downloads (from fetch module)
//! - Archive: extraction (from archive module)
//! - Installer: file installation and directives (from installer module)

pub mod import;
pub mod update;

pub use import::ImportOperation;
pub use update::{UpdateOperation, UpdateStatus};

use crate::error::Result;

/// Success flag plus user-facing message of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

impl OperationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Wrap `result`, describing a success with `describe`
    pub fn from_result<T>(result: Result<T>, describe: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => Self::ok(describe(&value)),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}
