//! Runtime settings
//!
//! Resolves the profile and registry locations from command line flags and
//! environment variables. Clap already folds `UCL_PROFILE` and `UCL_REGISTRY`
//! into the flags, so only the data directory fallback is read here.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Profile;
use crate::error::{LoaderError, Result, io_error};
use crate::registry::{ModRegistry, REGISTRY_FILE};

/// Environment variable naming the profile directory
pub const PROFILE_ENV: &str = "UCL_PROFILE";

/// Environment variable naming the registry file
pub const REGISTRY_ENV: &str = "UCL_REGISTRY";

/// Environment variable naming the data directory holding the registry
pub const DATA_DIR_ENV: &str = "UCL_DATA_DIR";

/// Application directory under the platform data directory
const APP_DIR: &str = "userchrome-loader";

/// Resolved locations for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: Option<PathBuf>,
    pub registry_path: PathBuf,
}

impl Settings {
    /// Resolve settings from the parsed flags
    pub fn resolve(profile: Option<PathBuf>, registry: Option<PathBuf>) -> Result<Self> {
        let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let registry_path = match registry {
            Some(path) => path,
            None => default_registry_path(data_dir.as_deref())?,
        };
        debug!("Registry file: {}", registry_path.display());

        Ok(Self {
            profile,
            registry_path,
        })
    }

    /// The profile to operate on; it must exist
    pub fn profile(&self) -> Result<Profile> {
        let Some(ref path) = self.profile else {
            return Err(LoaderError::ProfileNotFound {
                path: format!("(not set; use --profile or {PROFILE_ENV})"),
            });
        };
        if !path.is_dir() {
            return Err(LoaderError::ProfileNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Profile::from_path(path))
    }

    pub fn registry(&self) -> ModRegistry {
        ModRegistry::open(&self.registry_path)
    }
}

/// `<data dir>/mods.json`, where the data directory is `data_dir` or the
/// platform data directory's `userchrome-loader` folder
pub fn default_registry_path(data_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir.join(REGISTRY_FILE));
    }
    let base = dirs::data_dir().ok_or_else(|| {
        io_error(format!(
            "Could not determine the user data directory; set {DATA_DIR_ENV} or {REGISTRY_ENV}"
        ))
    })?;
    Ok(base.join(APP_DIR).join(REGISTRY_FILE))
}
