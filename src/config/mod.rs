//! Configuration management for packager-fetch
//!
//! Defaults are layered under an optional TOML file, then the
//! `MISTWARP_PACKAGER_DIR` override and CLI flags. The result is a
//! [`Settings`] value handed to the orchestrator once at startup.

pub mod schema;

pub use schema::Config;

use crate::error::{FetchError, FetchResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Config file looked up in the project root when none is given
pub const DEFAULT_CONFIG_FILE: &str = "packager-fetch.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    required: bool,
}

impl ConfigManager {
    /// Look for the default config file in the project root; absence is fine
    pub fn discover(root: &Path) -> Self {
        Self {
            config_path: root.join(DEFAULT_CONFIG_FILE),
            required: false,
        }
    }

    /// Use an explicitly named config file, which must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            required: true,
        }
    }

    /// Load configuration, falling back to defaults for a discovered file that is absent
    pub async fn load(&self) -> FetchResult<Config> {
        if !self.config_path.exists() {
            if self.required {
                return Err(FetchError::ConfigInvalid {
                    path: self.config_path.clone(),
                    reason: "file not found".to_string(),
                });
            }
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path).await.map_err(|e| {
            FetchError::io(
                format!("reading config from {}", self.config_path.display()),
                e,
            )
        })?;

        toml::from_str(&content).map_err(|e| FetchError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Whether the config file is present on disk
    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Packager directory (`--packager-dir` / `MISTWARP_PACKAGER_DIR`)
    pub packager_dir: Option<PathBuf>,
    /// Destination file (`--dest`)
    pub destination: Option<PathBuf>,
    /// Metadata file (`--metadata`)
    pub metadata: Option<PathBuf>,
    /// Skip the local packager entirely (`--no-local`)
    pub no_local: bool,
}

/// Fully resolved, absolute settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub destination: PathBuf,
    pub metadata: PathBuf,
    /// `None` when the local packager is disabled
    pub local: Option<LocalSettings>,
}

/// Resolved local packager project settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    pub dir: PathBuf,
    pub descriptor: String,
    pub deps_dir: String,
    pub output: PathBuf,
    pub package_manager: String,
    pub install_args: Vec<String>,
    pub build_args: Vec<String>,
}

impl LocalSettings {
    /// Path of the descriptor file inside the packager directory
    pub fn descriptor_path(&self) -> PathBuf {
        self.dir.join(&self.descriptor)
    }

    /// Path of the dependency directory inside the packager directory
    pub fn deps_path(&self) -> PathBuf {
        self.dir.join(&self.deps_dir)
    }

    /// Path of the build output inside the packager directory
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output)
    }
}

impl Settings {
    /// Merge config and overrides
    ///
    /// Config paths are relative to `root`; override paths are relative to
    /// `cwd`, the way a shell user would type them.
    pub fn resolve(root: &Path, cwd: &Path, config: Config, overrides: &Overrides) -> Self {
        let destination = overrides
            .destination
            .as_ref()
            .map(|p| cwd.join(p))
            .unwrap_or_else(|| root.join(&config.paths.destination));

        let metadata = overrides
            .metadata
            .as_ref()
            .map(|p| cwd.join(p))
            .unwrap_or_else(|| root.join(&config.paths.metadata));

        let local = if overrides.no_local || !config.local.enabled {
            debug!("Local packager disabled");
            None
        } else {
            let dir = overrides
                .packager_dir
                .as_ref()
                .map(|p| cwd.join(p))
                .unwrap_or_else(|| root.join(&config.local.dir));
            Some(LocalSettings {
                dir,
                descriptor: config.local.descriptor,
                deps_dir: config.local.deps_dir,
                output: config.local.output,
                package_manager: config.local.package_manager,
                install_args: config.local.install_args,
                build_args: config.local.build_args,
            })
        };

        Self {
            destination,
            metadata,
            local,
        }
    }
}
