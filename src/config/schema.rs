//! Configuration schema for packager-fetch
//!
//! Configuration is read from `packager-fetch.toml` in the project root, or
//! from the file named by `--config` / `PACKAGER_FETCH_CONFIG`.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Input and output file locations
    pub paths: PathsConfig,

    /// Local packager project settings
    pub local: LocalConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// File locations, relative to the project root
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where the standalone bundle must end up
    pub destination: PathBuf,

    /// Pinned release metadata (`{ "src", "sha256" }`)
    pub metadata: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("src-renderer/packager/standalone.html"),
            metadata: PathBuf::from("scripts/packager.json"),
        }
    }
}

/// Local packager project configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Try the local packager before downloading
    pub enabled: bool,

    /// Packager project directory (overridden by MISTWARP_PACKAGER_DIR)
    pub dir: PathBuf,

    /// Project descriptor that marks the directory as a packager checkout
    pub descriptor: String,

    /// Dependency directory; install runs only when it is absent
    pub deps_dir: String,

    /// Build output, relative to the packager directory
    pub output: PathBuf,

    /// Package manager executable
    pub package_manager: String,

    /// Arguments for the dependency install step
    pub install_args: Vec<String>,

    /// Arguments for the build step
    pub build_args: Vec<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("../packager"),
            descriptor: "package.json".to_string(),
            deps_dir: "node_modules".to_string(),
            output: PathBuf::from("dist/standalone.html"),
            package_manager: "npm".to_string(),
            install_args: vec!["ci".to_string()],
            build_args: vec!["run".to_string(), "build-standalone-prod".to_string()],
        }
    }
}
