//! Local packager builder
//!
//! Uses a sibling packager checkout when one exists: installs its
//! dependencies and builds it if the standalone output is missing, then
//! copies the output to the destination. Every failure here is reported as
//! [`LocalOutcome::Unusable`] so the caller can fall back to downloading.

pub mod runner;

pub use runner::{CommandPackageManager, PackageManager};

use crate::config::LocalSettings;
use crate::error::{FetchError, FetchResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Result of trying the local packager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalOutcome {
    /// The local build output was copied to the destination
    Used { source: PathBuf },
    /// No usable local packager; fall back to the released bundle
    Unusable,
}

/// Builds and copies the standalone bundle from a local packager checkout
pub struct LocalPackager {
    settings: LocalSettings,
    package_manager: Box<dyn PackageManager>,
}

impl LocalPackager {
    pub fn new(settings: LocalSettings, package_manager: Box<dyn PackageManager>) -> Self {
        Self {
            settings,
            package_manager,
        }
    }

    /// Create a packager that shells out to the configured package manager
    pub fn with_command(settings: LocalSettings) -> Self {
        let pm = CommandPackageManager::new(
            settings.package_manager.clone(),
            settings.install_args.clone(),
            settings.build_args.clone(),
        );
        Self::new(settings, Box::new(pm))
    }

    /// Try to produce the bundle locally and copy it to `destination`
    ///
    /// Never fails: errors are logged as warnings and reported as `Unusable`.
    pub async fn try_use(&self, destination: &Path) -> LocalOutcome {
        match self.build_and_copy(destination).await {
            Ok(Some(source)) => {
                info!("Using local packager from {}", source.display());
                LocalOutcome::Used { source }
            }
            Ok(None) => LocalOutcome::Unusable,
            Err(e) => {
                warn!("Failed to use local packager; falling back to downloading released packager.");
                warn!("{}", e);
                LocalOutcome::Unusable
            }
        }
    }

    /// `Ok(None)` means there is no packager checkout at all
    async fn build_and_copy(&self, destination: &Path) -> FetchResult<Option<PathBuf>> {
        let dir = &self.settings.dir;
        if !dir.exists() {
            debug!("No local packager at {}", dir.display());
            return Ok(None);
        }
        if !self.settings.descriptor_path().exists() {
            debug!(
                "{} has no {}, not a packager checkout",
                dir.display(),
                self.settings.descriptor
            );
            return Ok(None);
        }

        let output = self.settings.output_path();
        if !output.exists() {
            if !self.settings.deps_path().exists() {
                info!("Installing packager dependencies in {}", dir.display());
                self.package_manager.install(dir).await?;
            }

            info!("Building standalone packager");
            self.package_manager.build(dir).await?;
        }

        if !output.exists() {
            return Err(FetchError::MissingOutput(output));
        }

        copy_into_place(&output, destination).await?;
        Ok(Some(output))
    }
}

async fn copy_into_place(source: &Path, destination: &Path) -> FetchResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            FetchError::io(format!("creating directory {}", parent.display()), e)
        })?;
    }
    fs::copy(source, destination).await.map_err(|e| {
        FetchError::io(
            format!(
                "copying {} to {}",
                source.display(),
                destination.display()
            ),
            e,
        )
    })?;
    Ok(())
}
