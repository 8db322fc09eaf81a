//! Top-level fallback chain
//!
//! `TryLocal -> CheckCache -> Download`, each step either finishing the run
//! or handing over to the next one. Single pass, no retries.

use crate::config::Settings;
use crate::digest::file_matches;
use crate::error::FetchResult;
use crate::local::{LocalOutcome, LocalPackager};
use crate::metadata::{PackagerAsset, PackagerMetadata};
use crate::remote::RemoteFetcher;
use crate::ui::UiContext;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// How a successful run obtained the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Copied from the local packager build output (not hash-verified)
    LocalBuild { source: PathBuf },
    /// Destination already matched the pinned hash
    AlreadyCurrent,
    /// Downloaded and verified
    Downloaded { bytes: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    TryLocal,
    CheckCache,
    Download,
}

/// Drives one acquisition run
pub struct Orchestrator {
    asset: PackagerAsset,
    local: Option<LocalPackager>,
    remote: RemoteFetcher,
}

impl Orchestrator {
    pub fn new(asset: PackagerAsset, local: Option<LocalPackager>, remote: RemoteFetcher) -> Self {
        Self {
            asset,
            local,
            remote,
        }
    }

    /// Read the metadata and wire up the production local builder and HTTP fetcher
    pub async fn from_settings(settings: Settings, ui: UiContext) -> FetchResult<Self> {
        let metadata = PackagerMetadata::load(&settings.metadata).await?;
        let asset = metadata.into_asset(settings.destination);
        let local = settings.local.map(LocalPackager::with_command);
        Ok(Self::new(asset, local, RemoteFetcher::http(ui)))
    }

    /// Run the fallback chain to completion
    pub async fn run(&self) -> FetchResult<Outcome> {
        let mut state = State::TryLocal;
        loop {
            debug!("State: {:?}", state);
            state = match state {
                State::TryLocal => match self.try_local().await {
                    LocalOutcome::Used { source } => return Ok(Outcome::LocalBuild { source }),
                    LocalOutcome::Unusable => State::CheckCache,
                },
                State::CheckCache => {
                    if file_matches(&self.asset.local_path, &self.asset.expected_sha256).await {
                        info!("Packager already updated");
                        return Ok(Outcome::AlreadyCurrent);
                    }
                    State::Download
                }
                State::Download => {
                    return match self.remote.fetch(&self.asset).await {
                        Ok(bytes) => Ok(Outcome::Downloaded { bytes }),
                        Err(e) => {
                            if e.is_integrity() {
                                error!("Refusing to install packager: integrity check failed");
                            } else {
                                error!("Packager download failed");
                            }
                            Err(e)
                        }
                    };
                }
            };
        }
    }

    async fn try_local(&self) -> LocalOutcome {
        match &self.local {
            Some(local) => local.try_use(&self.asset.local_path).await,
            None => LocalOutcome::Unusable,
        }
    }
}
