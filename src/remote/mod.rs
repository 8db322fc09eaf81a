//! Released packager download with integrity check
//!
//! The downloaded bytes must hash to the pinned SHA-256 before anything is
//! written. A mismatch is fatal and leaves the destination untouched.

pub mod http;

pub use http::{AssetSource, HttpSource};

use crate::digest::sha256_hex;
use crate::error::{FetchError, FetchResult};
use crate::metadata::PackagerAsset;
use crate::ui::{DownloadSpinner, UiContext};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};

/// Suffix of the temporary file written before the final rename
pub const PART_SUFFIX: &str = ".part";

/// Downloads, verifies and stores the released bundle
pub struct RemoteFetcher {
    source: Box<dyn AssetSource>,
    ui: UiContext,
}

impl RemoteFetcher {
    pub fn new(source: Box<dyn AssetSource>, ui: UiContext) -> Self {
        Self { source, ui }
    }

    /// Fetcher using plain HTTP
    pub fn http(ui: UiContext) -> Self {
        Self::new(Box::new(HttpSource::new()), ui)
    }

    /// Download `asset.source_url`, verify it and write it to `asset.local_path`
    ///
    /// Returns the number of bytes written.
    pub async fn fetch(&self, asset: &PackagerAsset) -> FetchResult<usize> {
        info!("Downloading {}", asset.source_url);
        let started = Instant::now();

        let spinner = DownloadSpinner::start(&self.ui, &asset.source_url);
        let result = self.source.fetch(&asset.source_url).await;
        spinner.finish();
        let bytes = result?;

        info!(
            "Download packager: {:.2?} ({} bytes)",
            started.elapsed(),
            bytes.len()
        );

        verify(&bytes, &asset.expected_sha256)?;
        write_atomic(&asset.local_path, &bytes).await?;
        Ok(bytes.len())
    }
}

/// Compare the digest of `bytes` against `expected` as hex strings
pub fn verify(bytes: &[u8], expected: &str) -> FetchResult<()> {
    let actual = sha256_hex(bytes);
    if actual != expected {
        return Err(FetchError::HashMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    debug!("Hash verified: {}", actual);
    Ok(())
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Write to `<destination>.part`, then rename over the destination
async fn write_atomic(destination: &Path, bytes: &[u8]) -> FetchResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            FetchError::io(format!("creating directory {}", parent.display()), e)
        })?;
    }

    let temp = part_path(destination);
    if let Err(e) = fs::write(&temp, bytes).await {
        let _ = fs::remove_file(&temp).await;
        return Err(FetchError::io(format!("writing {}", temp.display()), e));
    }

    if let Err(e) = fs::rename(&temp, destination).await {
        let _ = fs::remove_file(&temp).await;
        return Err(FetchError::io(
            format!("moving download into place at {}", destination.display()),
            e,
        ));
    }
    Ok(())
}
