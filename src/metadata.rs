//! Pinned release metadata for the packager bundle
//!
//! The metadata file is JSON of the form
//! `{ "src": "<url>", "sha256": "<hex digest>" }`.

use crate::error::{FetchError, FetchResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Release location and pinned digest, as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackagerMetadata {
    /// URL of the released standalone bundle
    pub src: String,
    /// Expected SHA-256 of the bundle, compared verbatim against the lowercase hex digest
    pub sha256: String,
}

impl PackagerMetadata {
    /// Read the metadata file
    ///
    /// Only the JSON shape is checked here. The digest is compared verbatim
    /// later, so a malformed one surfaces as a cache miss and a hash mismatch.
    pub async fn load(path: &Path) -> FetchResult<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            FetchError::io(format!("reading packager metadata from {}", path.display()), e)
        })?;

        let metadata: Self =
            serde_json::from_str(&content).map_err(|e| FetchError::MetadataInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Loaded packager metadata: {} ({})", metadata.src, metadata.sha256);
        Ok(metadata)
    }

    /// Bind the metadata to the path the bundle should land at
    pub fn into_asset(self, local_path: PathBuf) -> PackagerAsset {
        PackagerAsset {
            source_url: self.src,
            expected_sha256: self.sha256,
            local_path,
        }
    }
}

/// The single artifact this tool is responsible for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerAsset {
    pub source_url: String,
    pub expected_sha256: String,
    pub local_path: PathBuf,
}
