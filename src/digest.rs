//! SHA-256 helpers for integrity checks

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Hash bytes with SHA-256, returning the lowercase hex digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Check whether the file at `path` already hashes to `expected`
///
/// Any read failure (most commonly a missing file) counts as a miss.
pub async fn file_matches(path: &Path, expected: &str) -> bool {
    match fs::read(path).await {
        Ok(data) => {
            let actual = sha256_hex(&data);
            debug!("Existing {} hashes to {}", path.display(), actual);
            actual == expected
        }
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            false
        }
    }
}
