//! Byte sources for the released packager bundle

use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use tracing::debug;

/// User agent sent with release downloads
const USER_AGENT: &str = concat!("packager-fetch/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the bundle size accepted from the network
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Something that can hand back the bytes behind a URL
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the full body at `url`
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>>;
}

/// Plain HTTP(S) source backed by `ureq`
///
/// Single attempt, no timeout beyond the client defaults. Non-2xx
/// statuses are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpSource;

impl HttpSource {
    pub fn new() -> Self {
        Self
    }
}

fn get_blocking(url: &str) -> Result<Vec<u8>, ureq::Error> {
    let mut response = ureq::get(url).header("User-Agent", USER_AGENT).call()?;
    debug!("GET {} -> {}", url, response.status());
    response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_vec()
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        let owned = url.to_string();
        tokio::task::spawn_blocking(move || get_blocking(&owned))
            .await
            .map_err(|e| FetchError::Internal(format!("download task failed: {}", e)))?
            .map_err(|e| FetchError::download(url, e))
    }
}
