//! Asset blob production for the CLI editor.

use async_trait::async_trait;
use bytes::Bytes;

use modelbeam_pairing::{Asset, AssetSource, PairingError};

/// Placeholder poster body. A headless CLI has no viewer widget to
/// screenshot, so it pushes the same fallback the web editor uses when no
/// canvas is available.
const PLACEHOLDER_POSTER: &[u8] = b"placeholder";

/// Fetches the model blob from its source URL; posters are a fixed
/// placeholder.
pub struct UrlAssetSource {
    http: reqwest::Client,
}

impl UrlAssetSource {
    pub fn new() -> Result<Self, PairingError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| PairingError::AssetFetch(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AssetSource for UrlAssetSource {
    async fn poster(&self, _asset: &Asset) -> Result<Bytes, PairingError> {
        Ok(Bytes::from_static(PLACEHOLDER_POSTER))
    }

    async fn model(&self, asset: &Asset) -> Result<Bytes, PairingError> {
        let response = self
            .http
            .get(&asset.gltf_url)
            .send()
            .await
            .map_err(|e| PairingError::AssetFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PairingError::AssetFetch(format!(
                "{} returned status {}",
                asset.gltf_url,
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| PairingError::AssetFetch(e.to_string()))
    }
}
