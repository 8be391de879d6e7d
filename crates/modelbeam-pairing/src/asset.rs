//! The "current asset" value and its blob producers.
//!
//! The protocol core never reads ambient editor state: whatever is
//! currently displayed is handed in explicitly per dispatch, and the
//! actual blob production (poster rendering, model fetching) is delegated
//! to the embedding application through [`AssetSource`].

use async_trait::async_trait;
use bytes::Bytes;

use crate::PairingError;

/// The asset the editor currently displays.
#[derive(Debug, Clone)]
pub struct Asset {
    pub title: Option<String>,
    /// Source URL of the glTF/GLB model.
    pub gltf_url: String,
    /// Optional environment map URL.
    pub env_url: Option<String>,
    /// Whether the environment map is HDR-encoded.
    pub env_is_hdr: bool,
    /// AR mode priority: Scene Viewer before WebXR.
    pub scene_viewer_first: bool,
}

impl Asset {
    pub fn new(gltf_url: impl Into<String>) -> Self {
        Self {
            title: None,
            gltf_url: gltf_url.into(),
            env_url: None,
            env_is_hdr: false,
            scene_viewer_first: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Produces the binary payloads for a dispatch.
///
/// Implementations live outside the core: the app fetches models over
/// HTTP and renders posters from whatever viewer widget it embeds.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// A poster image of the asset as currently displayed.
    async fn poster(&self, asset: &Asset) -> Result<Bytes, PairingError>;

    /// The model blob itself.
    async fn model(&self, asset: &Asset) -> Result<Bytes, PairingError>;
}
