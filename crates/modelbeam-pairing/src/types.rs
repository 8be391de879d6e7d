//! Wire types and protocol configuration.
//!
//! The JSON shapes here are the viewer-facing wire format; field names are
//! `camelCase` on the wire and must not drift, or deployed viewer pages
//! stop understanding the editor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use modelbeam_common::{SessionId, UpdateId};
use modelbeam_relay::{DEFAULT_CONSUME_TIMEOUT, DEFAULT_DOMAIN};

use crate::asset::Asset;

/// AR mode list preferring Scene Viewer on Android.
pub const AR_MODES_SCENE_VIEWER_FIRST: &str = "scene-viewer webxr quick-look";
/// AR mode list preferring WebXR.
pub const AR_MODES_WEBXR_FIRST: &str = "webxr scene-viewer quick-look";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for one editor session's protocol instance.
#[derive(Debug, Clone)]
pub struct PairingConfig {
    /// Relay base URL, trailing slash included.
    pub domain: String,
    /// How long a single ping consume blocks before it is retried.
    pub consume_timeout: Duration,
    /// Flat delay between discovery attempts after a failure or timeout.
    pub retry_delay: Duration,
    /// How long re-dispatch stays suppressed after a successful dispatch,
    /// so rapid editor changes do not saturate the relay with large
    /// assets.
    pub cooldown: Duration,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            consume_timeout: DEFAULT_CONSUME_TIMEOUT,
            retry_delay: Duration::from_secs(1),
            cooldown: Duration::from_secs(20),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery wire format
// ---------------------------------------------------------------------------

/// What a viewer POSTs to the ping URL to announce itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingMessage {
    pub id: SessionId,
}

// ---------------------------------------------------------------------------
// Content packet wire format
// ---------------------------------------------------------------------------

/// One complete content update, published to each session's content URL.
///
/// Built once per dispatch cycle and reused for every registered session;
/// only the relay URLs differ per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPacket {
    pub updated_content: UpdatedContent,
    pub snippet: Snippet,
    pub urls: PacketUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedContent {
    pub gltf_changed: bool,
    pub gltf_id: UpdateId,
    pub state_changed: bool,
    pub poster_id: UpdateId,
    pub env_changed: bool,
    pub env_is_hdr: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub config: ModelConfig,
    pub ar_config: ArConfig,
    pub extra_attributes: serde_json::Value,
    pub hotspots: Vec<serde_json::Value>,
}

/// `<model-viewer>` display configuration carried in the snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub title: Option<String>,
    pub ar: bool,
    pub ar_modes: String,
    pub auto_rotate: bool,
    pub camera_controls: bool,
    pub shadow_intensity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArConfig {
    pub ar: bool,
    pub ar_modes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketUrls {
    pub gltf: String,
    pub env: Option<String>,
}

impl ContentPacket {
    /// Build the packet for one dispatch cycle. The same update id tags
    /// both the poster and the model so the viewer can match blobs to this
    /// packet.
    pub fn new(asset: &Asset, update: UpdateId) -> Self {
        let ar_modes = if asset.scene_viewer_first {
            AR_MODES_SCENE_VIEWER_FIRST
        } else {
            AR_MODES_WEBXR_FIRST
        };

        let config = ModelConfig {
            title: asset.title.clone(),
            ar: true,
            ar_modes: ar_modes.to_string(),
            auto_rotate: true,
            camera_controls: true,
            shadow_intensity: 1.0,
        };

        Self {
            updated_content: UpdatedContent {
                gltf_changed: true,
                gltf_id: update,
                state_changed: true,
                poster_id: update,
                // Environment blobs are never pushed; the fields stay on
                // the wire so viewers need no schema change if they ever
                // are.
                env_changed: false,
                env_is_hdr: asset.env_is_hdr,
            },
            snippet: Snippet {
                ar_config: ArConfig {
                    ar: config.ar,
                    ar_modes: config.ar_modes.clone(),
                },
                config,
                extra_attributes: serde_json::json!({}),
                hotspots: Vec::new(),
            },
            urls: PacketUrls {
                gltf: asset.gltf_url.clone(),
                env: asset.env_url.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset() -> Asset {
        Asset {
            title: Some("Astronaut".into()),
            gltf_url: "https://models.test/astronaut.glb".into(),
            env_url: None,
            env_is_hdr: false,
            scene_viewer_first: true,
        }
    }

    #[test]
    fn packet_uses_camel_case_wire_names() {
        let packet = ContentPacket::new(&asset(), UpdateId::from(7));
        let json = serde_json::to_value(&packet).unwrap();

        let updated = &json["updatedContent"];
        assert_eq!(updated["gltfChanged"], true);
        assert_eq!(updated["gltfId"], 7);
        assert_eq!(updated["stateChanged"], true);
        assert_eq!(updated["posterId"], 7);
        assert_eq!(updated["envChanged"], false);
        assert_eq!(updated["envIsHdr"], false);

        let snippet = &json["snippet"];
        assert_eq!(snippet["config"]["arModes"], AR_MODES_SCENE_VIEWER_FIRST);
        assert_eq!(snippet["config"]["shadowIntensity"], 1.0);
        assert_eq!(snippet["arConfig"]["ar"], true);
        assert_eq!(snippet["extraAttributes"], serde_json::json!({}));
        assert_eq!(snippet["hotspots"], serde_json::json!([]));

        assert_eq!(json["urls"]["gltf"], "https://models.test/astronaut.glb");
        assert_eq!(json["urls"]["env"], serde_json::Value::Null);
    }

    #[test]
    fn ar_mode_order_follows_toggle() {
        let mut a = asset();
        a.scene_viewer_first = false;
        let packet = ContentPacket::new(&a, UpdateId::from(1));
        assert_eq!(packet.snippet.config.ar_modes, AR_MODES_WEBXR_FIRST);
        assert_eq!(packet.snippet.ar_config.ar_modes, AR_MODES_WEBXR_FIRST);
    }

    #[test]
    fn packet_round_trips() {
        let packet = ContentPacket::new(&asset(), UpdateId::from(9));
        let json = serde_json::to_string(&packet).unwrap();
        let back: ContentPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.updated_content.gltf_id, UpdateId::from(9));
        assert_eq!(back.urls.gltf, packet.urls.gltf);
    }

    #[test]
    fn ping_message_parses() {
        let ping: PingMessage = serde_json::from_str(r#"{"id":"A"}"#).unwrap();
        assert_eq!(ping.id.as_str(), "A");

        // Extra fields from future viewers are tolerated.
        let ping: PingMessage =
            serde_json::from_str(r#"{"id":"B","platform":"Android"}"#).unwrap();
        assert_eq!(ping.id.as_str(), "B");
    }

    #[test]
    fn default_config_matches_protocol_constants() {
        let config = PairingConfig::default();
        assert_eq!(config.domain, DEFAULT_DOMAIN);
        assert_eq!(config.consume_timeout, Duration::from_secs(30));
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.cooldown, Duration::from_secs(20));
    }
}
