//! Viewer-side half of the wire protocol.
//!
//! A viewer announces itself on the ping URL, then consumes its
//! per-session URLs for the content packet and the blobs the packet's
//! update id points at. Rendering the received model is not this crate's
//! business.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use modelbeam_common::{PairingId, SessionId, UpdateId};
use modelbeam_relay::{Relay, RelayUrls, DEFAULT_CONSUME_TIMEOUT};

use crate::types::{ContentPacket, PingMessage};
use crate::PairingError;

pub struct ViewerClient {
    relay: Arc<dyn Relay>,
    urls: RelayUrls,
    session_id: SessionId,
    consume_timeout: Duration,
}

impl ViewerClient {
    /// Join the editor session identified by `pairing` (parsed from the
    /// `?id=` query parameter of the scanned page URL) under a fresh
    /// session id.
    pub fn new(relay: Arc<dyn Relay>, domain: impl Into<String>, pairing: PairingId) -> Self {
        Self::with_session_id(relay, domain, pairing, SessionId::new(Uuid::new_v4().to_string()))
    }

    pub fn with_session_id(
        relay: Arc<dyn Relay>,
        domain: impl Into<String>,
        pairing: PairingId,
        session_id: SessionId,
    ) -> Self {
        Self {
            relay,
            urls: RelayUrls::new(domain, pairing),
            session_id,
            consume_timeout: DEFAULT_CONSUME_TIMEOUT,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Announce this viewer to the editor. The editor polls the ping URL,
    /// so the announcement is consumed by the next poll; call this again
    /// if no packet arrives.
    pub async fn announce(&self) -> Result<(), PairingError> {
        let ping = PingMessage {
            id: self.session_id.clone(),
        };
        let body = Bytes::from(serde_json::to_vec(&ping)?);
        self.relay.publish(&self.urls.ping(), body).await?;
        info!(session = %self.session_id, "announced to editor");
        Ok(())
    }

    /// Wait for the next content packet pushed to this session.
    pub async fn next_packet(&self) -> Result<ContentPacket, PairingError> {
        let body = self
            .relay
            .consume(&self.urls.session(&self.session_id), self.consume_timeout)
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the poster blob a packet's `posterId` refers to.
    pub async fn fetch_poster(&self, update: UpdateId) -> Result<Bytes, PairingError> {
        Ok(self
            .relay
            .consume(&self.urls.poster(&self.session_id, update), self.consume_timeout)
            .await?)
    }

    /// Fetch the model blob a packet's `gltfId` refers to.
    pub async fn fetch_model(&self, update: UpdateId) -> Result<Bytes, PairingError> {
        Ok(self
            .relay
            .consume(&self.urls.model(&self.session_id, update), self.consume_timeout)
            .await?)
    }

    /// Fetch the environment map when a packet flags `envChanged`.
    pub async fn fetch_environment(&self, is_hdr: bool) -> Result<Bytes, PairingError> {
        Ok(self
            .relay
            .consume(
                &self.urls.environment(&self.session_id, is_hdr),
                self.consume_timeout,
            )
            .await?)
    }
}
