//! Ordered content dispatch to every registered viewer session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use modelbeam_common::UpdateId;
use modelbeam_relay::{Relay, RelayUrls};

use crate::asset::{Asset, AssetSource};
use crate::registry::SessionRegistry;
use crate::status::{ConnectionState, StatusReporter};
use crate::types::ContentPacket;
use crate::PairingError;

/// Pushes the current asset to all registered sessions, serialized so at
/// most one dispatch is ever in flight.
///
/// A trigger that arrives while a dispatch runs (or during the
/// post-success cool-down) is dropped, not queued; callers that still
/// need a push re-trigger later.
pub struct ContentDispatcher {
    relay: Arc<dyn Relay>,
    urls: RelayUrls,
    registry: Arc<SessionRegistry>,
    reporter: Arc<StatusReporter>,
    deployed: Arc<AtomicBool>,
    busy: AtomicBool,
    content_changed: AtomicBool,
    cooldown: Duration,
}

impl ContentDispatcher {
    pub fn new(
        relay: Arc<dyn Relay>,
        urls: RelayUrls,
        registry: Arc<SessionRegistry>,
        reporter: Arc<StatusReporter>,
        deployed: Arc<AtomicBool>,
        cooldown: Duration,
    ) -> Self {
        Self {
            relay,
            urls,
            registry,
            reporter,
            deployed,
            busy: AtomicBool::new(false),
            content_changed: AtomicBool::new(false),
            cooldown,
        }
    }

    /// Note that the editor content no longer matches what viewers hold.
    pub fn mark_content_changed(&self) {
        self.content_changed.store(true, Ordering::SeqCst);
    }

    pub fn content_changed(&self) -> bool {
        self.content_changed.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one dispatch cycle for `asset`.
    ///
    /// Silently a no-op when the editor is not deployed, no sessions are
    /// registered, or another dispatch is in flight — these are contract
    /// conditions, not errors.
    pub async fn dispatch(self: &Arc<Self>, asset: &Asset, source: &dyn AssetSource) {
        if !self.deployed.load(Ordering::SeqCst) {
            debug!("dispatch skipped: not deployed");
            return;
        }
        if self.registry.is_empty().await {
            debug!("dispatch skipped: no viewer sessions");
            return;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("dispatch skipped: another dispatch in flight");
            return;
        }

        self.reporter
            .set(
                ConnectionState::Sending,
                "Sending content to paired viewers. Textured models can take a while.",
            )
            .await;

        let update = UpdateId::generate();
        match self.run(asset, source, update).await {
            Ok(delivered) => {
                self.content_changed.store(false, Ordering::SeqCst);
                info!(update = %update, sessions = delivered, "dispatch complete");
                self.reporter
                    .set(
                        ConnectionState::Connected,
                        "Content delivered to all paired viewers.",
                    )
                    .await;

                // Hold the busy flag through the cool-down so rapid
                // re-triggers cannot saturate the relay.
                let this = Arc::clone(self);
                tokio::spawn(async move {
                    sleep(this.cooldown).await;
                    this.busy.store(false, Ordering::SeqCst);
                    debug!("dispatch cool-down elapsed");
                });
            }
            Err(err) => {
                warn!(error = %err, "dispatch failed");
                self.busy.store(false, Ordering::SeqCst);
                self.reporter
                    .set(
                        ConnectionState::Error,
                        format!("Failed to push content to viewers: {err}"),
                    )
                    .await;
            }
        }
    }

    /// The fallible middle of a dispatch: build the packet, produce the
    /// blobs, publish to each session in discovery order.
    ///
    /// The first failed publish aborts everything that follows. Content
    /// already delivered to earlier sessions stays delivered — there is no
    /// rollback, only the error state.
    async fn run(
        &self,
        asset: &Asset,
        source: &dyn AssetSource,
        update: UpdateId,
    ) -> Result<usize, PairingError> {
        if asset.gltf_url.is_empty() {
            return Err(PairingError::MissingAsset);
        }

        let packet = ContentPacket::new(asset, update);
        let packet_bytes = Bytes::from(serde_json::to_vec(&packet)?);
        let poster = source.poster(asset).await?;
        let model = source.model(asset).await?;

        let sessions = self.registry.list().await;
        for session in &sessions {
            debug!(session = %session.id, update = %update, "publishing to session");
            self.relay
                .publish(&self.urls.session(&session.id), packet_bytes.clone())
                .await?;
            self.relay
                .publish(&self.urls.poster(&session.id, update), poster.clone())
                .await?;
            self.relay
                .publish(&self.urls.model(&session.id, update), model.clone())
                .await?;
            self.registry.clear_stale(&session.id).await;
        }
        Ok(sessions.len())
    }
}
