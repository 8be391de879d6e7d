//! Editor-side protocol instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use modelbeam_common::PairingId;
use modelbeam_relay::{Relay, RelayUrls};

use crate::asset::{Asset, AssetSource};
use crate::discovery::DiscoveryLoop;
use crate::dispatch::ContentDispatcher;
use crate::registry::{Session, SessionRegistry};
use crate::status::{ConnectionState, StatusEvent, StatusReporter};
use crate::types::PairingConfig;

/// One editor session: a fresh pairing id, its session registry, and the
/// discovery/dispatch machinery scoped to it.
///
/// Nothing is shared across editor sessions; a torn-down session cannot be
/// redeployed — pairing ids are minted per session, so the caller creates
/// a new `EditorSession` instead.
pub struct EditorSession {
    config: PairingConfig,
    relay: Arc<dyn Relay>,
    source: Arc<dyn AssetSource>,
    urls: RelayUrls,
    registry: Arc<SessionRegistry>,
    reporter: Arc<StatusReporter>,
    dispatcher: Arc<ContentDispatcher>,
    current_asset: Arc<RwLock<Option<Asset>>>,
    deployed: Arc<AtomicBool>,
    token: CancellationToken,
}

impl EditorSession {
    /// Mint a pairing id and assemble the protocol instance. Returns the
    /// receiver for connection status events alongside.
    pub fn new(
        config: PairingConfig,
        relay: Arc<dyn Relay>,
        source: Arc<dyn AssetSource>,
    ) -> (Self, mpsc::Receiver<StatusEvent>) {
        let (tx, rx) = mpsc::channel(256);
        let pairing = PairingId::generate();
        let urls = RelayUrls::new(config.domain.clone(), pairing);
        let registry = Arc::new(SessionRegistry::new());
        let reporter = Arc::new(StatusReporter::new(tx));
        let deployed = Arc::new(AtomicBool::new(false));
        let dispatcher = Arc::new(ContentDispatcher::new(
            relay.clone(),
            urls.clone(),
            registry.clone(),
            reporter.clone(),
            deployed.clone(),
            config.cooldown,
        ));

        let session = Self {
            config,
            relay,
            source,
            urls,
            registry,
            reporter,
            dispatcher,
            current_asset: Arc::new(RwLock::new(None)),
            deployed,
            token: CancellationToken::new(),
        };
        (session, rx)
    }

    pub fn pairing_id(&self) -> PairingId {
        self.urls.pairing_id()
    }

    /// URL a viewer opens to join this session; `base` is the hosting
    /// page's origin plus path, trailing slash included.
    pub fn viewer_url(&self, base: &str) -> String {
        self.urls.viewer_page(base)
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> ConnectionState {
        self.reporter.current().await
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.registry.list().await
    }

    /// Start discovery. Idempotent: a second call while deployed does
    /// nothing.
    pub async fn deploy(&self) {
        if self.deployed.swap(true, Ordering::SeqCst) {
            debug!("deploy called while already deployed");
            return;
        }
        info!(pairing = %self.pairing_id(), "deploying editor session");
        self.reporter
            .set(ConnectionState::Connecting, "Connecting to relay...")
            .await;

        DiscoveryLoop {
            relay: self.relay.clone(),
            urls: self.urls.clone(),
            registry: self.registry.clone(),
            reporter: self.reporter.clone(),
            dispatcher: self.dispatcher.clone(),
            current_asset: self.current_asset.clone(),
            source: self.source.clone(),
            token: self.token.clone(),
            consume_timeout: self.config.consume_timeout,
            retry_delay: self.config.retry_delay,
        }
        .spawn();
    }

    /// Replace the current asset: every paired session becomes stale and a
    /// dispatch is triggered (dropped if one is already in flight).
    pub async fn set_asset(&self, asset: Asset) {
        *self.current_asset.write().await = Some(asset.clone());
        self.registry.mark_all_stale().await;
        self.dispatcher.mark_content_changed();
        self.dispatcher.dispatch(&asset, self.source.as_ref()).await;
    }

    /// Manually re-push the current asset to all paired sessions.
    pub async fn push(&self) {
        let asset = self.current_asset.read().await.clone();
        match asset {
            Some(asset) => self.dispatcher.dispatch(&asset, self.source.as_ref()).await,
            None => debug!("push requested with no current asset"),
        }
    }

    /// Stop the protocol. Level-triggered: an in-flight consume or publish
    /// finishes on its own; no new iteration or dispatch starts.
    pub async fn teardown(&self) {
        info!(pairing = %self.pairing_id(), "tearing down editor session");
        self.deployed.store(false, Ordering::SeqCst);
        self.token.cancel();
        self.reporter
            .set(ConnectionState::Idle, "Session closed.")
            .await;
    }
}
