//! Viewer discovery by polling the relay's ping URL.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use modelbeam_relay::{Relay, RelayUrls};

use crate::asset::{Asset, AssetSource};
use crate::dispatch::ContentDispatcher;
use crate::registry::SessionRegistry;
use crate::status::{ConnectionState, StatusReporter};
use crate::types::PingMessage;
use crate::PairingError;

/// Polling task that discovers viewer sessions.
///
/// Runs until its cancellation token fires. Cancellation is
/// level-triggered: it never aborts an in-flight consume, it only stops
/// the next iteration from starting.
pub struct DiscoveryLoop {
    pub(crate) relay: Arc<dyn Relay>,
    pub(crate) urls: RelayUrls,
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) reporter: Arc<StatusReporter>,
    pub(crate) dispatcher: Arc<ContentDispatcher>,
    pub(crate) current_asset: Arc<RwLock<Option<Asset>>>,
    pub(crate) source: Arc<dyn AssetSource>,
    pub(crate) token: CancellationToken,
    pub(crate) consume_timeout: Duration,
    pub(crate) retry_delay: Duration,
}

impl DiscoveryLoop {
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let ping_url = self.urls.ping();
        info!(url = %ping_url, "discovery loop started");

        // Polling is up; until a viewer scans, the session is merely ready.
        if self.reporter.current().await == ConnectionState::Connecting {
            self.reporter
                .set(
                    ConnectionState::Ready,
                    "Relay ready. Waiting for a viewer to scan the pairing code.",
                )
                .await;
        }

        loop {
            if self.token.is_cancelled() {
                break;
            }
            if let Err(err) = self.poll_once(&ping_url).await {
                debug!(error = %err, "ping poll failed; retrying");
                sleep(self.retry_delay).await;
            }
        }

        info!("discovery loop stopped");
    }

    /// One consume of the ping URL. A well-formed response registers the
    /// session; failures (timeout, malformed body) bubble up so the loop
    /// applies its flat retry delay.
    async fn poll_once(&self, ping_url: &str) -> Result<(), PairingError> {
        let body = self.relay.consume(ping_url, self.consume_timeout).await?;
        let ping: PingMessage =
            serde_json::from_slice(&body).map_err(|_| PairingError::MalformedPing)?;

        if self.registry.register(ping.id.clone()).await {
            info!(session = %ping.id, "viewer session connected");
            self.reporter
                .set(
                    ConnectionState::Connected,
                    "Viewer connected. Pushing current content.",
                )
                .await;

            let asset = self.current_asset.read().await.clone();
            match asset {
                // Dropped silently if a dispatch is already in flight; the
                // new session stays stale and catches up on the next push.
                Some(asset) => self.dispatcher.dispatch(&asset, self.source.as_ref()).await,
                None => debug!("no current asset; nothing to dispatch yet"),
            }
        }
        Ok(())
    }
}
