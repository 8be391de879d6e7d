//! In-memory relay and asset fakes shared by the protocol tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;

use modelbeam_relay::{Relay, RelayError};

use crate::asset::{Asset, AssetSource};
use crate::PairingError;

/// One recorded publish attempt (failed attempts are recorded too).
#[derive(Debug, Clone)]
pub(crate) struct PublishRecord {
    pub(crate) url: String,
    pub(crate) payload: Bytes,
}

/// Scripted response for one consume call.
pub(crate) enum ConsumeStep {
    /// The relay hands over this payload immediately.
    Body(Bytes),
    /// Nobody published; the call blocks for its full timeout.
    Block,
}

/// Relay double that records every call and plays back scripted responses.
///
/// Publishes succeed unless a result was planned; consumes block for the
/// caller's timeout once the script runs out, mimicking an idle relay.
pub(crate) struct MockRelay {
    publishes: Mutex<Vec<PublishRecord>>,
    publish_plan: Mutex<VecDeque<Result<(), RelayError>>>,
    consume_plan: Mutex<VecDeque<ConsumeStep>>,
    consume_log: Mutex<Vec<(String, Instant)>>,
}

impl MockRelay {
    pub(crate) fn new() -> Self {
        Self {
            publishes: Mutex::new(Vec::new()),
            publish_plan: Mutex::new(VecDeque::new()),
            consume_plan: Mutex::new(VecDeque::new()),
            consume_log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn plan_publish(&self, result: Result<(), RelayError>) {
        self.publish_plan.lock().unwrap().push_back(result);
    }

    pub(crate) fn plan_consume(&self, step: ConsumeStep) {
        self.consume_plan.lock().unwrap().push_back(step);
    }

    /// Script a well-formed ping response.
    pub(crate) fn plan_ping(&self, session_id: &str) {
        self.plan_consume(ConsumeStep::Body(Bytes::from(format!(
            "{{\"id\":\"{session_id}\"}}"
        ))));
    }

    pub(crate) fn publishes(&self) -> Vec<PublishRecord> {
        self.publishes.lock().unwrap().clone()
    }

    pub(crate) fn published_urls(&self) -> Vec<String> {
        self.publishes
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.url.clone())
            .collect()
    }

    /// Start instants of every consume call, in call order.
    pub(crate) fn consume_starts(&self) -> Vec<Instant> {
        self.consume_log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, t)| *t)
            .collect()
    }

    pub(crate) fn consume_count(&self) -> usize {
        self.consume_log.lock().unwrap().len()
    }

    pub(crate) fn consume_urls(&self) -> Vec<String> {
        self.consume_log
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Relay for MockRelay {
    async fn publish(&self, url: &str, payload: Bytes) -> Result<(), RelayError> {
        self.publishes.lock().unwrap().push(PublishRecord {
            url: url.to_string(),
            payload,
        });
        match self.publish_plan.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(()),
        }
    }

    async fn consume(&self, url: &str, timeout: Duration) -> Result<Bytes, RelayError> {
        self.consume_log
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        let step = self.consume_plan.lock().unwrap().pop_front();
        match step {
            Some(ConsumeStep::Body(bytes)) => Ok(bytes),
            Some(ConsumeStep::Block) | None => {
                tokio::time::sleep(timeout).await;
                Err(RelayError::Timeout {
                    url: url.to_string(),
                })
            }
        }
    }
}

/// Asset source with fixed blobs.
pub(crate) struct StaticAssetSource {
    poster: Bytes,
    model: Bytes,
}

impl StaticAssetSource {
    pub(crate) fn new(poster: &'static [u8], model: &'static [u8]) -> Self {
        Self {
            poster: Bytes::from_static(poster),
            model: Bytes::from_static(model),
        }
    }
}

#[async_trait]
impl AssetSource for StaticAssetSource {
    async fn poster(&self, _asset: &Asset) -> Result<Bytes, PairingError> {
        Ok(self.poster.clone())
    }

    async fn model(&self, _asset: &Asset) -> Result<Bytes, PairingError> {
        Ok(self.model.clone())
    }
}
