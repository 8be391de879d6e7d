//! Relay transport for modelbeam.
//!
//! A "relay" is a generic anonymous HTTP store-and-forward endpoint: a POST
//! to a URL stores a payload, and the next GET to the same URL retrieves
//! and consumes it. This crate is the sole network boundary of the
//! protocol: it knows how to publish, how to consume with a timeout, and
//! how the relay URLs are derived — nothing else. All protocol branching
//! lives in `modelbeam-pairing`.

pub mod client;
pub mod urls;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

pub use client::HttpRelay;
pub use urls::{RelayUrls, DEFAULT_DOMAIN};

/// Default timeout for a blocking consume (the relay holds the GET open
/// until a payload arrives or the caller gives up).
pub const DEFAULT_CONSUME_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("relay returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("consume timed out for {url}")]
    Timeout { url: String },
}

impl From<RelayError> for modelbeam_common::BeamError {
    fn from(err: RelayError) -> Self {
        modelbeam_common::BeamError::Relay(err.to_string())
    }
}

impl RelayError {
    /// Timeouts are expected whenever nobody has published to the URL yet;
    /// the owning loop retries them rather than surfacing an error state.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RelayError::Timeout { .. })
    }
}

/// Pure store-and-forward transport.
///
/// Implemented over HTTP by [`HttpRelay`]; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait Relay: Send + Sync {
    /// POST `payload` (text or binary) to `url`. Does not retry. A non-2xx
    /// response is reported as an error, never a panic.
    async fn publish(&self, url: &str, payload: Bytes) -> Result<(), RelayError>;

    /// GET `url`, waiting up to `timeout` for the relay to hand over a
    /// pending payload. Timing out is a recoverable failure.
    async fn consume(&self, url: &str, timeout: Duration) -> Result<Bytes, RelayError>;
}
