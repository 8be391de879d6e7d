//! HTTP implementation of the relay transport.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::{Relay, RelayError};

/// Relay transport over plain HTTP.
///
/// One shared `reqwest::Client` serves every publish and consume; the
/// overall request deadline is left unset so a consume can block for as
/// long as its caller allows (the per-call timeout is enforced with
/// `tokio::time::timeout`).
pub struct HttpRelay {
    http: reqwest::Client,
}

impl HttpRelay {
    pub fn new() -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing client (shared connection pool with other
    /// subsystems).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn publish(&self, url: &str, payload: Bytes) -> Result<(), RelayError> {
        let response = self.http.post(url).body(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            debug!(url, "published to relay");
            Ok(())
        } else {
            warn!(url, status = status.as_u16(), "relay rejected publish");
            Err(RelayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    async fn consume(&self, url: &str, timeout: Duration) -> Result<Bytes, RelayError> {
        let request = async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                warn!(url, status = status.as_u16(), "relay rejected consume");
                return Err(RelayError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(response.bytes().await?)
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_elapsed) => {
                debug!(url, timeout_secs = timeout.as_secs(), "consume timed out");
                Err(RelayError::Timeout {
                    url: url.to_string(),
                })
            }
        }
    }
}
