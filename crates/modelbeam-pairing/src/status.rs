//! Connection state machine and status events for the presentation layer.
//!
//! The core never renders anything. Every transition produces one
//! [`StatusEvent`] with a machine-readable state tag and a human-readable
//! message; the embedding UI decides what to do with them.

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Observable protocol state.
///
/// `Idle → Connecting → {Ready | Error}`; `Connecting/Ready → Connected`
/// on first session discovery; `Sending` while a dispatch runs;
/// `Connected → Error` on dispatch failure; `Error → Sending` on the next
/// manual dispatch. `Idle` is re-entered only by explicit teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Idle,
    Connecting,
    Ready,
    Sending,
    Connected,
    Error,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Sending => "sending",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state transition, as delivered to the UI sink.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub state: ConnectionState,
    pub message: String,
}

/// Holds the single current state and emits transition events.
///
/// All shared-flag mutation of the protocol goes through single setter
/// operations like this one, so the invariants stay auditable in
/// isolation from I/O.
pub struct StatusReporter {
    state: RwLock<ConnectionState>,
    tx: mpsc::Sender<StatusEvent>,
}

impl StatusReporter {
    pub fn new(tx: mpsc::Sender<StatusEvent>) -> Self {
        Self {
            state: RwLock::new(ConnectionState::Idle),
            tx,
        }
    }

    /// Update the current state and emit one event. A dropped receiver is
    /// not an error: the protocol keeps running without an observer.
    pub async fn set(&self, state: ConnectionState, message: impl Into<String>) {
        let message = message.into();
        *self.state.write().await = state;
        debug!(state = %state, message, "connection state changed");
        let _ = self.tx.send(StatusEvent { state, message }).await;
    }

    pub async fn current(&self) -> ConnectionState {
        *self.state.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_updates_state_and_emits_event() {
        let (tx, mut rx) = mpsc::channel(16);
        let reporter = StatusReporter::new(tx);
        assert_eq!(reporter.current().await, ConnectionState::Idle);

        reporter
            .set(ConnectionState::Connecting, "Connecting to relay...")
            .await;
        assert_eq!(reporter.current().await, ConnectionState::Connecting);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.state, ConnectionState::Connecting);
        assert_eq!(event.message, "Connecting to relay...");
    }

    #[tokio::test]
    async fn events_arrive_in_transition_order() {
        let (tx, mut rx) = mpsc::channel(16);
        let reporter = StatusReporter::new(tx);

        reporter.set(ConnectionState::Connecting, "connecting").await;
        reporter.set(ConnectionState::Ready, "ready").await;
        reporter.set(ConnectionState::Connected, "connected").await;

        let states: Vec<_> = [
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|e| e.state)
        .collect();
        assert_eq!(
            states,
            [
                ConnectionState::Connecting,
                ConnectionState::Ready,
                ConnectionState::Connected
            ]
        );
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_block_transitions() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let reporter = StatusReporter::new(tx);
        reporter.set(ConnectionState::Error, "dispatch failed").await;
        assert_eq!(reporter.current().await, ConnectionState::Error);
    }

    #[test]
    fn state_tags_are_stable() {
        assert_eq!(ConnectionState::Idle.as_str(), "idle");
        assert_eq!(ConnectionState::Sending.as_str(), "sending");
        assert_eq!(
            serde_json::to_string(&ConnectionState::Connected).unwrap(),
            "\"connected\""
        );
    }
}
