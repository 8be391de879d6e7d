//! Pairing and dispatch protocol for modelbeam.
//!
//! Synthesizes session semantics on top of an anonymous HTTP relay that
//! offers nothing beyond "the second party to poll after the first POST
//! gets the body":
//! - viewer discovery by polling a well-known ping URL,
//! - an insertion-ordered registry of discovered viewer sessions,
//! - ordered content dispatch (packet, poster, model) to every session,
//!   with at most one dispatch in flight,
//! - a connection state machine feeding status events to the UI layer.
//!
//! The editor side is driven through [`EditorSession`]; the viewer side of
//! the same wire protocol is [`ViewerClient`].

pub mod asset;
pub mod discovery;
pub mod dispatch;
pub mod editor;
pub mod registry;
pub mod status;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_support;

use modelbeam_common::BeamError;
use modelbeam_relay::RelayError;

pub use asset::{Asset, AssetSource};
pub use discovery::DiscoveryLoop;
pub use dispatch::ContentDispatcher;
pub use editor::EditorSession;
pub use registry::{Session, SessionRegistry};
pub use status::{ConnectionState, StatusEvent, StatusReporter};
pub use types::{ContentPacket, PairingConfig, PingMessage};
pub use viewer::ViewerClient;

#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("malformed ping payload")]
    MalformedPing,

    #[error("asset has no model URL")]
    MissingAsset,

    #[error("failed to fetch asset: {0}")]
    AssetFetch(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<PairingError> for BeamError {
    fn from(err: PairingError) -> Self {
        BeamError::Pairing(err.to_string())
    }
}
