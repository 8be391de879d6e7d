//! Workspace-wide error umbrella.
//!
//! Crate-specific errors (`RelayError`, `PairingError`) live in the crates
//! that own the domain; this umbrella is what the application surface
//! reports. Nothing in the protocol core is fatal to the process — the
//! worst outcome is a visible error state that needs a user-initiated
//! retry.

#[derive(Debug, thiserror::Error)]
pub enum BeamError {
    #[error("relay error: {0}")]
    Relay(String),

    #[error("pairing error: {0}")]
    Pairing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_error_display() {
        let err = BeamError::Relay("post failed".into());
        assert_eq!(err.to_string(), "relay error: post failed");
    }

    #[test]
    fn io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = BeamError::from(io);
        assert_eq!(err.to_string(), "missing");
    }

    #[test]
    fn other_error_display() {
        let err = BeamError::Other("boom".into());
        assert_eq!(err.to_string(), "boom");
    }
}
