//! Deterministic relay URL templates.
//!
//! Every URL the protocol touches is derived here from the pairing id,
//! the viewer's session id, and the per-dispatch update id. Callers never
//! build relay URLs by hand — that invariant is what keeps unrelated
//! editors on the shared relay from colliding.

use modelbeam_common::{PairingId, SessionId, UpdateId};

/// The public piping relay the original deployment targets.
pub const DEFAULT_DOMAIN: &str = "https://piping.glitch.me/";

/// URL builder bound to one editor session's pairing id.
#[derive(Debug, Clone)]
pub struct RelayUrls {
    domain: String,
    pairing: PairingId,
}

impl RelayUrls {
    /// `domain` must end with a trailing slash (the templates concatenate).
    pub fn new(domain: impl Into<String>, pairing: PairingId) -> Self {
        Self {
            domain: domain.into(),
            pairing,
        }
    }

    pub fn pairing_id(&self) -> PairingId {
        self.pairing
    }

    /// Well-known discovery URL viewers ping to announce themselves.
    pub fn ping(&self) -> String {
        format!("{}ping-{}", self.domain, self.pairing)
    }

    /// Per-session URL carrying the JSON content packet.
    pub fn session(&self, session: &SessionId) -> String {
        format!("{}{}-{}", self.domain, self.pairing, session)
    }

    /// Poster image URL for one update.
    pub fn poster(&self, session: &SessionId, update: UpdateId) -> String {
        format!("{}{}-{}-{}-poster", self.domain, self.pairing, session, update)
    }

    /// Model blob URL for one update.
    pub fn model(&self, session: &SessionId, update: UpdateId) -> String {
        format!("{}{}-{}-{}", self.domain, self.pairing, session, update)
    }

    /// Environment map URL. HDR payloads get a fragment suffix so the
    /// receiving viewer picks the right decoder from the URL alone.
    pub fn environment(&self, session: &SessionId, is_hdr: bool) -> String {
        let suffix = if is_hdr { "#.hdr" } else { "" };
        format!("{}{}-{}-env{}", self.domain, self.pairing, session, suffix)
    }

    /// The page a viewer opens (usually via QR code) to join this session.
    /// `base` is the editor page's origin plus path, trailing slash
    /// included.
    pub fn viewer_page(&self, base: &str) -> String {
        format!("{}view/?id={}", base, self.pairing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> RelayUrls {
        // Fixed pairing id so the expected strings are literal.
        RelayUrls::new("https://relay.test/", PairingId::from(42))
    }

    fn update() -> UpdateId {
        UpdateId::from(7)
    }

    #[test]
    fn ping_template() {
        assert_eq!(urls().ping(), "https://relay.test/ping-42");
    }

    #[test]
    fn session_template() {
        let s = SessionId::from("A");
        assert_eq!(urls().session(&s), "https://relay.test/42-A");
    }

    #[test]
    fn poster_template() {
        let s = SessionId::from("A");
        assert_eq!(urls().poster(&s, update()), "https://relay.test/42-A-7-poster");
    }

    #[test]
    fn model_template() {
        let s = SessionId::from("A");
        assert_eq!(urls().model(&s, update()), "https://relay.test/42-A-7");
    }

    #[test]
    fn environment_template() {
        let s = SessionId::from("B");
        assert_eq!(urls().environment(&s, false), "https://relay.test/42-B-env");
        assert_eq!(urls().environment(&s, true), "https://relay.test/42-B-env#.hdr");
    }

    #[test]
    fn viewer_page_template() {
        assert_eq!(
            urls().viewer_page("https://editor.example/gallery/"),
            "https://editor.example/gallery/view/?id=42"
        );
    }
}
