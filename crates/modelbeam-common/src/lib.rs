pub mod errors;
pub mod id;

pub use errors::BeamError;
pub use id::{PairingId, SessionId, UpdateId, ID_BOUND};

pub type Result<T> = std::result::Result<T, BeamError>;
