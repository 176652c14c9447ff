use iov42_protocol::ProtocolId;
use thiserror::Error;

/// Errors from generating or importing key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The seed has the wrong length for the protocol.
    #[error("expected 32 seed bytes, got {0}")]
    InvalidSeedLength(usize),

    /// The seed is not a valid private key for the protocol.
    #[error("invalid {protocol_id} private key")]
    InvalidKey { protocol_id: ProtocolId },

    /// Random number generation failed.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),
}
