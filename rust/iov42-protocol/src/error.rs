use thiserror::Error;

use crate::ProtocolId;

/// Errors raised by a [`crate::SigningCapability`] while producing a signature.
///
/// These are provider failures (a hardware token refusing, an RNG failing).
/// A signature the platform later rejects is not a signing error; it
/// surfaces as an unsuccessful response.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The underlying signature implementation failed.
    #[error("Signing with {protocol_id} failed: {reason}")]
    Provider {
        /// Protocol of the capability that failed
        protocol_id: ProtocolId,
        /// Provider supplied description
        reason: String,
    },

    /// The artifact to sign could not be serialized.
    #[error("Unable to encode signed content: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Malformed input handed to a decoder or verifier.
///
/// Kept distinct from a genuine signature mismatch, which verifiers report
/// as `Ok(false)`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Header or key material was not valid base64url.
    #[error("Invalid base64url encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded header bytes were not the expected JSON shape.
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Public key bytes could not be parsed for the declared protocol.
    #[error("Invalid {protocol_id} public key: {reason}")]
    InvalidKey {
        /// Protocol the key was declared under
        protocol_id: ProtocolId,
        /// Parser supplied description
        reason: String,
    },

    /// Signature bytes could not be parsed for the declared protocol.
    #[error("Invalid {protocol_id} signature: {reason}")]
    InvalidSignature {
        /// Protocol the signature was declared under
        protocol_id: ProtocolId,
        /// Parser supplied description
        reason: String,
    },

    /// No verifier is available for the protocol.
    #[error("Unsupported signing protocol {0}")]
    UnsupportedProtocol(ProtocolId),

    /// No public credentials are known for the identity.
    #[error("No public credentials known for identity {0}")]
    UnknownIdentity(String),
}

/// Errors from the claims disclosure codec.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The disclosure header could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A disclosed plaintext does not hash to the commitment it is filed under.
    #[error("Disclosed claim does not match its commitment {hash}")]
    HashMismatch {
        /// Commitment the plaintext was disclosed under
        hash: String,
    },
}
