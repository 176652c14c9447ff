//! Concrete key types for `iov42-protocol`.
//!
//! Each credential type implements [`SigningCapability`] so it can back an
//! [`Identity`]; [`ProtocolVerifier`] implements [`SignatureVerifier`] for
//! every protocol compiled in.
//!
//! Implementations:
//! - **Ed25519** (enabled by the `ed25519` feature, on by default)
//! - **ECDSA P-256 / SHA-256** (enabled by the `ecdsa` feature, on by default)
//!
//! [`SigningCapability`]: iov42_protocol::SigningCapability
//! [`SignatureVerifier`]: iov42_protocol::SignatureVerifier
//! [`Identity`]: iov42_protocol::Identity

mod error;
pub use error::KeyError;

#[cfg(feature = "ed25519")]
mod ed25519;
#[cfg(feature = "ed25519")]
pub use ed25519::Ed25519Credentials;

#[cfg(feature = "ecdsa")]
mod ecdsa;
#[cfg(feature = "ecdsa")]
pub use ecdsa::EcdsaCredentials;

mod verifier;
pub use verifier::ProtocolVerifier;

/// 32 bytes of key seed from the operating system.
fn random_seed() -> Result<[u8; 32], KeyError> {
    let mut seed = [0u8; 32];
    getrandom::getrandom(&mut seed).map_err(KeyError::Rng)?;
    Ok(seed)
}
