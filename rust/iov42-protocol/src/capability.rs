//! Pluggable cryptography seam.
//!
//! The protocol never implements a signature algorithm itself. A signer is an
//! [`Identity`] holding a shared [`SigningCapability`]; verification goes
//! through a [`SignatureVerifier`] that dispatches on [`ProtocolId`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::{DecodeError, PublicKey, Signature, SigningError};

/// Named signing protocol a capability is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolId {
    /// ECDSA over SHA-256 (P-256), DER encoded signatures
    #[serde(rename = "SHA256WithECDSA")]
    Sha256WithEcdsa,
    /// RSA PKCS#1 v1.5 over SHA-256
    #[serde(rename = "SHA256WithRSA")]
    Sha256WithRsa,
    /// Ed25519
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl ProtocolId {
    /// The wire name of the protocol.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProtocolId::Sha256WithEcdsa => "SHA256WithECDSA",
            ProtocolId::Sha256WithRsa => "SHA256WithRSA",
            ProtocolId::Ed25519 => "Ed25519",
        }
    }
}

impl Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key holder able to sign on behalf of one identity.
#[async_trait]
pub trait SigningCapability: Send + Sync {
    /// The protocol every signature from this capability is produced under.
    fn protocol_id(&self) -> ProtocolId;

    /// The public half of the key, in the encoding the protocol expects.
    fn public_key(&self) -> PublicKey;

    /// Sign the given bytes.
    async fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError>;
}

/// Checks signatures for any supported [`ProtocolId`].
///
/// Implementations return `Ok(false)` for a well-formed signature that does
/// not match, and `Err(DecodeError)` when key or signature bytes cannot be
/// parsed at all.
pub trait SignatureVerifier {
    /// Verify `signature` over `content` with `public_key`.
    fn verify(
        &self,
        protocol_id: ProtocolId,
        public_key: &PublicKey,
        signature: &Signature,
        content: &[u8],
    ) -> Result<bool, DecodeError>;
}

/// Public credentials registered for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCredentials {
    /// Protocol the key signs under
    pub protocol_id: ProtocolId,
    /// The public key
    pub key: PublicKey,
}

/// Looks up the public credentials of an identity.
pub trait KeyResolver {
    /// Credentials for `identity_id`, if known.
    fn resolve(&self, identity_id: &str) -> Option<PublicCredentials>;

    /// Like [`KeyResolver::resolve`], failing with
    /// [`DecodeError::UnknownIdentity`] when nothing is known.
    fn require(&self, identity_id: &str) -> Result<PublicCredentials, DecodeError> {
        self.resolve(identity_id)
            .ok_or_else(|| DecodeError::UnknownIdentity(identity_id.to_string()))
    }
}

impl KeyResolver for HashMap<String, PublicCredentials> {
    fn resolve(&self, identity_id: &str) -> Option<PublicCredentials> {
        self.get(identity_id).cloned()
    }
}

/// An addressable key holder: an opaque id plus the capability that signs
/// for it.
///
/// The capability is externally owned; cloning an identity shares it.
#[derive(Clone)]
pub struct Identity {
    id: String,
    capability: Arc<dyn SigningCapability>,
}

impl Identity {
    /// Bind an identity id to a signing capability.
    pub fn new(id: impl Into<String>, capability: Arc<dyn SigningCapability>) -> Self {
        Self {
            id: id.into(),
            capability,
        }
    }

    /// The identity id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The protocol this identity signs under.
    pub fn protocol_id(&self) -> ProtocolId {
        self.capability.protocol_id()
    }

    /// Public credentials, as registered when the identity is issued.
    pub fn public_credentials(&self) -> PublicCredentials {
        PublicCredentials {
            protocol_id: self.capability.protocol_id(),
            key: self.capability.public_key(),
        }
    }

    /// Sign arbitrary content with this identity's capability.
    pub async fn sign(&self, content: &[u8]) -> Result<Signature, SigningError> {
        self.capability.sign(content).await
    }
}

impl Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("protocol_id", &self.capability.protocol_id())
            .finish()
    }
}
