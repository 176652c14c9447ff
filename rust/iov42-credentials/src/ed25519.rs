//! Ed25519 signing credentials.

use async_trait::async_trait;
use iov42_protocol::{ProtocolId, PublicKey, Signature, SigningCapability, SigningError};

use crate::{KeyError, random_seed};

/// An Ed25519 key pair. Public keys are the raw 32 byte point.
#[derive(Debug, Clone)]
pub struct Ed25519Credentials {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Credentials {
    /// Generate a new key pair from OS randomness.
    pub fn generate() -> Result<Self, KeyError> {
        Ok(Self {
            key: ed25519_dalek::SigningKey::from_bytes(&random_seed()?),
        })
    }

    /// Import a key pair from its 32 byte seed.
    pub fn import(seed: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| KeyError::InvalidSeedLength(seed.len()))?;
        Ok(Self {
            key: ed25519_dalek::SigningKey::from_bytes(&seed),
        })
    }

    /// The 32 byte seed, suitable for [`Ed25519Credentials::import`].
    pub fn export(&self) -> Vec<u8> {
        self.key.to_bytes().to_vec()
    }
}

impl From<ed25519_dalek::SigningKey> for Ed25519Credentials {
    fn from(key: ed25519_dalek::SigningKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl SigningCapability for Ed25519Credentials {
    fn protocol_id(&self) -> ProtocolId {
        ProtocolId::Ed25519
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::new(self.key.verifying_key().to_bytes().to_vec())
    }

    async fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError> {
        use signature::Signer;
        let signature: ed25519_dalek::Signature = self
            .key
            .try_sign(payload)
            .map_err(|e| SigningError::Provider {
                protocol_id: ProtocolId::Ed25519,
                reason: e.to_string(),
            })?;
        Ok(Signature::new(signature.to_bytes().to_vec()))
    }
}
