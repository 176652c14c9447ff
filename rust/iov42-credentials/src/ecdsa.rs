//! ECDSA P-256 signing credentials (`SHA256WithECDSA`).

use async_trait::async_trait;
use iov42_protocol::{ProtocolId, PublicKey, Signature, SigningCapability, SigningError};

use crate::{KeyError, random_seed};

/// A P-256 key pair.
///
/// Signatures are DER encoded over a SHA-256 digest of the payload. Public
/// keys are compressed SEC1 points (33 bytes).
#[derive(Debug, Clone)]
pub struct EcdsaCredentials {
    key: p256::ecdsa::SigningKey,
}

impl EcdsaCredentials {
    /// Generate a new key pair from OS randomness.
    pub fn generate() -> Result<Self, KeyError> {
        Self::import(&random_seed()?)
    }

    /// Import a key pair from its 32 byte secret scalar.
    pub fn import(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() != 32 {
            return Err(KeyError::InvalidSeedLength(secret.len()));
        }
        let key = p256::ecdsa::SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidKey {
            protocol_id: ProtocolId::Sha256WithEcdsa,
        })?;
        Ok(Self { key })
    }

    /// The 32 byte secret scalar.
    pub fn export(&self) -> Vec<u8> {
        self.key.to_bytes().to_vec()
    }
}

#[async_trait]
impl SigningCapability for EcdsaCredentials {
    fn protocol_id(&self) -> ProtocolId {
        ProtocolId::Sha256WithEcdsa
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::new(
            self.key
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
        )
    }

    async fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError> {
        use signature::Signer;
        let signature: p256::ecdsa::DerSignature = self
            .key
            .try_sign(payload)
            .map_err(|e| SigningError::Provider {
                protocol_id: ProtocolId::Sha256WithEcdsa,
                reason: e.to_string(),
            })?;
        Ok(Signature::new(signature.as_bytes().to_vec()))
    }
}
