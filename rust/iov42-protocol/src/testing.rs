//! Deterministic keyed-digest capability for unit tests.
//!
//! The "signature" is `sha256(secret || payload)` and the "public key" is the
//! secret itself. Worthless cryptographically, but it lets unit tests assert
//! exact signed content without pulling in a real key implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::{
    DecodeError, Identity, ProtocolId, PublicKey, Signature, SignatureVerifier, SigningCapability,
    SigningError,
};

pub(crate) struct DigestKey {
    secret: Vec<u8>,
}

impl DigestKey {
    fn digest(secret: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        hasher.update(payload);
        hasher.finalize().to_vec()
    }
}

#[async_trait]
impl SigningCapability for DigestKey {
    fn protocol_id(&self) -> ProtocolId {
        ProtocolId::Sha256WithRsa
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::new(self.secret.clone())
    }

    async fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError> {
        Ok(Signature::new(Self::digest(&self.secret, payload)))
    }
}

pub(crate) struct DigestVerifier;

impl SignatureVerifier for DigestVerifier {
    fn verify(
        &self,
        _protocol_id: ProtocolId,
        public_key: &PublicKey,
        signature: &Signature,
        content: &[u8],
    ) -> Result<bool, DecodeError> {
        Ok(DigestKey::digest(public_key.as_bytes(), content) == signature.as_bytes())
    }
}

/// An identity named `id` whose secret is its own name.
pub(crate) fn identity(id: &str) -> Identity {
    Identity::new(
        id,
        Arc::new(DigestKey {
            secret: id.as_bytes().to_vec(),
        }),
    )
}

/// The signature [`identity`] would produce over `payload`.
pub(crate) fn expected_signature(id: &str, payload: &[u8]) -> Signature {
    Signature::new(DigestKey::digest(id.as_bytes(), payload))
}
