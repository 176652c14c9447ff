//! Signature verification for every compiled-in protocol.

use iov42_protocol::{DecodeError, ProtocolId, PublicKey, Signature, SignatureVerifier};

/// Verifies signatures by dispatching on the declared [`ProtocolId`].
///
/// Unparseable keys or signatures are a [`DecodeError`]; a parseable
/// signature that does not match is `Ok(false)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolVerifier;

impl SignatureVerifier for ProtocolVerifier {
    fn verify(
        &self,
        protocol_id: ProtocolId,
        public_key: &PublicKey,
        signature: &Signature,
        content: &[u8],
    ) -> Result<bool, DecodeError> {
        match protocol_id {
            #[cfg(feature = "ed25519")]
            ProtocolId::Ed25519 => verify_ed25519(public_key, signature, content),
            #[cfg(feature = "ecdsa")]
            ProtocolId::Sha256WithEcdsa => verify_ecdsa(public_key, signature, content),
            unsupported => Err(DecodeError::UnsupportedProtocol(unsupported)),
        }
    }
}

#[cfg(feature = "ed25519")]
fn verify_ed25519(
    public_key: &PublicKey,
    signature: &Signature,
    content: &[u8],
) -> Result<bool, DecodeError> {
    use signature::Verifier;

    let invalid_key = |reason: String| DecodeError::InvalidKey {
        protocol_id: ProtocolId::Ed25519,
        reason,
    };
    let length = public_key.as_bytes().len();
    let key_bytes: [u8; 32] = public_key
        .as_bytes()
        .try_into()
        .map_err(|_| invalid_key(format!("expected 32 bytes, got {length}")))?;
    let key = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| invalid_key(e.to_string()))?;
    let signature = ed25519_dalek::Signature::from_slice(signature.as_bytes()).map_err(|e| {
        DecodeError::InvalidSignature {
            protocol_id: ProtocolId::Ed25519,
            reason: e.to_string(),
        }
    })?;

    Ok(key.verify(content, &signature).is_ok())
}

#[cfg(feature = "ecdsa")]
fn verify_ecdsa(
    public_key: &PublicKey,
    signature: &Signature,
    content: &[u8],
) -> Result<bool, DecodeError> {
    use signature::Verifier;

    let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(public_key.as_bytes()).map_err(|e| {
        DecodeError::InvalidKey {
            protocol_id: ProtocolId::Sha256WithEcdsa,
            reason: e.to_string(),
        }
    })?;
    let signature = p256::ecdsa::DerSignature::from_bytes(signature.as_bytes()).map_err(|e| {
        DecodeError::InvalidSignature {
            protocol_id: ProtocolId::Sha256WithEcdsa,
            reason: e.to_string(),
        }
    })?;

    Ok(key.verify(content, &signature).is_ok())
}
