//! The single authentication of a request.

use serde::{Deserialize, Serialize};

use crate::{
    Authorisation, DecodeError, Identity, KeyResolver, ProtocolId, Signature, SignatureVerifier,
    SigningError, authentication_content, read_content,
};

/// Exactly one per request.
///
/// For writes it signs the ordered authorisation signatures; for signed reads
/// it signs the request path and query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationHeader {
    pub protocol_id: ProtocolId,
    pub identity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate_identity_id: Option<String>,
    pub signature: Signature,
}

impl AuthenticationHeader {
    /// The identity whose key produced the signature.
    pub fn signer_id(&self) -> &str {
        self.delegate_identity_id
            .as_deref()
            .unwrap_or(&self.identity_id)
    }
}

async fn sign_as(
    content: &[u8],
    authenticator: &Identity,
    delegator: Option<&str>,
) -> Result<AuthenticationHeader, SigningError> {
    let signature = authenticator.sign(content).await?;
    let (identity_id, delegate_identity_id) = match delegator {
        Some(delegator) => (delegator.to_string(), Some(authenticator.id().to_string())),
        None => (authenticator.id().to_string(), None),
    };

    Ok(AuthenticationHeader {
        protocol_id: authenticator.protocol_id(),
        identity_id,
        delegate_identity_id,
        signature,
    })
}

/// Authenticate a write's authorisations.
///
/// The authenticator may be any identity; for identity issuance it is the
/// new identity itself, authenticating its own authorisation.
pub async fn authenticate(
    authorisations: &[Authorisation],
    authenticator: &Identity,
    delegator: Option<&str>,
) -> Result<AuthenticationHeader, SigningError> {
    let content = authentication_content(authorisations);
    sign_as(content.as_bytes(), authenticator, delegator).await
}

/// Authenticate a read of `path_and_query`.
pub async fn authenticate_read(
    path_and_query: &str,
    authenticator: &Identity,
    delegator: Option<&str>,
) -> Result<AuthenticationHeader, SigningError> {
    sign_as(read_content(path_and_query), authenticator, delegator).await
}

fn verify_content<R, V>(
    authentication: &AuthenticationHeader,
    content: &[u8],
    resolver: &R,
    verifier: &V,
) -> Result<bool, DecodeError>
where
    R: KeyResolver + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    let credentials = resolver.require(authentication.signer_id())?;
    verifier.verify(
        authentication.protocol_id,
        &credentials.key,
        &authentication.signature,
        content,
    )
}

/// Check an authentication against the authorisations it claims to cover,
/// in the order given.
pub fn verify_authentication<R, V>(
    authentication: &AuthenticationHeader,
    authorisations: &[Authorisation],
    resolver: &R,
    verifier: &V,
) -> Result<bool, DecodeError>
where
    R: KeyResolver + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    let content = authentication_content(authorisations);
    verify_content(authentication, content.as_bytes(), resolver, verifier)
}

/// Check a read authentication against the path and query it was sent with.
pub fn verify_read_authentication<R, V>(
    authentication: &AuthenticationHeader,
    path_and_query: &str,
    resolver: &R,
    verifier: &V,
) -> Result<bool, DecodeError>
where
    R: KeyResolver + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    verify_content(authentication, read_content(path_and_query), resolver, verifier)
}
