//! Per-signer authorisations of a write body.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    AuthenticationHeader, DecodeError, FinalizedBody, Identity, KeyResolver, ProtocolId,
    Signature, SignatureVerifier, SigningError, authenticate, write_body_content,
};

/// One signer's endorsement of the exact body bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorisation {
    pub protocol_id: ProtocolId,
    pub identity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate_identity_id: Option<String>,
    pub signature: Signature,
}

impl Authorisation {
    /// The identity whose key produced the signature: the delegate when
    /// signing on behalf of someone else, otherwise the identity itself.
    pub fn signer_id(&self) -> &str {
        self.delegate_identity_id
            .as_deref()
            .unwrap_or(&self.identity_id)
    }
}

/// Produces authorisations (and the matching authentication) for a session.
///
/// Holds the session's delegation mode. While a delegator is set, every
/// artifact is produced on the delegator's behalf with the actual signer
/// recorded as delegate. Whether the platform ever granted that delegation
/// is not checked here; an ungranted delegation is rejected on submission.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationAssembler {
    delegator: Option<String>,
}

impl AuthorizationAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign everything that follows on behalf of `delegator_id`.
    pub fn use_delegator(&mut self, delegator_id: impl Into<String>) {
        self.delegator = Some(delegator_id.into());
    }

    /// Return to signing as the signers themselves.
    pub fn stop_using_delegator(&mut self) {
        self.delegator = None;
    }

    /// The delegator currently in effect, if any.
    pub fn delegator(&self) -> Option<&str> {
        self.delegator.as_deref()
    }

    /// Sign `body` once per signer, preserving signer order.
    pub async fn authorise(
        &self,
        body: &FinalizedBody,
        signers: &[Identity],
    ) -> Result<Vec<Authorisation>, SigningError> {
        let content = write_body_content(body);
        let mut authorisations = Vec::with_capacity(signers.len());

        for signer in signers {
            let signature = signer.sign(content).await?;
            let (identity_id, delegate_identity_id) = match &self.delegator {
                Some(delegator) => (delegator.clone(), Some(signer.id().to_string())),
                None => (signer.id().to_string(), None),
            };

            trace!(
                request_id = %body.request_id(),
                identity_id = %identity_id,
                delegate = ?delegate_identity_id,
                "authorised request"
            );

            authorisations.push(Authorisation {
                protocol_id: signer.protocol_id(),
                identity_id,
                delegate_identity_id,
                signature,
            });
        }

        Ok(authorisations)
    }

    /// Authenticate `authorisations` as `authenticator`, honouring the
    /// current delegation mode.
    pub async fn authenticate(
        &self,
        authorisations: &[Authorisation],
        authenticator: &Identity,
    ) -> Result<AuthenticationHeader, SigningError> {
        authenticate(authorisations, authenticator, self.delegator()).await
    }
}

/// Check every authorisation against the body it claims to sign.
///
/// Keys are resolved for the actual signer (the delegate, when present).
/// Returns `Ok(false)` as soon as one signature does not match.
pub fn verify_authorisations<R, V>(
    body: &[u8],
    authorisations: &[Authorisation],
    resolver: &R,
    verifier: &V,
) -> Result<bool, DecodeError>
where
    R: KeyResolver + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    for authorisation in authorisations {
        let credentials = resolver.require(authorisation.signer_id())?;
        let valid = verifier.verify(
            authorisation.protocol_id,
            &credentials.key,
            &authorisation.signature,
            body,
        )?;
        if !valid {
            return Ok(false);
        }
    }
    Ok(true)
}
