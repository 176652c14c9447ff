//! A write ready for submission.

use crate::{
    AuthenticationHeader, Authorisation, AuthorizationAssembler, ClaimCommitment, FinalizedBody,
    Identity, RequestId, SigningError, disclosure_header, headers,
};

/// A finalized body with everything needed to submit it.
///
/// Built fresh per request and discarded after transmission.
#[derive(Debug, Clone)]
pub struct SignedWrite {
    pub body: FinalizedBody,
    pub authorisations: Vec<Authorisation>,
    pub authentication: AuthenticationHeader,
    /// Pre-encoded claims disclosure header, if the write carries claims.
    pub claims: Option<String>,
}

impl SignedWrite {
    /// Authorise `body` by each of `signers`, authenticate the result as
    /// `authenticator`, and attach a disclosure for `claims` if any.
    pub async fn assemble(
        assembler: &AuthorizationAssembler,
        body: FinalizedBody,
        signers: &[Identity],
        authenticator: &Identity,
        claims: &[ClaimCommitment],
    ) -> Result<Self, SigningError> {
        let authorisations = assembler.authorise(&body, signers).await?;
        let authentication = assembler.authenticate(&authorisations, authenticator).await?;
        let claims = if claims.is_empty() {
            None
        } else {
            Some(disclosure_header(claims)?)
        };

        Ok(Self {
            body,
            authorisations,
            authentication,
            claims,
        })
    }

    pub fn request_id(&self) -> &RequestId {
        self.body.request_id()
    }

    /// Header name/value pairs to send alongside the body.
    pub fn headers(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut pairs = vec![
            (headers::AUTHORISATIONS, headers::encode(&self.authorisations)?),
            (headers::AUTHENTICATION, headers::encode(&self.authentication)?),
        ];
        if let Some(claims) = &self.claims {
            pairs.push((headers::CLAIMS, claims.clone()));
        }
        Ok(pairs)
    }
}
