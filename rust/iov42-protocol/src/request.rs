//! Typed write request bodies.
//!
//! Each body serializes as single-line camelCase JSON with a leading `_type`
//! discriminator and the `requestId` it is submitted under. Bodies never
//! carry plaintext claims, only their [`ClaimHash`] commitments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ClaimHash, PublicCredentials, RequestId, Signature};

/// A serializable body addressed by a request id.
pub trait WriteRequest: Serialize {
    /// The id the body is submitted under.
    fn request_id(&self) -> &RequestId;
}

macro_rules! write_request {
    ($name:ident) => {
        impl $name {
            /// Replace the generated request id.
            pub fn with_request_id(mut self, request_id: RequestId) -> Self {
                self.request_id = request_id;
                self
            }
        }

        impl WriteRequest for $name {
            fn request_id(&self) -> &RequestId {
                &self.request_id
            }
        }
    };
}

/// Register a brand-new identity and its public credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct IssueIdentityRequest {
    pub request_id: RequestId,
    pub identity_id: String,
    pub public_credentials: PublicCredentials,
}

impl IssueIdentityRequest {
    pub fn new(identity_id: impl Into<String>, public_credentials: PublicCredentials) -> Self {
        Self {
            request_id: RequestId::new(),
            identity_id: identity_id.into(),
            public_credentials,
        }
    }
}

write_request!(IssueIdentityRequest);

/// Grant `delegate_identity_id` the right to sign on behalf of
/// `delegator_identity_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct AddDelegateRequest {
    pub request_id: RequestId,
    pub delegate_identity_id: String,
    pub delegator_identity_id: String,
}

impl AddDelegateRequest {
    pub fn new(
        delegator_identity_id: impl Into<String>,
        delegate_identity_id: impl Into<String>,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            delegate_identity_id: delegate_identity_id.into(),
            delegator_identity_id: delegator_identity_id.into(),
        }
    }
}

write_request!(AddDelegateRequest);

/// Commit claim hashes against an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct CreateIdentityClaimsRequest {
    pub request_id: RequestId,
    pub subject_id: String,
    pub claims: Vec<ClaimHash>,
}

impl CreateIdentityClaimsRequest {
    pub fn new(subject_id: impl Into<String>, claims: Vec<ClaimHash>) -> Self {
        Self {
            request_id: RequestId::new(),
            subject_id: subject_id.into(),
            claims,
        }
    }
}

write_request!(CreateIdentityClaimsRequest);

/// Commit claim hashes against an asset or asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct CreateAssetClaimsRequest {
    pub request_id: RequestId,
    pub subject_id: String,
    pub subject_type_id: String,
    pub claims: Vec<ClaimHash>,
}

impl CreateAssetClaimsRequest {
    pub fn new(
        subject_id: impl Into<String>,
        subject_type_id: impl Into<String>,
        claims: Vec<ClaimHash>,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            subject_id: subject_id.into(),
            subject_type_id: subject_type_id.into(),
            claims,
        }
    }
}

write_request!(CreateAssetClaimsRequest);

/// Endorse claims on an identity.
///
/// `endorsements` maps each claim hash to the endorser's signature over the
/// endorsement content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct CreateIdentityEndorsementsRequest {
    pub request_id: RequestId,
    pub subject_id: String,
    pub endorser_id: String,
    pub endorsements: BTreeMap<ClaimHash, Signature>,
}

impl CreateIdentityEndorsementsRequest {
    pub fn new(
        subject_id: impl Into<String>,
        endorser_id: impl Into<String>,
        endorsements: BTreeMap<ClaimHash, Signature>,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            subject_id: subject_id.into(),
            endorser_id: endorser_id.into(),
            endorsements,
        }
    }
}

write_request!(CreateIdentityEndorsementsRequest);

/// Endorse claims on an asset or asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct CreateAssetEndorsementsRequest {
    pub request_id: RequestId,
    pub subject_id: String,
    pub subject_type_id: String,
    pub endorser_id: String,
    pub endorsements: BTreeMap<ClaimHash, Signature>,
}

impl CreateAssetEndorsementsRequest {
    pub fn new(
        subject_id: impl Into<String>,
        subject_type_id: impl Into<String>,
        endorser_id: impl Into<String>,
        endorsements: BTreeMap<ClaimHash, Signature>,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            subject_id: subject_id.into(),
            subject_type_id: subject_type_id.into(),
            endorser_id: endorser_id.into(),
            endorsements,
        }
    }
}

write_request!(CreateAssetEndorsementsRequest);

/// A single movement within a [`TransfersRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transfer {
    /// Move a unique asset between owners.
    #[serde(rename_all = "camelCase")]
    Ownership {
        asset_id: String,
        asset_type_id: String,
        from_identity_id: String,
        to_identity_id: String,
    },
    /// Move a quantity between two accounts of a quantifiable asset type.
    #[serde(rename_all = "camelCase")]
    Quantity {
        asset_type_id: String,
        from_asset_id: String,
        to_asset_id: String,
        quantity: String,
    },
}

/// Atomically apply one or more transfers.
///
/// Every identity giving something up must authorise the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub struct TransfersRequest {
    pub request_id: RequestId,
    pub transfers: Vec<Transfer>,
}

impl TransfersRequest {
    pub fn new(transfers: Vec<Transfer>) -> Self {
        Self {
            request_id: RequestId::new(),
            transfers,
        }
    }
}

write_request!(TransfersRequest);
