//! Claim hash commitments and out-of-band disclosure.
//!
//! Signed bodies only ever reference claims by [`ClaimHash`]. The plaintext
//! travels in the unsigned claims header, keyed by the same hash, so a
//! tampered plaintext is caught as a hash mismatch rather than accepted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::{ClaimError, Identity, Signature, SigningError, encoding, endorsement_content};

/// `base64url(sha256(utf8(claim)))`, unpadded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimHash(String);

impl ClaimHash {
    /// The hash as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClaimHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash a plaintext claim.
pub fn claim_hash(claim: &str) -> ClaimHash {
    ClaimHash(encoding::encode(Sha256::digest(claim.as_bytes())))
}

/// A plaintext claim paired with its commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCommitment {
    pub plaintext: String,
    pub hash: ClaimHash,
}

impl ClaimCommitment {
    pub fn new(plaintext: impl Into<String>) -> Self {
        let plaintext = plaintext.into();
        let hash = claim_hash(&plaintext);
        Self { plaintext, hash }
    }
}

/// A third party's signature attesting to a claim on a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endorsement {
    pub claim: String,
    pub claim_hash: ClaimHash,
    pub endorsement_signature: Signature,
}

/// Commit to a set of claims, keeping first-seen order and dropping
/// duplicates.
pub fn commit<I, S>(claims: I) -> Vec<ClaimCommitment>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut commitments: Vec<ClaimCommitment> = Vec::new();
    for claim in claims {
        let commitment = ClaimCommitment::new(claim);
        if !commitments.iter().any(|seen| seen.hash == commitment.hash) {
            commitments.push(commitment);
        }
    }
    commitments
}

/// The hashes to embed in a signed body.
pub fn hashes(commitments: &[ClaimCommitment]) -> Vec<ClaimHash> {
    commitments.iter().map(|c| c.hash.clone()).collect()
}

/// The claims header value: `base64url(json({hash: plaintext, ...}))`.
pub fn disclosure_header(commitments: &[ClaimCommitment]) -> Result<String, serde_json::Error> {
    let disclosed: BTreeMap<&ClaimHash, &str> = commitments
        .iter()
        .map(|c| (&c.hash, c.plaintext.as_str()))
        .collect();
    Ok(encoding::encode(serde_json::to_vec(&disclosed)?))
}

/// Decode a claims header without checking it.
pub fn decode_disclosure(header: &str) -> Result<BTreeMap<ClaimHash, String>, ClaimError> {
    let bytes = encoding::decode(header)?;
    serde_json::from_slice(&bytes).map_err(|e| ClaimError::Decode(e.into()))
}

/// Decode a claims header and check every plaintext against its hash.
pub fn verify_disclosure(header: &str) -> Result<Vec<ClaimCommitment>, ClaimError> {
    decode_disclosure(header)?
        .into_iter()
        .map(|(hash, plaintext)| {
            if claim_hash(&plaintext) == hash {
                Ok(ClaimCommitment { plaintext, hash })
            } else {
                Err(ClaimError::HashMismatch {
                    hash: hash.to_string(),
                })
            }
        })
        .collect()
}

/// Sign each committed claim on `subject_id` as `endorser`.
pub async fn endorse(
    endorser: &Identity,
    subject_id: &str,
    subject_type_id: Option<&str>,
    commitments: &[ClaimCommitment],
) -> Result<Vec<Endorsement>, SigningError> {
    let mut endorsements = Vec::with_capacity(commitments.len());
    for commitment in commitments {
        let content = endorsement_content(subject_id, subject_type_id, &commitment.hash);
        let endorsement_signature = endorser.sign(content.as_bytes()).await?;
        endorsements.push(Endorsement {
            claim: commitment.plaintext.clone(),
            claim_hash: commitment.hash.clone(),
            endorsement_signature,
        });
    }
    Ok(endorsements)
}

/// Endorsements keyed by claim hash, as request bodies carry them.
pub fn endorsement_map(endorsements: &[Endorsement]) -> BTreeMap<ClaimHash, Signature> {
    endorsements
        .iter()
        .map(|e| (e.claim_hash.clone(), e.endorsement_signature.clone()))
        .collect()
}
