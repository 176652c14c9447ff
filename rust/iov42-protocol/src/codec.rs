//! Canonical content for every signable artifact.
//!
//! Client and verifier must agree on these bytes exactly. None of the
//! encodings carry a domain separation prefix; the platform verifies the
//! bare content.

use crate::{Authorisation, ClaimHash, FinalizedBody};

/// Content an authorisation signs: the finalized body bytes, verbatim.
pub fn write_body_content(body: &FinalizedBody) -> &[u8] {
    body.as_bytes()
}

/// Content a signed read authenticates: the request path including its
/// query string.
pub fn read_content(path_and_query: &str) -> &[u8] {
    path_and_query.as_bytes()
}

/// Content an endorser signs for a claim on a subject.
///
/// `{subject_id};{subject_type_id};{claim_hash}` when the subject has a type,
/// otherwise `{subject_id};{claim_hash}` with no empty segment.
pub fn endorsement_content(
    subject_id: &str,
    subject_type_id: Option<&str>,
    claim_hash: &ClaimHash,
) -> String {
    match subject_type_id {
        Some(subject_type_id) => format!("{subject_id};{subject_type_id};{claim_hash}"),
        None => format!("{subject_id};{claim_hash}"),
    }
}

/// Content the authentication signs: authorisation signatures joined by `;`
/// in array order.
pub fn authentication_content(authorisations: &[Authorisation]) -> String {
    authorisations
        .iter()
        .map(|authorisation| authorisation.signature.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
