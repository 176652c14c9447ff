//! Header names and `base64url(json(..))` header codecs.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{AuthenticationHeader, Authorisation, DecodeError, encoding};

/// Carries `base64url(json(Authorisation[]))`.
pub const AUTHORISATIONS: &str = "X-IOV42-Authorisations";

/// Carries `base64url(json(AuthenticationHeader))`.
pub const AUTHENTICATION: &str = "X-IOV42-Authentication";

/// Carries `base64url(json({hash: plaintext}))`.
pub const CLAIMS: &str = "X-IOV42-Claims";

/// Encode a value as a header.
pub fn encode<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    Ok(encoding::encode(serde_json::to_vec(value)?))
}

/// Decode a header into a value.
pub fn decode<T>(header: &str) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_slice(&encoding::decode(header)?)?)
}

/// Decode an authorisations header.
pub fn decode_authorisations(header: &str) -> Result<Vec<Authorisation>, DecodeError> {
    decode(header)
}

/// Decode an authentication header.
pub fn decode_authentication(header: &str) -> Result<AuthenticationHeader, DecodeError> {
    decode(header)
}
