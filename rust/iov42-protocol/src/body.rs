//! Request identifiers and finalized request bodies.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use ulid::Ulid;

use crate::request::WriteRequest;

/// Caller chosen idempotency key for a write.
///
/// Resubmitting the same id with the same body is deduplicated by the
/// platform, so writes can be retried blindly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh, unique request id.
    pub fn new() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The single canonical encoding of a write body.
///
/// Authorisation signatures cover these exact bytes and the transport sends
/// these exact bytes; there is no way to re-serialize a finalized body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedBody {
    request_id: RequestId,
    bytes: Vec<u8>,
}

impl FinalizedBody {
    /// Serialize a typed request body as single-line camelCase JSON.
    pub fn new<B>(body: &B) -> Result<Self, serde_json::Error>
    where
        B: WriteRequest,
    {
        Ok(Self {
            request_id: body.request_id().clone(),
            bytes: serde_json::to_vec(body)?,
        })
    }

    /// Adopt bytes that were serialized elsewhere.
    ///
    /// The caller is responsible for never altering the encoding afterwards.
    pub fn from_bytes(request_id: RequestId, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            request_id,
            bytes: bytes.into(),
        }
    }

    /// The request id the body will be submitted under.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// The exact bytes to sign and transmit.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
