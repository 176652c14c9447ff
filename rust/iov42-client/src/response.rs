//! Uniform results for terminal responses.

use iov42_protocol::PublicCredentials;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::TransportError;

/// A single entry of the platform's error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformError {
    #[serde(default)]
    pub error_code: u32,
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<PlatformError>,
}

/// What the platform returns once a write has been processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub request_id: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub proof: Option<String>,
}

/// An identity and the keys registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInfo {
    pub identity_id: String,
    #[serde(default)]
    pub public_credentials: Vec<PublicCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_id: String,
    #[serde(default)]
    pub public_credentials: Option<PublicCredentials>,
}

/// The outcome of a request that reached a terminal (non-redirect) status.
///
/// Failure statuses are reported here rather than as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult<T> {
    pub success: bool,
    pub status_code: u16,
    pub reason: String,
    /// Decoded body of a successful response with content
    pub value: Option<T>,
    /// Decoded error envelope of a failed response, if it had one
    pub errors: Vec<PlatformError>,
}

impl<T> ResponseResult<T>
where
    T: DeserializeOwned,
{
    pub(crate) async fn from_response(response: reqwest::Response) -> Result<Self, TransportError> {
        let status = response.status();
        let body = response.bytes().await?;
        Self::from_parts(status, &body)
    }

    pub(crate) fn from_parts(status: StatusCode, body: &[u8]) -> Result<Self, TransportError> {
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();

        if status.is_success() {
            let value = if body.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(
                    serde_json::from_slice(body).map_err(|source| TransportError::Decode {
                        status: status.as_u16(),
                        source,
                    })?,
                )
            };

            return Ok(Self {
                success: true,
                status_code: status.as_u16(),
                reason,
                value,
                errors: Vec::new(),
            });
        }

        let errors = serde_json::from_slice::<ErrorEnvelope>(body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();

        Ok(Self {
            success: false,
            status_code: status.as_u16(),
            reason,
            value: None,
            errors,
        })
    }
}

impl<T> ResponseResult<T> {
    /// The decoded value, if the request succeeded with a body.
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}
