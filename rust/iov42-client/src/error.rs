use iov42_protocol::SigningError;
use std::time::Duration;
use thiserror::Error;

/// Errors that prevent a request from reaching a terminal response.
///
/// An HTTP failure status is not one of these: it comes back as an
/// unsuccessful [`crate::ResponseResult`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP exchange itself failed
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A request URL could not be built
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Signing the request failed
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Request headers could not be encoded
    #[error("Unable to encode request headers: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A successful response body was not the expected shape
    #[error("Unable to decode HTTP {status} response: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A redirect carried no usable Location header
    #[error("HTTP {status} redirect without a valid Location header")]
    MissingLocation { status: u16 },

    /// More redirects than configured were followed
    #[error("Gave up after following {attempts} redirects")]
    RedirectLimit { attempts: u32 },

    /// Following redirects took longer than configured
    #[error("Gave up polling after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}
