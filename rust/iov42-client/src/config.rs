//! Client configuration.

use std::time::Duration;
use url::Url;

/// Configuration for a [`crate::Client`] and its transport.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the platform API (e.g., "https://node.example.com/api/v1")
    pub endpoint: String,

    /// Optional timeout for each HTTP exchange in seconds (default: 30)
    pub timeout_seconds: Option<u64>,

    /// Delay applied to the first read issued inside a consistency window
    pub consistency_delay: Duration,

    /// Maximum redirects followed for a single request (default: 60)
    pub max_redirects: u32,

    /// Optional bound on the total time spent following redirects
    pub poll_deadline: Option<Duration>,

    /// Optional custom headers to send with each request
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/v1".to_string(),
            timeout_seconds: Some(30),
            consistency_delay: Duration::from_secs(2),
            max_redirects: 60,
            poll_deadline: None,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration for the given API base URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the read-after-write delay
    pub fn with_consistency_delay(mut self, delay: Duration) -> Self {
        self.consistency_delay = delay;
        self
    }

    /// Bound the number of redirects followed per request
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Bound the total time spent following redirects per request
    pub fn with_poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = Some(deadline);
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// The endpoint as a base URL that relative paths can be joined onto.
    pub(crate) fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut endpoint = self.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Url::parse(&endpoint)
    }
}
