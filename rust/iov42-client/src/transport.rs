//! HTTP transport with redirect-driven polling.

use std::time::Duration;

use iov42_protocol::{AuthenticationHeader, SignedWrite, headers};
use reqwest::header::{CONTENT_TYPE, LOCATION, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::{Position, Url};

use crate::{ClientConfig, ResponseResult, TransportError};

/// Optional paging parameters for list reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<u32>,
    pub next: Option<String>,
}

impl Paging {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            next: None,
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }
}

/// Sends signed writes and reads, then follows platform redirects until a
/// terminal status arrives.
///
/// The platform answers a write with a redirect to the request's status
/// resource and keeps redirecting while processing is underway, optionally
/// asking the client to wait via `Retry-After`. Every redirect is reissued
/// as a plain GET carrying none of the original request's signed headers.
#[derive(Debug, Clone)]
pub struct RequestTransport {
    client: reqwest::Client,
    config: ClientConfig,
    base: Url,
}

impl RequestTransport {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let base = config.base_url()?;

        let mut client_builder =
            reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());

        if let Some(timeout) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(timeout));
        }

        let client = client_builder.build()?;

        Ok(Self {
            client,
            config,
            base,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `path` relative to the configured endpoint.
    ///
    /// A path already carrying the endpoint's path prefix resolves from the
    /// host root instead, so `/api/v1/node-info` and `node-info` name the
    /// same resource.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        if path.starts_with(self.base.path()) {
            return Ok(self.base.join(path)?);
        }
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// URL of a read, with paging parameters appended to the query.
    pub fn read_url(&self, path: &str, paging: &Paging) -> Result<Url, TransportError> {
        let mut url = self.url_for(path)?;
        if paging.limit.is_some() || paging.next.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = paging.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(next) = &paging.next {
                query.append_pair("next", next);
            }
        }
        Ok(url)
    }

    /// `PUT {endpoint}/requests/{requestId}` with the exact signed body.
    pub async fn put<T>(&self, write: &SignedWrite) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(&format!("requests/{}", write.request_id()))?;

        let mut builder = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in write.headers()? {
            builder = builder.header(name, value);
        }

        debug!(
            request_id = %write.request_id(),
            authorisations = write.authorisations.len(),
            claims = write.claims.is_some(),
            "submitting write"
        );

        let response = builder.body(write.body.as_bytes().to_vec()).send().await?;
        self.follow(response).await
    }

    /// GET `url`, authenticated when a header is given.
    pub async fn get<T>(
        &self,
        url: Url,
        authentication: Option<&AuthenticationHeader>,
    ) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::GET, url);
        if let Some(authentication) = authentication {
            builder = builder.header(headers::AUTHENTICATION, headers::encode(authentication)?);
        }

        let response = builder.send().await?;
        self.follow(response).await
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        for (name, value) in &self.config.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn follow<T>(
        &self,
        mut response: reqwest::Response,
    ) -> Result<ResponseResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        let started_at = Instant::now();
        let mut attempts = 0u32;

        while is_redirect(response.status()) {
            let status = response.status().as_u16();
            let location =
                redirect_location(&response).ok_or(TransportError::MissingLocation { status })?;
            let retry_after = retry_after(&response);

            if attempts >= self.config.max_redirects {
                warn!(attempts, location = %location, "redirect limit reached");
                return Err(TransportError::RedirectLimit { attempts });
            }

            if let Some(deadline) = self.config.poll_deadline {
                let elapsed = started_at.elapsed();
                let resume_at = elapsed.checked_add(retry_after);
                if resume_at.is_none_or(|resume_at| resume_at > deadline) {
                    warn!(
                        attempts,
                        elapsed_ms = elapsed.as_millis() as u64,
                        location = %location,
                        "poll deadline reached"
                    );
                    return Err(TransportError::DeadlineExceeded { elapsed });
                }
            }

            attempts += 1;
            debug!(
                attempt = attempts,
                status,
                location = %location,
                retry_after_ms = retry_after.as_millis() as u64,
                "following redirect"
            );

            if !retry_after.is_zero() {
                tokio::time::sleep(retry_after).await;
            }

            response = self.request(Method::GET, location).send().await?;
        }

        debug!(status = response.status().as_u16(), attempts, "terminal response");
        ResponseResult::from_response(response).await
    }
}

/// The path and query of `url`, which is what a signed read covers.
pub fn path_and_query(url: &Url) -> &str {
    &url[Position::BeforePath..Position::AfterQuery]
}

fn is_redirect(status: StatusCode) -> bool {
    (300..=308).contains(&status.as_u16())
}

fn redirect_location(response: &reqwest::Response) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    response.url().join(location).ok()
}

/// Seconds to wait before following; absent or unparseable means now.
fn retry_after(response: &reqwest::Response) -> Duration {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_default()
}
