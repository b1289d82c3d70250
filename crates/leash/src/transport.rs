//! Transport seam and the shipped reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::TransportError;
use crate::request::{Method, RequestDescriptor, Response};

/// Default timeout for transport requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Performs the actual HTTP I/O for an issuer.
///
/// Implementations must support being invoked repeatedly with independent
/// descriptors built from the same template; nothing may be retained
/// between calls. Issuers never retry: one `dispatch` produces exactly one
/// outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` and produce the response payload or a failure.
    async fn dispatch(&self, request: RequestDescriptor) -> Result<Response, TransportError>;
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
///
/// Non-success statuses reject the call with [`TransportError::Status`],
/// mirroring how issuer callers expect bad responses to surface as
/// failures rather than as payloads. A transport with different status
/// semantics can replace this one behind the same trait.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: RequestDescriptor) -> Result<Response, TransportError> {
        debug!(method = %request.method, url = %request.url, "dispatching HTTP request");

        let mut builder = self.client.request(to_reqwest(request.method), &request.url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        if status.is_success() {
            Ok(Response {
                status: status.as_u16(),
                headers,
                body,
            })
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_mapping_covers_all_variants() {
        assert_eq!(to_reqwest(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest(Method::Post), reqwest::Method::POST);
        assert_eq!(to_reqwest(Method::Put), reqwest::Method::PUT);
        assert_eq!(to_reqwest(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(to_reqwest(Method::Head), reqwest::Method::HEAD);
    }
}
