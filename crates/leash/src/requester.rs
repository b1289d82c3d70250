//! Templated single-endpoint issuer: one `execute` entry point with
//! per-call interpolation and descriptor overrides.

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::factory::RequesterConfig;
use crate::handle::RequestHandle;
use crate::issue::Issuer;
use crate::request::{Params, RequestDescriptor};
use crate::urls::UrlTools;

/// Issuer for one templated HTTP endpoint.
///
/// The configured descriptor is immutable: every call clones it and
/// interpolates the clone, so repeated executes always start from the
/// original template and per-call overrides never leak into later calls.
pub struct HttpRequester {
    base: RequestDescriptor,
    urls: Arc<dyn UrlTools>,
    issuer: Issuer,
}

impl HttpRequester {
    pub(crate) fn new(
        config: RequesterConfig,
        urls: Arc<dyn UrlTools>,
        issuer: Issuer,
    ) -> Result<Self, ConfigError> {
        if config.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        Ok(Self {
            base: RequestDescriptor {
                method: config.method,
                url: config.url,
                params: config.params,
                headers: config.headers,
                body: config.data,
            },
            urls,
            issuer,
        })
    }

    /// Execute the templated request: interpolate the template with
    /// `options`, overlay the overrides, dispatch through the transport,
    /// and return the cancellable handle.
    ///
    /// An absolute template (starting with `http`) has only its remainder
    /// after the protocol interpolated; a relative template is
    /// interpolated whole. A `Some` override replaces the corresponding
    /// descriptor field for this call only.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn execute(
        &self,
        options: &Params,
        params: Option<Params>,
        data: Option<serde_json::Value>,
    ) -> RequestHandle {
        let mut request = self.base.clone();
        request.url = self.resolve_url(options);
        if let Some(params) = params {
            request.params = params;
        }
        if let Some(data) = data {
            request.body = Some(data);
        }
        self.issuer.issue(request)
    }

    /// Reject every outstanding execute with the default abort reason.
    pub fn abort_all(&self) {
        self.issuer.abort_all();
    }

    /// Reject every outstanding execute with `reason` (passed through
    /// verbatim, empty string included).
    pub fn abort_all_with(&self, reason: &str) {
        self.issuer.abort_all_with(reason);
    }

    /// Number of executes issued here that have not settled yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.issuer.outstanding()
    }

    /// Interpolate the pristine template for one call. Absolute URLs keep
    /// their protocol out of the interpolation so the scheme separator
    /// can never be rewritten.
    fn resolve_url(&self, options: &Params) -> String {
        if self.base.url.starts_with("http") {
            let split = self.urls.split_protocol(&self.base.url);
            format!(
                "{}{}",
                split.protocol,
                self.urls.interpolate(&split.rest, options)
            )
        } else {
            self.urls.interpolate(&self.base.url, options)
        }
    }
}

impl fmt::Debug for HttpRequester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequester")
            .field("method", &self.base.method)
            .field("url", &self.base.url)
            .field("outstanding", &self.outstanding())
            .finish_non_exhaustive()
    }
}
