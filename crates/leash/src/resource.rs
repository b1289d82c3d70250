//! Resource-style issuer: a fixed table of named CRUD actions over one
//! URL template, each invocation yielding a cancellable handle.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::factory::{ActionDescriptor, ResourceConfig};
use crate::handle::RequestHandle;
use crate::issue::Issuer;
use crate::request::{Params, RequestDescriptor};
use crate::urls::UrlTools;

/// Issuer for a resource-style endpoint.
///
/// The action table is resolved once at construction; invoking an
/// undeclared name is a synchronous [`ConfigError`], never a settled
/// failure. All handles issued here share one registry, so
/// [`abort_all`](Self::abort_all) rejects exactly the calls made through
/// this resource.
pub struct Resource {
    url: String,
    params: Params,
    actions: HashMap<String, ActionDescriptor>,
    urls: Arc<dyn UrlTools>,
    issuer: Issuer,
}

impl Resource {
    pub(crate) fn new(
        config: ResourceConfig,
        urls: Arc<dyn UrlTools>,
        issuer: Issuer,
    ) -> Result<Self, ConfigError> {
        if config.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        for (name, descriptor) in &config.actions {
            if descriptor.url.as_deref() == Some("") {
                return Err(ConfigError::InvalidAction {
                    name: name.clone(),
                    reason: "empty URL override".to_string(),
                });
            }
        }
        Ok(Self {
            url: config.url,
            params: config.params,
            actions: config.actions,
            urls,
            issuer,
        })
    }

    /// Invoke a declared action: interpolate the template with the merged
    /// params (config defaults overlaid by `params`), dispatch through the
    /// transport, and return the cancellable handle.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownAction`] when `action` was never
    /// declared.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn invoke(
        &self,
        action: &str,
        params: &Params,
        data: Option<serde_json::Value>,
    ) -> Result<RequestHandle, ConfigError> {
        let descriptor = self
            .actions
            .get(action)
            .ok_or_else(|| ConfigError::UnknownAction(action.to_string()))?;

        let template = descriptor.url.as_deref().unwrap_or(&self.url);
        let mut merged = self.params.clone();
        merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

        let request = RequestDescriptor {
            method: descriptor.method,
            url: self.urls.interpolate(template, &merged),
            params: descriptor.params.clone(),
            headers: Vec::new(),
            body: data,
        };
        Ok(self.issuer.issue(request))
    }

    /// Names of the declared actions, in no particular order.
    #[must_use]
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Reject every outstanding call with the default abort reason.
    pub fn abort_all(&self) {
        self.issuer.abort_all();
    }

    /// Reject every outstanding call with `reason` (passed through
    /// verbatim, empty string included).
    pub fn abort_all_with(&self, reason: &str) {
        self.issuer.abort_all_with(reason);
    }

    /// Number of calls issued here that have not settled yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.issuer.outstanding()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("url", &self.url)
            .field("actions", &self.actions.keys())
            .field("outstanding", &self.outstanding())
            .finish_non_exhaustive()
    }
}
