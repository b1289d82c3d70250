//! Factory that turns declarative endpoint configs into issuers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::issue::Issuer;
use crate::request::{Method, Params};
use crate::requester::HttpRequester;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::urls::{ColonUrlTools, UrlTools};

/// Abort reason substituted whenever a caller aborts without supplying one.
pub const DEFAULT_ABORT_REASON: &str = "ABORT";

/// Declarative description of one action on a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// HTTP method the action dispatches with.
    #[serde(default)]
    pub method: Method,
    /// Replacement URL template for this action; the resource template is
    /// used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Query parameters the action always sends.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: Params,
}

impl ActionDescriptor {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set a per-action URL template override.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add a query parameter the action always sends.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Declarative description of a resource-style endpoint: a URL template,
/// default interpolation params, and a table of named actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// URL template shared by the actions (e.g. `/todos/:id`).
    pub url: String,
    /// Default interpolation values, overridden key-by-key by per-call
    /// params.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: Params,
    /// Action name → descriptor.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub actions: HashMap<String, ActionDescriptor>,
}

impl ResourceConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Declare an action.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, descriptor: ActionDescriptor) -> Self {
        self.actions.insert(name.into(), descriptor);
        self
    }

    /// Set a default interpolation value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Declarative description of a single templated request endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequesterConfig {
    /// HTTP method; GET when built from a bare URL string.
    #[serde(default)]
    pub method: Method,
    /// URL template (e.g. `http://api.example.com/items/:id`).
    pub url: String,
    /// Query parameters sent with every execute (replaceable per call).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: Params,
    /// Headers sent with every execute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    /// JSON body sent with every execute (replaceable per call).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RequesterConfig {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }
}

/// A bare URL string configures a GET requester.
impl From<&str> for RequesterConfig {
    fn from(url: &str) -> Self {
        Self::new(Method::Get, url)
    }
}

impl From<String> for RequesterConfig {
    fn from(url: String) -> Self {
        Self::new(Method::Get, url)
    }
}

/// Builds cancellable-request issuers around a shared transport.
///
/// The transport, the URL tools, and the default abort reason are fixed at
/// construction and copied into every issuer the factory builds; issuers
/// never reach for ambient state.
pub struct RequestFactory {
    transport: Arc<dyn Transport>,
    urls: Arc<dyn UrlTools>,
    default_abort_reason: Arc<str>,
}

impl RequestFactory {
    /// Create a factory over `transport` with [`ColonUrlTools`] and
    /// [`DEFAULT_ABORT_REASON`].
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            urls: Arc::new(ColonUrlTools),
            default_abort_reason: Arc::from(DEFAULT_ABORT_REASON),
        }
    }

    /// Replace the URL tools used by issuers built from this factory.
    #[must_use]
    pub fn with_url_tools(mut self, urls: Arc<dyn UrlTools>) -> Self {
        self.urls = urls;
        self
    }

    /// Replace the default abort reason.
    #[must_use]
    pub fn with_default_abort_reason(mut self, reason: impl Into<String>) -> Self {
        self.default_abort_reason = Arc::from(reason.into());
        self
    }

    /// Build a resource issuer with one callable entry per declared action.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the config has no URL template or a
    /// declared action is malformed.
    pub fn create_resource(&self, config: ResourceConfig) -> Result<Resource, ConfigError> {
        Resource::new(config, Arc::clone(&self.urls), self.issuer())
    }

    /// Build a templated requester. `config` is either a full
    /// [`RequesterConfig`] or a bare URL string, which configures a GET.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the config has no URL template.
    pub fn create_http_requester(
        &self,
        config: impl Into<RequesterConfig>,
    ) -> Result<HttpRequester, ConfigError> {
        HttpRequester::new(config.into(), Arc::clone(&self.urls), self.issuer())
    }

    fn issuer(&self) -> Issuer {
        Issuer::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.default_abort_reason),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::request::{RequestDescriptor, Response};

    struct NullTransport;

    #[async_trait::async_trait]
    impl Transport for NullTransport {
        async fn dispatch(&self, _request: RequestDescriptor) -> Result<Response, TransportError> {
            std::future::pending().await
        }
    }

    fn factory() -> RequestFactory {
        RequestFactory::new(Arc::new(NullTransport))
    }

    #[test]
    fn bare_string_configures_a_get() {
        let config = RequesterConfig::from("/todos/:id");
        assert_eq!(config.method, Method::Get);
        assert_eq!(config.url, "/todos/:id");
    }

    #[test]
    fn missing_url_fails_construction_synchronously() {
        assert_eq!(
            factory().create_http_requester("").unwrap_err(),
            ConfigError::MissingUrl
        );
        assert_eq!(
            factory()
                .create_resource(ResourceConfig::default())
                .unwrap_err(),
            ConfigError::MissingUrl
        );
    }

    #[test]
    fn malformed_action_fails_construction_synchronously() {
        let config = ResourceConfig::new("/todos/:id")
            .action("get", ActionDescriptor::new(Method::Get).with_url(""));
        let err = factory().create_resource(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAction { name, .. } if name == "get"));
    }

    #[test]
    fn resource_config_deserializes_from_json() {
        let config: ResourceConfig = serde_json::from_str(
            r#"{
                "url": "/todos/:id",
                "params": {"id": "0"},
                "actions": {
                    "query": {"method": "GET", "url": "/todos"},
                    "save": {"method": "POST"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.actions.len(), 2);
        assert_eq!(config.actions["save"].method, Method::Post);
        assert_eq!(config.actions["query"].url.as_deref(), Some("/todos"));

        let resource = factory().create_resource(config).unwrap();
        let mut names = resource.action_names();
        names.sort_unstable();
        assert_eq!(names, vec!["query", "save"]);
    }
}
