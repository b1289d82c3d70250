//! Error types for issuers, transports, and settled requests.

use thiserror::Error;

/// Errors raised synchronously while building or addressing an issuer.
///
/// Configuration problems are never deferred into a handle: a bad config
/// fails the construction call itself, and an unknown action name fails
/// the `invoke` call before anything is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The endpoint config carries no URL template.
    #[error("missing URL template")]
    MissingUrl,

    /// A declared action is unusable as written.
    #[error("invalid action `{name}`: {reason}")]
    InvalidAction { name: String, reason: String },

    /// The invoked action name was never declared on the resource.
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// An HTTP method string did not parse.
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
}

/// Errors produced by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed below the protocol level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-specific failure that fits no other variant.
    #[error("{0}")]
    Other(String),
}

/// The failure half of a settled request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The transport failed; the inner error is surfaced verbatim.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The request was aborted before the transport settled it.
    #[error("aborted: {reason}")]
    Aborted { reason: String },

    /// The in-flight request was torn down (runtime shutdown) before any
    /// settlement reached the handle. Not produced in normal operation.
    #[error("request dropped before settlement")]
    Dropped,
}

impl RequestError {
    /// The abort reason, if this failure is an abort rejection.
    #[must_use]
    pub fn abort_reason(&self) -> Option<&str> {
        match self {
            Self::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_reason_only_for_aborts() {
        let aborted = RequestError::Aborted {
            reason: "shutdown".to_string(),
        };
        assert_eq!(aborted.abort_reason(), Some("shutdown"));

        let failed = RequestError::Transport(TransportError::Other("boom".to_string()));
        assert_eq!(failed.abort_reason(), None);
        assert_eq!(RequestError::Dropped.abort_reason(), None);
    }

    #[test]
    fn config_errors_render_the_offending_name() {
        let err = ConfigError::UnknownAction("destroy".to_string());
        assert_eq!(err.to_string(), "unknown action `destroy`");

        let err = ConfigError::InvalidAction {
            name: "get".to_string(),
            reason: "empty URL override".to_string(),
        };
        assert_eq!(err.to_string(), "invalid action `get`: empty URL override");
    }
}
