//! Abortable HTTP requests with per-endpoint in-flight tracking.
//!
//! This crate wraps asynchronous HTTP calls in cancellable handles: every
//! issued request can be awaited for its outcome *and* aborted explicitly,
//! and every issuer tracks its unsettled requests so a whole endpoint can
//! be aborted in one call. Aborting never withdraws bytes already on the
//! wire: it settles the caller-facing handle immediately and lets the
//! transport call finish into the void.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use leash::{HttpTransport, Params, RequestFactory};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = RequestFactory::new(Arc::new(HttpTransport::new()?));
//! let requester = factory.create_http_requester("http://api.example.com/items/:id")?;
//!
//! let options = Params::from([("id".to_string(), "42".to_string())]);
//! let handle = requester.execute(&options, None, None);
//!
//! // Keep a detached abort control; awaiting consumes the handle.
//! let abort = handle.abort_handle();
//!
//! let response = handle.await?;
//! println!("{} {}", response.status, response.body);
//! # drop(abort);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`RequestFactory`] builds issuers from declarative endpoint configs,
//!   carrying the transport, the URL tools, and the default abort reason
//!   into each one.
//! - [`Resource`] is the multi-action issuer (one callable entry per
//!   declared CRUD action); [`HttpRequester`] is the single templated
//!   endpoint with an `execute` entry point.
//! - Both hand out a [`RequestHandle`] per call and track it in an
//!   [`OutstandingRegistry`] until it settles, whether by transport
//!   completion or by abort. The first settlement wins.
//! - [`Transport`] is the I/O seam; [`HttpTransport`] is the shipped
//!   reqwest-backed implementation.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod factory;
pub mod handle;
mod issue;
pub mod outstanding;
pub mod request;
pub mod requester;
pub mod resource;
pub mod transport;
pub mod urls;

pub use error::{ConfigError, RequestError, TransportError};
pub use factory::{
    ActionDescriptor, DEFAULT_ABORT_REASON, RequestFactory, RequesterConfig, ResourceConfig,
};
pub use handle::{AbortHandle, RequestHandle};
pub use outstanding::OutstandingRegistry;
pub use request::{Method, Params, RequestDescriptor, Response};
pub use requester::HttpRequester;
pub use resource::Resource;
pub use transport::{HttpTransport, Transport};
pub use urls::{ColonUrlTools, SplitUrl, UrlTools};
