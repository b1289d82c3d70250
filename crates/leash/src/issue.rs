//! Shared issuing core: what both issuer kinds do identically per call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::handle::{AbortHandle, RequestHandle, SettleCell};
use crate::outstanding::OutstandingRegistry;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

/// Per-issuer state: the transport, the registry of unsettled requests,
/// the configured default abort reason, and the id sequence.
pub(crate) struct Issuer {
    transport: Arc<dyn Transport>,
    registry: OutstandingRegistry,
    default_reason: Arc<str>,
    next_id: AtomicU64,
}

impl Issuer {
    pub(crate) fn new(transport: Arc<dyn Transport>, default_reason: Arc<str>) -> Self {
        Self {
            transport,
            registry: OutstandingRegistry::new(),
            default_reason,
            next_id: AtomicU64::new(1),
        }
    }

    /// Issue one request: register a fresh settle cell, spawn the driver
    /// task that awaits the transport, and hand back the caller's handle.
    ///
    /// Registration happens before the driver starts, so a transport that
    /// settles instantly still finds its registry entry to remove. The
    /// driver settles first and deregisters second, matching the abort
    /// path, so cleanup runs exactly once no matter which side wins.
    pub(crate) fn issue(&self, request: RequestDescriptor) -> RequestHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cell, rx) = SettleCell::new();
        self.registry.register(id, cell.clone());
        debug!(id, method = %request.method, url = %request.url, "issuing request");

        let transport = Arc::clone(&self.transport);
        let registry = self.registry.clone();
        let driver_cell = cell.clone();
        tokio::spawn(async move {
            let outcome = transport.dispatch(request).await.map_err(RequestError::from);
            let failure = outcome.as_ref().err().map(ToString::to_string);
            if driver_cell.settle(outcome) {
                match failure {
                    Some(error) => warn!(id, error = %error, "request settled with transport failure"),
                    None => debug!(id, "request settled by transport"),
                }
            }
            registry.remove(id);
        });

        let abort = AbortHandle::new(
            cell,
            self.registry.clone(),
            id,
            Arc::clone(&self.default_reason),
        );
        RequestHandle::new(rx, abort)
    }

    /// Reject every outstanding request with the default abort reason.
    pub(crate) fn abort_all(&self) {
        self.abort_all_with(&self.default_reason);
    }

    /// Reject every outstanding request with `reason`.
    pub(crate) fn abort_all_with(&self, reason: &str) {
        let rejected = self.registry.reject_all(reason);
        info!(rejected, reason, "aborted all outstanding requests");
    }

    /// Number of unsettled requests on this issuer.
    pub(crate) fn outstanding(&self) -> usize {
        self.registry.len()
    }
}
