//! Cancellable request handles and their settle-once result cell.
//!
//! Every issued request is backed by one [`SettleCell`]: a single-assignment
//! slot with two producers (the transport driver and the abort path) and one
//! consumer (the [`RequestHandle`] future). Whichever producer settles first
//! wins; the loser's attempt is silently ignored.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::RequestError;
use crate::outstanding::OutstandingRegistry;
use crate::request::Response;

/// What a request eventually settles to.
pub(crate) type Outcome = Result<Response, RequestError>;

/// Single-assignment result slot. The pending/settled tag is the
/// `Option` around the sender: `take()` under the lock marks settlement,
/// so a second producer finds the slot empty and backs off.
#[derive(Debug, Clone)]
pub(crate) struct SettleCell {
    tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl SettleCell {
    pub(crate) fn new() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let cell = Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        (cell, rx)
    }

    /// Attempt to settle with `outcome`. Returns `true` for the producer
    /// that won; later attempts return `false` and change nothing.
    pub(crate) fn settle(&self, outcome: Outcome) -> bool {
        let tx = self.tx.lock().unwrap().take();
        match tx {
            // The consumer may already be gone; the cell still counts as
            // settled so bookkeeping proceeds normally.
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.tx.lock().unwrap().is_none()
    }
}

/// Cheap, cloneable control that can reject one pending request.
///
/// Obtained from [`RequestHandle::abort_handle`] so the request can be
/// aborted from somewhere else while (or after) the handle itself is being
/// awaited. Aborting an already-settled request has no effect.
#[derive(Clone)]
pub struct AbortHandle {
    cell: SettleCell,
    registry: OutstandingRegistry,
    id: u64,
    default_reason: Arc<str>,
}

impl AbortHandle {
    pub(crate) fn new(
        cell: SettleCell,
        registry: OutstandingRegistry,
        id: u64,
        default_reason: Arc<str>,
    ) -> Self {
        Self {
            cell,
            registry,
            id,
            default_reason,
        }
    }

    /// Reject the request with the issuer's default abort reason.
    pub fn abort(&self) {
        self.reject(self.default_reason.as_ref().to_string());
    }

    /// Reject the request with `reason`, passed through verbatim. An
    /// empty string stays an empty string; it is not replaced by the
    /// default.
    pub fn abort_with(&self, reason: impl Into<String>) {
        self.reject(reason.into());
    }

    /// Issuer-local id of the request this handle controls.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the request has already settled (by any path).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cell.is_settled()
    }

    fn reject(&self, reason: String) {
        if self
            .cell
            .settle(Err(RequestError::Aborted {
                reason: reason.clone(),
            }))
        {
            self.registry.remove(self.id);
            debug!(id = self.id, reason = %reason, "request aborted");
        }
    }
}

impl fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortHandle")
            .field("id", &self.id)
            .field("settled", &self.cell.is_settled())
            .finish_non_exhaustive()
    }
}

/// One in-flight cancellable request.
///
/// Awaiting the handle yields whichever outcome settled the request
/// first: the transport's response, the transport's failure, or an abort
/// rejection. Abort through [`abort`](Self::abort) /
/// [`abort_with`](Self::abort_with) on the handle, or detach an
/// [`AbortHandle`] to abort from elsewhere. Dropping the handle does not
/// abort the request; the transport call keeps running and the registry is
/// still cleaned up when it settles.
pub struct RequestHandle {
    rx: oneshot::Receiver<Outcome>,
    abort: AbortHandle,
}

impl RequestHandle {
    pub(crate) fn new(rx: oneshot::Receiver<Outcome>, abort: AbortHandle) -> Self {
        Self { rx, abort }
    }

    /// Reject this request with the issuer's default abort reason.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Reject this request with `reason` (passed through verbatim).
    pub fn abort_with(&self, reason: impl Into<String>) {
        self.abort.abort_with(reason);
    }

    /// A cloneable abort control for this request.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Issuer-local id of this request.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.abort.id()
    }
}

impl fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandle")
            .field("id", &self.abort.id())
            .field("settled", &self.abort.is_settled())
            .finish_non_exhaustive()
    }
}

impl Future for RequestHandle {
    type Output = Result<Response, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(outcome) => outcome,
            // All senders vanished without settling: the driver task was
            // torn down with the runtime.
            Err(_) => Err(RequestError::Dropped),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_settlement_wins() {
        let (cell, mut rx) = SettleCell::new();
        assert!(!cell.is_settled());

        assert!(cell.settle(Err(RequestError::Aborted {
            reason: "first".to_string(),
        })));
        assert!(cell.is_settled());
        assert!(!cell.settle(Err(RequestError::Aborted {
            reason: "second".to_string(),
        })));

        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome.unwrap_err().abort_reason(), Some("first"));
    }

    #[test]
    fn settle_without_consumer_still_marks_settled() {
        let (cell, rx) = SettleCell::new();
        drop(rx);
        assert!(cell.settle(Ok(Response {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        })));
        assert!(cell.is_settled());
    }

    #[test]
    fn abort_settles_and_deregisters() {
        let registry = OutstandingRegistry::new();
        let (cell, mut rx) = SettleCell::new();
        registry.register(7, cell.clone());
        assert_eq!(registry.len(), 1);

        let abort = AbortHandle::new(cell, registry.clone(), 7, Arc::from("ABORT"));
        abort.abort();

        assert!(registry.is_empty());
        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome.unwrap_err().abort_reason(), Some("ABORT"));

        // A second abort is a no-op.
        abort.abort_with("again");
        assert!(abort.is_settled());
    }

    #[test]
    fn empty_reason_passes_through() {
        let registry = OutstandingRegistry::new();
        let (cell, mut rx) = SettleCell::new();
        registry.register(1, cell.clone());

        let abort = AbortHandle::new(cell, registry, 1, Arc::from("ABORT"));
        abort.abort_with("");

        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome.unwrap_err().abort_reason(), Some(""));
    }
}
