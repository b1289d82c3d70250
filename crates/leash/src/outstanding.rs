//! Per-issuer tracking of unsettled requests.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::RequestError;
use crate::handle::SettleCell;

struct Entry {
    id: u64,
    cell: SettleCell,
}

/// Ordered collection of the currently-unsettled requests of one issuer.
///
/// A request is present here exactly while it is unsettled: it is
/// registered when issued and removed on settlement by any path (transport
/// success, transport failure, or abort), so the registry never grows
/// across a long-lived session. All operations are short lock-guarded
/// sections; none of them can fail.
#[derive(Clone, Default)]
pub struct OutstandingRegistry {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl OutstandingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Callers never register the same id twice.
    pub(crate) fn register(&self, id: u64, cell: SettleCell) {
        self.entries.lock().unwrap().push(Entry { id, cell });
    }

    /// Remove the first entry with `id`; no-op when absent (the entry may
    /// already have been cleared by [`reject_all`](Self::reject_all)).
    pub(crate) fn remove(&self, id: u64) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(index) = entries.iter().position(|entry| entry.id == id) {
            entries.remove(index);
        }
    }

    /// Reject every member with `reason` and clear the registry.
    ///
    /// The member list is swapped out under the lock first, so the set of
    /// rejected requests is exactly the set registered before this call;
    /// requests issued afterwards are untouched. Returns how many members
    /// were actually settled by this call (members that lost a settlement
    /// race in the meantime are skipped).
    pub fn reject_all(&self, reason: &str) -> usize {
        let drained = std::mem::take(&mut *self.entries.lock().unwrap());
        let mut rejected = 0;
        for entry in drained {
            if entry.cell.settle(Err(RequestError::Aborted {
                reason: reason.to_string(),
            })) {
                debug!(id = entry.id, reason, "request rejected in bulk abort");
                rejected += 1;
            }
        }
        rejected
    }

    /// Number of unsettled requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
