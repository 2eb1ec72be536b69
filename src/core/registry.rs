//! # Listener registry - per-key ordered listener storage.
//!
//! Maps each [`EventKey`] to the ordered collection of its live listeners.
//! Registration order is semantically meaningful: dispatch initiates
//! deliveries in exactly this order.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─► DashMap<EventKey, Vec<Arc<Entry>>>     (per-shard locking)
//!            │
//!            └─► Entry { id, listener, stopped: AtomicBool }
//! ```
//!
//! ## Rules
//! - **Insertion**: append to the bucket, creating it if absent; always
//!   succeeds, safe under any concurrency.
//! - **Traversal**: dispatch works on a [`snapshot`](Registry::snapshot)
//!   taken at publish-call time; the bucket itself is never mutated during
//!   iteration, so removal can never skip a not-yet-visited sibling.
//! - **Removal**: mark the entry's `stopped` flag (release), then compact
//!   the bucket by id with `retain`. Snapshots taken by racing publishes
//!   re-check the flag (acquire) before initiating, so a retired entry is
//!   never invoked again.
//! - **Locks**: shard locks are held only for the append/copy/compact
//!   itself, never across `.await`.
//! - An absent bucket and an empty bucket are equivalent; buckets are
//!   removed when their last entry goes.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::events::EventKey;
use crate::listeners::{ListenerId, ListenerRef};

/// One registration: the listener, its identity, and its lifecycle gate.
///
/// The `stopped` flag is the absorbing `REMOVED` state: once set it never
/// clears, and a set flag is observed (acquire) by every dispatch before
/// initiation.
pub(crate) struct Entry {
    id: ListenerId,
    listener: ListenerRef,
    stopped: AtomicBool,
}

impl Entry {
    fn new(listener: ListenerRef) -> Arc<Self> {
        Arc::new(Self {
            id: ListenerId::next(),
            listener,
            stopped: AtomicBool::new(false),
        })
    }

    #[inline]
    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    #[inline]
    pub(crate) fn listener(&self) -> &ListenerRef {
        &self.listener
    }

    /// Whether this entry has left the registered state.
    #[inline]
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(AtomicOrdering::Acquire)
    }

    /// Moves the entry into the absorbing stopped state.
    ///
    /// Returns `true` for exactly one caller, even when a `Stopped` verdict
    /// races an explicit unsubscribe; only that caller compacts the bucket.
    #[inline]
    pub(crate) fn retire(&self) -> bool {
        !self.stopped.swap(true, AtomicOrdering::AcqRel)
    }
}

/// Concurrent per-key listener storage.
pub(crate) struct Registry {
    buckets: DashMap<EventKey, Vec<Arc<Entry>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Appends a listener to the bucket for `key`, creating it if absent.
    pub(crate) fn insert(&self, key: EventKey, listener: ListenerRef) -> ListenerId {
        let entry = Entry::new(listener);
        let id = entry.id();
        self.buckets.entry(key).or_default().push(entry);
        id
    }

    /// Returns a point-in-time copy of the live entries for `key`, in
    /// registration order.
    ///
    /// Listeners registered after the snapshot was taken are not part of the
    /// dispatch that requested it; they are visible to every later snapshot.
    pub(crate) fn snapshot(&self, key: EventKey) -> Vec<Arc<Entry>> {
        match self.buckets.get(&key) {
            Some(bucket) => bucket
                .iter()
                .filter(|entry| !entry.is_stopped())
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Compacts the bucket for `key`, dropping the entry with `id`.
    ///
    /// Removes the bucket itself when it becomes empty.
    pub(crate) fn remove(&self, key: EventKey, id: ListenerId) -> bool {
        let removed = match self.buckets.get_mut(&key) {
            Some(mut bucket) => {
                let before = bucket.len();
                bucket.retain(|entry| entry.id() != id);
                bucket.len() != before
            }
            None => false,
        };

        if removed {
            self.buckets.remove_if(&key, |_, bucket| bucket.is_empty());
        }
        removed
    }

    /// Explicit unsubscribe: retires the entry (so in-flight snapshots skip
    /// it) and compacts the bucket.
    ///
    /// Returns `false` when the registration is unknown or already retired.
    pub(crate) fn discard(&self, key: EventKey, id: ListenerId) -> bool {
        let retired = match self.buckets.get(&key) {
            Some(bucket) => bucket
                .iter()
                .find(|entry| entry.id() == id)
                .is_some_and(|entry| entry.retire()),
            None => false,
        };

        if retired {
            self.remove(key, id);
        }
        retired
    }

    #[cfg(test)]
    pub(crate) fn len(&self, key: EventKey) -> usize {
        self.buckets.get(&key).map_or(0, |bucket| bucket.len())
    }
}
