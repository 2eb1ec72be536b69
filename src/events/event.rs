//! # Event instances delivered to listeners.
//!
//! An [`Event`] couples an opaque payload with the [`EventKey`] of its
//! category plus delivery metadata:
//! - `seq`: a globally unique, monotonically increasing sequence number;
//! - `at`: wall-clock timestamp taken at construction (for logs).
//!
//! The bus never inspects the payload; it is owned by the publisher and
//! shared with listeners behind an `Arc`. Listeners that know the concrete
//! type can recover it with [`Event::payload`].
//!
//! ## Rules
//! - Events are immutable after construction; cloning shares the payload.
//! - Listeners must treat the payload as read-only.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use super::key::EventKey;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A single published event: category key, metadata, opaque payload.
///
/// Cheap to clone (the payload is `Arc`-backed); every listener invoked for
/// one publish observes the same payload instance.
#[derive(Clone)]
pub struct Event {
    key: EventKey,
    seq: u64,
    at: SystemTime,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Event {
    /// Creates a new event of category `key` carrying `payload`.
    pub fn new(key: EventKey, payload: impl Any + Send + Sync) -> Self {
        Self {
            key,
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            payload: Arc::new(payload),
        }
    }

    /// Creates a payload-less event, useful for pure notification categories.
    pub fn signal(key: EventKey) -> Self {
        Self::new(key, ())
    }

    /// Returns the category key this event belongs to.
    #[inline]
    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Returns the globally unique, monotonically increasing sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the wall-clock timestamp taken at construction.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// Downcasts the payload to `T`, returning `None` on type mismatch.
    ///
    /// ## Example
    /// ```rust
    /// use evbus::{Event, EventKey};
    ///
    /// let key = EventKey::new("order.created");
    /// let ev = Event::new(key, 42u64);
    ///
    /// assert_eq!(ev.payload::<u64>(), Some(&42));
    /// assert_eq!(ev.payload::<String>(), None);
    /// ```
    #[inline]
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("key", &self.key)
            .field("seq", &self.seq)
            .field("at", &self.at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_downcast() {
        let key = EventKey::new("payload");
        let ev = Event::new(key, String::from("hello"));

        assert_eq!(ev.payload::<String>().map(String::as_str), Some("hello"));
        assert!(ev.payload::<u32>().is_none());
    }

    #[test]
    fn test_signal_carries_unit_payload() {
        let key = EventKey::new("signal");
        let ev = Event::signal(key);
        assert!(ev.payload::<()>().is_some());
    }

    #[test]
    fn test_seq_is_monotonic() {
        let key = EventKey::new("seq");
        let first = Event::new(key, 1u8);
        let second = Event::new(key, 2u8);
        assert!(second.seq() > first.seq());
    }

    #[test]
    fn test_clone_shares_payload() {
        let key = EventKey::new("clone");
        let ev = Event::new(key, vec![1, 2, 3]);
        let copy = ev.clone();

        assert_eq!(copy.seq(), ev.seq());
        assert_eq!(copy.payload::<Vec<i32>>(), ev.payload::<Vec<i32>>());
    }
}
