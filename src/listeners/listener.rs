//! # Listener trait and per-invocation verdict.
//!
//! A listener is a registered, removable unit of behavior bound to one event
//! category. Each invocation consumes one [`Event`] and reports a
//! [`ListeningStatus`] that decides whether the listener survives:
//!
//! ```text
//! REGISTERED ──invoked──► Listening ──► REGISTERED   (repeatable)
//! REGISTERED ──invoked──► Stopped   ──► REMOVED      (terminal, absorbing)
//! ```
//!
//! ## Rules
//! - A listener that reported [`ListeningStatus::Stopped`] is never invoked
//!   again, for any event of any category.
//! - Listener bodies may suspend freely; a suspended body never blocks
//!   delivery to other listeners or unrelated publishes.
//! - Errors are reported through `Err`, not panics; panics are still caught
//!   and surfaced through the fault channel, but `Err` carries structure.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use evbus::{Event, Listen, ListenError, ListeningStatus};
//!
//! struct CountDown {
//!     left: std::sync::atomic::AtomicU32,
//! }
//!
//! #[async_trait]
//! impl Listen for CountDown {
//!     async fn on_event(&self, _event: &Event) -> Result<ListeningStatus, ListenError> {
//!         use std::sync::atomic::Ordering;
//!         if self.left.fetch_sub(1, Ordering::AcqRel) <= 1 {
//!             Ok(ListeningStatus::Stopped)
//!         } else {
//!             Ok(ListeningStatus::Listening)
//!         }
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenError;
use crate::events::Event;

/// Global counter for listener identity allocation.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Per-invocation verdict deciding whether a listener stays registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningStatus {
    /// Keep the listener registered; it will receive future events.
    Listening,
    /// Remove the listener permanently after this invocation.
    Stopped,
}

impl ListeningStatus {
    /// Returns `true` for [`ListeningStatus::Stopped`].
    #[inline]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ListeningStatus::Stopped)
    }
}

/// # Asynchronous listener unit.
///
/// Implementors receive one event per invocation and report a
/// [`ListeningStatus`]. The body may suspend at any point it chooses; the
/// dispatch engine treats it as an opaque asynchronous unit.
#[async_trait]
pub trait Listen: Send + Sync + 'static {
    /// Processes a single event and reports whether to keep listening.
    ///
    /// Called from a dispatch task, never in the publisher's call stack.
    /// Returning `Err` routes a fault to the bus's fault sink; whether the
    /// listener then stays registered is decided by the bus's
    /// [`FaultPolicy`](crate::FaultPolicy).
    async fn on_event(&self, event: &Event) -> Result<ListeningStatus, ListenError>;
}

/// Shared handle to a listener (`Arc<dyn Listen>`).
pub type ListenerRef = Arc<dyn Listen>;

/// Unique identity of one registration.
///
/// Allocated when the listener is registered; used to remove that exact
/// registration, either by the engine (on `Stopped`) or explicitly via
/// [`EventBus::unsubscribe`](crate::EventBus::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(LISTENER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
