//! # Cancellation wrapper for listeners.
//!
//! The bus never interrupts a listener on its own; cancellation is layered on
//! top by wrapping the listener in [`WithCancel`] with a
//! [`CancellationToken`].
//!
//! ## Rules
//! - Token already cancelled when an event arrives: the inner listener is
//!   **not** invoked and the wrapper reports
//!   [`Stopped`](crate::ListeningStatus::Stopped) - a clean detach.
//! - Token fires while the inner body is suspended: the invocation is
//!   abandoned and [`ListenError::Canceled`] is surfaced through the fault
//!   channel (the interrupted body's status is unknowable). The next event,
//!   if the listener was retained, detaches it via the first rule.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use evbus::{Event, ListenerRef, WithCancel};
//!
//! let token = CancellationToken::new();
//! let inner: ListenerRef = evbus::always(|_ev: Event| async {});
//! let guarded: ListenerRef = WithCancel::arc(token.clone(), inner);
//! # let _ = guarded;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ListenError;
use crate::events::Event;
use crate::listeners::listener::{Listen, ListenerRef, ListeningStatus};

/// Listener wrapper that honors a [`CancellationToken`].
pub struct WithCancel {
    inner: ListenerRef,
    token: CancellationToken,
}

impl WithCancel {
    /// Wraps `inner` so that `token` controls its lifetime.
    pub fn new(token: CancellationToken, inner: ListenerRef) -> Self {
        Self { inner, token }
    }

    /// Wraps and returns the listener as a shared handle.
    pub fn arc(token: CancellationToken, inner: ListenerRef) -> Arc<Self> {
        Arc::new(Self::new(token, inner))
    }
}

#[async_trait]
impl Listen for WithCancel {
    async fn on_event(&self, event: &Event) -> Result<ListeningStatus, ListenError> {
        if self.token.is_cancelled() {
            return Ok(ListeningStatus::Stopped);
        }

        tokio::select! {
            _ = self.token.cancelled() => Err(ListenError::Canceled),
            res = self.inner.on_event(event) => res,
        }
    }
}
