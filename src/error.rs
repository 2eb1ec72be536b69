//! Error type reported by listener bodies.
//!
//! A listener invocation either produces a
//! [`ListeningStatus`](crate::ListeningStatus) or a [`ListenError`]. Errors
//! never reach the publisher: the dispatch engine packages them into a
//! [`ListenerFault`](crate::ListenerFault) and hands them to the configured
//! fault sink.

use thiserror::Error;

/// # Errors produced by a listener invocation.
///
/// These represent failures of individual listener bodies. They are contained
/// at the invocation boundary and surfaced through the fault-reporting
/// channel, never through `publish`.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ListenError {
    /// Listener body failed while processing the event.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Invocation was interrupted by a wrapping cancellation token before the
    /// listener could report a status.
    #[error("invocation cancelled")]
    Canceled,
}

impl ListenError {
    /// Creates a [`ListenError::Fail`] from any displayable error message.
    pub fn fail(error: impl Into<String>) -> Self {
        ListenError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evbus::ListenError;
    ///
    /// let err = ListenError::fail("boom");
    /// assert_eq!(err.as_label(), "listener_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenError::Fail { .. } => "listener_failed",
            ListenError::Canceled => "listener_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenError::Fail { error } => format!("error: {error}"),
            ListenError::Canceled => "invocation cancelled".to_string(),
        }
    }
}
