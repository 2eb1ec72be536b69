//! # Fault reporting collaborator.
//!
//! A listener that returns `Err` or panics never surfaces in the publisher's
//! call stack. Instead the dispatch engine packages what happened into a
//! [`ListenerFault`] and hands it to the bus's [`FaultSink`].
//!
//! ## Rules
//! - Every fault reaches the sink exactly once, from the dispatch task that
//!   observed it, before the [`FaultPolicy`](crate::FaultPolicy) is applied.
//! - The sink decides what "reporting" means: log, count, forward, page.
//! - [`NoopFaults`] is the default and **discards** faults. Install a real
//!   sink (or enable the `logging` feature for [`LogFaults`](crate::LogFaults))
//!   to observe failures.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use evbus::{FaultSink, ListenerFault};
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl FaultSink for Pager {
//!     async fn on_fault(&self, fault: &ListenerFault) {
//!         // forward fault.reason.as_message() somewhere that wakes a human
//!         let _ = fault;
//!     }
//!
//!     fn name(&self) -> &'static str { "pager" }
//! }
//! ```

use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::ListenError;
use crate::events::EventKey;
use crate::listeners::ListenerId;

/// What went wrong inside a listener invocation.
#[derive(Debug, Clone)]
pub enum FaultReason {
    /// The listener body returned an error.
    Error(ListenError),
    /// The listener body panicked; the payload message was recovered where
    /// possible.
    Panic(String),
}

impl FaultReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FaultReason::Error(_) => "listener_error",
            FaultReason::Panic(_) => "listener_panic",
        }
    }

    /// Returns a human-readable message with details about the fault.
    pub fn as_message(&self) -> String {
        match self {
            FaultReason::Error(err) => err.as_message(),
            FaultReason::Panic(info) => format!("panic: {info}"),
        }
    }
}

/// One contained listener failure: who faulted, on which event, and how.
#[derive(Debug, Clone)]
pub struct ListenerFault {
    /// Category of the event being delivered.
    pub key: EventKey,
    /// Identity of the faulting registration.
    pub listener: ListenerId,
    /// Sequence number of the event whose delivery faulted.
    pub event_seq: u64,
    /// Wall-clock timestamp of the fault.
    pub at: SystemTime,
    /// What went wrong.
    pub reason: FaultReason,
}

impl ListenerFault {
    pub(crate) fn error(key: EventKey, listener: ListenerId, event_seq: u64, err: ListenError) -> Self {
        Self {
            key,
            listener,
            event_seq,
            at: SystemTime::now(),
            reason: FaultReason::Error(err),
        }
    }

    pub(crate) fn panic(key: EventKey, listener: ListenerId, event_seq: u64, info: String) -> Self {
        Self {
            key,
            listener,
            event_seq,
            at: SystemTime::now(),
            reason: FaultReason::Panic(info),
        }
    }
}

/// Receiver for contained listener failures.
///
/// Called inline from the dispatch task that contained the fault; keep
/// implementations quick and non-blocking (async I/O is fine).
#[async_trait]
pub trait FaultSink: Send + Sync + 'static {
    /// Processes one contained fault.
    async fn on_fault(&self, fault: &ListenerFault);

    /// Returns the sink name used in logs/diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Sink that discards every fault.
///
/// This is the default sink: with it installed, listener failures are
/// invisible. That trade-off is deliberate and opt-out - install a sink via
/// [`EventBusBuilder::fault_sink`](crate::EventBusBuilder::fault_sink) to
/// observe failures.
pub struct NoopFaults;

#[async_trait]
impl FaultSink for NoopFaults {
    async fn on_fault(&self, _fault: &ListenerFault) {}

    fn name(&self) -> &'static str {
        "noop"
    }
}
