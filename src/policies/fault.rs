//! # Fault policy for faulting listeners.
//!
//! [`FaultPolicy`] determines what happens to a listener's registration after
//! one of its invocations faults (returns `Err` or panics).
//!
//! - [`FaultPolicy::Retain`] the listener stays registered and receives
//!   future events (default).
//! - [`FaultPolicy::Drop`] the listener is removed as if it had reported
//!   `Stopped`.
//!
//! ## Choosing the right policy
//!
//! **Transient failures** (I/O hiccups, retryable work):
//! ```text
//! FaultPolicy::Retain           → fault is reported, listener keeps running
//! ```
//!
//! **Fail-fast listeners** (a fault means the listener's state is suspect):
//! ```text
//! FaultPolicy::Drop             → fault is reported, listener is removed
//! ```
//!
//! Either way the fault reaches the [`FaultSink`](crate::FaultSink) first;
//! the policy only decides the registration's fate.

/// Policy controlling whether a faulting listener stays registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Keep the faulting listener registered (default).
    Retain,
    /// Remove the faulting listener after reporting the fault.
    Drop,
}

impl FaultPolicy {
    /// Returns `true` if faulting listeners are removed.
    #[inline]
    pub fn drops(&self) -> bool {
        matches!(self, FaultPolicy::Drop)
    }
}

impl Default for FaultPolicy {
    /// Returns [`FaultPolicy::Retain`].
    fn default() -> Self {
        FaultPolicy::Retain
    }
}
