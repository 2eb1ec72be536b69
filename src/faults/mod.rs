//! Fault containment boundary: records and the reporting collaborator.
//!
//! ## Contents
//! - [`ListenerFault`], [`FaultReason`] what happened inside a contained
//!   listener failure
//! - [`FaultSink`] the reporting collaborator trait
//! - [`NoopFaults`] the explicit, documented discard-everything default
//! - [`LogFaults`] stdout logger (feature `logging`)
//!
//! What to *do* with a faulting listener's registration is not decided here;
//! see [`FaultPolicy`](crate::FaultPolicy).

#[cfg(feature = "logging")]
mod log;
mod sink;

#[cfg(feature = "logging")]
pub use self::log::LogFaults;
pub use sink::{FaultReason, FaultSink, ListenerFault, NoopFaults};
