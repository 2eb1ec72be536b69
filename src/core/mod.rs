//! Bus core: listener registry and dispatch engine.
//!
//! This module contains the embedded implementation of the bus runtime. The
//! public API from this module is [`EventBus`] (and its builder); the
//! registry is an internal detail.
//!
//! Internal modules:
//! - [`registry`]: per-key ordered listener storage with the snapshot /
//!   mark-stopped / compact-by-id mutation discipline;
//! - [`bus`]: delivery engine - ordered initiation, concurrent progress,
//!   verdict handling, fault containment;
//! - [`builder`]: fault wiring for bus construction.

mod builder;
mod bus;
mod registry;

pub use builder::EventBusBuilder;
pub use bus::EventBus;
