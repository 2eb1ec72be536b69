//! Event data model: category keys and event instances.
//!
//! This module groups the types producers hand to the bus:
//! - [`EventKey`] opaque identity of an event category (one per event class);
//! - [`Event`] a single published instance: key, sequence/timestamp metadata,
//!   opaque `Arc`-shared payload.
//!
//! Dispatch never inspects payloads; routing is a direct map lookup on the
//! key. See `core/bus.rs` for the delivery semantics.

mod event;
mod key;

pub use event::Event;
pub use key::EventKey;
