//! # evbus
//!
//! **Evbus** is a lightweight in-process event bus for Rust.
//!
//! Producers publish typed events; independently registered listeners
//! receive them and, through the status each invocation reports, control
//! whether they keep receiving future events of that type. The crate is
//! designed as a building block: no transport, no persistence, no
//! supervision - one process, one registry, typed fan-out.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  Producers (many):                        Listeners (many, per key):
//!
//!  publish(Event{key A}) ──┐
//!  publish(Event{key A}) ──┼──► EventBus ──► Registry[key A] ─► snapshot
//!  publish(Event{key B}) ──┘        │             │
//!                                   │             └─► [L1, L2, … Ln]  (registration order)
//!                                   ▼
//!                        dispatch task (one per publish)
//!                             │  for_each_concurrent
//!                             ├──► L1.on_event() ──► Listening  → stays
//!                             ├──► L2.on_event() ──► Stopped    → retired + removed
//!                             └──► L3.on_event() ──► Err/panic  → FaultSink + FaultPolicy
//! ```
//!
//! ### Listener lifecycle
//! ```text
//! subscribe(key, listener) ──► REGISTERED
//!
//! loop per publish:
//!   ├─► snapshot taken at publish-call time (registration order)
//!   ├─► on_event(event)  (body may suspend; siblings keep making progress)
//!   │       ├─ Ok(Listening) ─► stays REGISTERED
//!   │       ├─ Ok(Stopped)   ─► REMOVED (terminal, never invoked again)
//!   │       └─ Err / panic   ─► fault → FaultSink, then FaultPolicy:
//!   │                            Retain → stays,  Drop → REMOVED
//!   └─► unsubscribe(key, id) ─► REMOVED at any time
//! ```
//!
//! ## Features
//! | Area            | Description                                                       | Key types / traits                      |
//! |-----------------|-------------------------------------------------------------------|-----------------------------------------|
//! | **Events**      | Typed event categories and instances with seq/timestamp metadata. | [`EventKey`], [`Event`]                 |
//! | **Listeners**   | Async listener units with self-controlled lifetime.               | [`Listen`], [`ListenerFn`], [`ListenerRef`] |
//! | **Sugar**       | Fire-forever / fire-once / sentinel-bounded registrations.        | [`always`], [`once`], [`until`], [`while_`] |
//! | **Dispatch**    | Ordered initiation, concurrent delivery, awaiting variant.        | [`EventBus`]                            |
//! | **Faults**      | Contained listener failures routed to a collaborator.             | [`FaultSink`], [`ListenerFault`], [`FaultPolicy`] |
//! | **Cancellation**| Layered on by wrapping, never imposed by the core.                | [`WithCancel`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogFaults`] sink _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use evbus::{Event, EventBus, EventKey};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::new();
//!     let order_created = EventKey::new("order.created");
//!
//!     // Fires on every event of this key.
//!     bus.subscribe_always(order_created, |ev: Event| async move {
//!         if let Some(id) = ev.payload::<u64>() {
//!             println!("order #{id}");
//!         }
//!     });
//!
//!     // Detaches itself after the first event.
//!     bus.subscribe_once(order_created, |ev: Event| async move {
//!         println!("first order ever, seq={}", ev.seq());
//!     });
//!
//!     bus.publish_awaiting(Event::new(order_created, 1u64)).await;
//!     bus.publish_awaiting(Event::new(order_created, 2u64)).await;
//! }
//! ```

mod core;
mod error;
mod events;
mod faults;
mod listeners;
mod policies;

// ---- Public re-exports ----

pub use crate::core::{EventBus, EventBusBuilder};
pub use error::ListenError;
pub use events::{Event, EventKey};
pub use faults::{FaultReason, FaultSink, ListenerFault, NoopFaults};
pub use listeners::{
    always, once, until, until_false, until_true, while_, while_false, while_true, Listen,
    ListenerBuilder, ListenerFn, ListenerId, ListenerRef, ListeningStatus, WithCancel,
};
pub use policies::FaultPolicy;

// Optional: expose the simple built-in fault logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use faults::LogFaults;
