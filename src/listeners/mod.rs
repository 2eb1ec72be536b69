//! # Listener abstractions and convenience shapes.
//!
//! This module provides everything a subscriber-side caller touches:
//! - [`Listen`] - trait for implementing async listeners
//! - [`ListenerFn`] - function-backed listener implementation
//! - [`ListenerRef`] - shared reference to a listener (`Arc<dyn Listen>`)
//! - [`ListenerId`] - identity of one registration (for removal)
//! - [`ListeningStatus`] - the per-invocation verdict
//! - [`always`], [`once`], [`until`], [`while_`] (+ `bool` shorthands) -
//!   convenience constructors, each a pure reduction to one primitive
//! - [`ListenerBuilder`] - several registrations under one key in one call
//! - [`WithCancel`] - cancellation layered on by wrapping

mod builder;
mod cancel;
mod listener;
mod listener_fn;

pub use builder::ListenerBuilder;
pub use cancel::WithCancel;
pub use listener::{Listen, ListenerId, ListenerRef, ListeningStatus};
pub use listener_fn::{
    always, once, until, until_false, until_true, while_, while_false, while_true, ListenerFn,
};
