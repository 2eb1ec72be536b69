//! # Group registration sugar.
//!
//! [`ListenerBuilder`] registers several listener shapes under one key in a
//! single call, via [`EventBus::subscribe_all`](crate::EventBus::subscribe_all):
//!
//! ```rust
//! use evbus::{Event, EventBus, EventKey};
//!
//! let bus = EventBus::new();
//! let key = EventKey::new("chat.message");
//!
//! let ids = bus.subscribe_all(key, |b| {
//!     b.always(|ev: Event| async move {
//!         let _ = ev.seq(); // log every message
//!     });
//!     b.until_true(|ev: Event| async move {
//!         ev.payload::<&str>() == Some(&"stop")
//!     });
//! });
//! assert_eq!(ids.len(), 2);
//! ```
//!
//! Every method is a thin layer over the same generic constructors the
//! `subscribe_*` methods use; nothing here has semantics of its own.

use std::future::Future;

use crate::core::EventBus;
use crate::error::ListenError;
use crate::events::{Event, EventKey};
use crate::listeners::listener::{ListenerId, ListenerRef, ListeningStatus};
use crate::listeners::listener_fn::{
    always, once, until, until_false, until_true, while_, while_false, while_true, ListenerFn,
};

/// Registers multiple listeners for one key inside a
/// [`subscribe_all`](crate::EventBus::subscribe_all) call.
///
/// Each method registers immediately and returns the new [`ListenerId`];
/// the ids are also collected and returned by `subscribe_all` in
/// registration order.
pub struct ListenerBuilder<'a> {
    bus: &'a EventBus,
    key: EventKey,
    ids: Vec<ListenerId>,
}

impl<'a> ListenerBuilder<'a> {
    pub(crate) fn new(bus: &'a EventBus, key: EventKey) -> Self {
        Self {
            bus,
            key,
            ids: Vec::new(),
        }
    }

    pub(crate) fn into_ids(self) -> Vec<ListenerId> {
        self.ids
    }

    fn register(&mut self, listener: ListenerRef) -> ListenerId {
        let id = self.bus.subscribe(self.key, listener);
        self.ids.push(id);
        id
    }

    /// Registers a primitive listener: the body reports its own status.
    pub fn handler<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ListeningStatus, ListenError>> + Send + 'static,
    {
        self.register(ListenerFn::arc(f))
    }

    /// Registers a listener that runs on every event.
    pub fn always<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.register(always(f))
    }

    /// Registers a listener that runs for exactly one event.
    pub fn once<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.register(once(f))
    }

    /// Registers a listener that detaches once `f` yields `stop`.
    pub fn until<T, F, Fut>(&mut self, stop: T, f: F) -> ListenerId
    where
        T: PartialEq + Send + Sync + 'static,
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.register(until(stop, f))
    }

    /// Registers a listener that detaches once `f` yields anything but `keep`.
    pub fn while_<T, F, Fut>(&mut self, keep: T, f: F) -> ListenerId
    where
        T: PartialEq + Send + Sync + 'static,
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.register(while_(keep, f))
    }

    /// Registers a listener that detaches once `f` yields `true`.
    pub fn until_true<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.register(until_true(f))
    }

    /// Registers a listener that detaches once `f` yields `false`.
    pub fn until_false<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.register(until_false(f))
    }

    /// Registers a listener that keeps running while `f` yields `true`.
    pub fn while_true<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.register(while_true(f))
    }

    /// Registers a listener that keeps running while `f` yields `false`.
    pub fn while_false<F, Fut>(&mut self, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.register(while_false(f))
    }
}
