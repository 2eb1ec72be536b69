//! # Function-backed listener (`ListenerFn`) and the convenience shapes.
//!
//! [`ListenerFn`] wraps a closure `F: Fn(Event) -> Fut`, producing a fresh
//! future per invocation. The closure receives its own clone of the event
//! (cheap, `Arc`-backed payload), so the future owns everything it needs.
//!
//! The free constructors below are the convenience shapes: each one reduces
//! to exactly one primitive listener and is reused by the
//! [`EventBus`](crate::EventBus) `subscribe_*` methods and by
//! [`ListenerBuilder`](crate::ListenerBuilder). The reductions:
//!
//! - [`always`] - run the body, report [`Listening`](ListeningStatus::Listening).
//! - [`once`] - run the body, report [`Stopped`](ListeningStatus::Stopped).
//! - [`until`]`(stop, f)` - `Stopped` iff `f(event).await == stop`.
//! - [`while_`]`(keep, f)` - `Stopped` iff `f(event).await != keep`.
//! - [`until_true`] / [`until_false`] / [`while_true`] / [`while_false`] -
//!   `bool` shorthands over the two generic forms.
//!
//! ## Example
//! ```rust
//! use evbus::{Event, ListenerFn, ListenerRef, ListenError, ListeningStatus};
//!
//! let primitive: ListenerRef = ListenerFn::arc(|ev: Event| async move {
//!     let _ = ev.seq();
//!     Ok::<_, ListenError>(ListeningStatus::Listening)
//! });
//!
//! let sugar: ListenerRef = evbus::until(3u32, |ev: Event| async move {
//!     ev.payload::<u32>().copied().unwrap_or_default()
//! });
//! # let _ = (primitive, sugar);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenError;
use crate::events::Event;
use crate::listeners::listener::{Listen, ListenerRef, ListeningStatus};

/// Function-backed listener implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct ListenerFn<F> {
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Listen for ListenerFn<F>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<ListeningStatus, ListenError>> + Send + 'static,
{
    async fn on_event(&self, event: &Event) -> Result<ListeningStatus, ListenError> {
        (self.f)(event.clone()).await
    }
}

/// Listener that runs `f` on every event and always keeps listening.
pub fn always<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    ListenerFn::arc(move |event| {
        let fut = f(event);
        async move {
            fut.await;
            Ok::<_, ListenError>(ListeningStatus::Listening)
        }
    })
}

/// Listener that runs `f` for exactly one event, then detaches.
pub fn once<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    ListenerFn::arc(move |event| {
        let fut = f(event);
        async move {
            fut.await;
            Ok::<_, ListenError>(ListeningStatus::Stopped)
        }
    })
}

/// Listener that keeps listening until `f` yields a value equal to `stop`.
///
/// The invocation that produces the sentinel is the last one: the listener
/// reports `Stopped` *after* that body has run.
pub fn until<T, F, Fut>(stop: T, f: F) -> ListenerRef
where
    T: PartialEq + Send + Sync + 'static,
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let stop = Arc::new(stop);
    ListenerFn::arc(move |event| {
        let fut = f(event);
        let stop = Arc::clone(&stop);
        async move {
            if fut.await == *stop {
                Ok::<_, ListenError>(ListeningStatus::Stopped)
            } else {
                Ok(ListeningStatus::Listening)
            }
        }
    })
}

/// Listener that keeps listening while `f` yields a value equal to `keep`.
///
/// The first invocation yielding anything else is the last one.
pub fn while_<T, F, Fut>(keep: T, f: F) -> ListenerRef
where
    T: PartialEq + Send + Sync + 'static,
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let keep = Arc::new(keep);
    ListenerFn::arc(move |event| {
        let fut = f(event);
        let keep = Arc::clone(&keep);
        async move {
            if fut.await != *keep {
                Ok::<_, ListenError>(ListeningStatus::Stopped)
            } else {
                Ok(ListeningStatus::Listening)
            }
        }
    })
}

/// [`until`] with a `true` sentinel: detach once `f` yields `true`.
pub fn until_true<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    until(true, f)
}

/// [`until`] with a `false` sentinel: detach once `f` yields `false`.
pub fn until_false<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    until(false, f)
}

/// [`while_`] keeping on `true`: detach once `f` yields `false`.
pub fn while_true<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    while_(true, f)
}

/// [`while_`] keeping on `false`: detach once `f` yields `true`.
pub fn while_false<F, Fut>(f: F) -> ListenerRef
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    while_(false, f)
}
