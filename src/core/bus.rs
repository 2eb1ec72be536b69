//! # Event bus - the dispatch engine.
//!
//! [`EventBus`] owns the listener registry and drives delivery: one publish
//! fans an event out to every listener registered under the event's key,
//! collects each listener's [`ListeningStatus`], and retires the ones that
//! reported [`Stopped`](ListeningStatus::Stopped).
//!
//! ## Architecture
//! ```text
//! publish(event)                         publish_awaiting(event)
//!     │                                       │
//!     ├─ snapshot(key)  ◄── Registry ──►      ├─ snapshot(key)
//!     ├─ spawn dispatch task                  └─ dispatch inline, then return
//!     └─ return immediately
//!
//! dispatch: for_each_concurrent over the snapshot
//!     ├──► listener 1 ──► status/fault ──► retire on Stopped
//!     ├──► listener 2 ──► …                (faults → FaultSink + FaultPolicy)
//!     └──► listener N ──► …
//! ```
//!
//! ## Rules
//! - **Snapshot at call time**: listeners registered while a dispatch is in
//!   flight never see the in-flight event; they see every later one.
//! - **Initiation order**: listener futures are first-polled strictly in
//!   registration order. Completion order may differ when bodies suspend.
//! - **No cross-listener blocking**: a suspended body never stalls delivery
//!   to its siblings (concurrent fan-out) or to other publishes (each
//!   `publish` runs on its own task).
//! - **Publisher isolation**: `publish`/`publish_awaiting` never fail.
//!   Listener errors and panics are contained, reported to the
//!   [`FaultSink`], and resolved by the [`FaultPolicy`].
//! - **Exactly-once retirement**: a `Stopped` verdict (or unsubscribe)
//!   retires the registration once, even under racing publishes, and the
//!   listener is never initiated again.
//!
//! ## Example
//! ```rust
//! use evbus::{Event, EventBus, EventKey};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::new();
//!     let key = EventKey::new("greeting");
//!
//!     bus.subscribe_once(key, |ev: Event| async move {
//!         println!("hello, {}", ev.payload::<&str>().unwrap_or(&"?"));
//!     });
//!
//!     bus.publish_awaiting(Event::new(key, "world")).await;
//! }
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use futures::FutureExt;

use crate::core::builder::EventBusBuilder;
use crate::core::registry::{Entry, Registry};
use crate::events::{Event, EventKey};
use crate::faults::{FaultSink, ListenerFault};
use crate::listeners::{ListenerBuilder, ListenerId, ListenerRef, ListeningStatus};
use crate::policies::FaultPolicy;

/// In-process publish/subscribe core.
///
/// Cheap to clone (internally `Arc`-backed); clones share the same registry,
/// fault sink and policy. Producers publish, listeners decide their own
/// lifetime through the status they report.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<Registry>,
    faults: Arc<dyn FaultSink>,
    fault_policy: FaultPolicy,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with default wiring: faults discarded
    /// ([`NoopFaults`](crate::NoopFaults)), faulting listeners retained.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for a bus with custom fault wiring.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    pub(crate) fn assemble(faults: Arc<dyn FaultSink>, fault_policy: FaultPolicy) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            faults,
            fault_policy,
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a primitive listener under `key`.
    ///
    /// Appends at the end of the key's delivery order. Always succeeds; safe
    /// to call concurrently with other registrations and in-flight publishes
    /// (including from inside a listener body).
    pub fn subscribe(&self, key: EventKey, listener: ListenerRef) -> ListenerId {
        self.registry.insert(key, listener)
    }

    /// Registers a listener that runs `f` on every event of `key`.
    pub fn subscribe_always<F, Fut>(&self, key: EventKey, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe(key, crate::listeners::always(f))
    }

    /// Registers a listener that runs `f` for exactly one event of `key`.
    pub fn subscribe_once<F, Fut>(&self, key: EventKey, f: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe(key, crate::listeners::once(f))
    }

    /// Registers a listener that detaches once `f` yields `stop`.
    pub fn subscribe_until<T, F, Fut>(&self, key: EventKey, stop: T, f: F) -> ListenerId
    where
        T: PartialEq + Send + Sync + 'static,
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.subscribe(key, crate::listeners::until(stop, f))
    }

    /// Registers a listener that detaches once `f` yields anything but `keep`.
    pub fn subscribe_while<T, F, Fut>(&self, key: EventKey, keep: T, f: F) -> ListenerId
    where
        T: PartialEq + Send + Sync + 'static,
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.subscribe(key, crate::listeners::while_(keep, f))
    }

    /// Registers several listener shapes under one key in one call.
    ///
    /// See [`ListenerBuilder`] for the available shapes. Returns the new ids
    /// in registration order.
    pub fn subscribe_all<B>(&self, key: EventKey, build: B) -> Vec<ListenerId>
    where
        B: FnOnce(&mut ListenerBuilder<'_>),
    {
        let mut builder = ListenerBuilder::new(self, key);
        build(&mut builder);
        builder.into_ids()
    }

    /// Removes a registration explicitly.
    ///
    /// Returns `true` if the registration was live. In-flight dispatches
    /// that have not yet initiated this listener will skip it.
    pub fn unsubscribe(&self, key: EventKey, id: ListenerId) -> bool {
        self.registry.discard(key, id)
    }

    // ---------------------------
    // Publishing
    // ---------------------------

    /// Publishes an event without waiting for delivery (fire-and-continue).
    ///
    /// The listener set is snapshotted before this call returns; delivery
    /// then runs on a spawned task. Publishing to a key with no listeners is
    /// a silent no-op. Must be called within a tokio runtime.
    pub fn publish(&self, event: Event) {
        let targets = self.registry.snapshot(event.key());
        if targets.is_empty() {
            return;
        }

        let engine = self.clone();
        tokio::spawn(async move {
            engine.dispatch(targets, event).await;
        });
    }

    /// Publishes an event and completes once every listener invoked for this
    /// call has reported a status or faulted.
    pub async fn publish_awaiting(&self, event: Event) {
        let targets = self.registry.snapshot(event.key());
        if targets.is_empty() {
            return;
        }
        self.dispatch(targets, event).await;
    }

    // ---------------------------
    // Delivery
    // ---------------------------

    /// Drives one snapshot to completion.
    ///
    /// `for_each_concurrent` pulls the snapshot in order, so listener
    /// futures are first-polled in registration order while still running
    /// concurrently; no limit is applied, so a suspended listener cannot
    /// delay initiation of the ones after it.
    async fn dispatch(&self, targets: Vec<Arc<Entry>>, event: Event) {
        stream::iter(targets)
            .for_each_concurrent(None, |entry| {
                let event = event.clone();
                async move {
                    self.deliver(entry, event).await;
                }
            })
            .await;
    }

    /// Invokes one listener and applies its verdict.
    async fn deliver(&self, entry: Arc<Entry>, event: Event) {
        if entry.is_stopped() {
            return;
        }

        let invocation = AssertUnwindSafe(entry.listener().on_event(&event)).catch_unwind();
        match invocation.await {
            Ok(Ok(ListeningStatus::Listening)) => {}
            Ok(Ok(ListeningStatus::Stopped)) => {
                self.retire(&entry, event.key());
            }
            Ok(Err(err)) => {
                let fault = ListenerFault::error(event.key(), entry.id(), event.seq(), err);
                self.report(fault, &entry).await;
            }
            Err(panic) => {
                let info = panic_message(panic);
                let fault = ListenerFault::panic(event.key(), entry.id(), event.seq(), info);
                self.report(fault, &entry).await;
            }
        }
    }

    /// Routes a fault to the sink, then applies the fault policy.
    async fn report(&self, fault: ListenerFault, entry: &Arc<Entry>) {
        let key = fault.key;
        self.faults.on_fault(&fault).await;
        if self.fault_policy.drops() {
            self.retire(entry, key);
        }
    }

    /// Retires a registration exactly once and compacts the registry.
    fn retire(&self, entry: &Arc<Entry>, key: EventKey) {
        if entry.retire() {
            self.registry.remove(key, entry.id());
        }
    }
}

/// Recovers a readable message from a panic payload.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let any = &*panic;
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenError;
    use crate::faults::FaultReason;
    use crate::listeners::ListenerFn;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        faults: Mutex<Vec<ListenerFault>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.faults.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FaultSink for RecordingSink {
        async fn on_fault(&self, fault: &ListenerFault) {
            self.faults.lock().unwrap().push(fault.clone());
        }
    }

    fn counting_always(bus: &EventBus, key: EventKey, calls: &Arc<AtomicUsize>) -> ListenerId {
        let calls = Arc::clone(calls);
        bus.subscribe_always(key, move |_event: Event| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test]
    async fn test_listeners_initiated_in_registration_order() {
        let bus = EventBus::new();
        let key = EventKey::new("ordering");
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            bus.subscribe_always(key, move |_event: Event| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(i);
                }
            });
        }

        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stopped_listener_never_invoked_again() {
        let bus = EventBus::new();
        let key = EventKey::new("stop");

        let stopper_calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = Arc::clone(&stopper_calls);
            bus.subscribe(
                key,
                ListenerFn::arc(move |_event: Event| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ListenError>(ListeningStatus::Stopped)
                    }
                }),
            );
        }
        let keeper_calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, key, &keeper_calls);

        for _ in 0..3 {
            bus.publish_awaiting(Event::signal(key)).await;
        }

        assert_eq!(stopper_calls.load(Ordering::SeqCst), 1);
        assert_eq!(keeper_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_once_invoked_exactly_once() {
        let bus = EventBus::new();
        let key = EventKey::new("once");
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            bus.subscribe_once(key, move |_event: Event| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        bus.publish_awaiting(Event::signal(key)).await;
        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_always_invoked_every_publish() {
        let bus = EventBus::new();
        let key = EventKey::new("always");
        let calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, key, &calls);

        for _ in 0..4 {
            bus.publish_awaiting(Event::signal(key)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_until_true_stops_on_third_invocation() {
        let bus = EventBus::new();
        let key = EventKey::new("until");
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            // yields false, false, true
            bus.subscribe_until(key, true, move |_event: Event| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { n == 2 }
            });
        }

        for _ in 0..4 {
            bus.publish_awaiting(Event::signal(key)).await;
        }
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "fourth publish must not invoke the detached listener"
        );
    }

    #[tokio::test]
    async fn test_while_true_stops_on_first_false() {
        let bus = EventBus::new();
        let key = EventKey::new("while");
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            // yields true, true, false
            bus.subscribe_while(key, true, move |_event: Event| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { n < 2 }
            });
        }

        for _ in 0..5 {
            bus.publish_awaiting(Event::signal(key)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_until_with_non_bool_sentinel() {
        let bus = EventBus::new();
        let key = EventKey::new("sentinel");
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            bus.subscribe_until(key, "stop", move |event: Event| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { *event.payload::<&str>().unwrap() }
            });
        }

        for raw in ["go", "go", "stop", "go"] {
            bus.publish_awaiting(Event::new(key, raw)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_registration_during_dispatch_misses_inflight_event() {
        let bus = EventBus::new();
        let key = EventKey::new("mid-dispatch");
        let nested_calls = Arc::new(AtomicUsize::new(0));

        {
            let handle = bus.clone();
            let nested_calls = Arc::clone(&nested_calls);
            bus.subscribe_once(key, move |_event: Event| {
                let handle = handle.clone();
                let nested_calls = Arc::clone(&nested_calls);
                async move {
                    let nested_calls = Arc::clone(&nested_calls);
                    handle.subscribe_always(key, move |_event: Event| {
                        let nested_calls = Arc::clone(&nested_calls);
                        async move {
                            nested_calls.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });
        }

        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(
            nested_calls.load(Ordering::SeqCst),
            0,
            "listener added mid-dispatch must not see the in-flight event"
        );

        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(nested_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_listener_error_is_isolated_and_reported() {
        let sink = Arc::new(RecordingSink::default());
        let bus = EventBus::builder().fault_sink(sink.clone()).build();
        let key = EventKey::new("faulty");

        bus.subscribe(
            key,
            ListenerFn::arc(|_event: Event| async {
                Err::<ListeningStatus, _>(ListenError::fail("boom"))
            }),
        );
        let sibling_calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, key, &sibling_calls);

        bus.publish_awaiting(Event::signal(key)).await;

        assert_eq!(sibling_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.count(), 1);
        {
            let faults = sink.faults.lock().unwrap();
            assert!(matches!(
                faults[0].reason,
                FaultReason::Error(ListenError::Fail { .. })
            ));
            assert_eq!(faults[0].key, key);
        }

        // default policy retains the faulting listener
        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(sink.count(), 2);
    }

    #[tokio::test]
    async fn test_listener_panic_is_isolated_and_reported() {
        let sink = Arc::new(RecordingSink::default());
        let bus = EventBus::builder().fault_sink(sink.clone()).build();
        let key = EventKey::new("panicky");

        bus.subscribe(
            key,
            crate::listeners::always(|_event: Event| async {
                panic!("kaboom");
            }),
        );
        let sibling_calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, key, &sibling_calls);

        bus.publish_awaiting(Event::signal(key)).await;

        assert_eq!(sibling_calls.load(Ordering::SeqCst), 1);
        let faults = sink.faults.lock().unwrap();
        assert_eq!(faults.len(), 1);
        match &faults[0].reason {
            FaultReason::Panic(info) => assert!(info.contains("kaboom")),
            other => panic!("expected panic fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fault_policy_drop_removes_listener() {
        let sink = Arc::new(RecordingSink::default());
        let bus = EventBus::builder()
            .fault_policy(FaultPolicy::Drop)
            .fault_sink(sink.clone())
            .build();
        let key = EventKey::new("dropped");

        bus.subscribe(
            key,
            ListenerFn::arc(|_event: Event| async {
                Err::<ListeningStatus, _>(ListenError::fail("boom"))
            }),
        );

        bus.publish_awaiting(Event::signal(key)).await;
        bus.publish_awaiting(Event::signal(key)).await;

        assert_eq!(sink.count(), 1, "listener dropped after the first fault");
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_noop() {
        let bus = EventBus::new();
        let key = EventKey::new("empty");

        bus.publish(Event::signal(key));
        bus.publish_awaiting(Event::signal(key)).await;
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let key = EventKey::new("unsub");
        let calls = Arc::new(AtomicUsize::new(0));
        let id = counting_always(&bus, key, &calls);

        assert!(bus.unsubscribe(key, id));
        assert!(!bus.unsubscribe(key, id), "second unsubscribe is a no-op");

        bus.publish_awaiting(Event::signal(key)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_suspended_listener_does_not_block_sibling() {
        let bus = EventBus::new();
        let key = EventKey::new("suspend");
        let notify = Arc::new(tokio::sync::Notify::new());
        let resumed = Arc::new(AtomicUsize::new(0));

        {
            let notify = Arc::clone(&notify);
            let resumed = Arc::clone(&resumed);
            bus.subscribe_always(key, move |_event: Event| {
                let notify = Arc::clone(&notify);
                let resumed = Arc::clone(&resumed);
                async move {
                    notify.notified().await;
                    resumed.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
        {
            let notify = Arc::clone(&notify);
            bus.subscribe_always(key, move |_event: Event| {
                let notify = Arc::clone(&notify);
                async move {
                    notify.notify_one();
                }
            });
        }

        tokio::time::timeout(Duration::from_secs(5), bus.publish_awaiting(Event::signal(key)))
            .await
            .expect("second listener must run while the first is suspended");
        assert_eq!(resumed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publish_fire_and_forget_delivers() {
        let bus = EventBus::new();
        let key = EventKey::new("forget");
        let calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, key, &calls);

        bus.publish(Event::signal(key));

        tokio::time::timeout(Duration::from_secs(2), async {
            while calls.load(Ordering::SeqCst) < 1 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("delivery completes without awaiting the publish");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publishes_to_distinct_keys_are_independent() {
        let bus = EventBus::new();
        let a = EventKey::new("left");
        let b = EventKey::new("right");

        let a_calls = Arc::new(AtomicUsize::new(0));
        let b_calls = Arc::new(AtomicUsize::new(0));
        counting_always(&bus, a, &a_calls);
        counting_always(&bus, b, &b_calls);

        bus.publish_awaiting(Event::signal(a)).await;
        bus.publish_awaiting(Event::signal(a)).await;
        bus.publish_awaiting(Event::signal(b)).await;

        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribe_all_registers_each_shape() {
        let bus = EventBus::new();
        let key = EventKey::new("all");
        let always_calls = Arc::new(AtomicUsize::new(0));
        let once_calls = Arc::new(AtomicUsize::new(0));

        let ids = bus.subscribe_all(key, |b| {
            let always_calls = Arc::clone(&always_calls);
            b.always(move |_event: Event| {
                let always_calls = Arc::clone(&always_calls);
                async move {
                    always_calls.fetch_add(1, Ordering::SeqCst);
                }
            });
            let once_calls = Arc::clone(&once_calls);
            b.once(move |_event: Event| {
                let once_calls = Arc::clone(&once_calls);
                async move {
                    once_calls.fetch_add(1, Ordering::SeqCst);
                }
            });
        });
        assert_eq!(ids.len(), 2);

        bus.publish_awaiting(Event::signal(key)).await;
        bus.publish_awaiting(Event::signal(key)).await;

        assert_eq!(always_calls.load(Ordering::SeqCst), 2);
        assert_eq!(once_calls.load(Ordering::SeqCst), 1);
    }
}
