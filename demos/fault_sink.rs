//! Fault containment: errors are reported to a sink, never to the publisher.
//!
//! Run with: `cargo run --example fault_sink --features logging`

use std::sync::Arc;

use evbus::{Event, EventBus, EventKey, FaultPolicy, ListenError, ListenerFn, ListeningStatus, LogFaults};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Faulting listeners are dropped after their fault is logged.
    let bus = EventBus::builder()
        .fault_policy(FaultPolicy::Drop)
        .fault_sink(Arc::new(LogFaults))
        .build();
    let ingest = EventKey::new("ingest.record");

    bus.subscribe(
        ingest,
        ListenerFn::arc(|ev: Event| async move {
            match ev.payload::<&str>() {
                Some(raw) if !raw.is_empty() => {
                    println!("ingested {raw:?}");
                    Ok(ListeningStatus::Listening)
                }
                _ => Err(ListenError::fail("empty record")),
            }
        }),
    );

    bus.publish_awaiting(Event::new(ingest, "alpha")).await;
    // The empty record faults: logged by LogFaults, listener removed.
    bus.publish_awaiting(Event::new(ingest, "")).await;
    // Nobody is listening anymore; this is a silent no-op.
    bus.publish_awaiting(Event::new(ingest, "beta")).await;
}
