//! Subscription shapes on one key: always / once / until.
//!
//! Run with: `cargo run --example typed_listeners`

use evbus::{Event, EventBus, EventKey};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let bus = EventBus::new();
    let order_created = EventKey::new("order.created");

    // Fires on every order.
    bus.subscribe_always(order_created, |ev: Event| async move {
        if let Some(id) = ev.payload::<u64>() {
            println!("[always] order #{id}");
        }
    });

    // Fires on the first order only, then detaches itself.
    bus.subscribe_once(order_created, |ev: Event| async move {
        println!("[once] first order, seq={}", ev.seq());
    });

    // Keeps firing until it reports `true` (here: order id >= 3).
    bus.subscribe_until(order_created, true, |ev: Event| async move {
        let id = ev.payload::<u64>().copied().unwrap_or_default();
        println!("[until] saw order #{id}");
        id >= 3
    });

    for id in 1u64..=4 {
        bus.publish_awaiting(Event::new(order_created, id)).await;
        println!("--");
    }
}
