//! # Simple logging fault sink for debugging and demos.
//!
//! [`LogFaults`] prints contained listener failures to stdout in a
//! human-readable format.
//!
//! ## Output format
//! ```text
//! [listener-fault] key=order.created#3 listener=7 event_seq=42 kind=listener_error reason="error: empty record"
//! [listener-fault] key=order.created#3 listener=9 event_seq=43 kind=listener_panic reason="panic: index out of bounds"
//! ```

use async_trait::async_trait;

use super::sink::{FaultSink, ListenerFault};

/// Simple stdout fault logger.
///
/// Enabled via the `logging` feature. Not intended for production use -
/// implement a custom [`FaultSink`] for structured logging or metrics.
pub struct LogFaults;

#[async_trait]
impl FaultSink for LogFaults {
    async fn on_fault(&self, fault: &ListenerFault) {
        println!(
            "[listener-fault] key={} listener={} event_seq={} kind={} reason={:?}",
            fault.key,
            fault.listener,
            fault.event_seq,
            fault.reason.as_label(),
            fault.reason.as_message(),
        );
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
