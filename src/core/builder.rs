use std::sync::Arc;

use crate::core::bus::EventBus;
use crate::faults::{FaultSink, NoopFaults};
use crate::policies::FaultPolicy;

/// Builder for constructing an [`EventBus`] with custom fault wiring.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use evbus::{EventBus, FaultPolicy, NoopFaults};
///
/// let bus = EventBus::builder()
///     .fault_policy(FaultPolicy::Drop)
///     .fault_sink(Arc::new(NoopFaults))
///     .build();
/// # let _ = bus;
/// ```
pub struct EventBusBuilder {
    fault_policy: FaultPolicy,
    fault_sink: Option<Arc<dyn FaultSink>>,
}

impl EventBusBuilder {
    pub(crate) fn new() -> Self {
        Self {
            fault_policy: FaultPolicy::default(),
            fault_sink: None,
        }
    }

    /// Sets what happens to a faulting listener's registration.
    ///
    /// Default: [`FaultPolicy::Retain`].
    pub fn fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Sets the collaborator that receives contained listener failures.
    ///
    /// Default: [`NoopFaults`], which discards them.
    pub fn fault_sink(mut self, sink: Arc<dyn FaultSink>) -> Self {
        self.fault_sink = Some(sink);
        self
    }

    /// Builds the bus.
    pub fn build(self) -> EventBus {
        let faults = self.fault_sink.unwrap_or_else(|| Arc::new(NoopFaults));
        EventBus::assemble(faults, self.fault_policy)
    }
}
