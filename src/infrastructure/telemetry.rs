use crate::domain::ports::Telemetry;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Emits every analytics event as a structured log record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn send_event(&self, event: &str) {
        info!(target: "walletpay::analytics", event, "analytics event");
    }
}

/// Keeps events in memory, in the order they were sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingTelemetry {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn send_event(&self, event: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.to_string());
    }
}
