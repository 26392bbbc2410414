//! Where boundary events go.

use blindroute_types::EventEnvelope;

/// Receives every event the router emits, in emission order.
pub trait EventSink {
    fn emit(&mut self, envelope: EventEnvelope);
}

/// Buffers events in memory. The default sink for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<EventEnvelope>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[EventEnvelope] {
        &self.events
    }

    /// Take all buffered events, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, envelope: EventEnvelope) {
        self.events.push(envelope);
    }
}

/// Writes each event to the `tracing` pipeline and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, envelope: EventEnvelope) {
        match envelope.to_json() {
            Ok(payload) => tracing::info!(
                event_id = %envelope.id,
                kind = %envelope.event,
                %payload,
                "Router event"
            ),
            Err(e) => tracing::warn!(
                event_id = %envelope.id,
                kind = %envelope.event,
                error = %e,
                "Router event not serializable"
            ),
        }
    }
}
