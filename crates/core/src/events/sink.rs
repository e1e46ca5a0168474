//! Domain event sink trait and implementations.

use std::sync::{Arc, Mutex};

use log::info;

use super::DomainEvent;

/// Receives domain events.
///
/// Core services emit events through this trait after successful mutations.
///
/// - `emit()` must be fast and must not block (no network calls, no DB writes)
/// - Failure to deliver an event never affects the mutation that raised it
pub trait DomainEventSink: Send + Sync {
    /// Emit a single domain event.
    fn emit(&self, event: DomainEvent);

    /// Emit multiple domain events, in order.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Writes every event to the log at `info` level.
#[derive(Clone, Default)]
pub struct LogDomainEventSink;

impl DomainEventSink for LogDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        match &event {
            DomainEvent::MonitoredCaseChanged {
                case_number,
                new_movements,
                ..
            } => info!(
                "Case {} changed: {} new movement(s)",
                case_number,
                new_movements.len()
            ),
            DomainEvent::MonitoringFailed {
                case_number,
                message,
            } => info!("Monitoring of {} failed: {}", case_number, message),
            other => info!("Domain event: {:?}", other),
        }
    }
}

/// Collects emitted events, for tests.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_and_log_sinks_do_not_panic() {
        NoOpDomainEventSink.emit(DomainEvent::cases_changed(vec!["case-1".to_string()]));
        LogDomainEventSink.emit_batch(vec![
            DomainEvent::ledgers_changed(vec!["case-2".to_string()]),
            DomainEvent::monitoring_failed("0001".to_string(), "timeout".to_string()),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockDomainEventSink::new();
        assert!(sink.is_empty());

        sink.emit(DomainEvent::cases_changed(vec!["case-1".to_string()]));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            DomainEvent::monitoring_failed("0001".to_string(), "timeout".to_string()),
            DomainEvent::ledgers_changed(vec!["case-2".to_string()]),
        ]);
        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.events()[2],
            DomainEvent::ledgers_changed(vec!["case-2".to_string()])
        );

        sink.clear();
        assert!(sink.is_empty());
    }
}
