//! Recording event delivery.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use bridge_traits::presentation::SurfaceHandle;
use bridge_traits::{EventDelivery, Result};

/// One event as it was handed to the delivery pipeline.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub surface: SurfaceHandle,
    pub name: String,
    pub payload: Value,
}

/// `EventDelivery` that records everything for later inspection.
#[derive(Default)]
pub struct RecordingEventDelivery {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in delivery order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Event names delivered to one surface, in order.
    pub fn names_for(&self, surface: SurfaceHandle) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.surface == surface)
            .map(|event| event.name.clone())
            .collect()
    }

    /// Payloads of one event name delivered to one surface.
    pub fn payloads_for(&self, surface: SurfaceHandle, name: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.surface == surface && event.name == name)
            .map(|event| event.payload.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl EventDelivery for RecordingEventDelivery {
    async fn deliver(&self, surface: SurfaceHandle, event: &str, payload: Value) -> Result<()> {
        self.events.lock().unwrap().push(RecordedEvent {
            surface,
            name: event.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_in_order() {
        let delivery = RecordingEventDelivery::new();
        let surface = SurfaceHandle::new();

        delivery
            .deliver(surface, "onAppear", json!({}))
            .await
            .unwrap();
        delivery
            .deliver(surface, "onActivate", json!({}))
            .await
            .unwrap();

        assert_eq!(delivery.names_for(surface), vec!["onAppear", "onActivate"]);
    }
}
