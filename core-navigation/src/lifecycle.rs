//! Lifecycle event emission.
//!
//! One funnel for the per-screen event vocabulary. Every executor reports
//! through here so visibility and focus transitions stay paired: a screen
//! that appears is activated in the same breath, a screen that disappears is
//! deactivated first. Events go two ways at once: to the application code
//! bound to the screen's surface via `EventDelivery`, and mirrored onto the
//! in-process bus for observers.
//!
//! Delivery failures are logged and swallowed. A screen whose surface is gone
//! mid-transition must not fail the navigation that caused the transition.

use std::sync::Arc;

use bridge_traits::events::EventDelivery;
use core_runtime::events::{EventBus, NavCoreEvent, ScreenEvent, TabEvent};
use serde_json::{json, Value};
use tracing::warn;

use crate::container::ScreenContainer;

/// Event names as application code sees them.
pub mod event_names {
    pub const ON_APPEAR: &str = "onAppear";
    pub const ON_DISAPPEAR: &str = "onDisappear";
    pub const ON_ACTIVATE: &str = "onActivate";
    pub const ON_DEACTIVATE: &str = "onDeactivate";
    pub const ON_NAVIGATION_EVENT: &str = "onNavigationEvent";
    pub const ON_RECEIVE_PARAMS: &str = "onReceiveParams";
    pub const ON_TAB_CHANGE: &str = "onTabChange";
    pub const ON_TAB_PRESS: &str = "onTabPress";
    pub const ON_HEADER_ACTION_PRESS: &str = "onHeaderActionPress";
}

#[derive(Clone)]
pub struct LifecycleEmitter {
    delivery: Arc<dyn EventDelivery>,
    bus: EventBus,
}

impl LifecycleEmitter {
    pub fn new(delivery: Arc<dyn EventDelivery>, bus: EventBus) -> Self {
        Self { delivery, bus }
    }

    /// Screen entered the foreground: `onAppear` then `onActivate`, and the
    /// container is marked active.
    pub async fn enter(&self, container: &mut ScreenContainer) {
        self.deliver(container, event_names::ON_APPEAR, json!({})).await;
        self.bus_screen(ScreenEvent::Appeared {
            screen: container.name.clone(),
        });

        self.deliver(container, event_names::ON_ACTIVATE, json!({})).await;
        self.bus_screen(ScreenEvent::Activated {
            screen: container.name.clone(),
        });
        container.is_active = true;
    }

    /// Screen left the foreground: `onDeactivate` then `onDisappear`, and
    /// the container is marked inactive.
    pub async fn leave(&self, container: &mut ScreenContainer) {
        self.deliver(container, event_names::ON_DEACTIVATE, json!({})).await;
        self.bus_screen(ScreenEvent::Deactivated {
            screen: container.name.clone(),
        });

        self.deliver(container, event_names::ON_DISAPPEAR, json!({})).await;
        self.bus_screen(ScreenEvent::Disappeared {
            screen: container.name.clone(),
        });
        container.is_active = false;
    }

    /// Screen regained focus without a visibility change (a sheet or popover
    /// above it went away).
    pub async fn activate(&self, container: &mut ScreenContainer) {
        self.deliver(container, event_names::ON_ACTIVATE, json!({})).await;
        self.bus_screen(ScreenEvent::Activated {
            screen: container.name.clone(),
        });
        container.is_active = true;
    }

    /// Screen lost focus but stays visible (something partial was presented
    /// over it).
    pub async fn deactivate(&self, container: &mut ScreenContainer) {
        self.deliver(container, event_names::ON_DEACTIVATE, json!({})).await;
        self.bus_screen(ScreenEvent::Deactivated {
            screen: container.name.clone(),
        });
        container.is_active = false;
    }

    /// Deliver navigation params or a dismissal result to a screen.
    pub async fn receive_params(
        &self,
        container: &ScreenContainer,
        params: Value,
        source: Option<&str>,
    ) {
        let payload = json!({
            "params": params,
            "source": source,
        });
        self.deliver(container, event_names::ON_RECEIVE_PARAMS, payload)
            .await;
        self.bus_screen(ScreenEvent::ParamsDelivered {
            screen: container.name.clone(),
            source: source.map(str::to_string),
        });
    }

    /// Generic navigation notification to a screen (e.g. "you were revealed
    /// by a pop above you").
    pub async fn navigation_event(&self, container: &ScreenContainer, payload: Value) {
        self.deliver(container, event_names::ON_NAVIGATION_EVENT, payload)
            .await;
    }

    /// Selected tab changed; delivered to the newly selected tab's surface.
    pub async fn tab_change(
        &self,
        container: &ScreenContainer,
        selected_index: usize,
        previous_index: Option<usize>,
        user_initiated: bool,
    ) {
        let payload = json!({
            "selectedIndex": selected_index,
            "previousIndex": previous_index,
            "userInitiated": user_initiated,
        });
        self.deliver(container, event_names::ON_TAB_CHANGE, payload)
            .await;
        self.bus
            .emit(NavCoreEvent::Tab(TabEvent::Changed {
                selected_index,
                previous_index,
                user_initiated,
            }))
            .ok();
    }

    /// The already-selected tab was tapped again.
    pub async fn tab_press(&self, container: &ScreenContainer, selected_index: usize) {
        let payload = json!({ "selectedIndex": selected_index });
        self.deliver(container, event_names::ON_TAB_PRESS, payload)
            .await;
        self.bus
            .emit(NavCoreEvent::Tab(TabEvent::Pressed { selected_index }))
            .ok();
    }

    /// A header action button was pressed on the screen.
    pub async fn header_action(&self, container: &ScreenContainer, action_id: &str) {
        let payload = json!({ "actionId": action_id });
        self.deliver(container, event_names::ON_HEADER_ACTION_PRESS, payload)
            .await;
        self.bus_screen(ScreenEvent::HeaderActionPressed {
            screen: container.name.clone(),
            action_id: action_id.to_string(),
        });
    }

    /// Direct access to the bus for non-screen events (resolution outcomes,
    /// root readiness).
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    async fn deliver(&self, container: &ScreenContainer, event: &str, mut payload: Value) {
        if let Some(map) = payload.as_object_mut() {
            map.insert("screenName".to_string(), json!(container.name));
        }
        if let Err(err) = self.delivery.deliver(container.surface, event, payload).await {
            warn!(screen = %container.name, event, %err, "lifecycle delivery failed");
        }
    }

    fn bus_screen(&self, event: ScreenEvent) {
        self.bus.emit(NavCoreEvent::Screen(event)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::RecordingEventDelivery;
    use bridge_traits::presentation::{ControllerHandle, PresentationStyle, SurfaceHandle};

    fn container(name: &str) -> ScreenContainer {
        ScreenContainer::new(
            name,
            PresentationStyle::Push,
            format!("push:{name}:abcd1234"),
            ControllerHandle::new(),
            SurfaceHandle::new(),
        )
    }

    fn emitter(delivery: &Arc<RecordingEventDelivery>) -> LifecycleEmitter {
        LifecycleEmitter::new(delivery.clone(), EventBus::default())
    }

    #[tokio::test]
    async fn test_enter_pairs_appear_and_activate() {
        let delivery = Arc::new(RecordingEventDelivery::new());
        let emitter = emitter(&delivery);
        let mut c = container("details");

        emitter.enter(&mut c).await;

        assert!(c.is_active);
        assert_eq!(
            delivery.names_for(c.surface),
            vec!["onAppear".to_string(), "onActivate".to_string()]
        );
    }

    #[tokio::test]
    async fn test_leave_pairs_deactivate_and_disappear() {
        let delivery = Arc::new(RecordingEventDelivery::new());
        let emitter = emitter(&delivery);
        let mut c = container("details");
        c.is_active = true;

        emitter.leave(&mut c).await;

        assert!(!c.is_active);
        assert_eq!(
            delivery.names_for(c.surface),
            vec!["onDeactivate".to_string(), "onDisappear".to_string()]
        );
    }

    #[tokio::test]
    async fn test_payloads_carry_screen_name() {
        let delivery = Arc::new(RecordingEventDelivery::new());
        let emitter = emitter(&delivery);
        let c = container("cart");

        emitter
            .receive_params(&c, json!({"sku": "A-1"}), Some("catalog"))
            .await;

        let payloads = delivery.payloads_for(c.surface, "onReceiveParams");
        assert_eq!(payloads[0]["screenName"], "cart");
        assert_eq!(payloads[0]["params"]["sku"], "A-1");
        assert_eq!(payloads[0]["source"], "catalog");
    }

    #[tokio::test]
    async fn test_tab_change_mirrors_onto_bus() {
        let delivery = Arc::new(RecordingEventDelivery::new());
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let emitter = LifecycleEmitter::new(delivery.clone(), bus);
        let c = container("library");

        emitter.tab_change(&c, 2, Some(0), false).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Tab(TabEvent::Changed {
                selected_index: 2,
                previous_index: Some(0),
                user_initiated: false,
            })
        );
    }
}
