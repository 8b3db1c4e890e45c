//! # Event Bus System
//!
//! Provides an event-driven architecture for the navigation core using
//! `tokio::sync::broadcast`. This module enables decoupled observation of
//! navigation outcomes: every lifecycle delivery, resolution decision and
//! dropped command is mirrored onto the bus as a typed event.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     emit      ┌───────────┐
//! │ Lifecycle    ├──────────────>│           │
//! │ Emitter      │               │           │
//! └──────────────┘               │ EventBus  │
//! ┌──────────────┐     emit      │ (broadcast│     subscribe    ┌────────────┐
//! │ Resolver/    ├──────────────>│  channel) ├─────────────────>│ Host shell │
//! │ Executors    │               │           │                  └────────────┘
//! └──────────────┘               │           │
//! ┌──────────────┐     emit      │           │     subscribe    ┌────────────┐
//! │ Bootstrapper ├──────────────>│           ├─────────────────>│ Test suite │
//! └──────────────┘               └───────────┘                  └────────────┘
//! ```
//!
//! The bus is observability, not delivery: application-facing events travel
//! through the host's `EventDelivery` bridge, keyed by surface identity. The
//! bus carries the same facts for anyone who wants to watch the whole stream.
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` can produce two errors on the receive side:
//!
//! - **`RecvError::Lagged(n)`**: subscriber was too slow and missed `n`
//!   events. Non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: all senders dropped. Treat as shutdown.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum NavCoreEvent {
    /// Screen lifecycle events (appear/disappear/activate/deactivate)
    Screen(ScreenEvent),
    /// Navigation resolution and execution events
    Navigation(NavigationEvent),
    /// Tab selection events
    Tab(TabEvent),
}

impl NavCoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            NavCoreEvent::Screen(e) => e.description(),
            NavCoreEvent::Navigation(e) => e.description(),
            NavCoreEvent::Tab(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            NavCoreEvent::Navigation(NavigationEvent::CommandDropped { .. }) => {
                EventSeverity::Warning
            }
            NavCoreEvent::Navigation(NavigationEvent::RootFallback { .. }) => {
                EventSeverity::Warning
            }
            NavCoreEvent::Navigation(NavigationEvent::Executed { .. }) => EventSeverity::Info,
            NavCoreEvent::Navigation(NavigationEvent::RootReady { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Screen Lifecycle Events
// ============================================================================

/// Mirror of the per-screen lifecycle vocabulary delivered to application
/// code. `screen` is the logical screen name the container was created with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum ScreenEvent {
    /// Screen became visible.
    Appeared { screen: String },
    /// Screen stopped being visible.
    Disappeared { screen: String },
    /// Screen became the foreground screen.
    Activated { screen: String },
    /// Screen stopped being the foreground screen.
    Deactivated { screen: String },
    /// Navigation params or a dismissal result were delivered to the screen.
    ParamsDelivered {
        screen: String,
        /// Name of the screen that sent the params, when known.
        source: Option<String>,
    },
    /// A header action was pressed on the screen.
    HeaderActionPressed { screen: String, action_id: String },
}

impl ScreenEvent {
    fn description(&self) -> &str {
        match self {
            ScreenEvent::Appeared { .. } => "Screen appeared",
            ScreenEvent::Disappeared { .. } => "Screen disappeared",
            ScreenEvent::Activated { .. } => "Screen activated",
            ScreenEvent::Deactivated { .. } => "Screen deactivated",
            ScreenEvent::ParamsDelivered { .. } => "Params delivered to screen",
            ScreenEvent::HeaderActionPressed { .. } => "Header action pressed",
        }
    }
}

// ============================================================================
// Navigation Events
// ============================================================================

/// Events describing how navigation commands were resolved and executed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum NavigationEvent {
    /// A command's requested method was resolved against the target's
    /// registered style.
    Resolved {
        target: String,
        requested: String,
        resolved: String,
    },
    /// An executor finished driving the native primitive.
    Executed {
        action: String,
        target_screen: Option<String>,
        animated: bool,
    },
    /// A command was dropped without executing.
    CommandDropped { action: String, reason: String },
    /// The bootstrapper installed the requested screen as root.
    RootReady { screen: String },
    /// The bootstrapper gave up on bounded retries and installed the
    /// loading placeholder; background retries continue.
    RootFallback { screen: String },
}

impl NavigationEvent {
    fn description(&self) -> &str {
        match self {
            NavigationEvent::Resolved { .. } => "Navigation method resolved",
            NavigationEvent::Executed { .. } => "Navigation executed",
            NavigationEvent::CommandDropped { .. } => "Navigation command dropped",
            NavigationEvent::RootReady { .. } => "Navigation root ready",
            NavigationEvent::RootFallback { .. } => "Navigation root fell back to placeholder",
        }
    }
}

// ============================================================================
// Tab Events
// ============================================================================

/// Events related to tab selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum TabEvent {
    /// Selected tab changed.
    Changed {
        selected_index: usize,
        previous_index: Option<usize>,
        /// True when the user tapped the tab bar, false when navigation
        /// resolution switched tabs programmatically.
        user_initiated: bool,
    },
    /// The already-selected tab was tapped again.
    Pressed { selected_index: usize },
}

impl TabEvent {
    fn description(&self) -> &str {
        match self {
            TabEvent::Changed { .. } => "Tab selection changed",
            TabEvent::Pressed { .. } => "Active tab pressed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to navigation events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<NavCoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers. Publishing with no
    /// subscribers is a normal condition for the core; callers use `.ok()`.
    pub fn emit(&self, event: NavCoreEvent) -> Result<usize, SendError<NavCoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all
    /// future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<NavCoreEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let event = NavCoreEvent::Screen(ScreenEvent::Appeared {
            screen: "home".to_string(),
        });
        bus.emit(event.clone()).unwrap();

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_independently() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(NavCoreEvent::Tab(TabEvent::Pressed { selected_index: 0 }))
            .unwrap();

        assert!(matches!(rx1.recv().await.unwrap(), NavCoreEvent::Tab(_)));
        assert!(matches!(rx2.recv().await.unwrap(), NavCoreEvent::Tab(_)));
    }

    #[test]
    fn test_emit_without_subscribers_errors() {
        let bus = EventBus::new(16);
        assert!(bus
            .emit(NavCoreEvent::Tab(TabEvent::Pressed { selected_index: 0 }))
            .is_err());
    }

    #[test]
    fn test_severity_classification() {
        let dropped = NavCoreEvent::Navigation(NavigationEvent::CommandDropped {
            action: "pop".to_string(),
            reason: "stack has a single entry".to_string(),
        });
        assert_eq!(dropped.severity(), EventSeverity::Warning);

        let appeared = NavCoreEvent::Screen(ScreenEvent::Appeared {
            screen: "home".to_string(),
        });
        assert_eq!(appeared.severity(), EventSeverity::Debug);
    }
}
