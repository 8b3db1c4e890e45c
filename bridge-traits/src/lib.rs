//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the navigation core and the
//! platform-specific presentation layer. The core never touches a native view
//! hierarchy directly: every native capability it needs (instantiating a
//! controller, pushing onto a stack, presenting modally, selecting a tab,
//! attaching an overlay) is expressed as a trait here and injected by the
//! host as a trait object.
//!
//! ## Traits
//!
//! ### Presentation
//! - [`PresentationHost`](presentation::PresentationHost) - Controller
//!   lifecycle, stack/modal/tab/overlay/drawer/split primitives, hierarchy
//!   and geometry queries
//!
//! ### View Services
//! - [`ChildAttachment`](views::ChildAttachment) - Attach child surfaces to a
//!   screen's content surface
//! - [`IconResolver`](views::IconResolver) - Resolve icon descriptors into
//!   host renderables for tab/header items
//!
//! ### Event Delivery
//! - [`EventDelivery`](events::EventDelivery) - Deliver named events with a
//!   JSON payload to application code, keyed by surface identity
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with a descriptive error when a required capability is
//! missing, rather than degrading silently at first use:
//!
//! ```ignore
//! let host = config.presentation_host
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "PresentationHost".to_string(),
//!         message: "No presentation host provided. \
//!                  Tests: use bridge_headless::HeadlessHost. \
//!                  Mobile: inject the platform-native adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert native errors to `BridgeError`
//! and include enough context (handles, screen names) to act on.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` (via
//! [`PlatformSendSync`](platform::PlatformSendSync)) so implementations can
//! be shared across async tasks behind `Arc`.

pub mod error;
pub mod events;
pub mod platform;
pub mod presentation;
pub mod time;
pub mod views;

pub use error::{BridgeError, Result};
pub use events::EventDelivery;
pub use presentation::{
    ControllerHandle, DrawerDirection, PresentationHost, PresentationStyle, Rect, SurfaceHandle,
};
pub use views::{ChildAttachment, IconResolver};
