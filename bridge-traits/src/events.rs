//! Event Delivery Abstraction
//!
//! The framework's generic event-delivery primitive: named events with a JSON
//! payload, keyed by surface identity. The navigation core funnels its whole
//! lifecycle vocabulary (`onAppear`, `onNavigationEvent`, `onReceiveParams`,
//! ...) through this single seam so that every presentation path reports
//! through the same channel.

use async_trait::async_trait;
use serde_json::Value;

use crate::presentation::SurfaceHandle;
use crate::{error::Result, platform::PlatformSendSync};

/// Deliver a named event to the application code bound to a surface.
///
/// Delivery is fire-and-forget from the core's point of view: an `Ok` return
/// means the event was handed to the host's dispatch pipeline, not that
/// application code has observed it.
#[async_trait]
pub trait EventDelivery: PlatformSendSync {
    async fn deliver(&self, surface: SurfaceHandle, event: &str, payload: Value) -> Result<()>;
}
