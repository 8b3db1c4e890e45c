//! # Core Configuration Module
//!
//! Provides configuration management for the navigation core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CoreConfig` instance holding all bridge dependencies and tunables the
//! navigation core needs. It enforces fail-fast validation so a missing
//! required bridge surfaces at startup, not at first navigation.
//!
//! ## Required Dependencies
//!
//! - `PresentationHost` - drives the native presentation APIs
//! - `EventDelivery` - delivers lifecycle events to application code
//!
//! ## Optional Dependencies
//!
//! - `ChildAttachment` - child view attachment (absent: attachment skipped)
//! - `IconResolver` - tab/header icon resolution (absent: icon-less items)
//! - `Clock` - time source (default: system clock)
//!
//! When the `headless-shims` feature is enabled, in-memory defaults for the
//! required bridges are injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .presentation_host(Arc::new(MyNativeHost::new()))
//!     .event_delivery(Arc::new(MyEventPipeline::new()))
//!     .sweep_interval(std::time::Duration::from_secs(30))
//!     .build()
//!     .expect("Failed to build config");
//! ```

#[cfg(not(feature = "headless-shims"))]
use crate::error::Error;
use crate::error::Result;
use bridge_traits::time::{Clock, SystemClock};
use bridge_traits::{ChildAttachment, EventDelivery, IconResolver, PresentationHost};
use std::sync::Arc;
use std::time::Duration;

/// Retry tuning for root bootstrap.
///
/// Bounded exponential backoff while searching, then an infinite
/// fixed-interval background loop once the fallback placeholder is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapPolicy {
    /// Attempts before falling back to the placeholder root.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles per attempt.
    pub initial_delay: Duration,
    /// Backoff cap.
    pub max_delay: Duration,
    /// Fixed interval of the never-give-up fallback loop.
    pub fallback_interval: Duration,
}

impl Default for BootstrapPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(500),
            fallback_interval: Duration::from_millis(500),
        }
    }
}

/// Core configuration for the navigation core.
///
/// Holds all bridge dependencies and tunables. Use [`CoreConfigBuilder`] to
/// construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Native presentation driver (required)
    pub presentation_host: Arc<dyn PresentationHost>,

    /// Application event delivery (required)
    pub event_delivery: Arc<dyn EventDelivery>,

    /// Child view attachment (optional)
    pub child_attachment: Option<Arc<dyn ChildAttachment>>,

    /// Icon resolution for tab/header items (optional)
    pub icon_resolver: Option<Arc<dyn IconResolver>>,

    /// Time source (defaults to the system clock)
    pub clock: Arc<dyn Clock>,

    /// Interval of the periodic registry sweep
    pub sweep_interval: Duration,

    /// Root bootstrap retry tuning
    pub bootstrap: BootstrapPolicy,

    /// Animation flag applied when a command omits `animated`
    pub default_animated: bool,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("presentation_host", &"PresentationHost { ... }")
            .field("event_delivery", &"EventDelivery { ... }")
            .field(
                "child_attachment",
                &self.child_attachment.as_ref().map(|_| "ChildAttachment { ... }"),
            )
            .field(
                "icon_resolver",
                &self.icon_resolver.as_ref().map(|_| "IconResolver { ... }"),
            )
            .field("sweep_interval", &self.sweep_interval)
            .field("bootstrap", &self.bootstrap)
            .field("default_animated", &self.default_animated)
            .finish()
    }
}

impl CoreConfig {
    /// Start building a configuration.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    presentation_host: Option<Arc<dyn PresentationHost>>,
    event_delivery: Option<Arc<dyn EventDelivery>>,
    child_attachment: Option<Arc<dyn ChildAttachment>>,
    icon_resolver: Option<Arc<dyn IconResolver>>,
    clock: Option<Arc<dyn Clock>>,
    sweep_interval: Option<Duration>,
    bootstrap: Option<BootstrapPolicy>,
    default_animated: Option<bool>,
}

impl CoreConfigBuilder {
    pub fn presentation_host(mut self, host: Arc<dyn PresentationHost>) -> Self {
        self.presentation_host = Some(host);
        self
    }

    pub fn event_delivery(mut self, delivery: Arc<dyn EventDelivery>) -> Self {
        self.event_delivery = Some(delivery);
        self
    }

    pub fn child_attachment(mut self, attachment: Arc<dyn ChildAttachment>) -> Self {
        self.child_attachment = Some(attachment);
        self
    }

    pub fn icon_resolver(mut self, resolver: Arc<dyn IconResolver>) -> Self {
        self.icon_resolver = Some(resolver);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    pub fn bootstrap(mut self, policy: BootstrapPolicy) -> Self {
        self.bootstrap = Some(policy);
        self
    }

    pub fn default_animated(mut self, animated: bool) -> Self {
        self.default_animated = Some(animated);
        self
    }

    /// Build the configuration, validating required bridges.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::CapabilityMissing`] when a required
    /// bridge is absent and no shim feature provides a default.
    pub fn build(self) -> Result<CoreConfig> {
        #[cfg(feature = "headless-shims")]
        let presentation_host = self.presentation_host.unwrap_or_else(|| {
            Arc::new(bridge_headless::HeadlessHost::new()) as Arc<dyn PresentationHost>
        });
        #[cfg(not(feature = "headless-shims"))]
        let presentation_host =
            self.presentation_host
                .ok_or_else(|| Error::CapabilityMissing {
                    capability: "PresentationHost".to_string(),
                    message: "No presentation host provided. \
                              Tests: enable the headless-shims feature. \
                              Mobile: inject the platform-native adapter."
                        .to_string(),
                })?;

        #[cfg(feature = "headless-shims")]
        let event_delivery = self.event_delivery.unwrap_or_else(|| {
            Arc::new(bridge_headless::RecordingEventDelivery::new()) as Arc<dyn EventDelivery>
        });
        #[cfg(not(feature = "headless-shims"))]
        let event_delivery = self.event_delivery.ok_or_else(|| Error::CapabilityMissing {
            capability: "EventDelivery".to_string(),
            message: "No event delivery pipeline provided. \
                      Tests: enable the headless-shims feature. \
                      Mobile: inject the platform-native adapter."
                .to_string(),
        })?;

        Ok(CoreConfig {
            presentation_host,
            event_delivery,
            child_attachment: self.child_attachment,
            icon_resolver: self.icon_resolver,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            sweep_interval: self.sweep_interval.unwrap_or(Duration::from_secs(30)),
            bootstrap: self.bootstrap.unwrap_or_default(),
            default_animated: self.default_animated.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "headless-shims"))]
    #[test]
    fn test_build_requires_presentation_host() {
        let result = CoreConfig::builder().build();
        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "PresentationHost"
        ));
    }

    #[cfg(feature = "headless-shims")]
    #[test]
    fn test_build_with_shims_uses_defaults() {
        let config = CoreConfig::builder().build().unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert!(config.default_animated);
        assert_eq!(config.bootstrap.max_attempts, 8);
    }

    #[cfg(feature = "headless-shims")]
    #[test]
    fn test_builder_overrides() {
        let config = CoreConfig::builder()
            .sweep_interval(Duration::from_secs(5))
            .default_animated(false)
            .bootstrap(BootstrapPolicy {
                max_attempts: 3,
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert!(!config.default_animated);
        assert_eq!(config.bootstrap.max_attempts, 3);
    }
}
