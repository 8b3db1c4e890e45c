//! Screen containers: the unit of identity.
//!
//! A container pairs one native controller with its content surface under a
//! logical screen name and an immutable presentation style. Containers are
//! created and destroyed only by the registry; everything else borrows them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bridge_traits::presentation::{ControllerHandle, PresentationStyle, SurfaceHandle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::NavigationError;

/// Unique identifier for a screen container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(Uuid);

impl ContainerId {
    /// Create a new random container ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration aspects stored per container.
///
/// Each aspect maps to one prop blob and is read by the matching executor at
/// presentation time. Writes overwrite the aspect wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigAspect {
    Tab,
    Push,
    Modal,
    Sheet,
    Popover,
    Overlay,
    Drawer,
    SplitView,
}

impl ConfigAspect {
    /// The prop key carrying this aspect's blob.
    pub fn prop_key(&self) -> &'static str {
        match self {
            ConfigAspect::Tab => "tabConfig",
            ConfigAspect::Push => "pushConfig",
            ConfigAspect::Modal => "modalConfig",
            ConfigAspect::Sheet => "sheetConfig",
            ConfigAspect::Popover => "popoverConfig",
            ConfigAspect::Overlay => "overlayConfig",
            ConfigAspect::Drawer => "drawerConfig",
            ConfigAspect::SplitView => "splitViewConfig",
        }
    }

    /// All aspects, in prop-scan order.
    pub fn all() -> [ConfigAspect; 8] {
        [
            ConfigAspect::Tab,
            ConfigAspect::Push,
            ConfigAspect::Modal,
            ConfigAspect::Sheet,
            ConfigAspect::Popover,
            ConfigAspect::Overlay,
            ConfigAspect::Drawer,
            ConfigAspect::SplitView,
        ]
    }

    /// The aspect an executor reads for a given presentation style.
    pub fn for_style(style: PresentationStyle) -> ConfigAspect {
        match style {
            PresentationStyle::Tab => ConfigAspect::Tab,
            PresentationStyle::Push => ConfigAspect::Push,
            PresentationStyle::Modal => ConfigAspect::Modal,
            PresentationStyle::Sheet => ConfigAspect::Sheet,
            PresentationStyle::Popover => ConfigAspect::Popover,
            PresentationStyle::Overlay => ConfigAspect::Overlay,
            PresentationStyle::Drawer => ConfigAspect::Drawer,
            PresentationStyle::SplitView => ConfigAspect::SplitView,
        }
    }
}

impl FromStr for ConfigAspect {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigAspect::all()
            .into_iter()
            .find(|aspect| aspect.prop_key() == s)
            .ok_or_else(|| NavigationError::MalformedProps(format!("unknown config aspect: {s}")))
    }
}

/// The owned pairing of a native controller and content surface representing
/// one screen instance.
#[derive(Debug)]
pub struct ScreenContainer {
    /// Registry identity.
    pub id: ContainerId,
    /// Logical screen name as declared by application code. Not necessarily
    /// unique across presentation styles.
    pub name: String,
    /// Style the container was created with; immutable after creation.
    pub style: PresentationStyle,
    /// Registry slot this container occupies.
    pub context_key: String,
    /// Exclusively owned native controller; destroyed on eviction.
    pub controller: ControllerHandle,
    /// Child attachment point and event-delivery key; same lifetime as the
    /// controller.
    pub surface: SurfaceHandle,
    /// True while this screen is the visibly selected/foreground screen.
    pub is_active: bool,
    /// Per-aspect configuration, written by prop updates and read by the
    /// matching executor at presentation time.
    pub stored_configuration: HashMap<ConfigAspect, Value>,
}

impl ScreenContainer {
    pub fn new(
        name: impl Into<String>,
        style: PresentationStyle,
        context_key: impl Into<String>,
        controller: ControllerHandle,
        surface: SurfaceHandle,
    ) -> Self {
        Self {
            id: ContainerId::new(),
            name: name.into(),
            style,
            context_key: context_key.into(),
            controller,
            surface,
            is_active: false,
            stored_configuration: HashMap::new(),
        }
    }

    /// Overwrite one aspect's configuration wholesale.
    pub fn store_config(&mut self, aspect: ConfigAspect, blob: Value) {
        self.stored_configuration.insert(aspect, blob);
    }

    /// Decode the stored blob for an aspect, falling back to the type's
    /// default when absent or undecodable. Decode failures are logged, not
    /// raised: a bad config blob must not block navigation.
    pub fn config<T>(&self, aspect: ConfigAspect) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match self.stored_configuration.get(&aspect) {
            None => T::default(),
            Some(blob) => serde_json::from_value(blob.clone()).unwrap_or_else(|err| {
                tracing::warn!(
                    screen = %self.name,
                    aspect = aspect.prop_key(),
                    %err,
                    "undecodable config blob, using defaults"
                );
                T::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::presentation::PushOptions;
    use serde_json::json;

    fn container() -> ScreenContainer {
        ScreenContainer::new(
            "details",
            PresentationStyle::Push,
            "push:details:abcd1234",
            ControllerHandle::new(),
            SurfaceHandle::new(),
        )
    }

    #[test]
    fn test_store_config_overwrites_wholesale() {
        let mut c = container();
        c.store_config(ConfigAspect::Push, json!({"title": "A", "hideHeader": true}));
        c.store_config(ConfigAspect::Push, json!({"title": "B"}));

        let options: PushOptions = c.config(ConfigAspect::Push);
        assert_eq!(options.title.as_deref(), Some("B"));
        // No partial merge: the earlier hideHeader is gone.
        assert!(!options.hide_header);
    }

    #[test]
    fn test_config_defaults_when_absent() {
        let c = container();
        let options: PushOptions = c.config(ConfigAspect::Push);
        assert_eq!(options, PushOptions::default());
    }

    #[test]
    fn test_config_defaults_on_bad_blob() {
        let mut c = container();
        c.store_config(ConfigAspect::Push, json!("not an object"));
        let options: PushOptions = c.config(ConfigAspect::Push);
        assert_eq!(options, PushOptions::default());
    }

    #[test]
    fn test_aspect_prop_keys() {
        assert_eq!(ConfigAspect::SplitView.prop_key(), "splitViewConfig");
        assert_eq!("drawerConfig".parse::<ConfigAspect>().unwrap(), ConfigAspect::Drawer);
        assert!("windowConfig".parse::<ConfigAspect>().is_err());
    }
}
