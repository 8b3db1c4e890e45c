//! Screen prop decoding.
//!
//! Each prop update arriving from application code is a JSON object. Two keys
//! are identity (`name`, `presentationStyle`); the rest split into per-style
//! configuration blobs, navigation commands, and a generic `params` payload.
//! Identity errors reject the whole update; everything else degrades per key.

use bridge_traits::presentation::{IconDescriptor, PresentationStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{decode_commands, NavigationCommand};
use crate::container::ConfigAspect;
use crate::error::NavigationError;

/// One decoded prop update for a screen. Consumed exactly once; the command
/// list carries non-cloneable decode errors, so no `Clone`.
#[derive(Debug)]
pub struct ScreenProps {
    pub name: String,
    pub style: PresentationStyle,
    /// Per-aspect configuration blobs present in this update, kept raw; the
    /// matching executor decodes them at presentation time.
    pub configs: Vec<(ConfigAspect, Value)>,
    /// Commands carried by this update, already split per kind. Malformed
    /// entries survive as errors so the caller can log each one.
    pub commands: Vec<Result<NavigationCommand, NavigationError>>,
}

impl ScreenProps {
    /// Decode a raw prop object.
    ///
    /// `name` and `presentationStyle` are mandatory; a missing or malformed
    /// identity fails the whole update since there is no container to charge
    /// the rest of the payload to.
    pub fn decode(value: &Value) -> Result<Self, NavigationError> {
        let map = value
            .as_object()
            .ok_or_else(|| NavigationError::MalformedProps("props must be an object".into()))?;

        let name = map
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| NavigationError::MalformedProps("missing screen name".into()))?
            .to_string();

        let style: PresentationStyle = map
            .get("presentationStyle")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                NavigationError::MalformedProps(format!("{name}: missing presentationStyle"))
            })?
            .parse()
            .map_err(|err| NavigationError::MalformedProps(format!("{name}: {err}")))?;

        let configs = ConfigAspect::all()
            .into_iter()
            .filter_map(|aspect| {
                map.get(aspect.prop_key())
                    .map(|blob| (aspect, blob.clone()))
            })
            .collect();

        let commands = match map.get("navigationCommand") {
            Some(command_value) => decode_commands(command_value),
            None => Vec::new(),
        };

        Ok(Self {
            name,
            style,
            configs,
            commands,
        })
    }
}

/// Tab bar chrome as declared in `tabConfig`, before icon resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TabConfig {
    pub title: Option<String>,
    pub badge: Option<String>,
    pub icon: Option<IconDescriptor>,
    pub index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use serde_json::json;

    #[test]
    fn test_decode_identity_and_configs() {
        let props = ScreenProps::decode(&json!({
            "name": "settings",
            "presentationStyle": "tab",
            "tabConfig": {"title": "Settings", "index": 2},
            "pushConfig": {"title": "Settings"}
        }))
        .unwrap();

        assert_eq!(props.name, "settings");
        assert_eq!(props.style, PresentationStyle::Tab);
        assert_eq!(props.configs.len(), 2);
        assert!(props.commands.is_empty());
    }

    #[test]
    fn test_missing_name_rejects_update() {
        let err = ScreenProps::decode(&json!({"presentationStyle": "push"})).unwrap_err();
        assert!(matches!(err, NavigationError::MalformedProps(_)));
    }

    #[test]
    fn test_unknown_style_rejects_update() {
        let err = ScreenProps::decode(&json!({
            "name": "x",
            "presentationStyle": "carousel"
        }))
        .unwrap_err();
        assert!(matches!(err, NavigationError::MalformedProps(_)));
    }

    #[test]
    fn test_commands_ride_along() {
        let props = ScreenProps::decode(&json!({
            "name": "home",
            "presentationStyle": "tab",
            "navigationCommand": {"pushTo": {"screenName": "details"}}
        }))
        .unwrap();

        assert_eq!(props.commands.len(), 1);
        let command = props.commands[0].as_ref().unwrap();
        assert_eq!(command.kind, CommandKind::PushTo);
    }

    #[test]
    fn test_tab_config_decodes_icon_descriptor() {
        let config: TabConfig = serde_json::from_value(json!({
            "title": "Library",
            "icon": {"source": "system", "name": "books.vertical"}
        }))
        .unwrap();
        assert_eq!(config.icon.as_ref().unwrap().name, "books.vertical");
        assert_eq!(config.index, None);
    }
}
