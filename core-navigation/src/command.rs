//! Navigation command decoding.
//!
//! A `navigationCommand` prop is a map whose keys are command kinds, each
//! mapping to its own parameter object. Commands are transient: decoded,
//! executed once, never persisted. Distinct kinds in the same update are
//! decoded independently and executed one by one, never merged.

use bridge_traits::presentation::{DrawerDirection, PresentationStyle};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::NavigationError;
use crate::resolver::NavigationMethod;

/// Every command kind the prop channel can carry, in execution order.
///
/// Dismiss/pop kinds come first so that an update carrying both a dismissal
/// and a presentation settles the old surface before raising the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Pop,
    PopTo,
    PopToRoot,
    DismissModal,
    DismissSheet,
    DismissPopover,
    DismissOverlay,
    DismissDrawer,
    ReplaceWith,
    PushTo,
    PresentModal,
    PresentSheet,
    PresentPopover,
    PresentOverlay,
    PresentDrawer,
    PresentSplitView,
}

impl CommandKind {
    /// All kinds, in execution order.
    pub fn all() -> [CommandKind; 16] {
        [
            CommandKind::Pop,
            CommandKind::PopTo,
            CommandKind::PopToRoot,
            CommandKind::DismissModal,
            CommandKind::DismissSheet,
            CommandKind::DismissPopover,
            CommandKind::DismissOverlay,
            CommandKind::DismissDrawer,
            CommandKind::ReplaceWith,
            CommandKind::PushTo,
            CommandKind::PresentModal,
            CommandKind::PresentSheet,
            CommandKind::PresentPopover,
            CommandKind::PresentOverlay,
            CommandKind::PresentDrawer,
            CommandKind::PresentSplitView,
        ]
    }

    /// The prop map key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Pop => "pop",
            CommandKind::PopTo => "popTo",
            CommandKind::PopToRoot => "popToRoot",
            CommandKind::DismissModal => "dismissModal",
            CommandKind::DismissSheet => "dismissSheet",
            CommandKind::DismissPopover => "dismissPopover",
            CommandKind::DismissOverlay => "dismissOverlay",
            CommandKind::DismissDrawer => "dismissDrawer",
            CommandKind::ReplaceWith => "replaceWith",
            CommandKind::PushTo => "pushTo",
            CommandKind::PresentModal => "presentModal",
            CommandKind::PresentSheet => "presentSheet",
            CommandKind::PresentPopover => "presentPopover",
            CommandKind::PresentOverlay => "presentOverlay",
            CommandKind::PresentDrawer => "presentDrawer",
            CommandKind::PresentSplitView => "presentSplitView",
        }
    }

    /// Requested navigation method, for the target-presenting kinds that go
    /// through smart resolution. Stack-local and dismiss kinds act on the
    /// source screen and are never subject to style override.
    pub fn requested_method(&self) -> Option<NavigationMethod> {
        match self {
            CommandKind::PushTo => Some(NavigationMethod::Push),
            CommandKind::PresentModal => Some(NavigationMethod::Modal),
            CommandKind::PresentSheet => Some(NavigationMethod::Sheet),
            CommandKind::PresentPopover => Some(NavigationMethod::Popover),
            CommandKind::PresentOverlay => Some(NavigationMethod::Overlay),
            CommandKind::PresentDrawer => Some(NavigationMethod::Drawer),
            CommandKind::PresentSplitView => Some(NavigationMethod::SplitView),
            _ => None,
        }
    }

    /// Whether this kind requires a target screen name.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            CommandKind::PopTo | CommandKind::ReplaceWith | CommandKind::PushTo
        ) || self.requested_method().is_some()
    }
}

impl FromStr for CommandKind {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                NavigationError::MalformedCommand(format!("unknown command kind: {s}"))
            })
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One decoded navigation command.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationCommand {
    pub kind: CommandKind,
    /// Target screen name, for kinds that take one.
    pub target: Option<String>,
    /// Animation request; `None` defers to the configured default.
    pub animated: Option<bool>,
    /// Params to deliver to the target via `onReceiveParams`.
    pub params: Option<Value>,
    /// Result to deliver to the revealed screen on pop/dismiss.
    pub result: Option<Value>,
    /// Explicit style for targets the registry has never seen.
    pub style_override: Option<PresentationStyle>,
    /// Identity of the view that issued the command, when the host supplies
    /// one. Carried for future multi-instance routing; unused today.
    pub source_view_id: Option<String>,
    /// Drawer entrance override; dismissal infers its own exit direction
    /// from the current frame.
    pub drawer_direction: Option<DrawerDirection>,
}

impl NavigationCommand {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            target: None,
            animated: None,
            params: None,
            result: None,
            style_override: None,
            source_view_id: None,
            drawer_direction: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = Some(animated);
        self
    }

    fn from_args(kind: CommandKind, args: &Value) -> Result<Self, NavigationError> {
        let mut command = NavigationCommand::new(kind);

        // Booleans as a bare `true` are accepted for parameterless kinds.
        let Some(map) = args.as_object() else {
            if kind.requires_target() {
                return Err(NavigationError::MalformedCommand(format!(
                    "{kind} requires screenName"
                )));
            }
            return Ok(command);
        };

        command.target = map
            .get("screenName")
            .and_then(Value::as_str)
            .map(str::to_string);
        command.animated = map.get("animated").and_then(Value::as_bool);
        command.params = map.get("params").cloned();
        command.result = map.get("result").cloned();
        command.source_view_id = map
            .get("sourceViewId")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(style) = map.get("styleOverride").and_then(Value::as_str) {
            command.style_override = Some(style.parse().map_err(|_| {
                NavigationError::MalformedCommand(format!("unknown styleOverride: {style}"))
            })?);
        }
        if let Some(direction) = map.get("direction") {
            command.drawer_direction = serde_json::from_value(direction.clone()).map_err(|_| {
                NavigationError::MalformedCommand(format!("unknown drawer direction: {direction}"))
            })?;
        }

        if command.target.is_none() && kind.requires_target() {
            return Err(NavigationError::MalformedCommand(format!(
                "{kind} requires screenName"
            )));
        }
        Ok(command)
    }
}

/// Decode every command present in a `navigationCommand` prop value.
///
/// Unknown keys are skipped with a warning rather than failing the whole
/// update; a malformed parameter object fails only its own command.
pub fn decode_commands(value: &Value) -> Vec<Result<NavigationCommand, NavigationError>> {
    let Some(map) = value.as_object() else {
        return vec![Err(NavigationError::MalformedCommand(
            "navigationCommand must be an object".to_string(),
        ))];
    };

    let mut commands = Vec::new();
    for kind in CommandKind::all() {
        if let Some(args) = map.get(kind.as_str()) {
            commands.push(NavigationCommand::from_args(kind, args));
        }
    }

    for key in map.keys() {
        if CommandKind::from_str(key).is_err() {
            tracing::warn!(key = %key, "skipping unknown navigation command kind");
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_push_command() {
        let value = json!({
            "pushTo": {
                "screenName": "details",
                "animated": false,
                "params": {"id": 42}
            }
        });
        let commands = decode_commands(&value);
        assert_eq!(commands.len(), 1);
        let command = commands[0].as_ref().unwrap();
        assert_eq!(command.kind, CommandKind::PushTo);
        assert_eq!(command.target.as_deref(), Some("details"));
        assert_eq!(command.animated, Some(false));
        assert_eq!(command.params, Some(json!({"id": 42})));
    }

    #[test]
    fn test_distinct_kinds_decode_independently() {
        let value = json!({
            "pop": {"result": {"ok": true}},
            "presentModal": {"screenName": "confirm"}
        });
        let commands: Vec<_> = decode_commands(&value)
            .into_iter()
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(commands.len(), 2);
        // Dismiss/pop kinds execute before presentations.
        assert_eq!(commands[0].kind, CommandKind::Pop);
        assert_eq!(commands[1].kind, CommandKind::PresentModal);
    }

    #[test]
    fn test_missing_target_is_malformed() {
        let value = json!({"pushTo": {"animated": true}});
        let commands = decode_commands(&value);
        assert!(matches!(
            commands[0],
            Err(NavigationError::MalformedCommand(_))
        ));
    }

    #[test]
    fn test_bare_true_pop_is_accepted() {
        let value = json!({"pop": true});
        let commands = decode_commands(&value);
        let command = commands[0].as_ref().unwrap();
        assert_eq!(command.kind, CommandKind::Pop);
        assert_eq!(command.animated, None);
    }

    #[test]
    fn test_unknown_kind_is_skipped() {
        let value = json!({"teleportTo": {"screenName": "mars"}});
        assert!(decode_commands(&value).is_empty());
    }

    #[test]
    fn test_style_override_decodes() {
        let value = json!({"pushTo": {"screenName": "x", "styleOverride": "sheet"}});
        let command = decode_commands(&value)[0].as_ref().unwrap().clone();
        assert_eq!(command.style_override, Some(PresentationStyle::Sheet));
    }

    #[test]
    fn test_bad_style_override_fails_command() {
        let value = json!({"pushTo": {"screenName": "x", "styleOverride": "hologram"}});
        assert!(decode_commands(&value)[0].is_err());
    }
}
