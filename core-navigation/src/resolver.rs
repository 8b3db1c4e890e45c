//! Smart navigation resolution.
//!
//! The single most important behavioral contract in the system: a screen's
//! declared presentation style is authoritative, the caller's requested
//! navigation verb is advisory. Application code routes generically ("go to
//! screen X"); only the screen's own declaration knows whether that means
//! switching a tab versus stacking a page, so the override is centralized
//! here and call sites never need to know a target's style.

use bridge_traits::presentation::PresentationStyle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete navigation verb an executor can carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationMethod {
    Push,
    Modal,
    Sheet,
    Popover,
    Overlay,
    Drawer,
    SplitView,
    SwitchTab,
}

impl NavigationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMethod::Push => "push",
            NavigationMethod::Modal => "modal",
            NavigationMethod::Sheet => "sheet",
            NavigationMethod::Popover => "popover",
            NavigationMethod::Overlay => "overlay",
            NavigationMethod::Drawer => "drawer",
            NavigationMethod::SplitView => "splitView",
            NavigationMethod::SwitchTab => "switchTab",
        }
    }

    /// Style a freshly created target container gets when this method
    /// executes against an unregistered screen.
    pub fn target_style(&self) -> PresentationStyle {
        match self {
            NavigationMethod::Push => PresentationStyle::Push,
            NavigationMethod::Modal => PresentationStyle::Modal,
            NavigationMethod::Sheet => PresentationStyle::Sheet,
            NavigationMethod::Popover => PresentationStyle::Popover,
            NavigationMethod::Overlay => PresentationStyle::Overlay,
            NavigationMethod::Drawer => PresentationStyle::Drawer,
            NavigationMethod::SplitView => PresentationStyle::SplitView,
            NavigationMethod::SwitchTab => PresentationStyle::Tab,
        }
    }
}

impl fmt::Display for NavigationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical navigation method for a registered presentation style.
///
/// Total mapping; no default fallthrough.
pub fn canonical_method(style: PresentationStyle) -> NavigationMethod {
    match style {
        PresentationStyle::Tab => NavigationMethod::SwitchTab,
        PresentationStyle::Push => NavigationMethod::Push,
        PresentationStyle::Modal => NavigationMethod::Modal,
        PresentationStyle::Sheet => NavigationMethod::Sheet,
        PresentationStyle::Popover => NavigationMethod::Popover,
        PresentationStyle::Overlay => NavigationMethod::Overlay,
        PresentationStyle::Drawer => NavigationMethod::Drawer,
        PresentationStyle::SplitView => NavigationMethod::SplitView,
    }
}

/// Resolve the actual method for a navigation command.
///
/// The registered style always wins over the requested method. A screen the
/// registry has never seen falls back to the requested method verbatim: the
/// resolver cannot invent a style for an unknown screen.
pub fn resolve(requested: NavigationMethod, registered: Option<PresentationStyle>) -> NavigationMethod {
    match registered {
        Some(style) => canonical_method(style),
        None => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_style_wins() {
        // Asking to push a screen registered as a tab must switch tabs.
        assert_eq!(
            resolve(NavigationMethod::Push, Some(PresentationStyle::Tab)),
            NavigationMethod::SwitchTab
        );
        // And the other way around.
        assert_eq!(
            resolve(NavigationMethod::SwitchTab, Some(PresentationStyle::Push)),
            NavigationMethod::Push
        );
    }

    #[test]
    fn test_every_style_overrides_every_request() {
        let styles = [
            PresentationStyle::Tab,
            PresentationStyle::Push,
            PresentationStyle::Modal,
            PresentationStyle::Sheet,
            PresentationStyle::Popover,
            PresentationStyle::Overlay,
            PresentationStyle::Drawer,
            PresentationStyle::SplitView,
        ];
        let requests = [
            NavigationMethod::Push,
            NavigationMethod::Modal,
            NavigationMethod::Sheet,
            NavigationMethod::Popover,
            NavigationMethod::Overlay,
            NavigationMethod::Drawer,
            NavigationMethod::SplitView,
            NavigationMethod::SwitchTab,
        ];
        for style in styles {
            for requested in requests {
                assert_eq!(resolve(requested, Some(style)), canonical_method(style));
            }
        }
    }

    #[test]
    fn test_unknown_screen_falls_back_to_request() {
        assert_eq!(
            resolve(NavigationMethod::Drawer, None),
            NavigationMethod::Drawer
        );
    }

    #[test]
    fn test_canonical_and_target_style_are_inverse() {
        for style in [
            PresentationStyle::Tab,
            PresentationStyle::Push,
            PresentationStyle::Modal,
            PresentationStyle::Sheet,
            PresentationStyle::Popover,
            PresentationStyle::Overlay,
            PresentationStyle::Drawer,
            PresentationStyle::SplitView,
        ] {
            assert_eq!(canonical_method(style).target_style(), style);
        }
    }
}
