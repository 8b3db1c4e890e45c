//! Presentation Host Abstraction
//!
//! The single seam between the navigation core and the native view hierarchy.
//! Handles are opaque: the host owns the real controllers and views and maps
//! handles to them internally. Animated operations are async and resolve when
//! the host's animation completes, which is how the core orders its
//! completion events behind the native transition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::views::IconHandle;
use crate::{error::Result, platform::PlatformSendSync, BridgeError};

// ============================================================================
// Handles
// ============================================================================

/// Opaque identity of one native controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerHandle(Uuid);

impl ControllerHandle {
    /// Mint a fresh handle. Hosts call this when instantiating a controller.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControllerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControllerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller:{}", self.0)
    }
}

/// Opaque identity of one screen's content surface (the child attachment
/// point and the key for event delivery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(Uuid);

impl SurfaceHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface:{}", self.0)
    }
}

// ============================================================================
// Presentation styles
// ============================================================================

/// The declared intrinsic navigation mode of a screen.
///
/// Immutable on a container after creation; recorded per screen name on first
/// registration and authoritative when resolving navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationStyle {
    /// Long-lived tab child; singleton per screen name.
    Tab,
    /// Pushed onto a navigation stack.
    Push,
    /// Full modal presentation.
    Modal,
    /// Detent-based sheet presentation.
    Sheet,
    /// Anchored popover.
    Popover,
    /// View inserted above the current hierarchy with a backdrop.
    Overlay,
    /// Edge-attached sliding panel.
    Drawer,
    /// Primary/detail split container.
    SplitView,
}

impl PresentationStyle {
    /// String form used in context keys and prop payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationStyle::Tab => "tab",
            PresentationStyle::Push => "push",
            PresentationStyle::Modal => "modal",
            PresentationStyle::Sheet => "sheet",
            PresentationStyle::Popover => "popover",
            PresentationStyle::Overlay => "overlay",
            PresentationStyle::Drawer => "drawer",
            PresentationStyle::SplitView => "splitView",
        }
    }
}

impl FromStr for PresentationStyle {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tab" => Ok(PresentationStyle::Tab),
            "push" => Ok(PresentationStyle::Push),
            "modal" => Ok(PresentationStyle::Modal),
            "sheet" => Ok(PresentationStyle::Sheet),
            "popover" => Ok(PresentationStyle::Popover),
            "overlay" => Ok(PresentationStyle::Overlay),
            "drawer" => Ok(PresentationStyle::Drawer),
            "splitView" => Ok(PresentationStyle::SplitView),
            _ => Err(BridgeError::OperationFailed(format!(
                "unknown presentation style: {s}"
            ))),
        }
    }
}

impl fmt::Display for PresentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// View frame in the host's coordinate space (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

// ============================================================================
// Style-specific presentation options
// ============================================================================

/// Header configuration applied when pushing onto a stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PushOptions {
    pub title: Option<String>,
    pub hide_header: bool,
    pub hide_back_button: bool,
    pub back_title: Option<String>,
    pub header_actions: Vec<HeaderAction>,
}

/// A tappable header item; presses surface as `onHeaderActionPress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderAction {
    pub action_id: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<IconDescriptor>,
}

/// Modal presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ModalOptions {
    pub detents: Vec<SheetDetent>,
    pub corner_radius: Option<f64>,
    pub show_drag_indicator: bool,
    pub dismiss_on_backdrop_tap: bool,
}

/// Sheet resting positions, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetDetent {
    Medium,
    Large,
    /// Fraction of the window height, 0.0 - 1.0.
    Fraction(f64),
}

/// Popover anchoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PopoverOptions {
    /// Anchor rect in window coordinates; host centers when absent.
    pub anchor: Option<Rect>,
    pub arrow_directions: Vec<ArrowDirection>,
    pub preferred_width: Option<f64>,
    pub preferred_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Overlay insertion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayOptions {
    /// Backdrop color as #RRGGBBAA; host default when absent.
    pub backdrop_color: Option<String>,
    pub dismiss_on_tap: bool,
}

/// Drawer geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawerOptions {
    pub direction: DrawerDirection,
    /// Fraction of the window the drawer occupies along its axis.
    pub size_fraction: f64,
}

impl Default for DrawerOptions {
    fn default() -> Self {
        Self {
            direction: DrawerDirection::Left,
            size_fraction: 0.8,
        }
    }
}

/// Edge a drawer enters from and exits toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawerDirection {
    Left,
    Right,
    Top,
    Bottom,
}

/// Split-view layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitOptions {
    pub display_mode: SplitDisplayMode,
    pub preferred_primary_fraction: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SplitDisplayMode {
    #[default]
    SideBySide,
    OverlayPrimary,
    PrimaryHidden,
}

/// Tab bar item descriptor applied to a tab child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TabItem {
    pub title: Option<String>,
    pub badge: Option<String>,
    /// Resolved by the core through `IconResolver` before this reaches the
    /// host; hosts never see raw descriptors here.
    #[serde(skip)]
    pub icon: Option<IconHandle>,
    pub index: Option<usize>,
}

/// Icon descriptor as it appears in prop payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDescriptor {
    /// "asset", "system", or "uri".
    pub source: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<f64>,
}

// ============================================================================
// Presentation host trait
// ============================================================================

/// Driver for the native presentation APIs.
///
/// Synchronous methods are hierarchy/geometry snapshots and must not block.
/// Async methods cover operations the host may animate; their futures resolve
/// when the transition completes (immediately when `animated` is false).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::presentation::{PresentationHost, PresentationStyle};
///
/// async fn push_detail(host: &dyn PresentationHost) -> bridge_traits::Result<()> {
///     let (controller, _surface) = host.instantiate("details", PresentationStyle::Push)?;
///     let stack = host.active_stack().expect("a stack root is installed");
///     host.push(stack, controller, Default::default(), true).await
/// }
/// ```
#[async_trait]
pub trait PresentationHost: PlatformSendSync {
    // --- Controller lifecycle ---

    /// Create a native controller + content surface pair for a screen.
    fn instantiate(
        &self,
        name: &str,
        style: PresentationStyle,
    ) -> Result<(ControllerHandle, SurfaceHandle)>;

    /// Destroy a controller and its surface. Idempotent on unknown handles.
    fn destroy(&self, controller: ControllerHandle) -> Result<()>;

    // --- Hierarchy queries ---

    /// Root controllers currently installed in windows.
    fn navigation_roots(&self) -> Vec<ControllerHandle>;

    /// Direct children of a container controller: tab children, stack
    /// entries, split columns, attached overlays/drawers.
    fn child_controllers(&self, controller: ControllerHandle) -> Vec<ControllerHandle>;

    /// The controller this one is currently presenting, if any.
    fn presented_controller(&self, controller: ControllerHandle) -> Option<ControllerHandle>;

    /// The controller that presented this one, if any.
    fn presenting_controller(&self, controller: ControllerHandle) -> Option<ControllerHandle>;

    // --- Stack operations ---

    /// The navigation stack that currently owns focus, if one exists.
    fn active_stack(&self) -> Option<ControllerHandle>;

    /// Entries of a stack, root first.
    fn stack_entries(&self, stack: ControllerHandle) -> Vec<ControllerHandle>;

    async fn push(
        &self,
        stack: ControllerHandle,
        controller: ControllerHandle,
        options: PushOptions,
        animated: bool,
    ) -> Result<()>;

    /// Pop the top entry; returns the popped controller.
    async fn pop(&self, stack: ControllerHandle, animated: bool) -> Result<ControllerHandle>;

    /// Pop back to `target`; returns the popped controllers, top first.
    async fn pop_to(
        &self,
        stack: ControllerHandle,
        target: ControllerHandle,
        animated: bool,
    ) -> Result<Vec<ControllerHandle>>;

    /// Swap the top entry in place, without an intermediate transition frame.
    fn replace_top(&self, stack: ControllerHandle, controller: ControllerHandle) -> Result<()>;

    // --- Modal family ---

    async fn present(
        &self,
        controller: ControllerHandle,
        options: ModalOptions,
        animated: bool,
    ) -> Result<()>;

    async fn present_popover(
        &self,
        controller: ControllerHandle,
        options: PopoverOptions,
        animated: bool,
    ) -> Result<()>;

    async fn dismiss(&self, controller: ControllerHandle, animated: bool) -> Result<()>;

    // --- Tabs ---

    /// The tab root container, when one is installed.
    fn tab_root(&self) -> Option<ControllerHandle>;

    fn selected_tab_index(&self, root: ControllerHandle) -> Option<usize>;

    fn select_tab(&self, root: ControllerHandle, index: usize) -> Result<()>;

    /// Apply tab bar item chrome (title/badge/icon) to a tab child.
    fn apply_tab_item(&self, controller: ControllerHandle, item: TabItem) -> Result<()>;

    // --- Roots ---

    /// Wrap `controller` in a navigation stack and install it as the window
    /// root; returns the stack handle.
    async fn install_stack_root(
        &self,
        controller: ControllerHandle,
        animated: bool,
    ) -> Result<ControllerHandle>;

    /// Install a tab bar container with the given children as the window
    /// root; returns the tab root handle.
    async fn install_tab_root(
        &self,
        children: Vec<ControllerHandle>,
        initial_index: usize,
    ) -> Result<ControllerHandle>;

    /// Install a visible loading placeholder as the window root.
    fn install_placeholder_root(&self) -> Result<()>;

    // --- Overlay / drawer ---

    async fn attach_overlay(
        &self,
        controller: ControllerHandle,
        options: OverlayOptions,
        animated: bool,
    ) -> Result<()>;

    /// Alpha-fade the overlay out, then detach and leave it destroyable.
    async fn fade_out_and_detach(&self, controller: ControllerHandle, animated: bool)
        -> Result<()>;

    async fn attach_drawer(
        &self,
        controller: ControllerHandle,
        options: DrawerOptions,
        animated: bool,
    ) -> Result<()>;

    /// Slide the drawer off toward `direction`, then detach.
    async fn slide_out_and_detach(
        &self,
        controller: ControllerHandle,
        direction: DrawerDirection,
        animated: bool,
    ) -> Result<()>;

    // --- Split view ---

    async fn install_split(
        &self,
        primary: ControllerHandle,
        detail: ControllerHandle,
        options: SplitOptions,
    ) -> Result<()>;

    // --- Geometry ---

    /// Current frame of a controller's root view, in window coordinates.
    fn view_frame(&self, controller: ControllerHandle) -> Option<Rect>;

    /// Bounds of the window hosting the hierarchy.
    fn window_bounds(&self) -> Rect;
}
