//! Presentation executors.
//!
//! One executor per navigation method, each driving exactly one native
//! primitive through the presentation host and reporting the transition
//! through the lifecycle emitter. Executors never decide which of them runs;
//! the resolver does that upstream. They share a borrow context so every
//! operation sees a consistent registry snapshot for its whole duration.
//!
//! Lifecycle convention across all executors:
//! - full-screen transitions (push/pop, modal, tab switch) move the covered
//!   screen through `leave` and the revealed one through `enter`;
//! - partial presentations (sheet, popover, overlay, drawer) only shift
//!   focus: the screen underneath is deactivated, not disappeared.
//! - dismissal results are delivered to the revealed screen before the
//!   native transition starts, so the data is there when it appears.

use bridge_traits::presentation::{ControllerHandle, PresentationHost, PresentationStyle};
use core_runtime::events::{NavCoreEvent, NavigationEvent};
use serde_json::{json, Value};

use crate::command::NavigationCommand;
use crate::container::ContainerId;
use crate::lifecycle::LifecycleEmitter;
use crate::registry::ScreenRegistry;

pub mod drawer;
pub mod modal;
pub mod overlay;
pub mod popover;
pub mod split;
pub mod stack;
pub mod tab;

/// Everything an executor needs for one operation.
///
/// Built by the coordinator while it holds the registry write lock; the
/// borrows guarantee no other operation interleaves with this one.
pub struct ExecutorCtx<'a> {
    pub registry: &'a mut ScreenRegistry,
    pub host: &'a dyn PresentationHost,
    pub emitter: &'a LifecycleEmitter,
    pub default_animated: bool,
}

impl ExecutorCtx<'_> {
    /// Effective animation flag for a command.
    pub fn animated(&self, command: &NavigationCommand) -> bool {
        command.animated.unwrap_or(self.default_animated)
    }

    /// Report a completed operation: `onNavigationEvent` to the screen the
    /// navigation originated from (informational, fire-and-forget), mirrored
    /// onto the event bus for observers.
    pub async fn report_executed(
        &self,
        source: Option<ContainerId>,
        action: &str,
        target_screen: Option<&str>,
        animated: bool,
    ) {
        if let Some(container) = source.and_then(|id| self.registry.get(id)) {
            self.emitter
                .navigation_event(
                    container,
                    json!({
                        "action": action,
                        "targetScreen": target_screen,
                        "animated": animated,
                    }),
                )
                .await;
        }
        self.emitter
            .bus()
            .emit(NavCoreEvent::Navigation(NavigationEvent::Executed {
                action: action.to_string(),
                target_screen: target_screen.map(str::to_string),
                animated,
            }))
            .ok();
    }

    /// The container owning the current foreground content: walk the
    /// presented chain from the primary root, then map the topmost
    /// controller back to a registered container. Attached insertions
    /// (overlays, drawers) are skipped; they float above the foreground
    /// rather than being it.
    pub fn foreground_container(&self) -> Option<ContainerId> {
        let mut current = *self.host.navigation_roots().first()?;
        while let Some(presented) = self.host.presented_controller(current) {
            current = presented;
        }
        container_under(self.registry, self.host, current)
    }

    /// Deliver params or a dismissal result to a container's screen.
    pub async fn deliver_params(&mut self, id: ContainerId, params: Value, source: Option<&str>) {
        if let Some(container) = self.registry.get(id) {
            self.emitter.receive_params(container, params, source).await;
        }
    }
}

/// Resolve the screen container a controller stands for, descending through
/// container controllers: a stack resolves to its top entry, a tab root to
/// its selected child, a split root to its detail column. Overlay and drawer
/// containers are never the answer; they ride above whatever this resolves
/// to.
pub fn container_under(
    registry: &ScreenRegistry,
    host: &dyn PresentationHost,
    controller: ControllerHandle,
) -> Option<ContainerId> {
    if let Some(id) = registry.by_controller(controller) {
        return registry
            .get(id)
            .filter(|container| {
                !matches!(
                    container.style,
                    PresentationStyle::Overlay | PresentationStyle::Drawer
                )
            })
            .map(|container| container.id);
    }
    let children = host.child_controllers(controller);
    if let Some(index) = host.selected_tab_index(controller) {
        let child = children.get(index).copied()?;
        return container_under(registry, host, child);
    }
    children
        .iter()
        .rev()
        .find_map(|child| container_under(registry, host, *child))
}

/// Whether a controller is attached anywhere in the live hierarchy.
pub fn is_attached(host: &dyn PresentationHost, controller: ControllerHandle) -> bool {
    let mut queue: Vec<ControllerHandle> = host.navigation_roots();
    let mut seen = std::collections::HashSet::new();
    while let Some(current) = queue.pop() {
        if current == controller {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        queue.extend(host.child_controllers(current));
        if let Some(presented) = host.presented_controller(current) {
            queue.push(presented);
        }
    }
    false
}
