//! Screen registry.
//!
//! Owned service mapping context keys to screen containers, with a secondary
//! index from screen name to its first-registered presentation style. The
//! registry is the only creator and destroyer of containers: `find_or_create`
//! guarantees exactly one container per context key, and `sweep_unused`
//! periodically evicts non-tab containers no longer reachable from the live
//! native hierarchy.

use std::collections::{HashMap, HashSet, VecDeque};

use bridge_traits::presentation::{ControllerHandle, PresentationHost, PresentationStyle};
use tracing::{debug, warn};

use crate::container::{ContainerId, ScreenContainer};
use crate::context_key;
use crate::error::Result;

/// Process-lifetime store of screen containers and their lookup indices.
///
/// All mutation happens on the coordinator's single execution context; the
/// registry itself is plain owned data.
#[derive(Default)]
pub struct ScreenRegistry {
    /// Arena of containers; the two maps below are indices over it.
    containers: HashMap<ContainerId, ScreenContainer>,
    /// Primary index: context key -> container.
    by_context_key: HashMap<String, ContainerId>,
    /// Secondary index: screen name -> first-registered style. Used purely
    /// for navigation resolution, never for identity.
    style_by_name: HashMap<String, PresentationStyle>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the container for `(name, style)` or create one.
    ///
    /// The style index records `name -> style` only on first registration: a
    /// screen's canonical style must not flip because a later instance of
    /// the same name is created transiently for push/modal reuse.
    pub fn find_or_create(
        &mut self,
        name: &str,
        style: PresentationStyle,
        host: &dyn PresentationHost,
    ) -> Result<ContainerId> {
        let key = context_key::derive(
            self.by_context_key.keys().map(String::as_str),
            name,
            style,
        );

        if let Some(id) = self.by_context_key.get(&key) {
            return Ok(*id);
        }

        let (controller, surface) = host.instantiate(name, style)?;
        let container = ScreenContainer::new(name, style, key.clone(), controller, surface);
        let id = container.id;
        debug!(screen = name, %style, context_key = %key, "registered screen container");

        self.by_context_key.insert(key, id);
        self.style_by_name.entry(name.to_string()).or_insert(style);
        self.containers.insert(id, container);
        Ok(id)
    }

    /// Look up a container by screen name, preferring the tab slot and
    /// falling back to a linear scan. Used by bootstrappers and callers that
    /// assume a single instance per name.
    pub fn lookup_by_name(&self, name: &str) -> Option<ContainerId> {
        if let Some(id) = self.by_context_key.get(&context_key::tab_key(name)) {
            return Some(*id);
        }
        self.containers
            .values()
            .find(|container| container.name == name)
            .map(|container| container.id)
    }

    /// Container backing a given native controller, if any.
    pub fn by_controller(&self, controller: ControllerHandle) -> Option<ContainerId> {
        self.containers
            .values()
            .find(|container| container.controller == controller)
            .map(|container| container.id)
    }

    /// First-registered style for a screen name.
    pub fn registered_style(&self, name: &str) -> Option<PresentationStyle> {
        self.style_by_name.get(name).copied()
    }

    pub fn get(&self, id: ContainerId) -> Option<&ScreenContainer> {
        self.containers.get(&id)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut ScreenContainer> {
        self.containers.get_mut(&id)
    }

    /// Containers created with a given style, in no particular order.
    pub fn with_style(&self, style: PresentationStyle) -> Vec<ContainerId> {
        self.containers
            .values()
            .filter(|container| container.style == style)
            .map(|container| container.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Explicit eviction by context key (navigator teardown). Returns the
    /// evicted container so the caller can destroy its controller.
    pub fn remove(&mut self, key: &str) -> Option<ScreenContainer> {
        let id = self.by_context_key.remove(key)?;
        self.containers.remove(&id)
    }

    /// Evict every non-tab container whose controller is not reachable from
    /// the current native hierarchy.
    ///
    /// Reachability walks all navigation roots through child controllers and
    /// presented chains, at arbitrary depth. Tab-keyed containers are exempt:
    /// tabs are long-lived by contract. Idempotent; never evicts a reachable
    /// container. Returns the evicted containers; their controllers are
    /// destroyed through the host before returning.
    pub fn sweep_unused(&mut self, host: &dyn PresentationHost) -> Vec<ScreenContainer> {
        let reachable = reachable_controllers(host);

        let doomed: Vec<String> = self
            .containers
            .values()
            .filter(|container| {
                !context_key::is_tab_key(&container.context_key)
                    && !reachable.contains(&container.controller)
            })
            .map(|container| container.context_key.clone())
            .collect();

        let mut evicted = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(container) = self.remove(&key) {
                debug!(
                    screen = %container.name,
                    context_key = %key,
                    "sweeping unreachable container"
                );
                if let Err(err) = host.destroy(container.controller) {
                    warn!(screen = %container.name, %err, "failed to destroy swept controller");
                }
                evicted.push(container);
            }
        }
        evicted
    }
}

/// Controllers reachable from the installed roots: all tab/stack/split
/// children plus every presented-controller chain, breadth first.
fn reachable_controllers(host: &dyn PresentationHost) -> HashSet<ControllerHandle> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<ControllerHandle> = host.navigation_roots().into();

    while let Some(controller) = queue.pop_front() {
        if !seen.insert(controller) {
            continue;
        }
        queue.extend(host.child_controllers(controller));
        if let Some(presented) = host.presented_controller(controller) {
            queue.push_back(presented);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::HeadlessHost;
    use bridge_traits::presentation::{ModalOptions, PushOptions};

    #[test]
    fn test_find_or_create_is_idempotent_per_slot() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let a = registry
            .find_or_create("home", PresentationStyle::Tab, &host)
            .unwrap();
        let b = registry
            .find_or_create("home", PresentationStyle::Tab, &host)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_non_tab_reuse_via_prefix() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let a = registry
            .find_or_create("confirm", PresentationStyle::Modal, &host)
            .unwrap();
        let b = registry
            .find_or_create("confirm", PresentationStyle::Modal, &host)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_registration_wins_for_style() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        registry
            .find_or_create("profile", PresentationStyle::Push, &host)
            .unwrap();
        registry
            .find_or_create("profile", PresentationStyle::Modal, &host)
            .unwrap();

        assert_eq!(
            registry.registered_style("profile"),
            Some(PresentationStyle::Push)
        );
        // Both containers exist; only the style index is first-wins.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_by_name_prefers_tab_slot() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let pushed = registry
            .find_or_create("home", PresentationStyle::Push, &host)
            .unwrap();
        let tab = registry
            .find_or_create("home", PresentationStyle::Tab, &host)
            .unwrap();

        assert_ne!(pushed, tab);
        assert_eq!(registry.lookup_by_name("home"), Some(tab));
    }

    #[tokio::test]
    async fn test_sweep_spares_reachable_and_tab_containers() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let tab = registry
            .find_or_create("home", PresentationStyle::Tab, &host)
            .unwrap();
        let pushed = registry
            .find_or_create("details", PresentationStyle::Push, &host)
            .unwrap();
        let orphan = registry
            .find_or_create("orphan", PresentationStyle::Modal, &host)
            .unwrap();

        // Install home as root, push details on top; orphan stays detached.
        let home_controller = registry.get(tab).unwrap().controller;
        let stack = host.install_stack_root(home_controller, false).await.unwrap();
        let details_controller = registry.get(pushed).unwrap().controller;
        host.push(stack, details_controller, PushOptions::default(), false)
            .await
            .unwrap();

        let evicted = registry.sweep_unused(&host);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].name, "orphan");
        assert!(registry.get(tab).is_some());
        assert!(registry.get(pushed).is_some());
        assert!(registry.get(orphan).is_none());
    }

    #[tokio::test]
    async fn test_sweep_follows_presented_chains() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let root = registry
            .find_or_create("home", PresentationStyle::Push, &host)
            .unwrap();
        let modal = registry
            .find_or_create("dialog", PresentationStyle::Modal, &host)
            .unwrap();
        let nested = registry
            .find_or_create("nested", PresentationStyle::Sheet, &host)
            .unwrap();

        let root_controller = registry.get(root).unwrap().controller;
        host.install_stack_root(root_controller, false).await.unwrap();
        let modal_controller = registry.get(modal).unwrap().controller;
        host.present(modal_controller, ModalOptions::default(), false)
            .await
            .unwrap();
        let nested_controller = registry.get(nested).unwrap().controller;
        host.present(nested_controller, ModalOptions::default(), false)
            .await
            .unwrap();

        let evicted = registry.sweep_unused(&host);
        assert!(evicted.is_empty());

        // Idempotent across repeated runs.
        assert!(registry.sweep_unused(&host).is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_sweep_evicts_after_detach() {
        let host = HeadlessHost::new();
        let mut registry = ScreenRegistry::new();

        let root = registry
            .find_or_create("home", PresentationStyle::Push, &host)
            .unwrap();
        let modal = registry
            .find_or_create("dialog", PresentationStyle::Modal, &host)
            .unwrap();

        let root_controller = registry.get(root).unwrap().controller;
        host.install_stack_root(root_controller, false).await.unwrap();
        let modal_controller = registry.get(modal).unwrap().controller;
        host.present(modal_controller, ModalOptions::default(), false)
            .await
            .unwrap();

        assert!(registry.sweep_unused(&host).is_empty());

        host.dismiss(modal_controller, false).await.unwrap();
        let evicted = registry.sweep_unused(&host);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].name, "dialog");
    }
}
