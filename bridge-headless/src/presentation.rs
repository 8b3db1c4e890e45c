//! In-memory presentation host.
//!
//! Models the native hierarchy as a tree of nodes: window roots, tab roots
//! with a selected index, navigation stacks with ordered entries, presented
//! chains hanging off whichever controller is topmost, and overlay/drawer
//! children attached to the focused context. All operations resolve
//! synchronously; `animated` flags are accepted and ignored.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use bridge_traits::presentation::{
    ControllerHandle, DrawerDirection, DrawerOptions, ModalOptions, OverlayOptions, PopoverOptions,
    PresentationHost, PresentationStyle, PushOptions, Rect, SplitOptions, SurfaceHandle, TabItem,
};
use bridge_traits::{BridgeError, Result};

const DEFAULT_WINDOW: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 400.0,
    height: 800.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Screen,
    StackRoot,
    TabRoot,
    SplitRoot,
    Placeholder,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    name: String,
    #[allow(dead_code)]
    style: Option<PresentationStyle>,
    surface: SurfaceHandle,
    children: Vec<ControllerHandle>,
    presented: Option<ControllerHandle>,
    presenter: Option<ControllerHandle>,
    frame: Rect,
    tab_item: Option<TabItem>,
}

impl Node {
    fn container(kind: NodeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            style: None,
            surface: SurfaceHandle::new(),
            children: Vec::new(),
            presented: None,
            presenter: None,
            frame: DEFAULT_WINDOW,
            tab_item: None,
        }
    }
}

#[derive(Debug)]
struct HostState {
    nodes: HashMap<ControllerHandle, Node>,
    roots: Vec<ControllerHandle>,
    selected_tabs: HashMap<ControllerHandle, usize>,
    window: Rect,
}

impl HostState {
    fn node(&self, controller: ControllerHandle) -> Result<&Node> {
        self.nodes
            .get(&controller)
            .ok_or_else(|| BridgeError::UnknownHandle(controller.to_string()))
    }

    fn node_mut(&mut self, controller: ControllerHandle) -> Result<&mut Node> {
        self.nodes
            .get_mut(&controller)
            .ok_or_else(|| BridgeError::UnknownHandle(controller.to_string()))
    }

    /// Controller at the end of the presented chain starting from the
    /// primary root: the visually topmost context.
    fn topmost(&self) -> Option<ControllerHandle> {
        let mut current = *self.roots.first()?;
        while let Some(presented) = self.nodes.get(&current)?.presented {
            current = presented;
        }
        Some(current)
    }

    /// Stack controller that currently owns focus, searching through the
    /// presented chain, tab selection and split columns.
    fn focused_stack(&self, controller: ControllerHandle) -> Option<ControllerHandle> {
        let node = self.nodes.get(&controller)?;
        if let Some(presented) = node.presented {
            if let Some(stack) = self.focused_stack(presented) {
                return Some(stack);
            }
        }
        match node.kind {
            NodeKind::StackRoot => Some(controller),
            NodeKind::TabRoot => {
                let index = *self.selected_tabs.get(&controller)?;
                let child = *node.children.get(index)?;
                self.focused_stack(child)
            }
            NodeKind::SplitRoot => node
                .children
                .iter()
                .rev()
                .find_map(|child| self.focused_stack(*child)),
            NodeKind::Screen | NodeKind::Placeholder => None,
        }
    }
}

/// Simulated presentation host.
pub struct HeadlessHost {
    state: Mutex<HostState>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                nodes: HashMap::new(),
                roots: Vec::new(),
                selected_tabs: HashMap::new(),
                window: DEFAULT_WINDOW,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Override the simulated window bounds (test support).
    pub fn set_window_bounds(&self, bounds: Rect) {
        self.lock().window = bounds;
    }

    /// Find a live controller by the screen name it was instantiated with
    /// (test support; returns the first match).
    pub fn controller_named(&self, name: &str) -> Option<ControllerHandle> {
        let state = self.lock();
        state
            .nodes
            .iter()
            .find(|(_, node)| node.kind == NodeKind::Screen && node.name == name)
            .map(|(handle, _)| *handle)
    }

    /// Number of live controllers, containers included (test support).
    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Surface handle of a live controller (test support).
    pub fn surface_of(&self, controller: ControllerHandle) -> Option<SurfaceHandle> {
        self.lock().nodes.get(&controller).map(|node| node.surface)
    }

    fn detach_everywhere(state: &mut HostState, controller: ControllerHandle) {
        for node in state.nodes.values_mut() {
            node.children.retain(|child| *child != controller);
            if node.presented == Some(controller) {
                node.presented = None;
            }
            if node.presenter == Some(controller) {
                node.presenter = None;
            }
        }
        state.roots.retain(|root| *root != controller);
    }

    fn drawer_frame(window: Rect, options: &DrawerOptions) -> Rect {
        let fraction = options.size_fraction.clamp(0.0, 1.0);
        match options.direction {
            DrawerDirection::Left => Rect::new(0.0, 0.0, window.width * fraction, window.height),
            DrawerDirection::Right => Rect::new(
                window.width - window.width * fraction,
                0.0,
                window.width * fraction,
                window.height,
            ),
            DrawerDirection::Top => Rect::new(0.0, 0.0, window.width, window.height * fraction),
            DrawerDirection::Bottom => Rect::new(
                0.0,
                window.height - window.height * fraction,
                window.width,
                window.height * fraction,
            ),
        }
    }
}

#[async_trait]
impl PresentationHost for HeadlessHost {
    fn instantiate(
        &self,
        name: &str,
        style: PresentationStyle,
    ) -> Result<(ControllerHandle, SurfaceHandle)> {
        let mut state = self.lock();
        let handle = ControllerHandle::new();
        let node = Node {
            style: Some(style),
            ..Node::container(NodeKind::Screen, name)
        };
        let surface = node.surface;
        debug!(screen = name, %handle, "instantiated controller");
        state.nodes.insert(handle, node);
        Ok((handle, surface))
    }

    fn destroy(&self, controller: ControllerHandle) -> Result<()> {
        let mut state = self.lock();
        if state.nodes.remove(&controller).is_some() {
            Self::detach_everywhere(&mut state, controller);
        }
        Ok(())
    }

    fn navigation_roots(&self) -> Vec<ControllerHandle> {
        self.lock().roots.clone()
    }

    fn child_controllers(&self, controller: ControllerHandle) -> Vec<ControllerHandle> {
        self.lock()
            .nodes
            .get(&controller)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn presented_controller(&self, controller: ControllerHandle) -> Option<ControllerHandle> {
        self.lock().nodes.get(&controller)?.presented
    }

    fn presenting_controller(&self, controller: ControllerHandle) -> Option<ControllerHandle> {
        self.lock().nodes.get(&controller)?.presenter
    }

    fn active_stack(&self) -> Option<ControllerHandle> {
        let state = self.lock();
        state
            .roots
            .iter()
            .find_map(|root| state.focused_stack(*root))
    }

    fn stack_entries(&self, stack: ControllerHandle) -> Vec<ControllerHandle> {
        self.child_controllers(stack)
    }

    async fn push(
        &self,
        stack: ControllerHandle,
        controller: ControllerHandle,
        _options: PushOptions,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        let node = state.node(stack)?;
        if node.kind != NodeKind::StackRoot {
            return Err(BridgeError::OperationFailed(format!(
                "{stack} is not a navigation stack"
            )));
        }
        state.node_mut(stack)?.children.push(controller);
        Ok(())
    }

    async fn pop(&self, stack: ControllerHandle, _animated: bool) -> Result<ControllerHandle> {
        let mut state = self.lock();
        let node = state.node_mut(stack)?;
        if node.children.len() <= 1 {
            return Err(BridgeError::OperationFailed(
                "cannot pop the root entry of a stack".to_string(),
            ));
        }
        node.children.pop().ok_or_else(|| {
            BridgeError::OperationFailed("cannot pop an empty stack".to_string())
        })
    }

    async fn pop_to(
        &self,
        stack: ControllerHandle,
        target: ControllerHandle,
        _animated: bool,
    ) -> Result<Vec<ControllerHandle>> {
        let mut state = self.lock();
        let node = state.node_mut(stack)?;
        let index = node
            .children
            .iter()
            .position(|entry| *entry == target)
            .ok_or_else(|| {
                BridgeError::OperationFailed(format!("{target} is not in the stack"))
            })?;
        let mut popped = node.children.split_off(index + 1);
        popped.reverse();
        Ok(popped)
    }

    fn replace_top(&self, stack: ControllerHandle, controller: ControllerHandle) -> Result<()> {
        let mut state = self.lock();
        let node = state.node_mut(stack)?;
        let top = node
            .children
            .last_mut()
            .ok_or_else(|| BridgeError::OperationFailed("stack is empty".to_string()))?;
        *top = controller;
        Ok(())
    }

    async fn present(
        &self,
        controller: ControllerHandle,
        _options: ModalOptions,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        let presenter = state
            .topmost()
            .ok_or_else(|| BridgeError::NotAvailable("no root installed".to_string()))?;
        let window = state.window;
        state.node_mut(presenter)?.presented = Some(controller);
        let node = state.node_mut(controller)?;
        node.presenter = Some(presenter);
        node.frame = window;
        Ok(())
    }

    async fn present_popover(
        &self,
        controller: ControllerHandle,
        options: PopoverOptions,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        let presenter = state
            .topmost()
            .ok_or_else(|| BridgeError::NotAvailable("no root installed".to_string()))?;
        let window = state.window;
        state.node_mut(presenter)?.presented = Some(controller);
        let node = state.node_mut(controller)?;
        node.presenter = Some(presenter);
        node.frame = options.anchor.unwrap_or(Rect::new(
            window.width / 4.0,
            window.height / 4.0,
            window.width / 2.0,
            window.height / 2.0,
        ));
        Ok(())
    }

    async fn dismiss(&self, controller: ControllerHandle, _animated: bool) -> Result<()> {
        let mut state = self.lock();
        let presenter = state.node(controller)?.presenter.ok_or_else(|| {
            BridgeError::OperationFailed(format!("{controller} is not presented"))
        })?;
        state.node_mut(presenter)?.presented = None;
        state.node_mut(controller)?.presenter = None;
        Ok(())
    }

    fn tab_root(&self) -> Option<ControllerHandle> {
        let state = self.lock();
        state
            .roots
            .iter()
            .find(|root| {
                state
                    .nodes
                    .get(root)
                    .map(|node| node.kind == NodeKind::TabRoot)
                    .unwrap_or(false)
            })
            .copied()
    }

    fn selected_tab_index(&self, root: ControllerHandle) -> Option<usize> {
        self.lock().selected_tabs.get(&root).copied()
    }

    fn select_tab(&self, root: ControllerHandle, index: usize) -> Result<()> {
        let mut state = self.lock();
        let count = state.node(root)?.children.len();
        if index >= count {
            return Err(BridgeError::OperationFailed(format!(
                "tab index {index} out of range ({count} tabs)"
            )));
        }
        state.selected_tabs.insert(root, index);
        Ok(())
    }

    fn apply_tab_item(&self, controller: ControllerHandle, item: TabItem) -> Result<()> {
        let mut state = self.lock();
        state.node_mut(controller)?.tab_item = Some(item);
        Ok(())
    }

    async fn install_stack_root(
        &self,
        controller: ControllerHandle,
        _animated: bool,
    ) -> Result<ControllerHandle> {
        let mut state = self.lock();
        state.node(controller)?;
        let stack = ControllerHandle::new();
        let mut node = Node::container(NodeKind::StackRoot, "stack-root");
        node.children.push(controller);
        state.nodes.insert(stack, node);
        state.roots = vec![stack];
        Ok(stack)
    }

    async fn install_tab_root(
        &self,
        children: Vec<ControllerHandle>,
        initial_index: usize,
    ) -> Result<ControllerHandle> {
        let mut state = self.lock();
        if children.is_empty() {
            return Err(BridgeError::OperationFailed(
                "tab root requires at least one child".to_string(),
            ));
        }
        for child in &children {
            state.node(*child)?;
        }
        let root = ControllerHandle::new();
        let mut node = Node::container(NodeKind::TabRoot, "tab-root");
        node.children = children;
        let count = node.children.len();
        state.nodes.insert(root, node);
        state.selected_tabs.insert(root, initial_index.min(count - 1));
        state.roots = vec![root];
        Ok(root)
    }

    fn install_placeholder_root(&self) -> Result<()> {
        let mut state = self.lock();
        let placeholder = ControllerHandle::new();
        state
            .nodes
            .insert(placeholder, Node::container(NodeKind::Placeholder, "loading"));
        state.roots = vec![placeholder];
        Ok(())
    }

    async fn attach_overlay(
        &self,
        controller: ControllerHandle,
        _options: OverlayOptions,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        let parent = state
            .topmost()
            .ok_or_else(|| BridgeError::NotAvailable("no root installed".to_string()))?;
        let window = state.window;
        state.node_mut(parent)?.children.push(controller);
        state.node_mut(controller)?.frame = window;
        Ok(())
    }

    async fn fade_out_and_detach(
        &self,
        controller: ControllerHandle,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        state.node(controller)?;
        Self::detach_everywhere(&mut state, controller);
        Ok(())
    }

    async fn attach_drawer(
        &self,
        controller: ControllerHandle,
        options: DrawerOptions,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        let parent = state
            .topmost()
            .ok_or_else(|| BridgeError::NotAvailable("no root installed".to_string()))?;
        let frame = Self::drawer_frame(state.window, &options);
        state.node_mut(parent)?.children.push(controller);
        state.node_mut(controller)?.frame = frame;
        Ok(())
    }

    async fn slide_out_and_detach(
        &self,
        controller: ControllerHandle,
        _direction: DrawerDirection,
        _animated: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        state.node(controller)?;
        Self::detach_everywhere(&mut state, controller);
        Ok(())
    }

    async fn install_split(
        &self,
        primary: ControllerHandle,
        detail: ControllerHandle,
        _options: SplitOptions,
    ) -> Result<()> {
        let mut state = self.lock();
        state.node(primary)?;
        state.node(detail)?;
        let root = ControllerHandle::new();
        let mut node = Node::container(NodeKind::SplitRoot, "split-root");
        node.children = vec![primary, detail];
        state.nodes.insert(root, node);
        state.roots = vec![root];
        Ok(())
    }

    fn view_frame(&self, controller: ControllerHandle) -> Option<Rect> {
        self.lock().nodes.get(&controller).map(|node| node.frame)
    }

    fn window_bounds(&self) -> Rect {
        self.lock().window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stack_root_and_push() {
        let host = HeadlessHost::new();
        let (home, _) = host.instantiate("home", PresentationStyle::Push).unwrap();
        let stack = host.install_stack_root(home, false).await.unwrap();

        assert_eq!(host.active_stack(), Some(stack));
        assert_eq!(host.stack_entries(stack), vec![home]);

        let (details, _) = host
            .instantiate("details", PresentationStyle::Push)
            .unwrap();
        host.push(stack, details, PushOptions::default(), false)
            .await
            .unwrap();
        assert_eq!(host.stack_entries(stack), vec![home, details]);

        let popped = host.pop(stack, false).await.unwrap();
        assert_eq!(popped, details);
        assert_eq!(host.stack_entries(stack), vec![home]);
    }

    #[tokio::test]
    async fn test_pop_refuses_root_entry() {
        let host = HeadlessHost::new();
        let (home, _) = host.instantiate("home", PresentationStyle::Push).unwrap();
        let stack = host.install_stack_root(home, false).await.unwrap();
        assert!(host.pop(stack, false).await.is_err());
    }

    #[tokio::test]
    async fn test_present_chain_links_presenter() {
        let host = HeadlessHost::new();
        let (home, _) = host.instantiate("home", PresentationStyle::Push).unwrap();
        host.install_stack_root(home, false).await.unwrap();

        let (dialog, _) = host
            .instantiate("dialog", PresentationStyle::Modal)
            .unwrap();
        host.present(dialog, ModalOptions::default(), false)
            .await
            .unwrap();

        let presenter = host.presenting_controller(dialog).unwrap();
        assert_eq!(host.presented_controller(presenter), Some(dialog));

        host.dismiss(dialog, false).await.unwrap();
        assert_eq!(host.presented_controller(presenter), None);
    }

    #[tokio::test]
    async fn test_tab_root_selection() {
        let host = HeadlessHost::new();
        let (a, _) = host.instantiate("a", PresentationStyle::Tab).unwrap();
        let (b, _) = host.instantiate("b", PresentationStyle::Tab).unwrap();
        let root = host.install_tab_root(vec![a, b], 0).await.unwrap();

        assert_eq!(host.tab_root(), Some(root));
        assert_eq!(host.selected_tab_index(root), Some(0));
        host.select_tab(root, 1).unwrap();
        assert_eq!(host.selected_tab_index(root), Some(1));
        assert!(host.select_tab(root, 5).is_err());
    }

    #[tokio::test]
    async fn test_drawer_frame_follows_direction() {
        let host = HeadlessHost::new();
        let (home, _) = host.instantiate("home", PresentationStyle::Push).unwrap();
        host.install_stack_root(home, false).await.unwrap();

        let (menu, _) = host.instantiate("menu", PresentationStyle::Drawer).unwrap();
        host.attach_drawer(
            menu,
            DrawerOptions {
                direction: DrawerDirection::Right,
                size_fraction: 0.5,
            },
            false,
        )
        .await
        .unwrap();

        let frame = host.view_frame(menu).unwrap();
        let window = host.window_bounds();
        assert_eq!(frame.max_x(), window.width);
        assert_eq!(frame.width, window.width * 0.5);
    }

    #[tokio::test]
    async fn test_destroy_detaches_from_parent() {
        let host = HeadlessHost::new();
        let (home, _) = host.instantiate("home", PresentationStyle::Push).unwrap();
        let stack = host.install_stack_root(home, false).await.unwrap();
        let (details, _) = host
            .instantiate("details", PresentationStyle::Push)
            .unwrap();
        host.push(stack, details, PushOptions::default(), false)
            .await
            .unwrap();

        host.destroy(details).unwrap();
        assert_eq!(host.stack_entries(stack), vec![home]);
    }
}
