//! Navigation coordinator.
//!
//! Single owner of the screen registry and the only entry point the host
//! shell and the prop channel talk to. Every operation takes the registry
//! write lock for its whole duration, so commands execute strictly one at a
//! time and never interleave with a running transition.
//!
//! ```text
//!  prop updates ──> handle_props ──┐
//!  direct calls ──> navigate ──────┤      ┌─ resolver ─ executors ─ host
//!  tab bar taps ──> notify_tab_* ──┼──────┤
//!  header taps ──> notify_header ──┘      └─ lifecycle emitter ─ app code
//! ```
//!
//! The two ingress paths differ only in error surface: `handle_props` logs
//! and drops (application code cannot await a prop), while `navigate` and the
//! notify methods return `Result` to the caller.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::presentation::{PresentationHost, PresentationStyle, SurfaceHandle, TabItem};
use bridge_traits::time::Clock;
use bridge_traits::{ChildAttachment, IconResolver};
use core_runtime::config::{BootstrapPolicy, CoreConfig};
use core_runtime::events::{EventBus, NavCoreEvent, NavigationEvent};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::bootstrap::Bootstrapper;
use crate::command::NavigationCommand;
use crate::container::{ConfigAspect, ContainerId};
use crate::error::{NavigationError, Result};
use crate::executors::{self, container_under, ExecutorCtx};
use crate::lifecycle::LifecycleEmitter;
use crate::props::{ScreenProps, TabConfig};
use crate::registry::ScreenRegistry;
use crate::resolver::{resolve, NavigationMethod};

/// Point-in-time view of one screen container, for hosts and debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub name: String,
    pub style: PresentationStyle,
    pub context_key: String,
    pub is_active: bool,
}

pub struct NavigationCoordinator {
    registry: Arc<RwLock<ScreenRegistry>>,
    host: Arc<dyn PresentationHost>,
    emitter: LifecycleEmitter,
    bus: EventBus,
    child_attachment: Option<Arc<dyn ChildAttachment>>,
    icon_resolver: Option<Arc<dyn IconResolver>>,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
    bootstrap_policy: BootstrapPolicy,
    default_animated: bool,
    shutdown: CancellationToken,
}

impl NavigationCoordinator {
    pub fn new(config: CoreConfig) -> Self {
        let bus = EventBus::default();
        let emitter = LifecycleEmitter::new(config.event_delivery.clone(), bus.clone());
        Self {
            registry: Arc::new(RwLock::new(ScreenRegistry::new())),
            host: config.presentation_host,
            emitter,
            bus,
            child_attachment: config.child_attachment,
            icon_resolver: config.icon_resolver,
            clock: config.clock,
            sweep_interval: config.sweep_interval,
            bootstrap_policy: config.bootstrap,
            default_animated: config.default_animated,
            shutdown: CancellationToken::new(),
        }
    }

    /// Observability stream: every lifecycle delivery, resolution and drop.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    // ========================================================================
    // Prop channel
    // ========================================================================

    /// Ingest one prop update for a screen: register or refresh the
    /// container, store configuration, then execute any commands riding
    /// along. This path never fails outward; application code has no way to
    /// handle an error from a prop, so problems are logged and mirrored to
    /// the bus as drops.
    #[instrument(skip_all)]
    pub async fn handle_props(&self, value: &Value) {
        let props = match ScreenProps::decode(value) {
            Ok(props) => props,
            Err(err) => {
                warn!(%err, "dropping malformed prop update");
                self.report_dropped("props", &err);
                return;
            }
        };

        let mut registry = self.registry.write().await;
        let id = match registry.find_or_create(&props.name, props.style, self.host.as_ref()) {
            Ok(id) => id,
            Err(err) => {
                warn!(screen = %props.name, %err, "failed to register screen");
                self.report_dropped("register", &err);
                return;
            }
        };

        for (aspect, blob) in &props.configs {
            if let Some(container) = registry.get_mut(id) {
                container.store_config(*aspect, blob.clone());
            }
            if *aspect == ConfigAspect::Tab {
                self.apply_tab_chrome(&registry, id, blob).await;
            }
        }

        let started = self.clock.now();
        for command in &props.commands {
            match command {
                Ok(command) => {
                    let mut ctx = ExecutorCtx {
                        registry: &mut registry,
                        host: self.host.as_ref(),
                        emitter: &self.emitter,
                        default_animated: self.default_animated,
                    };
                    if let Err(err) = self.execute(&mut ctx, command).await {
                        warn!(kind = %command.kind, %err, "dropping navigation command");
                        self.report_dropped(command.kind.as_str(), &err);
                    }
                }
                Err(err) => {
                    warn!(%err, "dropping malformed navigation command");
                    self.report_dropped("decode", err);
                }
            }
        }
        if !props.commands.is_empty() {
            debug!(
                screen = %props.name,
                commands = props.commands.len(),
                elapsed_ms = (self.clock.now() - started).num_milliseconds(),
                "prop commands processed"
            );
        }
    }

    // ========================================================================
    // Direct entry points
    // ========================================================================

    /// Execute one navigation command, surfacing the error to the caller.
    #[instrument(skip(self), fields(kind = %command.kind))]
    pub async fn navigate(&self, command: NavigationCommand) -> Result<()> {
        let mut registry = self.registry.write().await;
        let mut ctx = ExecutorCtx {
            registry: &mut registry,
            host: self.host.as_ref(),
            emitter: &self.emitter,
            default_animated: self.default_animated,
        };
        self.execute(&mut ctx, &command).await
    }

    /// User tapped tab `index` on the native tab bar. A tap on the already
    /// selected tab surfaces as a tab press instead of a switch.
    pub async fn notify_tab_selected(&self, index: usize) -> Result<()> {
        let mut registry = self.registry.write().await;
        let root = self
            .host
            .tab_root()
            .ok_or_else(|| NavigationError::TabNotFound(format!("index {index}")))?;

        let children = self.host.child_controllers(root);
        let child = children
            .get(index)
            .copied()
            .ok_or_else(|| NavigationError::TabNotFound(format!("index {index}")))?;
        let target = container_under(&registry, self.host.as_ref(), child)
            .ok_or_else(|| NavigationError::TabNotFound(format!("index {index}")))?;
        let name = registry
            .get(target)
            .map(|c| c.name.clone())
            .ok_or_else(|| NavigationError::TabNotFound(format!("index {index}")))?;

        if self.host.selected_tab_index(root) == Some(index) {
            if let Some(container) = registry.get(target) {
                self.emitter.tab_press(container, index).await;
            }
            return Ok(());
        }

        let mut ctx = ExecutorCtx {
            registry: &mut registry,
            host: self.host.as_ref(),
            emitter: &self.emitter,
            default_animated: self.default_animated,
        };
        executors::tab::switch_to(&mut ctx, &name, None, true).await
    }

    /// A header action was pressed on a screen's native header.
    pub async fn notify_header_action(&self, screen: &str, action_id: &str) -> Result<()> {
        let registry = self.registry.read().await;
        let id = registry
            .lookup_by_name(screen)
            .ok_or_else(|| NavigationError::UnknownScreen(screen.to_string()))?;
        if let Some(container) = registry.get(id) {
            self.emitter.header_action(container, action_id).await;
        }
        Ok(())
    }

    /// Attach child surfaces to a registered screen's content surface.
    pub async fn attach_children(&self, screen: &str, children: &[SurfaceHandle]) -> Result<()> {
        let attachment = self.child_attachment.as_ref().ok_or_else(|| {
            NavigationError::Bridge(bridge_traits::BridgeError::NotAvailable(
                "child attachment".to_string(),
            ))
        })?;
        let registry = self.registry.read().await;
        let id = registry
            .lookup_by_name(screen)
            .ok_or_else(|| NavigationError::UnknownScreen(screen.to_string()))?;
        let surface = registry
            .get(id)
            .map(|c| c.surface)
            .ok_or_else(|| NavigationError::UnknownScreen(screen.to_string()))?;
        attachment.attach_children(surface, children)?;
        Ok(())
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Install `screen` wrapped in a navigation stack as the window root,
    /// retrying until it registers. Resolves when a root (real or
    /// placeholder-then-real) is installed, or on shutdown.
    pub async fn bootstrap_stack_root(&self, screen: &str) {
        self.bootstrapper()
            .resolve_stack_root(screen, self.default_animated)
            .await;
    }

    /// Install a tab bar root with the given screens, in order, once all of
    /// them have registered.
    pub async fn bootstrap_tab_root(&self, screens: &[String], initial_index: usize) {
        self.bootstrapper()
            .resolve_tab_root(screens, initial_index)
            .await;
    }

    fn bootstrapper(&self) -> Bootstrapper {
        Bootstrapper::new(
            self.registry.clone(),
            self.host.clone(),
            self.emitter.clone(),
            self.bootstrap_policy,
            self.shutdown.clone(),
        )
    }

    // ========================================================================
    // Registry maintenance
    // ========================================================================

    /// Spawn the periodic sweep of unreachable containers. Runs until
    /// shutdown.
    pub fn start_sweep(&self) -> JoinHandle<()> {
        let registry = self.registry.clone();
        let host = self.host.clone();
        let shutdown = self.shutdown.clone();
        let interval = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so a sweep never
            // races screen registration at startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = registry.write().await.sweep_unused(host.as_ref());
                        if !evicted.is_empty() {
                            info!(count = evicted.len(), "swept unreachable screen containers");
                        }
                    }
                    _ = shutdown.cancelled() => return,
                }
            }
        })
    }

    /// Run one sweep immediately; returns the number of evicted containers.
    pub async fn sweep_now(&self) -> usize {
        self.registry
            .write()
            .await
            .sweep_unused(self.host.as_ref())
            .len()
    }

    /// Stop background work: the sweep task and any bootstrap loops.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Point-in-time view of one registered screen, if any instance exists.
    pub async fn screen_snapshot(&self, screen: &str) -> Option<ScreenSnapshot> {
        let registry = self.registry.read().await;
        let id = registry.lookup_by_name(screen)?;
        registry.get(id).map(|container| ScreenSnapshot {
            name: container.name.clone(),
            style: container.style,
            context_key: container.context_key.clone(),
            is_active: container.is_active,
        })
    }

    /// Number of live screen containers.
    pub async fn screen_count(&self) -> usize {
        self.registry.read().await.len()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Resolve and run one command against the locked registry.
    async fn execute(&self, ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
        use crate::command::CommandKind::*;

        let Some(requested) = command.kind.requested_method() else {
            return match command.kind {
                Pop => executors::stack::pop(ctx, command).await,
                PopTo => executors::stack::pop_to(ctx, command).await,
                PopToRoot => executors::stack::pop_to_root(ctx, command).await,
                ReplaceWith => executors::stack::replace_with(ctx, command).await,
                DismissModal => {
                    executors::modal::dismiss(ctx, command, PresentationStyle::Modal).await
                }
                DismissSheet => {
                    executors::modal::dismiss(ctx, command, PresentationStyle::Sheet).await
                }
                DismissPopover => {
                    executors::modal::dismiss(ctx, command, PresentationStyle::Popover).await
                }
                DismissOverlay => executors::overlay::dismiss(ctx, command).await,
                DismissDrawer => executors::drawer::dismiss(ctx, command).await,
                _ => Err(NavigationError::MalformedCommand(format!(
                    "{} is not executable here",
                    command.kind
                ))),
            };
        };

        let target = command
            .target
            .as_deref()
            .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;

        // The registered style is authoritative; an explicit override only
        // fills in for screens the registry has never seen.
        let registered = ctx
            .registry
            .registered_style(target)
            .or(command.style_override);
        let resolved = resolve(requested, registered);
        if resolved != requested {
            debug!(
                screen = target,
                requested = %requested,
                resolved = %resolved,
                "navigation method overridden by registered style"
            );
        }
        self.bus
            .emit(NavCoreEvent::Navigation(NavigationEvent::Resolved {
                target: target.to_string(),
                requested: requested.to_string(),
                resolved: resolved.to_string(),
            }))
            .ok();

        match resolved {
            NavigationMethod::Push => executors::stack::push(ctx, command).await,
            NavigationMethod::Modal => {
                executors::modal::present(ctx, command, PresentationStyle::Modal).await
            }
            NavigationMethod::Sheet => {
                executors::modal::present(ctx, command, PresentationStyle::Sheet).await
            }
            NavigationMethod::Popover => executors::popover::present(ctx, command).await,
            NavigationMethod::Overlay => executors::overlay::present(ctx, command).await,
            NavigationMethod::Drawer => executors::drawer::present(ctx, command).await,
            NavigationMethod::SplitView => executors::split::present(ctx, command).await,
            NavigationMethod::SwitchTab => executors::tab::switch(ctx, command).await,
        }
    }

    /// Decode `tabConfig`, resolve its icon if a resolver is configured, and
    /// hand the finished tab item to the host.
    async fn apply_tab_chrome(&self, registry: &ScreenRegistry, id: ContainerId, blob: &Value) {
        let Some(container) = registry.get(id) else {
            return;
        };
        let config: TabConfig = match serde_json::from_value(blob.clone()) {
            Ok(config) => config,
            Err(err) => {
                warn!(screen = %container.name, %err, "undecodable tabConfig");
                return;
            }
        };

        let icon = match (&config.icon, &self.icon_resolver) {
            (Some(descriptor), Some(resolver)) => match resolver.resolve_icon(descriptor).await {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!(screen = %container.name, icon = %descriptor.name, %err, "icon resolution failed");
                    None
                }
            },
            _ => None,
        };

        let item = TabItem {
            title: config.title,
            badge: config.badge,
            icon,
            index: config.index,
        };
        if let Err(err) = self.host.apply_tab_item(container.controller, item) {
            warn!(screen = %container.name, %err, "failed to apply tab item");
        }
    }

    fn report_dropped(&self, action: &str, err: &NavigationError) {
        self.bus
            .emit(NavCoreEvent::Navigation(NavigationEvent::CommandDropped {
                action: action.to_string(),
                reason: err.to_string(),
            }))
            .ok();
    }
}

impl Drop for NavigationCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
