//! Root bootstrapping.
//!
//! Screens register through the prop channel at unpredictable times, so
//! installing the initial window root is a race the core has to referee:
//! poll the registry with doubling backoff, and if the root screen still has
//! not shown up after the bounded attempts, install a visible loading
//! placeholder and keep retrying forever at a fixed interval. The placeholder
//! guarantees the user never stares at an empty window; the infinite loop
//! guarantees a screen that registers late still becomes root.

use std::sync::Arc;

use bridge_traits::presentation::{ControllerHandle, PresentationHost};
use core_runtime::config::BootstrapPolicy;
use core_runtime::events::{NavCoreEvent, NavigationEvent};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::container::ContainerId;
use crate::lifecycle::LifecycleEmitter;
use crate::registry::ScreenRegistry;

pub struct Bootstrapper {
    registry: Arc<RwLock<ScreenRegistry>>,
    host: Arc<dyn PresentationHost>,
    emitter: LifecycleEmitter,
    policy: BootstrapPolicy,
    shutdown: CancellationToken,
}

impl Bootstrapper {
    pub fn new(
        registry: Arc<RwLock<ScreenRegistry>>,
        host: Arc<dyn PresentationHost>,
        emitter: LifecycleEmitter,
        policy: BootstrapPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            registry,
            host,
            emitter,
            policy,
            shutdown,
        }
    }

    /// Install `screen` wrapped in a navigation stack as the window root,
    /// waiting for it to register first.
    pub async fn resolve_stack_root(&self, screen: &str, animated: bool) {
        self.resolve(screen, |this| {
            let screen = screen.to_string();
            async move { this.try_install_stack(&screen, animated).await }
        })
        .await;
    }

    /// Install a tab bar with the given screens as children, in order, once
    /// every one of them has registered. `initial_index` is clamped by the
    /// host.
    pub async fn resolve_tab_root(&self, screens: &[String], initial_index: usize) {
        if screens.is_empty() {
            warn!("tab root requested with no screens");
            return;
        }
        let label = screens.join(",");
        self.resolve(&label, |this| {
            let screens = screens.to_vec();
            async move { this.try_install_tabs(&screens, initial_index).await }
        })
        .await;
    }

    /// Shared retry skeleton: bounded doubling backoff, then placeholder and
    /// an unbounded fixed-interval loop. Cancellation aborts either phase.
    /// A successful attempt yields the container that becomes the active root.
    async fn resolve<'a, F, Fut>(&'a self, label: &str, mut attempt: F)
    where
        F: FnMut(&'a Self) -> Fut,
        Fut: std::future::Future<Output = Option<ContainerId>> + 'a,
    {
        if let Some(root) = attempt(self).await {
            self.finish(label, root).await;
            return;
        }

        let mut delay = self.policy.initial_delay;
        for round in 1..self.policy.max_attempts {
            tokio::select! {
                _ = sleep(delay) => {}
                _ = self.shutdown.cancelled() => return,
            }
            if let Some(root) = attempt(self).await {
                self.finish(label, root).await;
                return;
            }
            debug!(screen = label, round, ?delay, "root screen not registered yet");
            delay = (delay * 2).min(self.policy.max_delay);
        }

        warn!(screen = label, "root screen never registered, installing placeholder");
        if let Err(err) = self.host.install_placeholder_root() {
            warn!(%err, "failed to install placeholder root");
        }
        self.emitter
            .bus()
            .emit(NavCoreEvent::Navigation(NavigationEvent::RootFallback {
                screen: label.to_string(),
            }))
            .ok();

        loop {
            tokio::select! {
                _ = sleep(self.policy.fallback_interval) => {}
                _ = self.shutdown.cancelled() => return,
            }
            if let Some(root) = attempt(self).await {
                self.finish(label, root).await;
                return;
            }
        }
    }

    async fn try_install_stack(&self, screen: &str, animated: bool) -> Option<ContainerId> {
        let registry = self.registry.read().await;
        let id = registry.lookup_by_name(screen)?;
        let controller = registry.get(id)?.controller;

        match self.host.install_stack_root(controller, animated).await {
            Ok(_) => Some(id),
            Err(err) => {
                warn!(screen, %err, "failed to install stack root");
                None
            }
        }
    }

    async fn try_install_tabs(&self, screens: &[String], initial_index: usize) -> Option<ContainerId> {
        let registry = self.registry.read().await;

        let mut resolved: Vec<(ContainerId, ControllerHandle)> = Vec::with_capacity(screens.len());
        for screen in screens {
            let id = registry.lookup_by_name(screen)?;
            let controller = registry.get(id)?.controller;
            resolved.push((id, controller));
        }

        let children: Vec<ControllerHandle> =
            resolved.iter().map(|(_, controller)| *controller).collect();
        match self.host.install_tab_root(children, initial_index).await {
            Ok(_) => {
                let selected = initial_index.min(resolved.len().saturating_sub(1));
                resolved.get(selected).map(|(id, _)| *id)
            }
            Err(err) => {
                warn!(%err, "failed to install tab root");
                None
            }
        }
    }

    /// `RootReady` goes out on the bus before the root container's own
    /// lifecycle, so listeners can tear down any splash surface first.
    async fn finish(&self, label: &str, root: ContainerId) {
        self.report_ready(label);
        let mut registry = self.registry.write().await;
        if let Some(container) = registry.get_mut(root) {
            self.emitter.enter(container).await;
        }
    }

    fn report_ready(&self, label: &str) {
        info!(screen = label, "navigation root ready");
        self.emitter
            .bus()
            .emit(NavCoreEvent::Navigation(NavigationEvent::RootReady {
                screen: label.to_string(),
            }))
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::{HeadlessHost, RecordingEventDelivery};
    use bridge_traits::presentation::PresentationStyle;
    use core_runtime::events::{EventBus, ScreenEvent};
    use std::time::Duration;

    fn harness(
        policy: BootstrapPolicy,
    ) -> (
        Arc<RwLock<ScreenRegistry>>,
        Arc<HeadlessHost>,
        EventBus,
        Bootstrapper,
    ) {
        let registry = Arc::new(RwLock::new(ScreenRegistry::new()));
        let host = Arc::new(HeadlessHost::new());
        let bus = EventBus::default();
        let emitter = LifecycleEmitter::new(Arc::new(RecordingEventDelivery::new()), bus.clone());
        let bootstrapper = Bootstrapper::new(
            registry.clone(),
            host.clone(),
            emitter,
            policy,
            CancellationToken::new(),
        );
        (registry, host, bus, bootstrapper)
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_registration_resolves_within_backoff() {
        let (registry, host, bus, bootstrapper) = harness(BootstrapPolicy::default());
        let mut rx = bus.subscribe();

        let host_for_task = host.clone();
        let registry_for_task = registry.clone();
        let register = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            registry_for_task
                .write()
                .await
                .find_or_create("home", PresentationStyle::Push, host_for_task.as_ref())
                .unwrap();
        });

        bootstrapper.resolve_stack_root("home", false).await;
        register.await.unwrap();

        // Readiness is announced before the root screen's own lifecycle.
        assert_eq!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Navigation(NavigationEvent::RootReady {
                screen: "home".to_string()
            })
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Screen(ScreenEvent::Appeared { .. })
        ));
        assert_eq!(host.navigation_roots().len(), 1);
        let id = registry.read().await.lookup_by_name("home").unwrap();
        assert!(registry.read().await.get(id).unwrap().is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_installs_placeholder_then_recovers() {
        let policy = BootstrapPolicy {
            max_attempts: 2,
            ..BootstrapPolicy::default()
        };
        let (registry, host, bus, bootstrapper) = harness(policy);
        let mut rx = bus.subscribe();

        let host_for_task = host.clone();
        let registry_for_task = registry.clone();
        tokio::spawn(async move {
            // Well past the two bounded attempts (t=0 and t=50ms).
            tokio::time::sleep(Duration::from_millis(2_000)).await;
            registry_for_task
                .write()
                .await
                .find_or_create("home", PresentationStyle::Push, host_for_task.as_ref())
                .unwrap();
        });

        bootstrapper.resolve_stack_root("home", false).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Navigation(NavigationEvent::RootFallback {
                screen: "home".to_string()
            })
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Navigation(NavigationEvent::RootReady {
                screen: "home".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_root_waits_for_all_children() {
        let (registry, host, bus, bootstrapper) = harness(BootstrapPolicy::default());
        let mut rx = bus.subscribe();

        registry
            .write()
            .await
            .find_or_create("home", PresentationStyle::Tab, host.as_ref())
            .unwrap();

        let host_for_task = host.clone();
        let registry_for_task = registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            registry_for_task
                .write()
                .await
                .find_or_create("library", PresentationStyle::Tab, host_for_task.as_ref())
                .unwrap();
        });

        bootstrapper
            .resolve_tab_root(&["home".to_string(), "library".to_string()], 0)
            .await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            NavCoreEvent::Navigation(NavigationEvent::RootReady { .. })
        ));
        assert!(host.tab_root().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_tab_root_request_is_rejected_up_front() {
        let (_registry, host, bus, bootstrapper) = harness(BootstrapPolicy::default());
        let mut rx = bus.subscribe();

        bootstrapper.resolve_tab_root(&[], 0).await;

        assert!(host.tab_root().is_none());
        assert!(host.navigation_roots().is_empty());
        assert!(rx.try_recv().is_err());
    }
}
