//! Tab-switch executor.
//!
//! Tabs are never presented or dismissed; switching only moves the selected
//! index on the installed tab root. Lifecycle is reconciled as a diff over
//! every tab container so exactly one tab is active afterwards, regardless
//! of what state a previous transition left behind.

use bridge_traits::presentation::{ControllerHandle, PresentationStyle};
use serde_json::Value;
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::ContainerId;
use crate::error::{NavigationError, Result};
use crate::executors::{container_under, ExecutorCtx};

pub async fn switch(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    switch_to(ctx, name, command.params.clone(), false).await
}

/// Switch to the tab hosting `name`. `user_initiated` distinguishes a tap on
/// the tab bar from a navigation command that resolved to a tab switch.
pub async fn switch_to(
    ctx: &mut ExecutorCtx<'_>,
    name: &str,
    params: Option<Value>,
    user_initiated: bool,
) -> Result<()> {
    let root = ctx
        .host
        .tab_root()
        .ok_or_else(|| NavigationError::TabNotFound(name.to_string()))?;

    let target = ctx
        .registry
        .lookup_by_name(name)
        .filter(|id| {
            ctx.registry
                .get(*id)
                .map(|c| c.style == PresentationStyle::Tab)
                .unwrap_or(false)
        })
        .ok_or_else(|| NavigationError::TabNotFound(name.to_string()))?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::TabNotFound(name.to_string()))?;

    let children = ctx.host.child_controllers(root);
    let index = children
        .iter()
        .position(|child| hosts_controller(ctx, *child, target_controller))
        .ok_or_else(|| NavigationError::TabNotFound(name.to_string()))?;

    let previous = ctx.host.selected_tab_index(root);
    if previous == Some(index) {
        if let Some(params) = params {
            ctx.deliver_params(target, params, None).await;
        }
        return Ok(());
    }
    let source = previous
        .and_then(|index| children.get(index).copied())
        .and_then(|child| container_under(ctx.registry, ctx.host, child));

    ctx.host.select_tab(root, index)?;
    debug!(screen = name, index, user_initiated, "switched tab");

    reconcile_active_tabs(ctx, &children, index).await;

    if let Some(params) = params {
        ctx.deliver_params(target, params, None).await;
    }
    if let Some(container) = ctx.registry.get(target) {
        ctx.emitter
            .tab_change(container, index, previous, user_initiated)
            .await;
    }
    ctx.report_executed(source, "switchTab", Some(name), false)
        .await;
    Ok(())
}

/// Walk every tab container and align its lifecycle with the selection:
/// the one under the selected child enters, everything else leaves.
async fn reconcile_active_tabs(
    ctx: &mut ExecutorCtx<'_>,
    children: &[ControllerHandle],
    selected: usize,
) {
    let tabs: Vec<(ContainerId, bool)> = ctx
        .registry
        .with_style(PresentationStyle::Tab)
        .into_iter()
        .filter_map(|id| {
            let controller = ctx.registry.get(id)?.controller;
            let owning = children
                .iter()
                .position(|child| hosts_controller(ctx, *child, controller));
            owning.map(|position| (id, position == selected))
        })
        .collect();

    for (id, should_be_active) in tabs {
        let Some(container) = ctx.registry.get_mut(id) else {
            continue;
        };
        if should_be_active && !container.is_active {
            ctx.emitter.enter(container).await;
        } else if !should_be_active && container.is_active {
            ctx.emitter.leave(container).await;
        }
    }
}

/// Whether a tab child is, or wraps, the given screen controller. Tab
/// children are often stack roots with the screen as their root entry.
fn hosts_controller(
    ctx: &ExecutorCtx<'_>,
    child: ControllerHandle,
    controller: ControllerHandle,
) -> bool {
    child == controller || ctx.host.child_controllers(child).contains(&controller)
}
