//! Stack executors: push, pop, popTo, popToRoot, replaceWith.
//!
//! All five operate on the focused navigation stack. The root entry of a
//! stack is never poppable; commands that would do so fail with
//! `CannotPopRoot` and the prop channel downgrades that to a logged drop.

use bridge_traits::presentation::{ControllerHandle, PresentationStyle, PushOptions};
use serde_json::Value;
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::{ConfigAspect, ContainerId};
use crate::error::{NavigationError, Result};
use crate::executors::ExecutorCtx;

pub async fn push(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);
    let stack = ctx.host.active_stack().ok_or(NavigationError::NoActiveStack)?;

    let target = ctx.registry.find_or_create(name, PresentationStyle::Push, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;

    let entries = ctx.host.stack_entries(stack);
    if entries.last() == Some(&target_controller) {
        // Already on top: refresh params, skip the transition.
        if let Some(params) = command.params.clone() {
            ctx.deliver_params(target, params, None).await;
        }
        return Ok(());
    }

    let covered = entries.last().and_then(|top| ctx.registry.by_controller(*top));
    let source = covered.and_then(|id| ctx.registry.get(id)).map(|c| c.name.clone());

    let options: PushOptions = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::Push))
        .unwrap_or_default();

    if let Some(covered) = covered {
        if let Some(container) = ctx.registry.get_mut(covered) {
            ctx.emitter.leave(container).await;
        }
    }

    ctx.host.push(stack, target_controller, options, animated).await?;
    debug!(screen = name, animated, "pushed onto stack");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, source.as_deref()).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(covered, "push", Some(name), animated).await;
    Ok(())
}

pub async fn pop(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let animated = ctx.animated(command);
    let stack = ctx.host.active_stack().ok_or(NavigationError::NoActiveStack)?;

    let entries = ctx.host.stack_entries(stack);
    if entries.len() <= 1 {
        return Err(NavigationError::CannotPopRoot);
    }

    let revealed = ctx.registry.by_controller(entries[entries.len() - 2]);
    let popped_id = ctx.registry.by_controller(entries[entries.len() - 1]);
    let popped_name = popped_id
        .and_then(|id| ctx.registry.get(id))
        .map(|c| c.name.clone());

    deliver_result(ctx, revealed, command.result.clone(), popped_name.as_deref()).await;

    ctx.host.pop(stack, animated).await?;

    if let Some(container) = popped_id.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.leave(container).await;
    }
    if let Some(container) = revealed.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(None, "pop", popped_name.as_deref(), animated)
        .await;
    Ok(())
}

pub async fn pop_to(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);
    let stack = ctx.host.active_stack().ok_or(NavigationError::NoActiveStack)?;

    let entries = ctx.host.stack_entries(stack);
    let target_controller = entries
        .iter()
        .copied()
        .find(|entry| {
            ctx.registry
                .by_controller(*entry)
                .and_then(|id| ctx.registry.get(id))
                .map(|c| c.name == name)
                .unwrap_or(false)
        })
        .ok_or_else(|| NavigationError::TargetNotInStack(name.to_string()))?;

    if entries.last() == Some(&target_controller) {
        return Ok(());
    }

    pop_down_to(ctx, stack, target_controller, command.result.clone(), animated).await?;
    ctx.report_executed(None, "popTo", Some(name), animated).await;
    Ok(())
}

pub async fn pop_to_root(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let animated = ctx.animated(command);
    let stack = ctx.host.active_stack().ok_or(NavigationError::NoActiveStack)?;

    let entries = ctx.host.stack_entries(stack);
    let Some(root) = entries.first().copied() else {
        return Err(NavigationError::NoActiveStack);
    };
    if entries.len() <= 1 {
        // Already at the root.
        return Ok(());
    }

    pop_down_to(ctx, stack, root, command.result.clone(), animated).await?;
    ctx.report_executed(None, "popToRoot", None, animated).await;
    Ok(())
}

pub async fn replace_with(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let stack = ctx.host.active_stack().ok_or(NavigationError::NoActiveStack)?;

    let entries = ctx.host.stack_entries(stack);
    let Some(old_top) = entries.last().copied() else {
        return Err(NavigationError::NoActiveStack);
    };

    let target = ctx.registry.find_or_create(name, PresentationStyle::Push, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;
    if target_controller == old_top {
        return Ok(());
    }

    let replaced = ctx.registry.by_controller(old_top);
    if let Some(container) = replaced.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.leave(container).await;
    }

    // In-place swap, no transition frame; the orphaned entry is left for the
    // registry sweep to reclaim.
    ctx.host.replace_top(stack, target_controller)?;

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, None).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(None, "replaceWith", Some(name), false).await;
    Ok(())
}

/// Shared popTo/popToRoot tail: result first, then the native pop, then the
/// lifecycle sweep over everything that left the stack.
async fn pop_down_to(
    ctx: &mut ExecutorCtx<'_>,
    stack: ControllerHandle,
    target_controller: ControllerHandle,
    result: Option<Value>,
    animated: bool,
) -> Result<()> {
    let revealed = ctx.registry.by_controller(target_controller);
    let top = ctx.host.stack_entries(stack).last().copied();
    let source = top
        .and_then(|controller| ctx.registry.by_controller(controller))
        .and_then(|id| ctx.registry.get(id))
        .map(|c| c.name.clone());

    deliver_result(ctx, revealed, result, source.as_deref()).await;

    let popped = ctx.host.pop_to(stack, target_controller, animated).await?;
    for controller in popped {
        if let Some(container) = ctx
            .registry
            .by_controller(controller)
            .and_then(|id| ctx.registry.get_mut(id))
        {
            ctx.emitter.leave(container).await;
        }
    }
    if let Some(container) = revealed.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.enter(container).await;
    }
    Ok(())
}

async fn deliver_result(
    ctx: &mut ExecutorCtx<'_>,
    revealed: Option<ContainerId>,
    result: Option<Value>,
    source: Option<&str>,
) {
    if let (Some(id), Some(result)) = (revealed, result) {
        ctx.deliver_params(id, result, source).await;
    }
}
