//! Modal and sheet executors.
//!
//! Both ride the host's `present`/`dismiss` pair; a sheet is a modal whose
//! options carry detents and whose presenter keeps its visibility. Dismissal
//! walks the presented chain from the root and takes the deepest presented
//! controller registered with the matching style, so nested presentations
//! unwind innermost-first.

use bridge_traits::presentation::{ControllerHandle, ModalOptions, PresentationStyle};
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::{ConfigAspect, ContainerId};
use crate::error::{NavigationError, Result};
use crate::executors::{container_under, ExecutorCtx};

pub async fn present(
    ctx: &mut ExecutorCtx<'_>,
    command: &NavigationCommand,
    style: PresentationStyle,
) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);

    let target = ctx.registry.find_or_create(name, style, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;

    if ctx.host.presenting_controller(target_controller).is_some() {
        // Same slot is already on screen: refresh params only.
        if let Some(params) = command.params.clone() {
            ctx.deliver_params(target, params, None).await;
        }
        return Ok(());
    }

    let presenter = ctx.foreground_container();
    let source = presenter
        .and_then(|id| ctx.registry.get(id))
        .map(|c| c.name.clone());

    let options: ModalOptions = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::for_style(style)))
        .unwrap_or_default();

    if let Some(container) = presenter.and_then(|id| ctx.registry.get_mut(id)) {
        if style == PresentationStyle::Modal {
            // A full modal covers its presenter entirely.
            ctx.emitter.leave(container).await;
        } else {
            ctx.emitter.deactivate(container).await;
        }
    }

    ctx.host.present(target_controller, options, animated).await?;
    debug!(screen = name, %style, animated, "presented");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, source.as_deref()).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(
        presenter,
        if style == PresentationStyle::Modal {
            "presentModal"
        } else {
            "presentSheet"
        },
        Some(name),
        animated,
    )
    .await;
    Ok(())
}

/// Dismiss the deepest presented controller of `style` (modal, sheet or
/// popover). The revealed presenter gets the result before the transition
/// starts and regains focus after it completes.
pub async fn dismiss(
    ctx: &mut ExecutorCtx<'_>,
    command: &NavigationCommand,
    style: PresentationStyle,
) -> Result<()> {
    let animated = ctx.animated(command);

    let (target, controller) = presented_of_style(ctx, style)
        .ok_or(NavigationError::NoPresentedController(style))?;
    let dismissed_name = ctx.registry.get(target).map(|c| c.name.clone());

    let revealed = ctx
        .host
        .presenting_controller(controller)
        .and_then(|presenter| container_under(ctx.registry, ctx.host, presenter));

    if let (Some(id), Some(result)) = (revealed, command.result.clone()) {
        ctx.deliver_params(id, result, dismissed_name.as_deref()).await;
    }

    ctx.host.dismiss(controller, animated).await?;

    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.leave(container).await;
    }
    if let Some(container) = revealed.and_then(|id| ctx.registry.get_mut(id)) {
        if style == PresentationStyle::Modal {
            ctx.emitter.enter(container).await;
        } else {
            ctx.emitter.activate(container).await;
        }
    }
    ctx.report_executed(
        None,
        match style {
            PresentationStyle::Modal => "dismissModal",
            PresentationStyle::Sheet => "dismissSheet",
            _ => "dismissPopover",
        },
        dismissed_name.as_deref(),
        animated,
    )
    .await;
    Ok(())
}

/// Deepest controller in the presented chain whose container carries the
/// given style.
fn presented_of_style(
    ctx: &ExecutorCtx<'_>,
    style: PresentationStyle,
) -> Option<(ContainerId, ControllerHandle)> {
    let mut current = *ctx.host.navigation_roots().first()?;
    let mut found = None;
    while let Some(presented) = ctx.host.presented_controller(current) {
        if let Some(id) = ctx.registry.by_controller(presented) {
            if ctx.registry.get(id).map(|c| c.style) == Some(style) {
                found = Some((id, presented));
            }
        }
        current = presented;
    }
    found
}
