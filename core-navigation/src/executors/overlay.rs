//! Overlay executor.
//!
//! Overlays are view insertions, not presentations: they attach above the
//! current context with a backdrop and have no presenter link. Dismissal
//! therefore routes its result to the active screen underneath rather than
//! to a presenting controller.

use bridge_traits::presentation::PresentationStyle;
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::{ConfigAspect, ContainerId};
use crate::error::{NavigationError, Result};
use crate::executors::{is_attached, ExecutorCtx};

pub async fn present(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);

    let target = ctx
        .registry
        .find_or_create(name, PresentationStyle::Overlay, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;

    if is_attached(ctx.host, target_controller) {
        if let Some(params) = command.params.clone() {
            ctx.deliver_params(target, params, None).await;
        }
        return Ok(());
    }

    let under = ctx.foreground_container();
    let source = under
        .and_then(|id| ctx.registry.get(id))
        .map(|c| c.name.clone());
    let options = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::Overlay))
        .unwrap_or_default();

    if let Some(container) = under.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.deactivate(container).await;
    }

    ctx.host
        .attach_overlay(target_controller, options, animated)
        .await?;
    debug!(screen = name, animated, "attached overlay");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, source.as_deref()).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(under, "presentOverlay", Some(name), animated)
        .await;
    Ok(())
}

pub async fn dismiss(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let animated = ctx.animated(command);

    let target = attached_of_style(ctx, PresentationStyle::Overlay)
        .ok_or(NavigationError::NoPresentedController(PresentationStyle::Overlay))?;
    let (controller, dismissed_name) = {
        let container = ctx
            .registry
            .get(target)
            .ok_or(NavigationError::NoPresentedController(PresentationStyle::Overlay))?;
        (container.controller, container.name.clone())
    };

    let revealed = revealed_under(ctx);
    if let (Some(id), Some(result)) = (revealed, command.result.clone()) {
        ctx.deliver_params(id, result, Some(&dismissed_name)).await;
    }

    ctx.host.fade_out_and_detach(controller, animated).await?;

    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.leave(container).await;
    }
    if let Some(container) = revealed.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.activate(container).await;
    }
    ctx.report_executed(None, "dismissOverlay", Some(&dismissed_name), animated)
        .await;
    Ok(())
}

/// The attached container of a given insertion style, preferring the active
/// one when several are attached.
pub(super) fn attached_of_style(
    ctx: &ExecutorCtx<'_>,
    style: PresentationStyle,
) -> Option<ContainerId> {
    let candidates: Vec<ContainerId> = ctx
        .registry
        .with_style(style)
        .into_iter()
        .filter(|id| {
            ctx.registry
                .get(*id)
                .map(|c| is_attached(ctx.host, c.controller))
                .unwrap_or(false)
        })
        .collect();

    candidates
        .iter()
        .copied()
        .find(|id| ctx.registry.get(*id).map(|c| c.is_active).unwrap_or(false))
        .or_else(|| candidates.first().copied())
}

/// The screen that regains focus when an insertion goes away: the foreground
/// content container, which by construction is never an overlay or drawer.
pub(super) fn revealed_under(ctx: &ExecutorCtx<'_>) -> Option<ContainerId> {
    ctx.foreground_container()
}
