//! Popover executor.
//!
//! Anchored presentation over the current context. Dismissal is shared with
//! the modal family since popovers use the same presenter linkage.

use bridge_traits::presentation::{PopoverOptions, PresentationStyle};
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::ConfigAspect;
use crate::error::{NavigationError, Result};
use crate::executors::ExecutorCtx;

pub async fn present(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);

    let target = ctx
        .registry
        .find_or_create(name, PresentationStyle::Popover, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;

    if ctx.host.presenting_controller(target_controller).is_some() {
        if let Some(params) = command.params.clone() {
            ctx.deliver_params(target, params, None).await;
        }
        return Ok(());
    }

    let presenter = ctx.foreground_container();
    let source = presenter
        .and_then(|id| ctx.registry.get(id))
        .map(|c| c.name.clone());

    let options: PopoverOptions = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::Popover))
        .unwrap_or_default();

    // The anchored source keeps its visibility; only focus moves.
    if let Some(container) = presenter.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.deactivate(container).await;
    }

    ctx.host
        .present_popover(target_controller, options, animated)
        .await?;
    debug!(screen = name, animated, "presented popover");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, source.as_deref()).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(presenter, "presentPopover", Some(name), animated)
        .await;
    Ok(())
}
