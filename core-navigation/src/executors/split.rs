//! Split-view executor.
//!
//! Installs a primary/detail split as the window root: the existing root
//! hierarchy becomes the primary column and the target screen the detail.
//! There is no dedicated dismissal; splits are replaced by installing a
//! different root.

use bridge_traits::presentation::PresentationStyle;
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

    let primary = ctx
        .host
        .navigation_roots()
        .first()
        .copied()
        .ok_or(NavigationError::NoActiveStack)?;

    let target = ctx
        .registry
        .find_or_create(name, PresentationStyle::SplitView, ctx.host)?;
    let target_controller = ctx
        .registry
        .get(target)
        .map(|c| c.controller)
        .ok_or_else(|| NavigationError::UnknownScreen(name.to_string()))?;

    let options = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::SplitView))
        .unwrap_or_default();

    ctx.host
        .install_split(primary, target_controller, options)
        .await?;
    debug!(screen = name, "installed split root");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, None).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(None, "presentSplitView", Some(name), animated)
        .await;
    Ok(())
}
