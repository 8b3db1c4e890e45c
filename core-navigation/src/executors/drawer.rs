//! Drawer executor.
//!
//! Drawers attach to an edge and slide in along it. Dismissal does not trust
//! stored configuration for the exit edge: the drawer leaves toward whichever
//! window edge its current frame sits closest to, so a drawer that was
//! repositioned after attachment still exits the natural way.

use bridge_traits::presentation::{DrawerDirection, DrawerOptions, PresentationStyle, Rect};
use tracing::debug;

use crate::command::NavigationCommand;
use crate::container::ConfigAspect;
use crate::error::{NavigationError, Result};
use crate::executors::overlay::{attached_of_style, revealed_under};
use crate::executors::{is_attached, ExecutorCtx};

pub async fn present(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let name = command
        .target
        .as_deref()
        .ok_or_else(|| NavigationError::MalformedCommand("missing screenName".into()))?;
    let animated = ctx.animated(command);

    let target = ctx
        .registry
        .find_or_create(name, PresentationStyle::Drawer, ctx.host)?;
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

    let mut options: DrawerOptions = ctx
        .registry
        .get(target)
        .map(|c| c.config(ConfigAspect::Drawer))
        .unwrap_or_default();
    if let Some(direction) = command.drawer_direction {
        options.direction = direction;
    }

    if let Some(container) = under.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.deactivate(container).await;
    }

    ctx.host
        .attach_drawer(target_controller, options, animated)
        .await?;
    debug!(screen = name, animated, "attached drawer");

    if let Some(params) = command.params.clone() {
        ctx.deliver_params(target, params, source.as_deref()).await;
    }
    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.enter(container).await;
    }
    ctx.report_executed(under, "presentDrawer", Some(name), animated)
        .await;
    Ok(())
}

pub async fn dismiss(ctx: &mut ExecutorCtx<'_>, command: &NavigationCommand) -> Result<()> {
    let animated = ctx.animated(command);

    let target = attached_of_style(ctx, PresentationStyle::Drawer)
        .ok_or(NavigationError::NoPresentedController(PresentationStyle::Drawer))?;
    let (controller, dismissed_name) = {
        let container = ctx
            .registry
            .get(target)
            .ok_or(NavigationError::NoPresentedController(PresentationStyle::Drawer))?;
        (container.controller, container.name.clone())
    };

    let direction = ctx
        .host
        .view_frame(controller)
        .map(|frame| exit_direction(frame, ctx.host.window_bounds()))
        .unwrap_or(DrawerDirection::Left);

    let revealed = revealed_under(ctx);
    if let (Some(id), Some(result)) = (revealed, command.result.clone()) {
        ctx.deliver_params(id, result, Some(&dismissed_name)).await;
    }

    ctx.host
        .slide_out_and_detach(controller, direction, animated)
        .await?;

    if let Some(container) = ctx.registry.get_mut(target) {
        ctx.emitter.leave(container).await;
    }
    if let Some(container) = revealed.and_then(|id| ctx.registry.get_mut(id)) {
        ctx.emitter.activate(container).await;
    }
    ctx.report_executed(None, "dismissDrawer", Some(&dismissed_name), animated)
        .await;
    Ok(())
}

/// Edge whose distance to the drawer frame is smallest; ties break in
/// left, right, top, bottom order.
fn exit_direction(frame: Rect, window: Rect) -> DrawerDirection {
    let distances = [
        (DrawerDirection::Left, frame.x - window.x),
        (DrawerDirection::Right, window.max_x() - frame.max_x()),
        (DrawerDirection::Top, frame.y - window.y),
        (DrawerDirection::Bottom, window.max_y() - frame.max_y()),
    ];
    distances
        .into_iter()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(direction, _)| direction)
        .unwrap_or(DrawerDirection::Left)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 800.0,
    };

    #[test]
    fn test_exit_direction_follows_nearest_edge() {
        // A left drawer hugs x = 0.
        let left = Rect::new(0.0, 0.0, 320.0, 800.0);
        assert_eq!(exit_direction(left, WINDOW), DrawerDirection::Left);

        let right = Rect::new(80.0, 0.0, 320.0, 800.0);
        assert_eq!(exit_direction(right, WINDOW), DrawerDirection::Right);

        let bottom = Rect::new(20.0, 160.0, 360.0, 640.0);
        assert_eq!(exit_direction(bottom, WINDOW), DrawerDirection::Bottom);
    }

    #[test]
    fn test_full_window_frame_prefers_left() {
        assert_eq!(exit_direction(WINDOW, WINDOW), DrawerDirection::Left);
    }
}
