use crate::engine::AuraEngine;
use crate::handler::{EffectHandler, HandleMode, HandlerContext};
use crate::state::ClientUpdate;

/// Mount display driven by the capability id stored in the amount.
#[derive(Clone, Copy, Debug, Default)]
pub struct MountHandler;

impl EffectHandler for MountHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::SEND_FOR_CLIENT_MASK
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let Some(amount) = engine.world().effect(ctx.effect).map(|e| e.amount()) else {
            return;
        };
        let display = if ctx.apply {
            u32::try_from(amount).ok().filter(|display| *display > 0)
        } else {
            None
        };

        let world = engine.world_mut();
        let Some(unit) = world.unit_mut(ctx.target) else {
            return;
        };
        unit.mount_display = display;
        world.outbox_mut().push_client(ClientUpdate::Mount {
            target: ctx.target,
            display,
        });
    }
}
