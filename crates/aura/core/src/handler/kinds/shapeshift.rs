use tracing::{debug, warn};

use crate::engine::AuraEngine;
use crate::handler::{EffectHandler, HandleMode, HandlerContext};
use crate::spell::AuraType;
use crate::state::{ClientUpdate, RemoveMode, UnitFlags};

/// Shapeshift forms keyed by the form id in `misc_value`.
///
/// Applying a form removes every competing form on the target. A target that
/// cannot shapeshift drops the application instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeshiftHandler;

impl EffectHandler for ShapeshiftHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::REAL
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let Some(form_id) = engine.world().effect(ctx.effect).map(|e| e.misc_value()) else {
            return;
        };

        if !ctx.apply {
            let world = engine.world_mut();
            if let Some(unit) = world.unit_mut(ctx.target)
                && unit.shapeshift_form == Some(form_id)
            {
                unit.shapeshift_form = None;
                world.outbox_mut().push_client(ClientUpdate::Shapeshift {
                    target: ctx.target,
                    form: None,
                });
            }
            return;
        }

        let form = match engine.env().content() {
            Ok(content) => content.shapeshift_form(form_id),
            Err(err) => {
                warn!(effect = %ctx.effect, error = %err, "shapeshift without content tables");
                return;
            }
        };
        let Some(form) = form else {
            warn!(effect = %ctx.effect, form = form_id, "unknown shapeshift form");
            return;
        };

        let cannot_shapeshift = engine
            .world()
            .unit(ctx.target)
            .is_some_and(|unit| unit.flags.contains(UnitFlags::CANNOT_SHAPESHIFT));
        if cannot_shapeshift {
            debug!(target = %ctx.target, form = form.id, "target cannot shapeshift");
            if let Err(err) = engine.remove_application(ctx.application, RemoveMode::Default) {
                warn!(application = %ctx.application, error = %err, "failed to drop shapeshift");
            }
            return;
        }

        let competing: Vec<_> = engine
            .world()
            .unit(ctx.target)
            .map(|unit| unit.effects_by_type(AuraType::ModShapeshift).to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|other| other.aura != ctx.effect.aura)
            .filter_map(|other| engine.world().application_for(other.aura, ctx.target))
            .collect();
        for application in competing {
            if let Err(err) = engine.remove_application(application, RemoveMode::Default) {
                warn!(%application, error = %err, "failed to remove competing form");
            }
        }

        let world = engine.world_mut();
        if let Some(unit) = world.unit_mut(ctx.target) {
            unit.shapeshift_form = Some(form.id);
            world.outbox_mut().push_client(ClientUpdate::Shapeshift {
                target: ctx.target,
                form: Some(form.id),
            });
        }
    }
}
