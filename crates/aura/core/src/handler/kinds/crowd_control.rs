use tracing::debug;

use crate::engine::AuraEngine;
use crate::handler::{EffectHandler, HandleMode, HandlerContext};
use crate::spell::AuraType;
use crate::state::UnitState;

/// Toggles the control state flag matching the effect type.
///
/// Removal only clears the flag once no other effect of a type sharing that
/// flag is still registered on the target.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrowdControlHandler;

impl CrowdControlHandler {
    fn state_for(aura_type: AuraType) -> Option<UnitState> {
        match aura_type {
            AuraType::ModStun => Some(UnitState::STUNNED),
            AuraType::ModRoot | AuraType::ModRoot2 => Some(UnitState::ROOTED),
            AuraType::ModFear => Some(UnitState::FLEEING),
            AuraType::ModConfuse => Some(UnitState::CONFUSED),
            AuraType::Transform => Some(UnitState::TRANSFORMED),
            _ => None,
        }
    }

    fn types_for(state: UnitState) -> &'static [AuraType] {
        if state == UnitState::STUNNED {
            &[AuraType::ModStun]
        } else if state == UnitState::ROOTED {
            &[AuraType::ModRoot, AuraType::ModRoot2]
        } else if state == UnitState::FLEEING {
            &[AuraType::ModFear]
        } else if state == UnitState::CONFUSED {
            &[AuraType::ModConfuse]
        } else if state == UnitState::TRANSFORMED {
            &[AuraType::Transform]
        } else {
            &[]
        }
    }
}

impl EffectHandler for CrowdControlHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::REAL
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let Some(aura_type) = engine.world().effect(ctx.effect).map(|e| e.aura_type()) else {
            return;
        };
        let Some(state) = Self::state_for(aura_type) else {
            return;
        };
        let Some(unit) = engine.world_mut().unit_mut(ctx.target) else {
            return;
        };

        if ctx.apply {
            unit.state.insert(state);
            debug!(target = %ctx.target, ?state, "control state set");
            return;
        }

        let still_held = Self::types_for(state)
            .iter()
            .any(|aura_type| unit.has_aura_type(*aura_type));
        if !still_held {
            unit.state.remove(state);
            debug!(target = %ctx.target, ?state, "control state cleared");
        }
    }
}
