use tracing::{trace, warn};

use crate::engine::AuraEngine;
use crate::handler::{EffectHandler, HandleMode, HandlerContext};
use crate::spell::AuraType;
use crate::state::Stat;

/// Primary stat and maximum health modifiers.
///
/// `ModStat` reads the stat index from `misc_value`; `-1` modifies every
/// stat.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatHandler;

impl EffectHandler for StatHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::CHANGE_AMOUNT_MASK | HandleMode::STAT
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let Some((aura_type, misc_value, amount)) = engine
            .world()
            .effect(ctx.effect)
            .map(|e| (e.aura_type(), e.misc_value(), e.amount()))
        else {
            return;
        };
        let delta = if ctx.apply { amount } else { -amount };
        let Some(unit) = engine.world_mut().unit_mut(ctx.target) else {
            return;
        };

        match aura_type {
            AuraType::ModStat => {
                if misc_value == -1 {
                    for index in 0..Stat::COUNT as u8 {
                        if let Some(stat) = Stat::from_repr(index) {
                            unit.modify_stat(stat, delta);
                        }
                    }
                } else if let Some(stat) = u8::try_from(misc_value).ok().and_then(Stat::from_repr) {
                    unit.modify_stat(stat, delta);
                } else {
                    warn!(effect = %ctx.effect, misc_value, "unknown stat index");
                    return;
                }
            }
            AuraType::ModIncreaseHealth => {
                if ctx.apply {
                    unit.health.shift_maximum(amount);
                    if amount > 0 {
                        unit.health.restore(amount as u32);
                    }
                } else {
                    if unit.is_alive() && amount > 0 {
                        let floor = unit.health.current.saturating_sub(amount as u32).max(1);
                        unit.health.current = floor;
                    }
                    unit.health.shift_maximum(-amount);
                }
            }
            _ => return,
        }
        trace!(effect = %ctx.effect, target = %ctx.target, delta, "stat modifier applied");
    }
}

/// Skill bonus modifiers keyed by the skill id in `misc_value`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkillHandler;

impl EffectHandler for SkillHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::CHANGE_AMOUNT_MASK | HandleMode::SKILL
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let Some((misc_value, amount)) = engine
            .world()
            .effect(ctx.effect)
            .map(|e| (e.misc_value(), e.amount()))
        else {
            return;
        };
        let Ok(skill) = u32::try_from(misc_value) else {
            warn!(effect = %ctx.effect, misc_value, "invalid skill id");
            return;
        };
        if let Some(unit) = engine.world_mut().unit_mut(ctx.target) {
            unit.modify_skill(skill, if ctx.apply { amount } else { -amount });
        }
    }
}
