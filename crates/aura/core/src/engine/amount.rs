//! Effect amount and spell modifier calculation.
//!
//! ```text
//! amount = base formula (or mastery × coefficient)
//!        → per-type override
//!        → + Σ rolling remainder of same caster/spell/slot
//!        → script rewrite
//!        → × stack amount (unless NO_SCALE_WITH_STACK)
//! ```

use std::sync::Arc;

use tracing::{trace, warn};

use crate::env::DamageKind;
use crate::script::{AmountCalc, rewrite_chain};
use crate::spell::{
    AuraType, EffectAttributes, ModifierKind, SpellAttributes, SpellModOp, SpellModScope,
    SpellModifier,
};
use crate::state::{AuraKind, EffectHandle};

use super::AuraEngine;

impl AuraEngine<'_> {
    /// Computes the effect's amount from the current caster, owner and stack.
    ///
    /// May clear the effect's recalculation flag and refreshes its estimated
    /// amount. The returned value is not committed; callers pass it to
    /// [`change_amount`](Self::change_amount) or store it at creation.
    pub fn calculate_amount(&mut self, effect: EffectHandle) -> i32 {
        let world = &*self.world;
        let Some(aura) = world.aura(effect.aura) else {
            return 0;
        };
        let spell = Arc::clone(aura.spell());
        let Some(info) = spell.effect(effect.index) else {
            return 0;
        };
        let Some(slot) = aura.effect(effect.index) else {
            return 0;
        };
        let aura_type = slot.aura_type();
        let base_amount = slot.base_amount();
        let mut can_be_recalculated = slot.can_be_recalculated();
        let caster_id = aura.caster();
        let owner_id = aura.owner();
        let aura_kind = aura.kind();
        let stack_amount = aura.stack_amount();
        let caster = caster_id.and_then(|id| world.unit(id));
        let owner = world.unit(owner_id);

        let mut amount = match caster {
            Some(caster)
                if spell.has_attribute(SpellAttributes::MASTERY_AFFECTS_POINTS)
                    && info.bonus_coefficient != 0.0
                    && caster.is_player() =>
            {
                (caster.mastery * info.bonus_coefficient) as i32
            }
            _ => {
                let value = info.calc_value(base_amount, caster.map(|c| c.level));
                match caster.filter(|c| c.is_player()) {
                    Some(caster) => {
                        let value = caster.spell_mods.apply(SpellModOp::Points, &spell, value);
                        match SpellModOp::points_for_index(effect.index) {
                            Some(op) => caster.spell_mods.apply(op, &spell, value),
                            None => value,
                        }
                    }
                    None => value,
                }
            }
        };

        match aura_type {
            AuraType::ModConfuse
            | AuraType::ModFear
            | AuraType::ModStun
            | AuraType::ModRoot
            | AuraType::ModRoot2
            | AuraType::Transform => {
                can_be_recalculated = false;
                if !spell.proc_flags.is_empty()
                    && let Some(owner) = owner
                {
                    let pct = self.env.config().cc_break_health_pct;
                    amount = owner.health.pct_of_max(pct) as i32;
                }
            }
            AuraType::SchoolAbsorb | AuraType::ManaShield => {
                can_be_recalculated = false;
            }
            AuraType::Mounted => {
                can_be_recalculated = false;
                if let (Ok(content), Some(owner)) = (self.env.content(), owner) {
                    let mount_type = content
                        .mount_type_for_spell(spell.id)
                        .unwrap_or(slot.misc_value_b());
                    if let Some(capability) = content.mount_capability(owner, mount_type) {
                        amount = capability as i32;
                    }
                }
            }
            AuraType::ShowConfirmationPromptWithDifficulty => {
                if let Some(caster) = caster {
                    amount = caster.difficulty as i32;
                }
                can_be_recalculated = false;
            }
            _ => {}
        }

        if spell.has_attribute(SpellAttributes::ROLLING_PERIODIC)
            && let Some(owner) = owner
        {
            for other in owner.effects_by_type(aura_type) {
                if other.index != effect.index {
                    continue;
                }
                let Some(other_aura) = world.aura(other.aura) else {
                    continue;
                };
                if other_aura.caster() != caster_id || other_aura.spell().id != spell.id {
                    continue;
                }
                let total = other_aura.total_ticks(other.index);
                if total == 0 {
                    continue;
                }
                let remaining = other_aura.remaining_ticks(other.index);
                let other_amount = other_aura.effect(other.index).map_or(0, |e| e.amount());
                let rolled = i64::from(other_amount) * i64::from(remaining) / i64::from(total);
                trace!(%effect, from = %other, rolled, "rolling periodic remainder");
                amount = amount.saturating_add(rolled as i32);
            }
        }

        let scripts = aura.scripts();
        let calc = rewrite_chain(
            &scripts,
            AmountCalc {
                amount,
                can_be_recalculated,
            },
            |script, calc| script.calc_amount(world, effect, *calc),
        );
        let mut amount = calc.amount;
        let can_be_recalculated = calc.can_be_recalculated;

        let bonus_stacks = if info
            .attributes
            .contains(EffectAttributes::NO_SCALE_WITH_STACK)
        {
            1
        } else {
            amount = amount.saturating_mul(i32::from(stack_amount));
            stack_amount
        };

        let estimated_amount = match (caster, owner, self.env.combat()) {
            (Some(caster), Some(owner), Ok(combat)) if aura_kind == AuraKind::Unit => {
                match aura_type {
                    AuraType::PeriodicDamage | AuraType::PeriodicLeech => {
                        Some(combat.damage_bonus_done(
                            caster,
                            owner,
                            &spell,
                            amount,
                            DamageKind::Periodic,
                            bonus_stacks,
                        ))
                    }
                    AuraType::PeriodicHeal => Some(combat.healing_bonus_done(
                        caster,
                        owner,
                        &spell,
                        amount,
                        DamageKind::Periodic,
                        bonus_stacks,
                    )),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(slot) = self.world.effect_mut(effect) {
            slot.can_be_recalculated = can_be_recalculated;
            slot.estimated_amount = estimated_amount;
        }
        amount
    }

    /// Rebuilds the modifier the effect contributes to its target's casts.
    pub fn calculate_spell_mod(&mut self, effect: EffectHandle) {
        let world = &*self.world;
        let Some(aura) = world.aura(effect.aura) else {
            return;
        };
        let Some(info) = aura.spell().effect(effect.index) else {
            return;
        };
        let Some(slot) = aura.effect(effect.index) else {
            return;
        };

        let (kind, scope) = match slot.aura_type() {
            AuraType::AddFlatModifier => {
                (ModifierKind::Flat, SpellModScope::FamilyMask(info.class_mask))
            }
            AuraType::AddPctModifier => (ModifierKind::Pct, SpellModScope::FamilyMask(info.class_mask)),
            AuraType::AddFlatModifierBySpellLabel => (
                ModifierKind::Flat,
                SpellModScope::Label(slot.misc_value_b() as u32),
            ),
            AuraType::AddPctModifierBySpellLabel => (
                ModifierKind::Pct,
                SpellModScope::Label(slot.misc_value_b() as u32),
            ),
            _ => return,
        };

        let modifier = match SpellModOp::from_misc_value(slot.misc_value()) {
            Some(op) => Some(SpellModifier {
                op,
                kind,
                value: slot.amount(),
                scope,
                spell: aura.spell().id,
                owner: effect,
            }),
            None => {
                warn!(
                    %effect,
                    spell = %aura.spell().id,
                    misc_value = slot.misc_value(),
                    "unknown spell modifier op"
                );
                None
            }
        };

        let scripts = aura.scripts();
        let modifier = rewrite_chain(&scripts, modifier, |script, modifier| {
            script.calc_spell_mod(world, effect, modifier.as_ref())
        });

        if let Some(slot) = self.world.effect_mut(effect) {
            slot.spell_mod = modifier;
        }
    }
}
