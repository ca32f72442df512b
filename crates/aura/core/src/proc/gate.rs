//! Per-type proc qualification.

use tracing::trace;

use crate::engine::AuraEngine;
use crate::script::any_veto;
use crate::spell::{AuraType, SchoolMask, SpellAttributes};
use crate::state::{ApplicationId, EffectHandle};

use super::ProcEventInfo;

impl AuraEngine<'_> {
    /// Returns true if `event` qualifies the effect to proc on `application`.
    pub fn check_effect_proc(
        &self,
        application: ApplicationId,
        effect: EffectHandle,
        event: &ProcEventInfo,
    ) -> bool {
        let world = self.world();
        let Some(aura) = world.aura(effect.aura) else {
            return false;
        };
        let Some(slot) = aura.effect(effect.index) else {
            return false;
        };

        let scripts = aura.scripts();
        if any_veto(&scripts, |script| {
            script.check_effect_proc(world, effect, application, event)
        }) {
            trace!(%effect, "proc rejected by script");
            return false;
        }

        match slot.aura_type() {
            AuraType::ModConfuse
            | AuraType::ModFear
            | AuraType::ModStun
            | AuraType::ModRoot
            | AuraType::ModRoot2
            | AuraType::Transform => {
                if event.damage() == 0 {
                    return false;
                }
                // The spell's own damage on apply must not break it.
                if event
                    .spell
                    .as_ref()
                    .is_some_and(|spell| spell.id == aura.spell().id)
                    && aura.duration() == aura.max_duration()
                {
                    return false;
                }
            }
            AuraType::MechanicImmunity | AuraType::ModMechanicResistance => {
                let Ok(mechanic) = u32::try_from(slot.misc_value()) else {
                    return false;
                };
                let bit = 1u64.checked_shl(mechanic).unwrap_or(0);
                if !event
                    .spell
                    .as_ref()
                    .is_some_and(|spell| spell.mechanic_mask & bit != 0)
                {
                    return false;
                }
            }
            AuraType::ModCastingSpeedNotStack => {
                if !event
                    .proc_spell
                    .as_ref()
                    .is_some_and(|proc_spell| proc_spell.cast_time > 0)
                {
                    return false;
                }
            }
            AuraType::ModSchoolMaskDamageFromCaster | AuraType::ModSpellDamageFromCaster => {
                if aura.caster() != Some(event.actor) {
                    return false;
                }
            }
            AuraType::ModPowerCostSchool | AuraType::ModPowerCostSchoolPct => {
                let school = SchoolMask::from_bits_truncate(slot.misc_value() as u8);
                if !event
                    .spell
                    .as_ref()
                    .is_some_and(|spell| spell.school.intersects(school))
                {
                    return false;
                }
                if !event.proc_spell.as_ref().is_some_and(|proc_spell| {
                    proc_spell.power_costs.iter().any(|cost| cost.amount > 0)
                }) {
                    return false;
                }
            }
            AuraType::ReflectSpellsSchool => {
                let school = SchoolMask::from_bits_truncate(slot.misc_value() as u8);
                if !event.school_mask().intersects(school) {
                    return false;
                }
            }
            AuraType::ProcTriggerSpell | AuraType::ProcTriggerSpellWithValue => {
                let trigger = aura
                    .spell()
                    .effect(effect.index)
                    .and_then(|info| info.trigger_spell);
                if let (Some(trigger), Ok(spells)) = (trigger, self.env().spells())
                    && spells
                        .spell(trigger)
                        .is_some_and(|spell| spell.has_attribute(SpellAttributes::ADD_EXTRA_ATTACKS))
                    && world
                        .unit(event.actor)
                        .is_some_and(|actor| actor.last_extra_attack_spell == Some(trigger))
                {
                    // Extra attacks must not chain into themselves.
                    return false;
                }
            }
            AuraType::ModSpellCritChance => {
                if !event
                    .spell
                    .as_ref()
                    .is_some_and(|spell| spell.has_attribute(SpellAttributes::CAN_CRIT))
                {
                    return false;
                }
            }
            _ => {}
        }
        true
    }
}
