//! Proc execution.
//!
//! ```text
//! trigger_procs: snapshot target apps → proc flag filter
//!                → per effect: check_effect_proc → handle_proc
//!                → consume one charge per proccing aura
//! ```

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::engine::AuraEngine;
use crate::env::DamageKind;
use crate::error::AuraError;
use crate::script::any_veto;
use crate::spell::{AuraType, SpellAttributes, SpellInfo};
use crate::state::{
    ApplicationId, CastRequest, CombatEvent, EffectHandle, RemoveMode, UnitId,
};

use super::{ProcError, ProcEventInfo};

impl AuraEngine<'_> {
    /// Runs the reactive behavior of an effect that passed the proc gate.
    pub fn handle_proc(
        &mut self,
        application: ApplicationId,
        effect: EffectHandle,
        event: &ProcEventInfo,
    ) {
        let scripts = self.scripts_of(effect.aura);
        if any_veto(&scripts, |script| {
            script.on_effect_proc(self, effect, application, event)
        }) {
            trace!(%effect, %application, "proc prevented by script");
            return;
        }
        let Some(aura_type) = self.world().effect(effect).map(|e| e.aura_type()) else {
            return;
        };

        let result = match aura_type {
            t if t.is_crowd_control() => {
                self.break_on_damage(application, effect, event);
                Ok(())
            }
            AuraType::Dummy | AuraType::ProcTriggerSpell => {
                self.proc_trigger_spell(application, effect, event, None)
            }
            AuraType::ProcTriggerSpellWithValue => {
                let amount = self.world().effect(effect).map(|e| e.amount());
                self.proc_trigger_spell(application, effect, event, amount)
            }
            AuraType::ProcTriggerDamage => self.proc_trigger_damage(application, effect, event),
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(
                %effect,
                %application,
                code = err.error_code(),
                error = %err,
                "proc handling failed"
            );
        }

        for script in &scripts {
            script.after_effect_proc(self, effect, application, event);
        }
    }

    /// Feeds one combat event to every aura on `target`.
    ///
    /// Returns the number of auras that procced.
    pub fn trigger_procs(&mut self, target: UnitId, event: &ProcEventInfo) -> usize {
        let mut procced = 0;
        for application in self.world().unit_applications(target) {
            let Some(app) = self.world().application(application) else {
                continue;
            };
            if app.has_remove_mode() {
                continue;
            }
            let aura = app.aura;
            let indices: Vec<u8> = app.effect_indices().collect();
            let listens = self
                .world()
                .aura(aura)
                .is_some_and(|state| state.spell().proc_flags.intersects(event.type_mask));
            if !listens {
                continue;
            }

            let mut triggered = false;
            for index in indices {
                if self.world().is_removed(application) {
                    break;
                }
                let effect = EffectHandle::new(aura, index);
                if self.check_effect_proc(application, effect, event) {
                    debug!(%effect, %application, "effect procs");
                    self.handle_proc(application, effect, event);
                    triggered = true;
                }
            }

            if triggered {
                procced += 1;
                if self.world().aura(aura).is_some_and(|state| state.is_using_charges())
                    && let Err(err) = self.mod_charges(aura, -1)
                {
                    warn!(%aura, error = %err, "failed to consume proc charge");
                }
            }
        }
        procced
    }

    /// Subtracts event damage from the stored threshold and breaks the
    /// effect once it is used up.
    fn break_on_damage(&mut self, application: ApplicationId, effect: EffectHandle, event: &ProcEventInfo) {
        let Some(amount) = self.world().effect(effect).map(|e| e.amount()) else {
            return;
        };
        let damage = i32::try_from(event.damage()).unwrap_or(i32::MAX);
        let left = amount.saturating_sub(damage);
        if left <= 0 {
            debug!(%effect, %application, "crowd control broken by damage");
            if let Err(err) = self.remove_application(application, RemoveMode::EnemySpell) {
                warn!(%application, error = %err, "failed to break crowd control");
            }
        } else {
            self.change_amount(effect, left, false, false);
        }
    }

    fn proc_trigger_spell(
        &mut self,
        application: ApplicationId,
        effect: EffectHandle,
        event: &ProcEventInfo,
        base_value: Option<i32>,
    ) -> Result<(), ProcError> {
        let (aura_caster, trigger) = self
            .world()
            .aura(effect.aura)
            .map(|aura| {
                (
                    aura.caster(),
                    aura.spell().effect(effect.index).and_then(|info| info.trigger_spell),
                )
            })
            .unwrap_or_default();
        let trigger = trigger.ok_or(ProcError::TriggerSpellMissing { effect })?;
        let triggered: Arc<SpellInfo> = self
            .env()
            .spells()?
            .spell(trigger)
            .ok_or(ProcError::TriggerSpellUnknown { effect, spell: trigger })?;
        let target = self
            .world()
            .application(application)
            .map(|app| app.target)
            .ok_or(ProcError::TargetMissing(event.proc_target))?;

        let caster = if triggered.has_attribute(SpellAttributes::NEEDS_ORIGINAL_CASTER) {
            match aura_caster {
                Some(caster) => caster,
                None => {
                    debug!(%effect, spell = %trigger, "original caster gone, trigger skipped");
                    return Ok(());
                }
            }
        } else {
            target
        };

        self.world_mut().outbox_mut().push_cast(CastRequest {
            caster,
            target: event.proc_target,
            spell: trigger,
            base_value,
            triggered_by: effect,
        });
        Ok(())
    }

    fn proc_trigger_damage(
        &mut self,
        application: ApplicationId,
        effect: EffectHandle,
        event: &ProcEventInfo,
    ) -> Result<(), ProcError> {
        let Some((spell, amount)) = self.world().aura(effect.aura).and_then(|aura| {
            aura.effect(effect.index)
                .map(|slot| (Arc::clone(aura.spell()), slot.amount()))
        }) else {
            return Ok(());
        };
        let attacker = self
            .world()
            .application(application)
            .map(|app| app.target)
            .ok_or(ProcError::TargetMissing(event.proc_target))?;
        let victim_id = event.proc_target;
        let combat = self.env().combat()?;

        let world = self.world();
        let victim = world
            .unit(victim_id)
            .ok_or(ProcError::TargetMissing(victim_id))?;
        let breakdown = if victim.is_isolated() || victim.is_damage_immune() {
            None
        } else {
            let caster = world.unit(attacker);
            let mut damage = amount;
            if let Some(caster) = caster {
                damage =
                    combat.damage_bonus_done(caster, victim, &spell, damage, DamageKind::Direct, 1);
            }
            damage = combat.damage_bonus_taken(caster, victim, &spell, damage, DamageKind::Direct);
            Some(combat.resolve_damage(victim, &spell, damage.max(0) as u32))
        };

        let world = self.world_mut();
        let Some(breakdown) = breakdown else {
            world.outbox_mut().push_combat(CombatEvent::Immune {
                caster: Some(attacker),
                target: victim_id,
                spell: spell.id,
            });
            return Ok(());
        };
        if let Some(victim) = world.unit_mut(victim_id) {
            victim.health.drain(breakdown.damage);
        }
        world.outbox_mut().push_combat(CombatEvent::ProcDamage {
            attacker,
            target: victim_id,
            spell: spell.id,
            damage: breakdown.damage,
            absorbed: breakdown.absorbed,
            resisted: breakdown.resisted,
        });
        Ok(())
    }
}
