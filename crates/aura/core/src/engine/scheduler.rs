//! Periodic timers and the world update loop.
//!
//! Each periodic effect owns `{period, ticks_done, periodic_timer}`. An update
//! accumulates elapsed time and fires every tick boundary it crosses, bounded
//! by the effect's total tick count for non-permanent auras.

use tracing::{debug, trace, warn};

use crate::error::AuraError;
use crate::script::{PeriodicCalc, any_veto, rewrite_chain};
use crate::spell::{SpellAttributes, SpellModOp};
use crate::state::{ApplicationId, AuraId, EffectHandle, RemoveMode};

use super::AuraEngine;

impl AuraEngine<'_> {
    /// Derives the tick period and resets (or, with `load`, reconstructs)
    /// the tick accounting of one effect.
    ///
    /// With `load`, `ticks_done` and `periodic_timer` are rebuilt from the
    /// time already elapsed on the aura (`max_duration - duration`).
    pub fn calculate_periodic(&mut self, effect: EffectHandle, reset_timer: bool, load: bool) {
        let world = &*self.world;
        let Some(aura) = world.aura(effect.aura) else {
            return;
        };
        let spell = aura.spell();
        let Some(info) = spell.effect(effect.index) else {
            return;
        };
        let Some(slot) = aura.effect(effect.index) else {
            return;
        };
        let caster = aura.caster().and_then(|id| world.unit(id));

        let scripts = aura.scripts();
        let calc = rewrite_chain(
            &scripts,
            PeriodicCalc {
                is_periodic: slot.aura_type().is_periodic(),
                period: info.amplitude,
            },
            |script, calc| script.calc_periodic(world, effect, *calc),
        );
        let mut is_periodic = calc.is_periodic;
        let mut period = calc.period;

        if is_periodic && period > 0 {
            if let Some(caster) = caster.filter(|c| c.is_player()) {
                let modded = caster
                    .spell_mods
                    .apply(SpellModOp::Period, spell, period as i32);
                period = modded.max(0) as u32;
            }
            if let Some(caster) = caster
                && (spell.is_channeled()
                    || spell.has_attribute(SpellAttributes::HASTE_AFFECTS_PERIODIC))
            {
                period = (u64::from(period) * u64::from(caster.cast_speed_pct) / 100) as u32;
            }
        }

        if period == 0 {
            is_periodic = false;
        }

        let extra_initial = spell.has_attribute(SpellAttributes::EXTRA_INITIAL_PERIOD);
        let elapsed = aura.max_duration().saturating_sub(aura.duration()).max(0) as u32;
        let permanent = aura.is_permanent();

        let Some(slot) = self.world.effect_mut(effect) else {
            return;
        };
        slot.is_periodic = is_periodic;
        slot.period = period;
        if !is_periodic {
            return;
        }

        if load {
            if period > 0 && !permanent {
                slot.ticks_done = elapsed / period;
                slot.periodic_timer = elapsed % period;
            }
            if extra_initial {
                slot.ticks_done += 1;
            }
        } else {
            slot.ticks_done = 0;
            if reset_timer {
                slot.periodic_timer = if extra_initial { period } else { 0 };
            }
        }
        trace!(
            %effect,
            period,
            ticks_done = slot.ticks_done,
            timer = slot.periodic_timer,
            load,
            "periodic calculated"
        );
    }

    /// Advances one effect's periodic timer by `diff` milliseconds and fires
    /// every tick boundary crossed.
    ///
    /// Each tick re-snapshots the effect's applications, so a removal during
    /// one tick is observed by the next.
    pub fn update_effect(&mut self, effect: EffectHandle, diff: u32) {
        let Some(aura) = self.world.aura(effect.aura) else {
            return;
        };
        if aura.duration() < 0 && !aura.is_passive() && !aura.is_permanent() {
            return;
        }
        match self.world.effect_mut(effect) {
            Some(slot) if slot.is_periodic => {
                slot.periodic_timer = slot.periodic_timer.saturating_add(diff);
            }
            _ => return,
        }

        loop {
            let Some(aura) = self.world.aura(effect.aura) else {
                break;
            };
            let permanent = aura.is_permanent();
            let total_ticks = aura.total_ticks(effect.index);
            let Some(slot) = self.world.effect_mut(effect) else {
                break;
            };
            if slot.period == 0 || slot.periodic_timer < slot.period {
                break;
            }
            slot.periodic_timer -= slot.period;
            if !permanent && slot.ticks_done + 1 > total_ticks {
                break;
            }
            slot.ticks_done += 1;
            debug!(%effect, tick = slot.ticks_done, total_ticks, "periodic tick");

            for application in self.world.effect_applications(effect) {
                if self.world.is_removed(application) {
                    continue;
                }
                self.periodic_tick(effect, application);
            }
        }
    }

    /// Runs one tick body on one application. Failures are logged and dropped.
    pub(crate) fn periodic_tick(&mut self, effect: EffectHandle, application: ApplicationId) {
        let scripts = self.scripts_of(effect.aura);
        if any_veto(&scripts, |script| {
            script.on_effect_periodic(self, effect, application)
        }) {
            trace!(%effect, %application, "periodic tick prevented by script");
            return;
        }
        if self.world.is_removed(application) {
            return;
        }
        let Some(aura_type) = self.world.effect(effect).map(|e| e.aura_type()) else {
            return;
        };

        let handler = self.env.handlers().get(aura_type);
        if let Err(err) = handler.periodic_tick(self, effect, application) {
            warn!(
                %effect,
                %application,
                code = err.error_code(),
                error = %err,
                "periodic tick failed"
            );
        }
    }

    /// Advances every aura by `diff` milliseconds: counts durations down,
    /// runs periodic updates and removes expired auras.
    pub fn update(&mut self, diff: u32) {
        for aura in self.world.aura_ids() {
            self.update_aura(aura, diff);
        }
    }

    fn update_aura(&mut self, aura: AuraId, diff: u32) {
        let Some(state) = self.world.aura_mut(aura) else {
            return;
        };
        if state.is_removed() {
            return;
        }
        state.tick_duration(diff);
        let indices: Vec<u8> = state.effects().map(|effect| effect.index()).collect();

        for index in indices {
            self.update_effect(EffectHandle::new(aura, index), diff);
        }

        if self.world.aura(aura).is_some_and(|state| state.is_expired()) {
            debug!(%aura, "aura expired");
            if let Err(err) = self.remove_aura(aura, RemoveMode::Expire) {
                warn!(%aura, error = %err, "failed to remove expired aura");
            }
        }
    }
}
