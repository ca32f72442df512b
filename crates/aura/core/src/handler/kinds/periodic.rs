//! Periodic tick bodies.
//!
//! These handlers have no apply/remove behavior; the scheduler calls
//! [`EffectHandler::periodic_tick`] once per tick per application.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::{AuraEngine, TickError};
use crate::env::DamageKind;
use crate::handler::{EffectHandler, HandleMode, HandlerContext};
use crate::spell::{SpellAttributes, SpellInfo};
use crate::state::{ApplicationId, CastRequest, CombatEvent, EffectHandle, UnitId};

/// Everything a tick body reads before mutating the world.
struct Tick {
    spell: Arc<SpellInfo>,
    caster: Option<UnitId>,
    target: UnitId,
    amount: i32,
    stacks: u8,
}

impl Tick {
    fn resolve(
        engine: &AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<Self, TickError> {
        let world = engine.world();
        let target = world
            .application(application)
            .map(|app| app.target)
            .ok_or(TickError::ApplicationMissing(application))?;
        let aura = world
            .aura(effect.aura)
            .ok_or(TickError::EffectMissing(effect))?;
        let slot = aura
            .effect(effect.index)
            .ok_or(TickError::EffectMissing(effect))?;
        if world.unit(target).is_none() {
            return Err(TickError::TargetMissing(target));
        }
        Ok(Self {
            spell: Arc::clone(aura.spell()),
            caster: aura.caster(),
            target,
            amount: slot.amount(),
            stacks: aura.stack_amount(),
        })
    }

    /// Pushes an immune record and returns true if the target rejects damage.
    fn immune_to_damage(&self, engine: &mut AuraEngine<'_>) -> bool {
        let immune = engine
            .world()
            .unit(self.target)
            .is_some_and(|unit| unit.is_isolated() || unit.is_damage_immune());
        if immune {
            engine.world_mut().outbox_mut().push_combat(CombatEvent::Immune {
                caster: self.caster,
                target: self.target,
                spell: self.spell.id,
            });
        }
        immune
    }

    fn isolated(&self, engine: &AuraEngine<'_>) -> bool {
        engine
            .world()
            .unit(self.target)
            .is_some_and(|unit| unit.is_isolated())
    }

    /// Runs the amount through the caster and victim damage formulas and
    /// splits it into dealt, absorbed and resisted parts.
    fn damage(&self, engine: &AuraEngine<'_>) -> Result<(u32, u32, u32), TickError> {
        let combat = engine.env().combat()?;
        let world = engine.world();
        let victim = world
            .unit(self.target)
            .ok_or(TickError::TargetMissing(self.target))?;
        let caster = self.caster.and_then(|id| world.unit(id));

        let mut damage = self.amount;
        if let Some(caster) = caster {
            damage = combat.damage_bonus_done(
                caster,
                victim,
                &self.spell,
                damage,
                DamageKind::Periodic,
                self.stacks,
            );
        }
        damage = combat.damage_bonus_taken(caster, victim, &self.spell, damage, DamageKind::Periodic);
        let breakdown = combat.resolve_damage(victim, &self.spell, damage.max(0) as u32);
        Ok((breakdown.damage, breakdown.absorbed, breakdown.resisted))
    }

    fn deal_damage(&self, engine: &mut AuraEngine<'_>, damage: u32, absorbed: u32, resisted: u32) {
        let world = engine.world_mut();
        if let Some(victim) = world.unit_mut(self.target) {
            victim.health.drain(damage);
        }
        world.outbox_mut().push_combat(CombatEvent::PeriodicDamage {
            caster: self.caster,
            target: self.target,
            spell: self.spell.id,
            damage,
            absorbed,
            resisted,
        });
    }
}

/// Damage over time.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicDamageHandler;

impl EffectHandler for PeriodicDamageHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}

    fn periodic_tick(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<(), TickError> {
        let tick = Tick::resolve(engine, effect, application)?;
        if tick.immune_to_damage(engine) {
            trace!(%effect, target = %tick.target, "periodic damage resisted by immunity");
            return Ok(());
        }
        let (damage, absorbed, resisted) = tick.damage(engine)?;
        debug!(%effect, target = %tick.target, damage, absorbed, resisted, "periodic damage");
        tick.deal_damage(engine, damage, absorbed, resisted);
        Ok(())
    }
}

/// Damage over time that heals the caster by the damage dealt.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicLeechHandler;

impl EffectHandler for PeriodicLeechHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}

    fn periodic_tick(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<(), TickError> {
        let tick = Tick::resolve(engine, effect, application)?;
        if tick.immune_to_damage(engine) {
            return Ok(());
        }
        let (damage, absorbed, resisted) = tick.damage(engine)?;
        tick.deal_damage(engine, damage, absorbed, resisted);

        let Some(caster_id) = tick.caster else {
            return Ok(());
        };
        let combat = engine.env().combat()?;
        let heal = match engine.world().unit(caster_id) {
            Some(caster) if caster.is_alive() => combat.healing_bonus_taken(
                Some(caster),
                caster,
                &tick.spell,
                damage.min(i32::MAX as u32) as i32,
                DamageKind::Periodic,
            ),
            _ => return Ok(()),
        };
        let heal = heal.max(0) as u32;
        debug!(%effect, target = %tick.target, damage, heal, "periodic leech");

        let world = engine.world_mut();
        if let Some(caster) = world.unit_mut(caster_id) {
            caster.health.restore(heal);
        }
        world.outbox_mut().push_combat(CombatEvent::PeriodicHeal {
            caster: Some(caster_id),
            target: caster_id,
            spell: tick.spell.id,
            heal,
        });
        Ok(())
    }
}

/// Healing over time.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicHealHandler;

impl EffectHandler for PeriodicHealHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}

    fn periodic_tick(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<(), TickError> {
        let tick = Tick::resolve(engine, effect, application)?;
        if tick.isolated(engine) {
            return Ok(());
        }

        let combat = engine.env().combat()?;
        let world = engine.world();
        let target = world
            .unit(tick.target)
            .ok_or(TickError::TargetMissing(tick.target))?;
        let caster = tick.caster.and_then(|id| world.unit(id));
        let mut heal = tick.amount;
        if let Some(caster) = caster {
            heal = combat.healing_bonus_done(
                caster,
                target,
                &tick.spell,
                heal,
                DamageKind::Periodic,
                tick.stacks,
            );
        }
        heal = combat.healing_bonus_taken(caster, target, &tick.spell, heal, DamageKind::Periodic);
        let heal = heal.max(0) as u32;
        debug!(%effect, target = %tick.target, heal, "periodic heal");

        let world = engine.world_mut();
        if let Some(target) = world.unit_mut(tick.target) {
            target.health.restore(heal);
        }
        world.outbox_mut().push_combat(CombatEvent::PeriodicHeal {
            caster: tick.caster,
            target: tick.target,
            spell: tick.spell.id,
            heal,
        });
        Ok(())
    }
}

/// Power restored over time.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicEnergizeHandler;

impl EffectHandler for PeriodicEnergizeHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}

    fn periodic_tick(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<(), TickError> {
        let tick = Tick::resolve(engine, effect, application)?;
        if tick.isolated(engine) || tick.amount <= 0 {
            return Ok(());
        }
        let amount = tick.amount as u32;

        let world = engine.world_mut();
        if let Some(target) = world.unit_mut(tick.target) {
            target.power.restore(amount);
        }
        world.outbox_mut().push_combat(CombatEvent::PeriodicEnergize {
            caster: tick.caster,
            target: tick.target,
            spell: tick.spell.id,
            amount,
        });
        Ok(())
    }
}

/// Casts the effect's trigger spell on every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicTriggerSpellHandler;

impl EffectHandler for PeriodicTriggerSpellHandler {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}

    fn periodic_tick(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> Result<(), TickError> {
        let tick = Tick::resolve(engine, effect, application)?;
        let trigger = tick
            .spell
            .effect(effect.index)
            .and_then(|info| info.trigger_spell)
            .ok_or(TickError::TriggerSpellMissing(effect))?;
        let triggered = engine
            .env()
            .spells()?
            .spell(trigger)
            .ok_or(TickError::TriggerSpellUnknown {
                effect,
                spell: trigger,
            })?;

        let caster = if triggered.has_attribute(SpellAttributes::NEEDS_ORIGINAL_CASTER) {
            tick.caster
        } else {
            Some(tick.target)
        };
        let Some(caster) = caster else {
            trace!(%effect, spell = %trigger, "trigger caster gone");
            return Ok(());
        };

        engine.world_mut().outbox_mut().push_cast(CastRequest {
            caster,
            target: tick.target,
            spell: trigger,
            base_value: None,
            triggered_by: effect,
        });
        Ok(())
    }
}
