//! Aura creation, application, stacking and removal.
//!
//! This is the thin container around the dispatch core: it owns the
//! aura ↔ application bookkeeping and routes every transition through
//! [`handle_effect`](AuraEngine::handle_effect) and
//! [`change_amount`](AuraEngine::change_amount).

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::effect::{AuraEffect, AuraSnapshot};
use crate::handler::HandleMode;
use crate::script::AuraScript;
use crate::spell::{SpellAttributes, SpellInfo, SpellModOp};
use crate::state::{
    ApplicationId, Aura, AuraId, AuraKind, ClientUpdate, EffectHandle, RemoveMode, UnitId,
    WorldError,
};

use super::AuraEngine;

/// Parameters of a new aura.
#[derive(Clone)]
pub struct AuraCreateInfo {
    pub spell: Arc<SpellInfo>,
    pub caster: Option<UnitId>,
    pub owner: UnitId,
    pub kind: AuraKind,
    /// Per-slot overrides of the declared base points.
    pub base_amounts: [Option<i32>; EngineConfig::MAX_EFFECTS],
    pub stack_amount: u8,
    pub scripts: Vec<Arc<dyn AuraScript>>,
}

impl AuraCreateInfo {
    pub fn new(spell: Arc<SpellInfo>, owner: UnitId) -> Self {
        Self {
            spell,
            caster: None,
            owner,
            kind: AuraKind::Unit,
            base_amounts: [None; EngineConfig::MAX_EFFECTS],
            stack_amount: 1,
            scripts: Vec::new(),
        }
    }

    pub fn with_caster(mut self, caster: UnitId) -> Self {
        self.caster = Some(caster);
        self
    }

    pub fn with_kind(mut self, kind: AuraKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_base_amount(mut self, index: u8, amount: i32) -> Self {
        if let Some(slot) = self.base_amounts.get_mut(usize::from(index)) {
            *slot = Some(amount);
        }
        self
    }

    pub fn with_stack_amount(mut self, stack_amount: u8) -> Self {
        self.stack_amount = stack_amount;
        self
    }

    pub fn with_script(mut self, script: impl AuraScript + 'static) -> Self {
        self.scripts.push(Arc::new(script));
        self
    }
}

impl core::fmt::Debug for AuraCreateInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuraCreateInfo")
            .field("spell", &self.spell.id)
            .field("caster", &self.caster)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("base_amounts", &self.base_amounts)
            .field("stack_amount", &self.stack_amount)
            .field("scripts", &self.scripts.len())
            .finish()
    }
}

impl AuraEngine<'_> {
    /// Creates an aura and computes the initial period and amount of every
    /// effect. The aura is not applied to any target yet.
    pub fn create_aura(&mut self, info: AuraCreateInfo) -> Result<AuraId, WorldError> {
        if self.world.unit(info.owner).is_none() {
            return Err(WorldError::UnitNotFound(info.owner));
        }

        let spell = info.spell;
        let mut max_duration = spell.max_duration;
        if max_duration > 0
            && let Some(caster) = info
                .caster
                .and_then(|id| self.world.unit(id))
                .filter(|c| c.is_player())
        {
            max_duration = caster
                .spell_mods
                .apply(SpellModOp::Duration, &spell, max_duration)
                .max(0);
        }

        let max_stack = spell.max_stack.max(1);
        let stack_amount = info.stack_amount.clamp(1, max_stack);
        let effects: ArrayVec<AuraEffect, { EngineConfig::MAX_EFFECTS }> = spell
            .effects
            .iter()
            .enumerate()
            .map(|(index, effect)| {
                AuraEffect::new(index as u8, effect, info.base_amounts[index])
            })
            .collect();
        let indices: Vec<u8> = effects.iter().map(AuraEffect::index).collect();

        let aura = self.world.insert_aura(|id| Aura {
            id,
            caster: info.caster,
            owner: info.owner,
            kind: info.kind,
            duration: max_duration,
            max_duration,
            stack_amount,
            charges: spell.proc_charges,
            using_charges: spell.proc_charges != 0,
            effects,
            applications: Vec::new(),
            scripts: info.scripts,
            removed: false,
            spell: Arc::clone(&spell),
        });

        for index in indices {
            let effect = EffectHandle::new(aura, index);
            self.calculate_periodic(effect, true, false);
            let amount = self.calculate_amount(effect);
            if let Some(slot) = self.world.effect_mut(effect) {
                slot.amount = amount;
            }
            self.calculate_spell_mod(effect);
        }

        debug!(%aura, spell = %spell.id, owner = %info.owner, max_duration, "aura created");
        Ok(aura)
    }

    /// Applies every effect of the aura to `target`.
    pub fn apply_aura(&mut self, aura: AuraId, target: UnitId) -> Result<ApplicationId, WorldError> {
        let state = self.world.aura(aura).ok_or(WorldError::AuraNotFound(aura))?;
        if state.is_removed() {
            return Err(WorldError::AuraRemoved(aura));
        }
        let effect_mask = state.effect_mask();
        if self.world.unit(target).is_none() {
            return Err(WorldError::UnitNotFound(target));
        }
        if self.world.application_for(aura, target).is_some() {
            return Err(WorldError::AlreadyApplied { aura, target });
        }

        // A slot joins the mask only once its apply starts.
        let application = self.world.insert_application(aura, target, 0);
        if let Some(state) = self.world.aura_mut(aura) {
            state.applications.push(application);
        }
        if let Some(unit) = self.world.unit_mut(target) {
            unit.attach_application(application);
        }
        debug!(%aura, %application, %target, "aura applied");

        for index in (0u8..8).filter(|index| effect_mask & (1u8 << index) != 0) {
            match self.world.application_mut(application) {
                Some(app) if !app.has_remove_mode() => app.effect_mask |= 1u8 << index,
                _ => break,
            }
            self.handle_effect(application, EffectHandle::new(aura, index), HandleMode::REAL, true);
        }

        if !self.world.is_removed(application) {
            self.world.outbox_mut().push_client(ClientUpdate::AuraState {
                target,
                aura,
                application,
            });
        }
        Ok(application)
    }

    /// Removes one application from its target.
    ///
    /// Removing the owner's application of a unit aura destroys the aura.
    /// Removing an application that is already being removed is a no-op.
    pub fn remove_application(
        &mut self,
        application: ApplicationId,
        mode: RemoveMode,
    ) -> Result<(), WorldError> {
        let app = self
            .world
            .application(application)
            .ok_or(WorldError::ApplicationNotFound(application))?;
        if app.has_remove_mode() {
            return Ok(());
        }
        let (aura, target) = (app.aura, app.target);
        let indices: Vec<u8> = app.effect_indices().collect();
        let mode = if mode.is_removed() { mode } else { RemoveMode::Default };

        if let Some(app) = self.world.application_mut(application) {
            app.remove_mode = mode;
        }
        // A slot leaves the mask once its remove starts; slots already
        // unapplied by a nested amount change are skipped.
        for index in indices {
            match self.world.application_mut(application) {
                Some(app) if app.has_effect(index) => app.effect_mask &= !(1u8 << index),
                _ => continue,
            }
            self.handle_effect(application, EffectHandle::new(aura, index), HandleMode::REAL, false);
        }

        if let Some(unit) = self.world.unit_mut(target) {
            unit.detach_application(application);
        }
        if let Some(state) = self.world.aura_mut(aura) {
            state.applications.retain(|id| *id != application);
        }
        self.world.take_application(application);
        self.world.outbox_mut().push_client(ClientUpdate::AuraState {
            target,
            aura,
            application,
        });
        debug!(%aura, %application, %target, ?mode, "application removed");

        let destroys_aura = self.world.aura(aura).is_some_and(|state| {
            !state.is_removed() && state.kind() == AuraKind::Unit && state.owner() == target
        });
        if destroys_aura {
            self.remove_aura(aura, mode)?;
        }
        Ok(())
    }

    /// Removes the aura from every target and destroys it.
    pub fn remove_aura(&mut self, aura: AuraId, mode: RemoveMode) -> Result<(), WorldError> {
        let state = self.world.aura_mut(aura).ok_or(WorldError::AuraNotFound(aura))?;
        if state.removed {
            return Ok(());
        }
        state.removed = true;
        let applications = state.applications.clone();

        for application in applications {
            if self.world.application(application).is_some() {
                self.remove_application(application, mode)?;
            }
        }

        self.world.take_aura(aura);
        debug!(%aura, ?mode, "aura destroyed");
        Ok(())
    }

    /// Changes the stack count by `delta`, clamped to the spell's maximum.
    ///
    /// Every effect is recalculated and re-dispatched with `REAPPLY`. With
    /// `refresh`, the duration, periodic timers and charges are reset too.
    /// Returns true if the aura was removed because its stack reached zero.
    pub fn mod_stack_amount(
        &mut self,
        aura: AuraId,
        delta: i32,
        refresh: bool,
    ) -> Result<bool, WorldError> {
        let state = self.world.aura(aura).ok_or(WorldError::AuraNotFound(aura))?;
        let current = i32::from(state.stack_amount());
        let max_stack = i32::from(state.spell().max_stack.max(1));
        let proc_charges = state.spell().proc_charges;

        let stack = (current + delta).min(max_stack);
        if stack <= 0 {
            self.remove_aura(aura, RemoveMode::Default)?;
            return Ok(true);
        }

        let refresh = refresh && stack >= current;
        self.set_stack_amount(aura, stack as u8);

        if refresh {
            self.refresh_timers(aura, true);
            if let Some(state) = self.world.aura_mut(aura) {
                state.charges = proc_charges;
            }
        }
        Ok(false)
    }

    fn set_stack_amount(&mut self, aura: AuraId, stack_amount: u8) {
        let Some(state) = self.world.aura_mut(aura) else {
            return;
        };
        state.stack_amount = stack_amount;
        let indices: Vec<u8> = state.effects().map(AuraEffect::index).collect();

        for index in indices {
            let effect = EffectHandle::new(aura, index);
            let amount = self.calculate_amount(effect);
            self.change_amount(effect, amount, false, true);
        }
        self.notify_targets(aura);
    }

    /// Resets the duration to its maximum and recomputes periodic timers.
    ///
    /// With `DONT_RESET_PERIODIC_TIMER`, a final partial tick still pending is
    /// rolled over into the new duration instead of being discarded.
    pub fn refresh_timers(&mut self, aura: AuraId, reset_periodic_timer: bool) {
        let caster_duration_mod = self.world.aura(aura).and_then(|state| {
            let caster = state.caster().and_then(|id| self.world.unit(id))?;
            let spell = state.spell();
            (caster.is_player() && spell.max_duration > 0).then(|| {
                caster
                    .spell_mods
                    .apply(SpellModOp::Duration, spell, spell.max_duration)
                    .max(0)
            })
        });
        let Some(state) = self.world.aura_mut(aura) else {
            return;
        };

        let mut reset_periodic_timer = reset_periodic_timer;
        state.max_duration = caster_duration_mod.unwrap_or(state.spell.max_duration);
        if state
            .spell
            .has_attribute(SpellAttributes::DONT_RESET_PERIODIC_TIMER)
        {
            let min_period = state
                .effects()
                .map(AuraEffect::period)
                .filter(|period| *period > 0)
                .map(|period| period as i32)
                .fold(state.max_duration, i32::min);
            if state.duration <= min_period {
                state.max_duration += state.duration;
                reset_periodic_timer = false;
            }
        }
        state.duration = state.max_duration;
        let indices: Vec<u8> = state.effects().map(AuraEffect::index).collect();

        for index in indices {
            self.calculate_periodic(EffectHandle::new(aura, index), reset_periodic_timer, false);
        }
    }

    /// Adds `delta` proc charges. Returns true if the aura ran out of charges
    /// and was removed.
    pub fn mod_charges(&mut self, aura: AuraId, delta: i32) -> Result<bool, WorldError> {
        let state = self.world.aura_mut(aura).ok_or(WorldError::AuraNotFound(aura))?;
        if !state.using_charges {
            return Ok(false);
        }
        let charges = (i32::from(state.charges) + delta).min(i32::from(u8::MAX));
        if charges <= 0 {
            self.remove_aura(aura, RemoveMode::Expire)?;
            return Ok(true);
        }
        state.charges = charges as u8;
        self.notify_targets(aura);
        Ok(false)
    }

    /// Captures the persistent state of an aura.
    pub fn snapshot_aura(&self, aura: AuraId) -> Option<AuraSnapshot> {
        self.world.aura(aura).map(AuraSnapshot::capture)
    }

    /// Restores persisted counters and amounts onto a freshly created aura.
    ///
    /// Tick accounting is rebuilt from the elapsed duration, so the restored
    /// effect fires the same remaining ticks an uninterrupted one would.
    pub fn restore_aura(&mut self, aura: AuraId, snapshot: &AuraSnapshot) -> Result<(), WorldError> {
        let state = self.world.aura_mut(aura).ok_or(WorldError::AuraNotFound(aura))?;
        if state.spell.id != snapshot.spell {
            warn!(%aura, expected = %state.spell.id, found = %snapshot.spell, "snapshot spell mismatch");
        }
        state.max_duration = snapshot.max_duration;
        state.duration = snapshot.duration;
        state.charges = snapshot.charges;
        state.using_charges = snapshot.charges != 0;
        state.stack_amount = snapshot.stack_amount.max(1);

        let mut indices = Vec::new();
        for slot in state.effects.iter_mut() {
            if let Some(saved) = snapshot.effect(slot.index) {
                slot.amount = saved.amount;
                slot.base_amount = saved.base_amount;
                slot.can_be_recalculated = saved.can_be_recalculated;
            }
            indices.push(slot.index);
        }

        for index in indices {
            let effect = EffectHandle::new(aura, index);
            self.calculate_periodic(effect, false, true);
            self.calculate_spell_mod(effect);
            self.recalculate_amount(effect);
        }
        debug!(%aura, duration = snapshot.duration, "aura restored");
        Ok(())
    }

    /// Re-sends the client-visible state of every effect on `target`.
    pub fn send_for_client(&mut self, target: UnitId) {
        for (application, effect) in self.effects_in_force(target) {
            self.handle_effect(application, effect, HandleMode::SEND_FOR_CLIENT, true);
        }
    }

    /// Re-applies stat contributions of every effect on `target`.
    pub fn reapply_stat_effects(&mut self, target: UnitId) {
        self.reapply_pass(target, HandleMode::STAT);
    }

    /// Re-applies skill contributions of every effect on `target`.
    pub fn reapply_skill_effects(&mut self, target: UnitId) {
        self.reapply_pass(target, HandleMode::SKILL);
    }

    fn reapply_pass(&mut self, target: UnitId, mode: HandleMode) {
        let effects = self.effects_in_force(target);
        for &(application, effect) in &effects {
            self.handle_effect(application, effect, mode, false);
        }
        for &(application, effect) in &effects {
            if !self.world.is_removed(application) {
                self.handle_effect(application, effect, mode, true);
            }
        }
    }

    /// Snapshot of every (application, effect) pair in force on `target`.
    fn effects_in_force(&self, target: UnitId) -> Vec<(ApplicationId, EffectHandle)> {
        self.world
            .unit_applications(target)
            .into_iter()
            .filter_map(|id| self.world.application(id))
            .filter(|app| !app.has_remove_mode())
            .flat_map(|app| {
                app.effect_indices()
                    .map(move |index| (app.id, EffectHandle::new(app.aura, index)))
            })
            .collect()
    }

    fn notify_targets(&mut self, aura: AuraId) {
        let updates: Vec<ClientUpdate> = self
            .world
            .aura(aura)
            .map(|state| {
                state
                    .applications()
                    .iter()
                    .filter_map(|id| self.world.application(*id))
                    .map(|app| ClientUpdate::AuraState {
                        target: app.target,
                        aura,
                        application: app.id,
                    })
                    .collect()
            })
            .unwrap_or_default();
        for update in updates {
            self.world.outbox_mut().push_client(update);
        }
    }
}
