//! Arena owning every unit, aura and application.
//!
//! Entities reference each other by handle only. Iteration helpers return
//! owned snapshots (`Vec` of handles) so callers can mutate the arena while
//! walking them.

use std::collections::BTreeMap;

use crate::effect::AuraEffect;

use super::{
    ApplicationId, Aura, AuraApplication, AuraId, EffectHandle, Outbox, Unit, UnitId,
};

#[derive(Debug, Default)]
pub struct AuraWorld {
    units: BTreeMap<UnitId, Unit>,
    auras: BTreeMap<AuraId, Aura>,
    applications: BTreeMap<ApplicationId, AuraApplication>,
    next_aura: u32,
    next_application: u32,
    outbox: Outbox,
}

impl AuraWorld {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== units =====

    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        let id = unit.id;
        self.units.insert(id, unit);
        id
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    // ===== auras & effects =====

    pub(crate) fn insert_aura(&mut self, build: impl FnOnce(AuraId) -> Aura) -> AuraId {
        self.next_aura += 1;
        let id = AuraId(self.next_aura);
        self.auras.insert(id, build(id));
        id
    }

    pub(crate) fn take_aura(&mut self, id: AuraId) -> Option<Aura> {
        self.auras.remove(&id)
    }

    pub fn aura(&self, id: AuraId) -> Option<&Aura> {
        self.auras.get(&id)
    }

    pub(crate) fn aura_mut(&mut self, id: AuraId) -> Option<&mut Aura> {
        self.auras.get_mut(&id)
    }

    /// Snapshot of every live aura id, in creation order.
    pub fn aura_ids(&self) -> Vec<AuraId> {
        self.auras.keys().copied().collect()
    }

    pub fn effect(&self, handle: EffectHandle) -> Option<&AuraEffect> {
        self.aura(handle.aura)?.effect(handle.index)
    }

    pub(crate) fn effect_mut(&mut self, handle: EffectHandle) -> Option<&mut AuraEffect> {
        self.aura_mut(handle.aura)?.effect_mut(handle.index)
    }

    // ===== applications =====

    pub(crate) fn insert_application(
        &mut self,
        aura: AuraId,
        target: UnitId,
        effect_mask: u8,
    ) -> ApplicationId {
        self.next_application += 1;
        let id = ApplicationId(self.next_application);
        self.applications
            .insert(id, AuraApplication::new(id, aura, target, effect_mask));
        id
    }

    pub(crate) fn take_application(&mut self, id: ApplicationId) -> Option<AuraApplication> {
        self.applications.remove(&id)
    }

    pub fn application(&self, id: ApplicationId) -> Option<&AuraApplication> {
        self.applications.get(&id)
    }

    pub(crate) fn application_mut(&mut self, id: ApplicationId) -> Option<&mut AuraApplication> {
        self.applications.get_mut(&id)
    }

    /// Returns true once an application left its target (or no longer exists).
    pub fn is_removed(&self, id: ApplicationId) -> bool {
        self.applications
            .get(&id)
            .is_none_or(AuraApplication::has_remove_mode)
    }

    /// Application of `aura` on `target`, if any.
    pub fn application_for(&self, aura: AuraId, target: UnitId) -> Option<ApplicationId> {
        self.aura(aura)?
            .applications
            .iter()
            .copied()
            .find(|id| self.application(*id).is_some_and(|app| app.target == target))
    }

    /// Snapshot of every application in which the effect is in force.
    pub fn effect_applications(&self, handle: EffectHandle) -> Vec<ApplicationId> {
        let Some(aura) = self.aura(handle.aura) else {
            return Vec::new();
        };
        aura.applications
            .iter()
            .copied()
            .filter(|id| {
                self.application(*id)
                    .is_some_and(|app| app.has_effect(handle.index))
            })
            .collect()
    }

    /// Snapshot of a unit's applied auras.
    pub fn unit_applications(&self, unit: UnitId) -> Vec<ApplicationId> {
        self.unit(unit)
            .map(|unit| unit.applied_auras().to_vec())
            .unwrap_or_default()
    }

    /// Adds or removes an effect from the target's effect index.
    pub(crate) fn register_effect(&mut self, target: UnitId, handle: EffectHandle, adding: bool) {
        let Some(aura_type) = self.effect(handle).map(AuraEffect::aura_type) else {
            return;
        };
        if let Some(unit) = self.unit_mut(target) {
            unit.register_effect(aura_type, handle, adding);
        }
    }

    // ===== outbox =====

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }
}
