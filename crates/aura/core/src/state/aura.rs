//! Aura containers.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::effect::AuraEffect;
use crate::script::AuraScript;
use crate::spell::{SpellAttributes, SpellInfo};

use super::{ApplicationId, AuraId, UnitId};

/// Whether an aura targets its owner only or spreads to many targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuraKind {
    /// Applied to its owning unit only.
    #[default]
    Unit,
    /// Area aura; the same effects are applied to several targets.
    Area,
}

/// A group of effects sharing one duration, stack count and script list.
pub struct Aura {
    pub(crate) id: AuraId,
    pub(crate) spell: Arc<SpellInfo>,
    pub(crate) caster: Option<UnitId>,
    pub(crate) owner: UnitId,
    pub(crate) kind: AuraKind,
    pub(crate) duration: i32,
    pub(crate) max_duration: i32,
    pub(crate) stack_amount: u8,
    pub(crate) charges: u8,
    pub(crate) using_charges: bool,
    pub(crate) effects: ArrayVec<AuraEffect, { EngineConfig::MAX_EFFECTS }>,
    pub(crate) applications: Vec<ApplicationId>,
    pub(crate) scripts: Vec<Arc<dyn AuraScript>>,
    pub(crate) removed: bool,
}

impl Aura {
    pub fn id(&self) -> AuraId {
        self.id
    }

    pub fn spell(&self) -> &Arc<SpellInfo> {
        &self.spell
    }

    pub fn caster(&self) -> Option<UnitId> {
        self.caster
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    pub fn kind(&self) -> AuraKind {
        self.kind
    }

    /// Remaining duration in milliseconds; `-1` for permanent auras.
    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn max_duration(&self) -> i32 {
        self.max_duration
    }

    pub fn stack_amount(&self) -> u8 {
        self.stack_amount
    }

    pub fn charges(&self) -> u8 {
        self.charges
    }

    /// Auras created with proc charges follow the charges stacking model.
    pub fn is_using_charges(&self) -> bool {
        self.using_charges
    }

    pub fn is_permanent(&self) -> bool {
        self.max_duration == SpellInfo::PERMANENT
    }

    pub fn is_passive(&self) -> bool {
        self.spell.is_passive()
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0 && !self.is_permanent()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn effects(&self) -> impl Iterator<Item = &AuraEffect> {
        self.effects.iter()
    }

    pub fn effect(&self, index: u8) -> Option<&AuraEffect> {
        self.effects.iter().find(|effect| effect.index() == index)
    }

    pub(crate) fn effect_mut(&mut self, index: u8) -> Option<&mut AuraEffect> {
        self.effects.iter_mut().find(|effect| effect.index() == index)
    }

    /// Bitmask of all effect slots this aura carries.
    pub fn effect_mask(&self) -> u8 {
        self.effects
            .iter()
            .fold(0u8, |mask, effect| mask | (1u8 << effect.index()))
    }

    /// Total ticks of the effect in slot `index` over the aura's duration.
    pub fn total_ticks(&self, index: u8) -> u32 {
        self.effect(index).map_or(0, |effect| {
            effect.total_ticks(self.max_duration, self.extra_initial_period())
        })
    }

    pub fn remaining_ticks(&self, index: u8) -> u32 {
        self.effect(index).map_or(0, |effect| {
            effect.remaining_ticks(self.max_duration, self.extra_initial_period())
        })
    }

    pub(crate) fn extra_initial_period(&self) -> bool {
        self.spell.has_attribute(SpellAttributes::EXTRA_INITIAL_PERIOD)
    }

    pub fn applications(&self) -> &[ApplicationId] {
        &self.applications
    }

    pub(crate) fn scripts(&self) -> Vec<Arc<dyn AuraScript>> {
        self.scripts.clone()
    }

    /// Counts the remaining duration down by `diff` milliseconds.
    pub(crate) fn tick_duration(&mut self, diff: u32) {
        if self.duration > 0 {
            let diff = i32::try_from(diff).unwrap_or(i32::MAX);
            self.duration = self.duration.saturating_sub(diff).max(0);
        }
    }
}

impl core::fmt::Debug for Aura {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Aura")
            .field("id", &self.id)
            .field("spell", &self.spell.id)
            .field("caster", &self.caster)
            .field("owner", &self.owner)
            .field("duration", &self.duration)
            .field("max_duration", &self.max_duration)
            .field("stack_amount", &self.stack_amount)
            .field("charges", &self.charges)
            .field("effects", &self.effects)
            .field("applications", &self.applications)
            .field("scripts", &self.scripts.len())
            .finish()
    }
}
