//! Static spell definitions consumed by the aura engine.
//!
//! A [`SpellInfo`] is immutable content: the engine reads it through an
//! `Arc` so auras can keep their definition alive independently of the
//! catalog that produced it.

mod aura_type;
mod modifier;

pub use aura_type::AuraType;
pub use modifier::{
    ModifierKind, SpellModOp, SpellModScope, SpellModifier, SpellModifierSet,
};

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::EngineConfig;
use crate::state::SpellId;

bitflags! {
    /// Spell-level attributes that change how the engine treats its effects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpellAttributes: u32 {
        /// Always-on aura (talents, racials).
        const PASSIVE                   = 1 << 0;
        /// Channeled spell; haste shortens its tick period.
        const CHANNELED                 = 1 << 1;
        /// Caster haste scales the tick period of non-channeled spells.
        const HASTE_AFFECTS_PERIODIC    = 1 << 2;
        /// First tick fires on the next update after apply.
        const EXTRA_INITIAL_PERIOD      = 1 << 3;
        /// Reapplication folds the unticked remainder of earlier instances in.
        const ROLLING_PERIODIC          = 1 << 4;
        /// Effect points come from the caster's mastery rating.
        const MASTERY_AFFECTS_POINTS    = 1 << 5;
        /// Spell is able to critically strike.
        const CAN_CRIT                  = 1 << 6;
        /// Refresh keeps the running tick when only one tick remains.
        const DONT_RESET_PERIODIC_TIMER = 1 << 7;
        /// When triggered by a proc, the original aura caster casts it.
        const NEEDS_ORIGINAL_CASTER     = 1 << 8;
        /// Spell grants extra melee attacks.
        const ADD_EXTRA_ATTACKS         = 1 << 9;
    }
}

bitflags! {
    /// Per-effect attributes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EffectAttributes: u8 {
        /// Amount is not multiplied by the aura's stack count.
        const NO_SCALE_WITH_STACK = 1 << 0;
    }
}

bitflags! {
    /// Magic school bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SchoolMask: u8 {
        const PHYSICAL = 1 << 0;
        const HOLY     = 1 << 1;
        const FIRE     = 1 << 2;
        const NATURE   = 1 << 3;
        const FROST    = 1 << 4;
        const SHADOW   = 1 << 5;
        const ARCANE   = 1 << 6;
    }
}

bitflags! {
    /// Combat event categories an aura reacts to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProcFlags: u32 {
        const DEAL_MELEE_HIT       = 1 << 0;
        const TAKE_MELEE_HIT       = 1 << 1;
        const DEAL_SPELL_DAMAGE    = 1 << 2;
        const TAKE_SPELL_DAMAGE    = 1 << 3;
        const DEAL_PERIODIC        = 1 << 4;
        const TAKE_PERIODIC        = 1 << 5;
        const DEAL_HELPFUL_SPELL   = 1 << 6;
        const TAKE_HELPFUL_SPELL   = 1 << 7;
        const TAKE_ANY_DAMAGE      = 1 << 8;
        const CAST_SPELL           = 1 << 9;
    }
}

/// One effect slot of a spell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellEffectInfo {
    pub aura_type: AuraType,
    /// Opaque per-type parameter (stat index, modifier op, mechanic, form id).
    pub misc_value: i32,
    /// Second opaque parameter (mount type, spell label).
    pub misc_value_b: i32,
    pub base_points: i32,
    /// Extra points per caster level.
    pub points_per_level: f32,
    /// Tick interval in milliseconds; zero for non-periodic effects.
    pub amplitude: u32,
    /// Mastery coefficient used with `MASTERY_AFFECTS_POINTS`.
    pub bonus_coefficient: f32,
    pub trigger_spell: Option<SpellId>,
    /// Family mask selecting spells affected by a class-mask modifier.
    pub class_mask: u64,
    pub attributes: EffectAttributes,
}

impl SpellEffectInfo {
    pub fn new(aura_type: AuraType) -> Self {
        Self {
            aura_type,
            misc_value: 0,
            misc_value_b: 0,
            base_points: 0,
            points_per_level: 0.0,
            amplitude: 0,
            bonus_coefficient: 0.0,
            trigger_spell: None,
            class_mask: 0,
            attributes: EffectAttributes::empty(),
        }
    }

    pub fn with_base_points(mut self, points: i32) -> Self {
        self.base_points = points;
        self
    }

    pub fn with_amplitude(mut self, amplitude: u32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_misc(mut self, misc_value: i32, misc_value_b: i32) -> Self {
        self.misc_value = misc_value;
        self.misc_value_b = misc_value_b;
        self
    }

    pub fn with_points_per_level(mut self, points: f32) -> Self {
        self.points_per_level = points;
        self
    }

    pub fn with_bonus_coefficient(mut self, coefficient: f32) -> Self {
        self.bonus_coefficient = coefficient;
        self
    }

    pub fn with_trigger_spell(mut self, spell: SpellId) -> Self {
        self.trigger_spell = Some(spell);
        self
    }

    pub fn with_class_mask(mut self, mask: u64) -> Self {
        self.class_mask = mask;
        self
    }

    pub fn with_attributes(mut self, attributes: EffectAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Evaluates the declared base value for a caster of the given level.
    pub fn calc_value(&self, base_amount: i32, caster_level: Option<u8>) -> i32 {
        match caster_level {
            Some(level) if self.points_per_level != 0.0 => {
                base_amount + (self.points_per_level * f32::from(level)) as i32
            }
            _ => base_amount,
        }
    }
}

impl Default for SpellEffectInfo {
    fn default() -> Self {
        Self::new(AuraType::Dummy)
    }
}

/// Immutable definition of a spell that creates an aura.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellInfo {
    pub id: SpellId,
    pub attributes: SpellAttributes,
    pub school: SchoolMask,
    /// Family flags matched against class-mask spell modifiers.
    pub family_flags: u64,
    /// Labels matched against label-scoped spell modifiers.
    pub labels: Vec<u32>,
    /// Union of every effect's mechanic bit.
    pub mechanic_mask: u64,
    /// Aura duration in milliseconds; `-1` means permanent.
    pub max_duration: i32,
    pub max_stack: u8,
    /// Proc charges; non-zero switches the aura to the charges model.
    pub proc_charges: u8,
    pub proc_flags: ProcFlags,
    pub effects: ArrayVec<SpellEffectInfo, { EngineConfig::MAX_EFFECTS }>,
}

impl SpellInfo {
    pub const PERMANENT: i32 = -1;

    pub fn new(id: SpellId) -> Self {
        Self {
            id,
            attributes: SpellAttributes::empty(),
            school: SchoolMask::PHYSICAL,
            family_flags: 0,
            labels: Vec::new(),
            mechanic_mask: 0,
            max_duration: 0,
            max_stack: 1,
            proc_charges: 0,
            proc_flags: ProcFlags::empty(),
            effects: ArrayVec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: SpellAttributes) -> Self {
        self.attributes |= attributes;
        self
    }

    pub fn with_school(mut self, school: SchoolMask) -> Self {
        self.school = school;
        self
    }

    pub fn with_family_flags(mut self, flags: u64) -> Self {
        self.family_flags = flags;
        self
    }

    pub fn with_label(mut self, label: u32) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_mechanic_mask(mut self, mask: u64) -> Self {
        self.mechanic_mask = mask;
        self
    }

    pub fn with_duration(mut self, max_duration: i32) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_max_stack(mut self, max_stack: u8) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn with_proc(mut self, flags: ProcFlags, charges: u8) -> Self {
        self.proc_flags = flags;
        self.proc_charges = charges;
        self
    }

    /// Appends an effect slot. Slots beyond [`EngineConfig::MAX_EFFECTS`] are dropped.
    pub fn with_effect(mut self, effect: SpellEffectInfo) -> Self {
        if self.effects.try_push(effect).is_err() {
            tracing::warn!(spell = %self.id, "spell declares more effect slots than supported");
        }
        self
    }

    pub fn has_attribute(&self, attribute: SpellAttributes) -> bool {
        self.attributes.contains(attribute)
    }

    pub fn is_passive(&self) -> bool {
        self.has_attribute(SpellAttributes::PASSIVE)
    }

    pub fn is_channeled(&self) -> bool {
        self.has_attribute(SpellAttributes::CHANNELED)
    }

    pub fn effect(&self, index: u8) -> Option<&SpellEffectInfo> {
        self.effects.get(usize::from(index))
    }

    /// Returns true if the given modifier applies to casts of this spell.
    pub fn is_affected_by(&self, modifier: &SpellModifier) -> bool {
        match modifier.scope {
            SpellModScope::FamilyMask(mask) => self.family_flags & mask != 0,
            SpellModScope::Label(label) => self.labels.contains(&label),
        }
    }
}

impl Default for SpellInfo {
    fn default() -> Self {
        Self::new(SpellId(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AuraId, EffectHandle};

    fn modifier(scope: SpellModScope) -> SpellModifier {
        SpellModifier {
            op: SpellModOp::Points,
            kind: ModifierKind::Flat,
            value: 5,
            scope,
            spell: SpellId(1),
            owner: EffectHandle::new(AuraId(1), 0),
        }
    }

    #[test]
    fn family_mask_and_label_scopes() {
        let spell = SpellInfo::new(SpellId(10))
            .with_family_flags(0b0100)
            .with_label(77);

        assert!(spell.is_affected_by(&modifier(SpellModScope::FamilyMask(0b0110))));
        assert!(!spell.is_affected_by(&modifier(SpellModScope::FamilyMask(0b0001))));
        assert!(spell.is_affected_by(&modifier(SpellModScope::Label(77))));
        assert!(!spell.is_affected_by(&modifier(SpellModScope::Label(78))));
    }

    #[test]
    fn extra_effect_slots_are_dropped() {
        let spell = (0..5).fold(SpellInfo::new(SpellId(2)), |spell, _| {
            spell.with_effect(SpellEffectInfo::new(AuraType::Dummy))
        });
        assert_eq!(spell.effects.len(), EngineConfig::MAX_EFFECTS);
    }

    #[test]
    fn calc_value_scales_with_level() {
        let info = SpellEffectInfo::new(AuraType::PeriodicDamage)
            .with_base_points(100)
            .with_points_per_level(2.0);
        assert_eq!(info.calc_value(100, Some(10)), 120);
        assert_eq!(info.calc_value(100, None), 100);
    }
}
