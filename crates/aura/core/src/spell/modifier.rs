//! Spell modifiers contributed by aura effects to their caster.
//!
//! A modifier is a flat or percentage bonus that the owning unit applies to
//! its own casts of matching spells. The application order mirrors the stat
//! bonus stack: flat bonuses are summed first, then percentage bonuses are
//! applied sequentially.

use crate::state::{EffectHandle, SpellId};

/// Spell property a modifier changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::FromRepr, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SpellModOp {
    /// Points of every effect.
    Points = 0,
    Duration = 1,
    CritChance = 2,
    CastingTime = 3,
    Cost = 4,
    /// Tick period of periodic effects.
    Period = 5,
    PointsIndex0 = 6,
    PointsIndex1 = 7,
    PointsIndex2 = 8,
}

impl SpellModOp {
    /// Resolves the op encoded in an effect's misc value.
    pub fn from_misc_value(value: i32) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::from_repr)
    }

    /// Per-slot points op for effect `index`.
    pub const fn points_for_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::PointsIndex0),
            1 => Some(Self::PointsIndex1),
            2 => Some(Self::PointsIndex2),
            _ => None,
        }
    }

    /// Bitmask of effect slots whose amount depends on this op.
    ///
    /// Passive auras with matching effects are recalculated whenever a
    /// modifier with this op is added to or removed from their caster.
    pub const fn recalculate_effect_mask(self) -> u8 {
        match self {
            Self::Points => 0b111,
            Self::PointsIndex0 => 0b001,
            Self::PointsIndex1 => 0b010,
            Self::PointsIndex2 => 0b100,
            _ => 0,
        }
    }
}

/// How a modifier's value combines with the base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Added to the base value.
    Flat,
    /// Percentage multiplier (20 = ×1.2, -20 = ×0.8), applied sequentially.
    Pct,
}

/// Which spells a modifier affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellModScope {
    FamilyMask(u64),
    Label(u32),
}

/// A modifier owned by exactly one aura effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellModifier {
    pub op: SpellModOp,
    pub kind: ModifierKind,
    pub value: i32,
    pub scope: SpellModScope,
    /// Spell of the aura that owns this modifier.
    pub spell: SpellId,
    pub owner: EffectHandle,
}

/// The set of modifiers currently pushed onto a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellModifierSet {
    modifiers: Vec<SpellModifier>,
}

impl SpellModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a modifier, replacing any previous one from the same owner.
    pub fn add(&mut self, modifier: SpellModifier) {
        self.remove(modifier.owner);
        self.modifiers.push(modifier);
    }

    /// Removes the modifier owned by the given effect.
    pub fn remove(&mut self, owner: EffectHandle) -> Option<SpellModifier> {
        let position = self.modifiers.iter().position(|m| m.owner == owner)?;
        Some(self.modifiers.remove(position))
    }

    pub fn get(&self, owner: EffectHandle) -> Option<&SpellModifier> {
        self.modifiers.iter().find(|m| m.owner == owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellModifier> {
        self.modifiers.iter()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Applies every matching modifier for `op` to `base`.
    ///
    /// ```text
    /// result = (base + flat_sum) × (1 + pct₁/100) × (1 + pct₂/100) …
    /// ```
    pub fn apply(&self, op: SpellModOp, spell: &super::SpellInfo, base: i32) -> i32 {
        let matching = || {
            self.modifiers
                .iter()
                .filter(move |m| m.op == op && spell.is_affected_by(m))
        };

        let flat_sum: i64 = matching()
            .filter(|m| m.kind == ModifierKind::Flat)
            .map(|m| i64::from(m.value))
            .sum();

        let result = matching()
            .filter(|m| m.kind == ModifierKind::Pct)
            .fold(i64::from(base) + flat_sum, |acc, m| {
                acc * (100 + i64::from(m.value)) / 100
            });

        result.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}
