//! Units auras are cast by and applied to.
//!
//! A unit carries the few attributes the engine reads (health, mastery,
//! haste, difficulty) plus the registries the engine mutates while
//! dispatching: the effect index keyed by aura type, the list of applied
//! auras and the spell modifier set.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::spell::{AuraType, SpellModifierSet};

use super::{ApplicationId, EffectHandle, SpellId, UnitId};

/// Integer resource meter (health, power) tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Returns `pct` percent of the maximum.
    pub fn pct_of_max(&self, pct: u32) -> u32 {
        (u64::from(self.maximum) * u64::from(pct) / 100) as u32
    }

    pub fn drain(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.maximum);
    }

    /// Shifts the maximum by `delta`, keeping current within bounds.
    pub fn shift_maximum(&mut self, delta: i32) {
        self.maximum = self.maximum.saturating_add_signed(delta);
        self.current = self.current.min(self.maximum);
    }
}

/// Whether a unit is a primary actor (player) or a simulated creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitKind {
    Player,
    #[default]
    Creature,
}

bitflags! {
    /// Control states toggled by crowd-control handlers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitState: u8 {
        const STUNNED     = 1 << 0;
        const ROOTED      = 1 << 1;
        const FLEEING     = 1 << 2;
        const CONFUSED    = 1 << 3;
        const TRANSFORMED = 1 << 4;
    }
}

bitflags! {
    /// Static unit properties consulted by handlers and tick bodies.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u8 {
        /// Cannot be affected by anything outside its own phase.
        const ISOLATED         = 1 << 0;
        const DAMAGE_IMMUNE    = 1 << 1;
        const CANNOT_SHAPESHIFT = 1 << 2;
    }
}

/// Primary stats modified by `ModStat` effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Stat {
    Strength = 0,
    Agility = 1,
    Stamina = 2,
    Intellect = 3,
}

impl Stat {
    pub const COUNT: usize = 4;
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub level: u8,
    pub health: ResourceMeter,
    pub power: ResourceMeter,
    /// Mastery rating consumed by mastery-scaled effects.
    pub mastery: f32,
    /// Cast speed multiplier in percent (100 = unhasted, 80 = 20% faster).
    pub cast_speed_pct: u32,
    /// Difficulty tier of the map the unit is in.
    pub difficulty: u32,
    pub state: UnitState,
    pub flags: UnitFlags,
    pub stat_bonus: [i32; Stat::COUNT],
    pub skill_bonus: BTreeMap<u32, i32>,
    pub shapeshift_form: Option<i32>,
    pub mount_display: Option<u32>,
    pub last_extra_attack_spell: Option<SpellId>,
    pub spell_mods: SpellModifierSet,
    effects: BTreeMap<AuraType, Vec<EffectHandle>>,
    applied: Vec<ApplicationId>,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, health: u32) -> Self {
        Self {
            id,
            kind,
            level: 1,
            health: ResourceMeter::full(health),
            cast_speed_pct: 100,
            ..Self::default()
        }
    }

    pub fn player(id: UnitId, health: u32) -> Self {
        Self::new(id, UnitKind::Player, health)
    }

    pub fn creature(id: UnitId, health: u32) -> Self {
        Self::new(id, UnitKind::Creature, health)
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_power(mut self, maximum: u32) -> Self {
        self.power = ResourceMeter::full(maximum);
        self
    }

    pub fn with_mastery(mut self, mastery: f32) -> Self {
        self.mastery = mastery;
        self
    }

    pub fn with_cast_speed_pct(mut self, pct: u32) -> Self {
        self.cast_speed_pct = pct;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_flags(mut self, flags: UnitFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns true for primary actors, the only units that own spell modifiers.
    pub fn is_player(&self) -> bool {
        self.kind == UnitKind::Player
    }

    pub fn is_alive(&self) -> bool {
        self.health.current > 0
    }

    pub fn is_isolated(&self) -> bool {
        self.flags.contains(UnitFlags::ISOLATED)
    }

    pub fn is_damage_immune(&self) -> bool {
        self.flags.contains(UnitFlags::DAMAGE_IMMUNE)
    }

    // ===== effect registry =====

    /// Adds or removes an effect from the index keyed by aura type.
    pub fn register_effect(&mut self, aura_type: AuraType, effect: EffectHandle, adding: bool) {
        if adding {
            let list = self.effects.entry(aura_type).or_default();
            if !list.contains(&effect) {
                list.push(effect);
            }
        } else if let Some(list) = self.effects.get_mut(&aura_type) {
            list.retain(|registered| *registered != effect);
            if list.is_empty() {
                self.effects.remove(&aura_type);
            }
        }
    }

    pub fn has_aura_type(&self, aura_type: AuraType) -> bool {
        self.effects
            .get(&aura_type)
            .is_some_and(|list| !list.is_empty())
    }

    pub fn effects_by_type(&self, aura_type: AuraType) -> &[EffectHandle] {
        self.effects
            .get(&aura_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ===== applied auras =====

    pub fn applied_auras(&self) -> &[ApplicationId] {
        &self.applied
    }

    pub(crate) fn attach_application(&mut self, application: ApplicationId) {
        if !self.applied.contains(&application) {
            self.applied.push(application);
        }
    }

    pub(crate) fn detach_application(&mut self, application: ApplicationId) {
        self.applied.retain(|id| *id != application);
    }

    // ===== stat accumulators =====

    pub fn stat(&self, stat: Stat) -> i32 {
        self.stat_bonus[stat as usize]
    }

    pub fn modify_stat(&mut self, stat: Stat, delta: i32) {
        self.stat_bonus[stat as usize] += delta;
    }

    pub fn skill(&self, skill: u32) -> i32 {
        self.skill_bonus.get(&skill).copied().unwrap_or(0)
    }

    pub fn modify_skill(&mut self, skill: u32, delta: i32) {
        let entry = self.skill_bonus.entry(skill).or_insert(0);
        *entry += delta;
        if *entry == 0 {
            self.skill_bonus.remove(&skill);
        }
    }
}
