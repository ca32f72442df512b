//! Damage and healing formulas owned by the combat layer.

use crate::spell::SpellInfo;
use crate::state::Unit;

/// Whether damage comes from a periodic tick or a direct hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Periodic,
    Direct,
}

/// Final split of a damage amount after absorbs and resists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    /// Damage actually dealt to the victim.
    pub damage: u32,
    pub absorbed: u32,
    pub resisted: u32,
}

impl DamageBreakdown {
    pub fn unmitigated(damage: u32) -> Self {
        Self {
            damage,
            absorbed: 0,
            resisted: 0,
        }
    }
}

/// Bonus and mitigation formulas.
///
/// The engine supplies raw amounts; implementations apply spell power, crit,
/// versatility, armor or whatever else the ruleset defines.
pub trait CombatOracle: Send + Sync {
    fn damage_bonus_done(
        &self,
        caster: &Unit,
        victim: &Unit,
        spell: &SpellInfo,
        amount: i32,
        kind: DamageKind,
        stacks: u8,
    ) -> i32;

    fn damage_bonus_taken(
        &self,
        caster: Option<&Unit>,
        victim: &Unit,
        spell: &SpellInfo,
        amount: i32,
        kind: DamageKind,
    ) -> i32;

    fn healing_bonus_done(
        &self,
        caster: &Unit,
        victim: &Unit,
        spell: &SpellInfo,
        amount: i32,
        kind: DamageKind,
        stacks: u8,
    ) -> i32;

    fn healing_bonus_taken(
        &self,
        caster: Option<&Unit>,
        victim: &Unit,
        spell: &SpellInfo,
        amount: i32,
        kind: DamageKind,
    ) -> i32;

    /// Splits final damage into dealt, absorbed and resisted parts.
    fn resolve_damage(&self, victim: &Unit, spell: &SpellInfo, damage: u32) -> DamageBreakdown;
}

/// Identity formulas: every bonus returns its input and nothing is mitigated.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralCombat;

impl CombatOracle for NeutralCombat {
    fn damage_bonus_done(
        &self,
        _caster: &Unit,
        _victim: &Unit,
        _spell: &SpellInfo,
        amount: i32,
        _kind: DamageKind,
        _stacks: u8,
    ) -> i32 {
        amount
    }

    fn damage_bonus_taken(
        &self,
        _caster: Option<&Unit>,
        _victim: &Unit,
        _spell: &SpellInfo,
        amount: i32,
        _kind: DamageKind,
    ) -> i32 {
        amount
    }

    fn healing_bonus_done(
        &self,
        _caster: &Unit,
        _victim: &Unit,
        _spell: &SpellInfo,
        amount: i32,
        _kind: DamageKind,
        _stacks: u8,
    ) -> i32 {
        amount
    }

    fn healing_bonus_taken(
        &self,
        _caster: Option<&Unit>,
        _victim: &Unit,
        _spell: &SpellInfo,
        amount: i32,
        _kind: DamageKind,
    ) -> i32 {
        amount
    }

    fn resolve_damage(&self, _victim: &Unit, _spell: &SpellInfo, damage: u32) -> DamageBreakdown {
        DamageBreakdown::unmitigated(damage)
    }
}
