//! Per-slot effect state.
//!
//! An [`AuraEffect`] is owned by exactly one aura and addressed from outside
//! through an [`EffectHandle`](crate::state::EffectHandle). The engine drives
//! all mutation; the public surface is read-only.
mod snapshot;

pub use snapshot::{AuraSnapshot, EffectSnapshot};
#[cfg(feature = "serde")]
pub use snapshot::SnapshotError;

use crate::spell::{AuraType, SpellEffectInfo, SpellModifier};

#[derive(Clone, Debug, PartialEq)]
pub struct AuraEffect {
    pub(crate) index: u8,
    pub(crate) aura_type: AuraType,
    pub(crate) misc_value: i32,
    pub(crate) misc_value_b: i32,
    pub(crate) base_amount: i32,
    pub(crate) amount: i32,
    /// Bonus-adjusted amount shown before the effect really ticks.
    pub(crate) estimated_amount: Option<i32>,
    pub(crate) can_be_recalculated: bool,
    pub(crate) is_periodic: bool,
    pub(crate) period: u32,
    pub(crate) ticks_done: u32,
    pub(crate) periodic_timer: u32,
    pub(crate) spell_mod: Option<SpellModifier>,
}

impl AuraEffect {
    pub(crate) fn new(index: u8, info: &SpellEffectInfo, base_amount: Option<i32>) -> Self {
        let base_amount = base_amount.unwrap_or(info.base_points);
        Self {
            index,
            aura_type: info.aura_type,
            misc_value: info.misc_value,
            misc_value_b: info.misc_value_b,
            base_amount,
            amount: base_amount,
            estimated_amount: None,
            can_be_recalculated: true,
            is_periodic: false,
            period: 0,
            ticks_done: 0,
            periodic_timer: 0,
            spell_mod: None,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn aura_type(&self) -> AuraType {
        self.aura_type
    }

    pub fn misc_value(&self) -> i32 {
        self.misc_value
    }

    pub fn misc_value_b(&self) -> i32 {
        self.misc_value_b
    }

    pub fn base_amount(&self) -> i32 {
        self.base_amount
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn estimated_amount(&self) -> Option<i32> {
        self.estimated_amount
    }

    pub fn can_be_recalculated(&self) -> bool {
        self.can_be_recalculated
    }

    pub fn is_periodic(&self) -> bool {
        self.is_periodic
    }

    /// Tick interval in milliseconds.
    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn ticks_done(&self) -> u32 {
        self.ticks_done
    }

    /// Milliseconds accumulated towards the next tick.
    pub fn periodic_timer(&self) -> u32 {
        self.periodic_timer
    }

    pub fn spell_mod(&self) -> Option<&SpellModifier> {
        self.spell_mod.as_ref()
    }

    /// Number of ticks the effect performs over `max_duration`.
    ///
    /// Zero for permanent auras and non-ticking effects, which are unbounded.
    pub fn total_ticks(&self, max_duration: i32, extra_initial_period: bool) -> u32 {
        if self.period == 0 || max_duration < 0 {
            return 0;
        }
        let ticks = max_duration.unsigned_abs() / self.period;
        if extra_initial_period { ticks + 1 } else { ticks }
    }

    /// Ticks left before the effect reaches its total.
    pub fn remaining_ticks(&self, max_duration: i32, extra_initial_period: bool) -> u32 {
        self.total_ticks(max_duration, extra_initial_period)
            .saturating_sub(self.ticks_done)
    }
}
