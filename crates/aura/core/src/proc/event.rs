//! Combat event descriptors consumed by the proc gate.

use std::sync::Arc;

use crate::spell::{ProcFlags, SchoolMask, SpellInfo};
use crate::state::UnitId;

/// Damage carried by a combat event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageInfo {
    pub damage: u32,
    pub school: SchoolMask,
}

/// Power cost component of the spell that caused the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerCost {
    pub amount: i32,
}

/// The cast (not the spell definition) behind an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcSpell {
    /// Cast time in milliseconds; zero for instant casts.
    pub cast_time: u32,
    pub power_costs: Vec<PowerCost>,
}

/// One combat event that may trigger procs.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcEventInfo {
    pub actor: UnitId,
    pub action_target: UnitId,
    /// Target of triggered spells and proc damage.
    pub proc_target: UnitId,
    pub type_mask: ProcFlags,
    pub spell: Option<Arc<SpellInfo>>,
    pub damage: Option<DamageInfo>,
    pub proc_spell: Option<ProcSpell>,
}

impl ProcEventInfo {
    pub fn new(actor: UnitId, action_target: UnitId, type_mask: ProcFlags) -> Self {
        Self {
            actor,
            action_target,
            proc_target: action_target,
            type_mask,
            spell: None,
            damage: None,
            proc_spell: None,
        }
    }

    pub fn with_proc_target(mut self, target: UnitId) -> Self {
        self.proc_target = target;
        self
    }

    pub fn with_spell(mut self, spell: Arc<SpellInfo>) -> Self {
        self.spell = Some(spell);
        self
    }

    pub fn with_damage(mut self, damage: u32, school: SchoolMask) -> Self {
        self.damage = Some(DamageInfo { damage, school });
        self
    }

    pub fn with_proc_spell(mut self, proc_spell: ProcSpell) -> Self {
        self.proc_spell = Some(proc_spell);
        self
    }

    /// Damage dealt by the event, zero when it carries none.
    pub fn damage(&self) -> u32 {
        self.damage.map_or(0, |info| info.damage)
    }

    /// School of the damage, falling back to the event spell's school.
    pub fn school_mask(&self) -> SchoolMask {
        match (&self.damage, &self.spell) {
            (Some(info), _) => info.school,
            (None, Some(spell)) => spell.school,
            (None, None) => SchoolMask::empty(),
        }
    }
}
