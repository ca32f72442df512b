//! In-memory content tables implementing the engine's read-only oracles.

use std::collections::BTreeMap;
use std::sync::Arc;

use aura_core::{ContentOracle, ShapeshiftForm, SpellBook, SpellId, SpellInfo, SpellOracle, Unit};

/// Display granted for a mount type once the rider reaches a level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MountCapability {
    pub mount_type: i32,
    pub required_level: u8,
    pub display: u32,
}

/// Mount and shapeshift lookup tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentTables {
    /// Mount type overrides keyed by the spell that summons the mount.
    pub spell_mount_types: BTreeMap<SpellId, i32>,
    pub mount_capabilities: Vec<MountCapability>,
    pub shapeshift_forms: Vec<ShapeshiftForm>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spell_mount_type(mut self, spell: SpellId, mount_type: i32) -> Self {
        self.spell_mount_types.insert(spell, mount_type);
        self
    }

    pub fn with_mount_capability(mut self, capability: MountCapability) -> Self {
        self.mount_capabilities.push(capability);
        self
    }

    pub fn with_shapeshift_form(mut self, form: ShapeshiftForm) -> Self {
        self.shapeshift_forms.push(form);
        self
    }
}

/// Spell catalog plus content tables, ready to hand to an `AuraEnv`.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    spells: SpellBook,
    tables: ContentTables,
}

impl ContentBundle {
    pub fn new(spells: SpellBook, tables: ContentTables) -> Self {
        Self { spells, tables }
    }

    pub fn spells(&self) -> &SpellBook {
        &self.spells
    }

    pub fn tables(&self) -> &ContentTables {
        &self.tables
    }
}

impl SpellOracle for ContentBundle {
    fn spell(&self, id: SpellId) -> Option<Arc<SpellInfo>> {
        self.spells.spell(id)
    }
}

impl ContentOracle for ContentBundle {
    fn mount_type_for_spell(&self, spell: SpellId) -> Option<i32> {
        self.tables.spell_mount_types.get(&spell).copied()
    }

    /// Picks the highest-level capability of the mount type the unit qualifies for.
    fn mount_capability(&self, unit: &Unit, mount_type: i32) -> Option<u32> {
        self.tables
            .mount_capabilities
            .iter()
            .filter(|cap| cap.mount_type == mount_type && cap.required_level <= unit.level)
            .max_by_key(|cap| cap.required_level)
            .map(|cap| cap.display)
    }

    fn shapeshift_form(&self, form: i32) -> Option<ShapeshiftForm> {
        self.tables
            .shapeshift_forms
            .iter()
            .find(|entry| entry.id == form)
            .cloned()
    }
}
