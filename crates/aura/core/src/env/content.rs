//! Lookup tables for mounts and shapeshift forms.

use crate::state::{SpellId, Unit};

/// Shapeshift form definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeshiftForm {
    pub id: i32,
    /// Display model shown while shapeshifted; `None` keeps the native model.
    pub display: Option<u32>,
}

pub trait ContentOracle: Send + Sync {
    /// Mount type override registered for a spell.
    fn mount_type_for_spell(&self, spell: SpellId) -> Option<i32>;

    /// Capability id (display) the unit gets for a mount type.
    fn mount_capability(&self, unit: &Unit, mount_type: i32) -> Option<u32>;

    fn shapeshift_form(&self, form: i32) -> Option<ShapeshiftForm>;
}
