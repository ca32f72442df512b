//! Persistence snapshots of aura rows.
//!
//! Only amounts and aura-level counters are stored. Tick accounting is
//! reconstructed on restore from `max_duration - duration`, so a snapshot
//! taken mid-period resumes on the same tick boundary.

#[cfg(feature = "serde")]
use crate::error::{AuraError, ErrorSeverity};
use crate::state::{Aura, SpellId, UnitId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSnapshot {
    pub index: u8,
    pub amount: i32,
    pub base_amount: i32,
    pub can_be_recalculated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraSnapshot {
    pub spell: SpellId,
    pub caster: Option<UnitId>,
    pub owner: UnitId,
    pub duration: i32,
    pub max_duration: i32,
    pub stack_amount: u8,
    pub charges: u8,
    pub effects: Vec<EffectSnapshot>,
}

/// Byte encoding failures of [`AuraSnapshot`].
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("aura snapshot serialization failed: {0}")]
    Encode(String),

    #[error("aura snapshot deserialization failed: {0}")]
    Decode(String),
}

#[cfg(feature = "serde")]
impl AuraError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encode(_) => ErrorSeverity::Internal,
            Self::Decode(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "SNAPSHOT_ENCODE",
            Self::Decode(_) => "SNAPSHOT_DECODE",
        }
    }
}

impl AuraSnapshot {
    pub fn capture(aura: &Aura) -> Self {
        Self {
            spell: aura.spell().id,
            caster: aura.caster(),
            owner: aura.owner(),
            duration: aura.duration(),
            max_duration: aura.max_duration(),
            stack_amount: aura.stack_amount(),
            charges: aura.charges(),
            effects: aura
                .effects()
                .map(|effect| EffectSnapshot {
                    index: effect.index(),
                    amount: effect.amount(),
                    base_amount: effect.base_amount(),
                    can_be_recalculated: effect.can_be_recalculated(),
                })
                .collect(),
        }
    }

    pub fn effect(&self, index: u8) -> Option<&EffectSnapshot> {
        self.effects.iter().find(|effect| effect.index == index)
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}
