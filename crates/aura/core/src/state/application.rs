//! Aura ↔ target association.

use super::{ApplicationId, AuraId, UnitId};

/// Why an application left its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemoveMode {
    /// Still in force.
    #[default]
    None,
    Default,
    Expire,
    EnemySpell,
    Interrupt,
    Death,
}

impl RemoveMode {
    pub const fn is_removed(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One aura applied to one target.
///
/// The removal flag is the cooperative cancellation signal: every stage of
/// dispatch re-checks it after a callback before proceeding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraApplication {
    pub id: ApplicationId,
    pub aura: AuraId,
    pub target: UnitId,
    /// Bit `i` set when effect slot `i` is in force on this target.
    pub effect_mask: u8,
    pub remove_mode: RemoveMode,
}

impl AuraApplication {
    pub fn new(id: ApplicationId, aura: AuraId, target: UnitId, effect_mask: u8) -> Self {
        Self {
            id,
            aura,
            target,
            effect_mask,
            remove_mode: RemoveMode::None,
        }
    }

    pub fn has_effect(&self, index: u8) -> bool {
        index < 8 && self.effect_mask & (1u8 << index) != 0
    }

    pub fn has_remove_mode(&self) -> bool {
        self.remove_mode.is_removed()
    }

    /// Effect slots in force, in slot order.
    pub fn effect_indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..8).filter(move |index| self.has_effect(*index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_mask_iteration() {
        let app = AuraApplication::new(ApplicationId(1), AuraId(1), UnitId(1), 0b101);
        assert!(app.has_effect(0));
        assert!(!app.has_effect(1));
        assert_eq!(app.effect_indices().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!app.has_remove_mode());
    }
}
