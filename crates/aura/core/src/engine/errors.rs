use crate::env::OracleError;
use crate::error::{AuraError, ErrorSeverity};
use crate::state::{ApplicationId, EffectHandle, SpellId, UnitId};

/// A single periodic tick body that could not run.
///
/// The scheduler logs and drops these so the remaining applications and the
/// next tick still run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error("tick target unit {0} not found")]
    TargetMissing(UnitId),

    #[error("{0} no longer exists")]
    ApplicationMissing(ApplicationId),

    #[error("effect {0} no longer exists")]
    EffectMissing(EffectHandle),

    #[error("effect {0} has no trigger spell")]
    TriggerSpellMissing(EffectHandle),

    #[error("effect {effect} triggers unknown {spell}")]
    TriggerSpellUnknown { effect: EffectHandle, spell: SpellId },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl AuraError for TickError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TargetMissing(_) | Self::ApplicationMissing(_) | Self::EffectMissing(_) => {
                ErrorSeverity::Recoverable
            }
            Self::TriggerSpellMissing(_) | Self::TriggerSpellUnknown { .. } => {
                ErrorSeverity::Validation
            }
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TargetMissing(_) => "TICK_TARGET_MISSING",
            Self::ApplicationMissing(_) => "TICK_APPLICATION_MISSING",
            Self::EffectMissing(_) => "TICK_EFFECT_MISSING",
            Self::TriggerSpellMissing(_) => "TICK_TRIGGER_SPELL_MISSING",
            Self::TriggerSpellUnknown { .. } => "TICK_TRIGGER_SPELL_UNKNOWN",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
