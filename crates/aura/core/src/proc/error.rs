use crate::env::OracleError;
use crate::error::{AuraError, ErrorSeverity};
use crate::state::{EffectHandle, SpellId, UnitId};

/// A proc branch that could not run. Logged by the dispatcher and dropped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProcError {
    #[error("effect {effect} has no trigger spell")]
    TriggerSpellMissing { effect: EffectHandle },

    #[error("effect {effect} triggers unknown {spell}")]
    TriggerSpellUnknown { effect: EffectHandle, spell: SpellId },

    #[error("proc target unit {0} not found")]
    TargetMissing(UnitId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl AuraError for ProcError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TriggerSpellMissing { .. } | Self::TriggerSpellUnknown { .. } => {
                ErrorSeverity::Validation
            }
            Self::TargetMissing(_) => ErrorSeverity::Recoverable,
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TriggerSpellMissing { .. } => "PROC_TRIGGER_SPELL_MISSING",
            Self::TriggerSpellUnknown { .. } => "PROC_TRIGGER_SPELL_UNKNOWN",
            Self::TargetMissing(_) => "PROC_TARGET_MISSING",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
