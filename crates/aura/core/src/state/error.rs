use crate::error::{AuraError, ErrorSeverity};

use super::{ApplicationId, AuraId, UnitId};

/// Errors raised by lifecycle operations on the aura arena.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("{0} not found")]
    AuraNotFound(AuraId),

    #[error("{0} not found")]
    ApplicationNotFound(ApplicationId),

    #[error("{aura} is already applied to unit {target}")]
    AlreadyApplied { aura: AuraId, target: UnitId },

    #[error("{0} has already been removed")]
    AuraRemoved(AuraId),
}

impl AuraError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "WORLD_UNIT_NOT_FOUND",
            Self::AuraNotFound(_) => "WORLD_AURA_NOT_FOUND",
            Self::ApplicationNotFound(_) => "WORLD_APPLICATION_NOT_FOUND",
            Self::AlreadyApplied { .. } => "WORLD_ALREADY_APPLIED",
            Self::AuraRemoved(_) => "WORLD_AURA_REMOVED",
        }
    }
}
