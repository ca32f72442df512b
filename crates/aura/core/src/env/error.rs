//! Oracle access errors.

use crate::error::{AuraError, ErrorSeverity};
use crate::state::SpellId;

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// SpellOracle is not available in the environment.
    #[error("SpellOracle not available")]
    SpellsNotAvailable,

    /// CombatOracle is not available in the environment.
    #[error("CombatOracle not available")]
    CombatNotAvailable,

    /// ContentOracle is not available in the environment.
    #[error("ContentOracle not available")]
    ContentNotAvailable,

    /// Spell definition was not found by id.
    #[error("spell definition {0} not found")]
    SpellNotFound(SpellId),
}

impl AuraError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            SpellsNotAvailable | CombatNotAvailable | ContentNotAvailable => ErrorSeverity::Fatal,
            SpellNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            SpellsNotAvailable => "ORACLE_SPELLS_NOT_AVAILABLE",
            CombatNotAvailable => "ORACLE_COMBAT_NOT_AVAILABLE",
            ContentNotAvailable => "ORACLE_CONTENT_NOT_AVAILABLE",
            SpellNotFound(_) => "ORACLE_SPELL_NOT_FOUND",
        }
    }
}
