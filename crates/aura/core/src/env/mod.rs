//! Traits describing read-only world data.
//!
//! Oracles expose spell definitions, combat formulas and content tables. The
//! [`AuraEnv`] aggregate bundles them with the handler table and engine
//! configuration so the engine can reach everything it needs without hard
//! coupling to concrete implementations.
mod book;
mod combat;
mod content;
mod error;
mod spells;

pub use book::SpellBook;
pub use combat::{CombatOracle, DamageBreakdown, DamageKind, NeutralCombat};
pub use content::{ContentOracle, ShapeshiftForm};
pub use error::OracleError;
pub use spells::SpellOracle;

use crate::config::EngineConfig;
use crate::handler::HandlerTable;

/// Aggregates the read-only collaborators of the aura engine.
///
/// Missing oracles are tolerated: operations that need one skip the dependent
/// branch (and log) rather than fail.
#[derive(Clone, Copy)]
pub struct AuraEnv<'a> {
    spells: Option<&'a dyn SpellOracle>,
    combat: Option<&'a dyn CombatOracle>,
    content: Option<&'a dyn ContentOracle>,
    handlers: &'a HandlerTable,
    config: &'a EngineConfig,
}

impl<'a> AuraEnv<'a> {
    pub fn new(handlers: &'a HandlerTable, config: &'a EngineConfig) -> Self {
        Self {
            spells: None,
            combat: None,
            content: None,
            handlers,
            config,
        }
    }

    pub fn with_spells(mut self, spells: &'a dyn SpellOracle) -> Self {
        self.spells = Some(spells);
        self
    }

    pub fn with_combat(mut self, combat: &'a dyn CombatOracle) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn with_content(mut self, content: &'a dyn ContentOracle) -> Self {
        self.content = Some(content);
        self
    }

    /// Returns the SpellOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SpellsNotAvailable` if no spell oracle was provided.
    pub fn spells(&self) -> Result<&'a dyn SpellOracle, OracleError> {
        self.spells.ok_or(OracleError::SpellsNotAvailable)
    }

    /// Returns the CombatOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CombatNotAvailable` if no combat oracle was provided.
    pub fn combat(&self) -> Result<&'a dyn CombatOracle, OracleError> {
        self.combat.ok_or(OracleError::CombatNotAvailable)
    }

    /// Returns the ContentOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ContentNotAvailable` if no content oracle was provided.
    pub fn content(&self) -> Result<&'a dyn ContentOracle, OracleError> {
        self.content.ok_or(OracleError::ContentNotAvailable)
    }

    pub fn handlers(&self) -> &'a HandlerTable {
        self.handlers
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }
}

impl core::fmt::Debug for AuraEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuraEnv")
            .field("spells", &self.spells.is_some())
            .field("combat", &self.combat.is_some())
            .field("content", &self.content.is_some())
            .field("config", self.config)
            .finish()
    }
}
