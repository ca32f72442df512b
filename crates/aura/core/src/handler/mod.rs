//! Default per-type effect behavior.
//!
//! A [`HandlerTable`] maps every [`AuraType`] to one [`EffectHandler`].
//! Handlers are registered once at startup; dispatch is a vector index.
//! Each handler declares the composite [`HandleMode`] mask it cares about and
//! is skipped by the dispatcher when a call's mode does not intersect it.

mod kinds;
mod mode;

pub use kinds::{
    CrowdControlHandler, MountHandler, NoImmediateEffect, PeriodicDamageHandler,
    PeriodicEnergizeHandler, PeriodicHealHandler, PeriodicLeechHandler,
    PeriodicTriggerSpellHandler, ShapeshiftHandler, SkillHandler, StatHandler,
};
pub use mode::HandleMode;

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::engine::{AuraEngine, TickError};
use crate::spell::AuraType;
use crate::state::{ApplicationId, EffectHandle, UnitId};

/// Arguments of one handler invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerContext {
    pub effect: EffectHandle,
    pub application: ApplicationId,
    pub target: UnitId,
    pub mode: HandleMode,
    /// `true` when applying, `false` when removing.
    pub apply: bool,
}

/// Default behavior of one effect type.
///
/// `handle` must be idempotent per (mode, apply) pair: an apply followed by
/// the matching remove leaves the target unchanged.
pub trait EffectHandler: Send + Sync {
    /// Composite mask of modes this handler reacts to.
    fn mask(&self) -> HandleMode;

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext);

    /// Body of one periodic tick on one application.
    fn periodic_tick(
        &self,
        _engine: &mut AuraEngine<'_>,
        _effect: EffectHandle,
        _application: ApplicationId,
    ) -> Result<(), TickError> {
        Ok(())
    }
}

/// Dispatch table indexed by [`AuraType::index`].
pub struct HandlerTable {
    handlers: Vec<Arc<dyn EffectHandler>>,
}

impl HandlerTable {
    /// A table where every type maps to [`NoImmediateEffect`].
    pub fn empty() -> Self {
        let fallback: Arc<dyn EffectHandler> = Arc::new(NoImmediateEffect);
        Self {
            handlers: vec![fallback; AuraType::COUNT],
        }
    }

    /// The table with every built-in handler registered.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();

        let crowd_control: Arc<dyn EffectHandler> = Arc::new(CrowdControlHandler);
        for aura_type in AuraType::iter().filter(|t| t.is_crowd_control()) {
            table.register_shared(aura_type, Arc::clone(&crowd_control));
        }

        let stat: Arc<dyn EffectHandler> = Arc::new(StatHandler);
        table.register_shared(AuraType::ModStat, Arc::clone(&stat));
        table.register_shared(AuraType::ModIncreaseHealth, stat);

        table.register(AuraType::ModSkill, SkillHandler);
        table.register(AuraType::Mounted, MountHandler);
        table.register(AuraType::ModShapeshift, ShapeshiftHandler);
        table.register(AuraType::PeriodicDamage, PeriodicDamageHandler);
        table.register(AuraType::PeriodicLeech, PeriodicLeechHandler);
        table.register(AuraType::PeriodicHeal, PeriodicHealHandler);
        table.register(AuraType::PeriodicEnergize, PeriodicEnergizeHandler);
        table.register(AuraType::PeriodicTriggerSpell, PeriodicTriggerSpellHandler);
        table
    }

    pub fn register(&mut self, aura_type: AuraType, handler: impl EffectHandler + 'static) {
        self.register_shared(aura_type, Arc::new(handler));
    }

    pub fn register_shared(&mut self, aura_type: AuraType, handler: Arc<dyn EffectHandler>) {
        self.handlers[aura_type.index()] = handler;
    }

    pub fn get(&self, aura_type: AuraType) -> &dyn EffectHandler {
        self.handlers[aura_type.index()].as_ref()
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl core::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("len", &self.handlers.len())
            .finish()
    }
}
