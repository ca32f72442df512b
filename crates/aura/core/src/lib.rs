//! Aura effect dispatch and scheduling engine.
//!
//! `aura-core` runs the per-effect state machine behind buffs, debuffs and
//! passive modifiers: amount recalculation with stacking and spell-modifier
//! feedback, the handler-mode protocol, periodic tick scheduling with
//! reload-exact resume, and the proc gate/dispatch pair. All state mutation
//! flows through [`engine::AuraEngine`], which borrows an [`AuraWorld`] arena
//! together with a read-only [`AuraEnv`].
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod handler;
pub mod proc;
pub mod script;
pub mod spell;
pub mod state;

pub use config::EngineConfig;
#[cfg(feature = "serde")]
pub use effect::SnapshotError;
pub use effect::{AuraEffect, AuraSnapshot, EffectSnapshot};
pub use engine::{AuraCreateInfo, AuraEngine, RecalcCascade, TickError};
pub use env::{
    AuraEnv, CombatOracle, ContentOracle, DamageBreakdown, DamageKind, NeutralCombat,
    OracleError, ShapeshiftForm, SpellBook, SpellOracle,
};
pub use error::{AuraError, ErrorContext, ErrorSeverity};
pub use handler::{EffectHandler, HandleMode, HandlerContext, HandlerTable};
pub use proc::{DamageInfo, PowerCost, ProcError, ProcEventInfo, ProcSpell};
pub use script::{AmountCalc, AuraScript, HookOutcome, PeriodicCalc};
pub use spell::{
    AuraType, EffectAttributes, ModifierKind, ProcFlags, SchoolMask, SpellAttributes,
    SpellEffectInfo, SpellInfo, SpellModOp, SpellModScope, SpellModifier, SpellModifierSet,
};
pub use state::{
    ApplicationId, Aura, AuraApplication, AuraId, AuraKind, AuraWorld, CastRequest, ClientUpdate,
    CombatEvent, EffectHandle, Outbox, RemoveMode, ResourceMeter, SpellId, Stat, Unit, UnitFlags,
    UnitId, UnitKind, UnitState, WorldError,
};
