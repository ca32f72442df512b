//! Built-in effect handlers.
//!
//! Each handler covers one family of aura types. Types without default
//! behavior map to [`NoImmediateEffect`] and are driven by scripts alone.
mod crowd_control;
mod mount;
mod periodic;
mod shapeshift;
mod stat;

pub use crowd_control::CrowdControlHandler;
pub use mount::MountHandler;
pub use periodic::{
    PeriodicDamageHandler, PeriodicEnergizeHandler, PeriodicHealHandler, PeriodicLeechHandler,
    PeriodicTriggerSpellHandler,
};
pub use shapeshift::ShapeshiftHandler;
pub use stat::{SkillHandler, StatHandler};

use crate::engine::AuraEngine;

use super::{EffectHandler, HandleMode, HandlerContext};

/// Handler for types with no immediate apply/remove behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImmediateEffect;

impl EffectHandler for NoImmediateEffect {
    fn mask(&self) -> HandleMode {
        HandleMode::empty()
    }

    fn handle(&self, _engine: &mut AuraEngine<'_>, _ctx: HandlerContext) {}
}
