//! Aura dispatch and scheduling engine.
//!
//! The [`AuraEngine`] borrows the [`AuraWorld`] arena mutably together with a
//! read-only [`AuraEnv`]. Every operation (apply/remove transitions, amount
//! changes, periodic updates and procs) runs synchronously on the calling
//! thread; handlers and scripts receive the engine itself and may re-enter it.

mod amount;
mod errors;
mod lifecycle;
mod scheduler;
mod transition;

pub use errors::TickError;
pub use lifecycle::AuraCreateInfo;
pub use transition::RecalcCascade;

use std::sync::Arc;

use crate::env::AuraEnv;
use crate::script::AuraScript;
use crate::state::{AuraId, AuraWorld};

pub struct AuraEngine<'a> {
    world: &'a mut AuraWorld,
    env: AuraEnv<'a>,
}

impl<'a> AuraEngine<'a> {
    pub fn new(world: &'a mut AuraWorld, env: AuraEnv<'a>) -> Self {
        Self { world, env }
    }

    pub fn world(&self) -> &AuraWorld {
        self.world
    }

    pub fn world_mut(&mut self) -> &mut AuraWorld {
        self.world
    }

    pub fn env(&self) -> AuraEnv<'a> {
        self.env
    }

    /// Snapshot of an aura's scripts; empty once the aura is gone.
    pub(crate) fn scripts_of(&self, aura: AuraId) -> Vec<Arc<dyn AuraScript>> {
        self.world
            .aura(aura)
            .map(|aura| aura.scripts())
            .unwrap_or_default()
    }
}
