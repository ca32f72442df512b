//! Arena-owned world state: units, auras and applications.
//!
//! The aura → owner and application → target relations are stored as handles,
//! never references, so a snapshot of handles stays valid while the arena is
//! mutated underneath it.
mod application;
mod aura;
mod error;
mod ids;
mod outbox;
mod unit;
mod world;

pub use application::{AuraApplication, RemoveMode};
pub use aura::{Aura, AuraKind};
pub use error::WorldError;
pub use ids::{ApplicationId, AuraId, EffectHandle, SpellId, UnitId};
pub use outbox::{CastRequest, ClientUpdate, CombatEvent, Outbox};
pub use unit::{ResourceMeter, Stat, Unit, UnitFlags, UnitKind, UnitState};
pub use world::AuraWorld;
