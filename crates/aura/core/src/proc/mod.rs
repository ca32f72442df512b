//! Reactive effects driven by combat events.
//!
//! [`ProcEventInfo`] describes one event; the gate decides whether an effect
//! qualifies and the dispatcher runs its reactive behavior.
mod dispatch;
mod error;
mod event;
mod gate;

pub use error::ProcError;
pub use event::{DamageInfo, PowerCost, ProcEventInfo, ProcSpell};
