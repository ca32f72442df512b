//! Side effects the engine emits for collaborators outside the core.
//!
//! The engine never calls into the combat log, the spell caster or the
//! network layer directly. It queues records here and the world loop drains
//! them after each engine call.

use super::{ApplicationId, AuraId, EffectHandle, SpellId, UnitId};

/// Combat log records produced by periodic ticks and procs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    PeriodicDamage {
        caster: Option<UnitId>,
        target: UnitId,
        spell: SpellId,
        damage: u32,
        absorbed: u32,
        resisted: u32,
    },
    PeriodicHeal {
        caster: Option<UnitId>,
        target: UnitId,
        spell: SpellId,
        heal: u32,
    },
    PeriodicEnergize {
        caster: Option<UnitId>,
        target: UnitId,
        spell: SpellId,
        amount: u32,
    },
    ProcDamage {
        attacker: UnitId,
        target: UnitId,
        spell: SpellId,
        damage: u32,
        absorbed: u32,
        resisted: u32,
    },
    /// The target was immune to a tick or proc.
    Immune {
        caster: Option<UnitId>,
        target: UnitId,
        spell: SpellId,
    },
}

/// A spell cast requested by a periodic or proc effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastRequest {
    pub caster: UnitId,
    pub target: UnitId,
    pub spell: SpellId,
    /// Overrides the base value of the triggered spell's first effect.
    pub base_value: Option<i32>,
    pub triggered_by: EffectHandle,
}

/// State that must be propagated to observing clients.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientUpdate {
    AuraState {
        target: UnitId,
        aura: AuraId,
        application: ApplicationId,
    },
    Mount {
        target: UnitId,
        display: Option<u32>,
    },
    Shapeshift {
        target: UnitId,
        form: Option<i32>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox {
    combat: Vec<CombatEvent>,
    casts: Vec<CastRequest>,
    client: Vec<ClientUpdate>,
}

impl Outbox {
    pub fn push_combat(&mut self, event: CombatEvent) {
        self.combat.push(event);
    }

    pub fn push_cast(&mut self, request: CastRequest) {
        self.casts.push(request);
    }

    pub fn push_client(&mut self, update: ClientUpdate) {
        self.client.push(update);
    }

    pub fn combat(&self) -> &[CombatEvent] {
        &self.combat
    }

    pub fn casts(&self) -> &[CastRequest] {
        &self.casts
    }

    pub fn client(&self) -> &[ClientUpdate] {
        &self.client
    }

    pub fn drain_combat(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.combat)
    }

    pub fn drain_casts(&mut self) -> Vec<CastRequest> {
        std::mem::take(&mut self.casts)
    }

    pub fn drain_client(&mut self) -> Vec<ClientUpdate> {
        std::mem::take(&mut self.client)
    }
}
