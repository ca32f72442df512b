//! Shared fixtures for aura-core integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use aura_core::{
    ApplicationId, AuraCreateInfo, AuraEngine, AuraEnv, AuraId, AuraType, AuraWorld,
    ContentOracle, EffectHandle, EffectHandler, EngineConfig, HandleMode, HandlerContext,
    HandlerTable, NeutralCombat, ShapeshiftForm, SpellBook, SpellEffectInfo, SpellId, SpellInfo,
    Unit, UnitId,
};

pub const CASTER: UnitId = UnitId(1);
pub const TARGET: UnitId = UnitId(2);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mount and shapeshift tables used by handler tests.
#[derive(Debug, Default)]
pub struct TestContent {
    pub mount_types: BTreeMap<SpellId, i32>,
    pub mount_displays: BTreeMap<i32, u32>,
    pub forms: BTreeMap<i32, ShapeshiftForm>,
}

impl ContentOracle for TestContent {
    fn mount_type_for_spell(&self, spell: SpellId) -> Option<i32> {
        self.mount_types.get(&spell).copied()
    }

    fn mount_capability(&self, _unit: &Unit, mount_type: i32) -> Option<u32> {
        self.mount_displays.get(&mount_type).copied()
    }

    fn shapeshift_form(&self, form: i32) -> Option<ShapeshiftForm> {
        self.forms.get(&form).cloned()
    }
}

/// One observed handler call: (apply, mode, amount at call time).
pub type Observation = (bool, HandleMode, i32);

/// Records every call it receives together with the amount it observes.
#[derive(Clone, Default)]
pub struct ProbeHandler {
    pub mask: HandleMode,
    pub calls: Arc<Mutex<Vec<Observation>>>,
}

impl ProbeHandler {
    pub fn new(mask: HandleMode) -> Self {
        Self {
            mask,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Observation> {
        self.calls.lock().unwrap().clone()
    }
}

impl EffectHandler for ProbeHandler {
    fn mask(&self) -> HandleMode {
        self.mask
    }

    fn handle(&self, engine: &mut AuraEngine<'_>, ctx: HandlerContext) {
        let amount = engine
            .world()
            .effect(ctx.effect)
            .map(|effect| effect.amount())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((ctx.apply, ctx.mode, amount));
    }
}

/// Owns every collaborator the engine borrows.
pub struct Harness {
    pub world: AuraWorld,
    pub spells: SpellBook,
    pub handlers: HandlerTable,
    pub config: EngineConfig,
    pub combat: NeutralCombat,
    pub content: TestContent,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let mut world = AuraWorld::new();
        world.add_unit(Unit::player(CASTER, 1000).with_power(100));
        world.add_unit(Unit::creature(TARGET, 1000).with_power(100));
        Self {
            world,
            spells: SpellBook::new(),
            handlers: HandlerTable::with_defaults(),
            config: EngineConfig::default(),
            combat: NeutralCombat,
            content: TestContent::default(),
        }
    }

    pub fn engine(&mut self) -> AuraEngine<'_> {
        let env = AuraEnv::new(&self.handlers, &self.config)
            .with_spells(&self.spells)
            .with_combat(&self.combat)
            .with_content(&self.content);
        AuraEngine::new(&mut self.world, env)
    }

    pub fn spell(&mut self, spell: SpellInfo) -> Arc<SpellInfo> {
        self.spells.insert(spell)
    }

    /// Creates the aura and applies it to `target`.
    pub fn cast(&mut self, info: AuraCreateInfo, target: UnitId) -> (AuraId, ApplicationId) {
        let mut engine = self.engine();
        let aura = engine.create_aura(info).expect("aura created");
        let application = engine.apply_aura(aura, target).expect("aura applied");
        (aura, application)
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        self.world.unit(id).expect("unit exists")
    }

    pub fn amount(&self, effect: EffectHandle) -> i32 {
        self.world.effect(effect).expect("effect exists").amount()
    }
}

/// A spell with a single effect slot.
pub fn single_effect_spell(id: u32, effect: SpellEffectInfo) -> SpellInfo {
    SpellInfo::new(SpellId(id)).with_effect(effect)
}

/// Periodic damage spell: `amount` every `period` ms over `duration` ms.
pub fn dot(id: u32, amount: i32, period: u32, duration: i32) -> SpellInfo {
    single_effect_spell(
        id,
        SpellEffectInfo::new(AuraType::PeriodicDamage)
            .with_base_points(amount)
            .with_amplitude(period),
    )
    .with_duration(duration)
}

pub fn effect0(aura: AuraId) -> EffectHandle {
    EffectHandle::new(aura, 0)
}
