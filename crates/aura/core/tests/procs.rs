mod common;

use std::sync::{Arc, Mutex};

use aura_core::{
    ApplicationId, AuraCreateInfo, AuraEngine, AuraScript, AuraType, CastRequest, CombatEvent,
    EffectHandle, HookOutcome, ProcEventInfo, ProcFlags, ProcSpell, PowerCost, SchoolMask,
    SpellAttributes, SpellEffectInfo, SpellId, UnitFlags, UnitState,
};
use common::{CASTER, Harness, TARGET, effect0, single_effect_spell};

const TRIGGERED: SpellId = SpellId(200);

fn trigger_aura(harness: &mut Harness, aura_type: AuraType, charges: u8) -> aura_core::AuraId {
    harness.spell(single_effect_spell(200, SpellEffectInfo::new(AuraType::Dummy)));
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(aura_type)
                .with_base_points(42)
                .with_trigger_spell(TRIGGERED),
        )
        .with_proc(ProcFlags::DEAL_SPELL_DAMAGE, charges)
        .with_duration(30_000),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);
    aura
}

fn spell_hit() -> ProcEventInfo {
    ProcEventInfo::new(CASTER, TARGET, ProcFlags::DEAL_SPELL_DAMAGE)
        .with_damage(10, SchoolMask::FIRE)
}

#[test]
fn crowd_control_ignores_its_own_application_damage() {
    let mut harness = Harness::new();
    let stun = harness.spell(
        single_effect_spell(100, SpellEffectInfo::new(AuraType::ModStun))
            .with_proc(ProcFlags::TAKE_ANY_DAMAGE, 0)
            .with_duration(10_000),
    );
    let (aura, application) = harness.cast(
        AuraCreateInfo::new(Arc::clone(&stun), TARGET).with_caster(CASTER),
        TARGET,
    );
    assert!(harness.unit(TARGET).state.contains(UnitState::STUNNED));

    let hit = ProcEventInfo::new(CASTER, TARGET, ProcFlags::TAKE_ANY_DAMAGE)
        .with_spell(stun)
        .with_damage(50, SchoolMask::PHYSICAL);
    assert!(!harness.engine().check_effect_proc(application, effect0(aura), &hit));

    harness.engine().update(100);
    assert!(harness.engine().check_effect_proc(application, effect0(aura), &hit));

    let no_damage = ProcEventInfo::new(CASTER, TARGET, ProcFlags::TAKE_ANY_DAMAGE);
    assert!(!harness.engine().check_effect_proc(application, effect0(aura), &no_damage));
}

#[test]
fn crowd_control_breaks_once_threshold_is_spent() {
    let mut harness = Harness::new();
    let stun = harness.spell(
        single_effect_spell(100, SpellEffectInfo::new(AuraType::ModStun))
            .with_proc(ProcFlags::TAKE_ANY_DAMAGE, 0)
            .with_duration(10_000),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(stun, TARGET).with_caster(CASTER), TARGET);
    assert_eq!(harness.amount(effect0(aura)), 100);

    let hit = |damage| {
        ProcEventInfo::new(CASTER, TARGET, ProcFlags::TAKE_ANY_DAMAGE)
            .with_damage(damage, SchoolMask::PHYSICAL)
    };
    assert_eq!(harness.engine().trigger_procs(TARGET, &hit(60)), 1);
    assert_eq!(harness.amount(effect0(aura)), 40);
    assert!(harness.unit(TARGET).state.contains(UnitState::STUNNED));

    harness.engine().trigger_procs(TARGET, &hit(40));
    assert!(harness.world.aura(aura).is_none());
    assert!(!harness.unit(TARGET).state.contains(UnitState::STUNNED));
}

#[test]
fn trigger_spell_consumes_charges() {
    let mut harness = Harness::new();
    let aura = trigger_aura(&mut harness, AuraType::ProcTriggerSpell, 2);

    assert_eq!(harness.engine().trigger_procs(CASTER, &spell_hit()), 1);
    assert_eq!(harness.world.aura(aura).unwrap().charges(), 1);
    assert_eq!(
        harness.world.outbox().casts(),
        &[CastRequest {
            caster: CASTER,
            target: TARGET,
            spell: TRIGGERED,
            base_value: None,
            triggered_by: effect0(aura),
        }]
    );

    harness.engine().trigger_procs(CASTER, &spell_hit());
    assert!(harness.world.aura(aura).is_none());
    assert_eq!(harness.world.outbox().casts().len(), 2);
}

#[test]
fn trigger_with_value_forwards_amount() {
    let mut harness = Harness::new();
    trigger_aura(&mut harness, AuraType::ProcTriggerSpellWithValue, 0);

    harness.engine().trigger_procs(CASTER, &spell_hit());
    assert_eq!(harness.world.outbox().casts()[0].base_value, Some(42));
}

#[test]
fn unrelated_event_does_not_proc() {
    let mut harness = Harness::new();
    trigger_aura(&mut harness, AuraType::ProcTriggerSpell, 0);

    let melee = ProcEventInfo::new(CASTER, TARGET, ProcFlags::DEAL_MELEE_HIT);
    assert_eq!(harness.engine().trigger_procs(CASTER, &melee), 0);
    assert!(harness.world.outbox().casts().is_empty());
}

#[test]
fn original_caster_casts_when_required() {
    let mut harness = Harness::new();
    harness.spell(
        single_effect_spell(200, SpellEffectInfo::new(AuraType::Dummy))
            .with_attributes(SpellAttributes::NEEDS_ORIGINAL_CASTER),
    );
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::ProcTriggerSpell).with_trigger_spell(TRIGGERED),
        )
        .with_proc(ProcFlags::TAKE_SPELL_DAMAGE, 0)
        .with_duration(30_000),
    );
    harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    let event = ProcEventInfo::new(TARGET, TARGET, ProcFlags::TAKE_SPELL_DAMAGE)
        .with_proc_target(TARGET);
    harness.engine().trigger_procs(TARGET, &event);
    let cast = &harness.world.outbox().casts()[0];
    assert_eq!(cast.caster, CASTER);
    assert_eq!(cast.target, TARGET);
}

#[test]
fn extra_attack_trigger_does_not_chain() {
    let mut harness = Harness::new();
    harness.spell(
        single_effect_spell(200, SpellEffectInfo::new(AuraType::Dummy))
            .with_attributes(SpellAttributes::ADD_EXTRA_ATTACKS),
    );
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::ProcTriggerSpell).with_trigger_spell(TRIGGERED),
        )
        .with_proc(ProcFlags::DEAL_MELEE_HIT, 0)
        .with_duration(30_000),
    );
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);
    let melee = ProcEventInfo::new(CASTER, TARGET, ProcFlags::DEAL_MELEE_HIT);

    assert!(harness.engine().check_effect_proc(application, effect0(aura), &melee));
    harness.world.unit_mut(CASTER).unwrap().last_extra_attack_spell = Some(TRIGGERED);
    assert!(!harness.engine().check_effect_proc(application, effect0(aura), &melee));
}

#[test]
fn trigger_damage_hits_proc_target() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::ProcTriggerDamage).with_base_points(25),
        )
        .with_proc(ProcFlags::DEAL_MELEE_HIT, 0)
        .with_duration(30_000),
    );
    harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);

    let melee = ProcEventInfo::new(CASTER, TARGET, ProcFlags::DEAL_MELEE_HIT);
    harness.engine().trigger_procs(CASTER, &melee);
    assert_eq!(harness.unit(TARGET).health.current, 975);
    assert!(matches!(
        harness.world.outbox().combat(),
        [CombatEvent::ProcDamage { attacker, damage: 25, .. }] if *attacker == CASTER
    ));

    harness.world.unit_mut(TARGET).unwrap().flags |= UnitFlags::DAMAGE_IMMUNE;
    harness.engine().trigger_procs(CASTER, &melee);
    assert_eq!(harness.unit(TARGET).health.current, 975);
    assert!(matches!(
        harness.world.outbox().combat().last(),
        Some(CombatEvent::Immune { .. })
    ));
}

#[test]
fn power_cost_gate_needs_school_and_positive_cost() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::ModPowerCostSchool)
                .with_misc(SchoolMask::FIRE.bits() as i32, 0),
        )
        .with_proc(ProcFlags::CAST_SPELL, 0)
        .with_duration(30_000),
    );
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);
    let fireball = Arc::new(aura_core::SpellInfo::new(SpellId(300)).with_school(SchoolMask::FIRE));
    let frostbolt =
        Arc::new(aura_core::SpellInfo::new(SpellId(301)).with_school(SchoolMask::FROST));
    let costly = ProcSpell {
        cast_time: 2500,
        power_costs: vec![PowerCost { amount: 30 }],
    };
    let free = ProcSpell {
        cast_time: 2500,
        power_costs: vec![PowerCost { amount: 0 }],
    };

    let cast = |spell: &Arc<aura_core::SpellInfo>, proc_spell: &ProcSpell| {
        ProcEventInfo::new(CASTER, TARGET, ProcFlags::CAST_SPELL)
            .with_spell(Arc::clone(spell))
            .with_proc_spell(proc_spell.clone())
    };
    let effect = effect0(aura);
    let engine = harness.engine();
    assert!(engine.check_effect_proc(application, effect, &cast(&fireball, &costly)));
    assert!(!engine.check_effect_proc(application, effect, &cast(&fireball, &free)));
    assert!(!engine.check_effect_proc(application, effect, &cast(&frostbolt, &costly)));
}

#[test]
fn mechanic_gate_matches_event_spell() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::MechanicImmunity).with_misc(5, 0),
        )
        .with_proc(ProcFlags::TAKE_SPELL_DAMAGE, 0)
        .with_duration(30_000),
    );
    let (aura, application) = harness.cast(AuraCreateInfo::new(spell, TARGET), TARGET);
    let matching = Arc::new(aura_core::SpellInfo::new(SpellId(300)).with_mechanic_mask(1 << 5));
    let other = Arc::new(aura_core::SpellInfo::new(SpellId(301)).with_mechanic_mask(1 << 4));

    let engine = harness.engine();
    let event = |spell: &Arc<aura_core::SpellInfo>| {
        ProcEventInfo::new(CASTER, TARGET, ProcFlags::TAKE_SPELL_DAMAGE).with_spell(Arc::clone(spell))
    };
    assert!(engine.check_effect_proc(application, effect0(aura), &event(&matching)));
    assert!(!engine.check_effect_proc(application, effect0(aura), &event(&other)));
}

#[derive(Clone, Default)]
struct ProcHooks {
    log: Arc<Mutex<Vec<&'static str>>>,
    veto: bool,
}

impl AuraScript for ProcHooks {
    fn on_effect_proc(
        &self,
        _engine: &mut AuraEngine<'_>,
        _effect: EffectHandle,
        _application: ApplicationId,
        _event: &ProcEventInfo,
    ) -> HookOutcome {
        self.log.lock().unwrap().push("on_proc");
        if self.veto {
            HookOutcome::Veto
        } else {
            HookOutcome::Continue
        }
    }

    fn after_effect_proc(
        &self,
        _engine: &mut AuraEngine<'_>,
        _effect: EffectHandle,
        _application: ApplicationId,
        _event: &ProcEventInfo,
    ) {
        self.log.lock().unwrap().push("after_proc");
    }
}

#[test]
fn proc_hooks_wrap_default_behavior() {
    for veto in [false, true] {
        let mut harness = Harness::new();
        harness.spell(single_effect_spell(200, SpellEffectInfo::new(AuraType::Dummy)));
        let spell = harness.spell(
            single_effect_spell(
                100,
                SpellEffectInfo::new(AuraType::ProcTriggerSpell).with_trigger_spell(TRIGGERED),
            )
            .with_proc(ProcFlags::DEAL_SPELL_DAMAGE, 0)
            .with_duration(30_000),
        );
        let hooks = ProcHooks {
            veto,
            ..ProcHooks::default()
        };
        harness.cast(
            AuraCreateInfo::new(spell, CASTER)
                .with_caster(CASTER)
                .with_script(hooks.clone()),
            CASTER,
        );

        harness.engine().trigger_procs(CASTER, &spell_hit());
        let log = hooks.log.lock().unwrap().clone();
        if veto {
            assert_eq!(log, vec!["on_proc"]);
            assert!(harness.world.outbox().casts().is_empty());
        } else {
            assert_eq!(log, vec!["on_proc", "after_proc"]);
            assert_eq!(harness.world.outbox().casts().len(), 1);
        }
    }
}
