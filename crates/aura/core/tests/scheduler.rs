mod common;

use aura_core::{
    AuraCreateInfo, AuraType, CombatEvent, SpellAttributes, SpellEffectInfo, SpellId,
};
use common::{CASTER, Harness, TARGET, dot, effect0, single_effect_spell};

#[test]
fn catch_up_fires_every_crossed_boundary_up_to_total() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 2000, 6000));
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);
    let effect = effect0(aura);

    harness.engine().update_effect(effect, 6000);
    assert_eq!(harness.world.effect(effect).unwrap().ticks_done(), 3);
    assert_eq!(harness.unit(TARGET).health.current, 970);

    harness.engine().update_effect(effect, 1);
    harness.engine().update_effect(effect, 100_000);
    assert_eq!(harness.world.effect(effect).unwrap().ticks_done(), 3);
    assert_eq!(harness.unit(TARGET).health.current, 970);
    assert_eq!(harness.world.outbox().combat().len(), 3);
}

#[test]
fn update_expires_aura_after_last_tick() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 2000, 6000));
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update(2000);
    harness.engine().update(2000);
    assert!(harness.world.aura(aura).is_some());
    harness.engine().update(2000);

    assert!(harness.world.aura(aura).is_none());
    assert!(harness.world.application(application).is_none());
    assert!(harness.unit(TARGET).applied_auras().is_empty());
    assert_eq!(harness.unit(TARGET).health.current, 970);

    let ticks = harness
        .world
        .outbox()
        .combat()
        .iter()
        .filter(|event| matches!(event, CombatEvent::PeriodicDamage { damage: 10, .. }))
        .count();
    assert_eq!(ticks, 3);
}

#[test]
fn haste_shortens_period_when_allowed() {
    let mut harness = Harness::new();
    harness.world.unit_mut(CASTER).unwrap().cast_speed_pct = 50;
    let hasted = harness.spell(
        dot(100, 10, 2000, 6000).with_attributes(SpellAttributes::HASTE_AFFECTS_PERIODIC),
    );
    let plain = harness.spell(dot(101, 10, 2000, 6000));

    let (hasted, _) =
        harness.cast(AuraCreateInfo::new(hasted, TARGET).with_caster(CASTER), TARGET);
    let (plain, _) = harness.cast(AuraCreateInfo::new(plain, TARGET).with_caster(CASTER), TARGET);

    assert_eq!(harness.world.effect(effect0(hasted)).unwrap().period(), 1000);
    assert_eq!(harness.world.aura(hasted).unwrap().total_ticks(0), 6);
    assert_eq!(harness.world.effect(effect0(plain)).unwrap().period(), 2000);
}

#[test]
fn extra_initial_period_ticks_immediately() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        dot(100, 10, 2000, 6000).with_attributes(SpellAttributes::EXTRA_INITIAL_PERIOD),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);
    let effect = effect0(aura);
    assert_eq!(harness.world.aura(aura).unwrap().total_ticks(0), 4);

    harness.engine().update_effect(effect, 0);
    assert_eq!(harness.world.effect(effect).unwrap().ticks_done(), 1);

    harness.engine().update_effect(effect, 6000);
    assert_eq!(harness.world.effect(effect).unwrap().ticks_done(), 4);
    assert_eq!(harness.unit(TARGET).health.current, 960);
}

#[test]
fn zero_amplitude_is_not_periodic() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 0, 6000));
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);
    let effect = harness.world.effect(effect0(aura)).unwrap();
    assert!(!effect.is_periodic());

    harness.engine().update_effect(effect0(aura), 6000);
    assert_eq!(harness.unit(TARGET).health.current, 1000);
}

#[test]
fn failed_tick_keeps_schedule_running() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::PeriodicTriggerSpell)
                .with_amplitude(1000)
                .with_trigger_spell(SpellId(999)),
        )
        .with_duration(3000),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update_effect(effect0(aura), 3000);
    assert_eq!(harness.world.effect(effect0(aura)).unwrap().ticks_done(), 3);
    assert!(harness.world.outbox().casts().is_empty());
}

#[test]
fn periodic_trigger_spell_requests_cast_each_tick() {
    let mut harness = Harness::new();
    harness.spell(single_effect_spell(200, SpellEffectInfo::new(AuraType::Dummy)));
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::PeriodicTriggerSpell)
                .with_amplitude(1000)
                .with_trigger_spell(SpellId(200)),
        )
        .with_duration(2000),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update_effect(effect0(aura), 2000);
    let casts = harness.world.outbox().casts();
    assert_eq!(casts.len(), 2);
    assert!(casts
        .iter()
        .all(|cast| cast.caster == TARGET && cast.target == TARGET && cast.spell == SpellId(200)));
}

#[test]
fn heal_and_energize_ticks_restore_resources() {
    let mut harness = Harness::new();
    {
        let target = harness.world.unit_mut(TARGET).unwrap();
        target.health.drain(500);
        target.power.drain(100);
    }
    let heal = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::PeriodicHeal)
                .with_base_points(50)
                .with_amplitude(1000),
        )
        .with_duration(2000),
    );
    let energize = harness.spell(
        single_effect_spell(
            101,
            SpellEffectInfo::new(AuraType::PeriodicEnergize)
                .with_base_points(7)
                .with_amplitude(1000),
        )
        .with_duration(2000),
    );
    harness.cast(AuraCreateInfo::new(heal, TARGET).with_caster(CASTER), TARGET);
    harness.cast(AuraCreateInfo::new(energize, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update(2000);
    assert_eq!(harness.unit(TARGET).health.current, 600);
    assert_eq!(harness.unit(TARGET).power.current, 14);
}

#[test]
fn leech_moves_health_to_caster() {
    let mut harness = Harness::new();
    harness.world.unit_mut(CASTER).unwrap().health.drain(100);
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::PeriodicLeech)
                .with_base_points(20)
                .with_amplitude(1000),
        )
        .with_duration(1000),
    );
    harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update(1000);
    assert_eq!(harness.unit(TARGET).health.current, 980);
    assert_eq!(harness.unit(CASTER).health.current, 920);
}

#[test]
fn immune_target_skips_damage_tick() {
    let mut harness = Harness::new();
    harness.world.unit_mut(TARGET).unwrap().flags |= aura_core::UnitFlags::DAMAGE_IMMUNE;
    let spell = harness.spell(dot(100, 10, 1000, 2000));
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness.engine().update_effect(effect0(aura), 2000);
    assert_eq!(harness.unit(TARGET).health.current, 1000);
    assert_eq!(harness.world.effect(effect0(aura)).unwrap().ticks_done(), 2);
    assert!(harness
        .world
        .outbox()
        .combat()
        .iter()
        .all(|event| matches!(event, CombatEvent::Immune { .. })));
}
