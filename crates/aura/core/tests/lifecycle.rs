mod common;

use std::sync::{Arc, Mutex};

use aura_core::{
    ApplicationId, AuraCreateInfo, AuraEngine, AuraKind, AuraScript, AuraType, ClientUpdate,
    EffectHandle, HandleMode, HookOutcome, RemoveMode, ShapeshiftForm, SpellAttributes,
    SpellEffectInfo, SpellId, UnitFlags, UnitId, UnitState, WorldError,
};
use common::{CASTER, Harness, TARGET, dot, effect0, single_effect_spell};

#[test]
fn apply_validates_target_and_duplicates() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 1000, 5000));
    let (aura, _) = harness.cast(
        AuraCreateInfo::new(spell.clone(), TARGET).with_caster(CASTER),
        TARGET,
    );

    let mut engine = harness.engine();
    assert_eq!(
        engine.apply_aura(aura, TARGET),
        Err(WorldError::AlreadyApplied {
            aura,
            target: TARGET
        })
    );
    assert_eq!(
        engine.apply_aura(aura, UnitId(99)),
        Err(WorldError::UnitNotFound(UnitId(99)))
    );
    assert_eq!(
        engine.create_aura(AuraCreateInfo::new(spell, UnitId(99))),
        Err(WorldError::UnitNotFound(UnitId(99)))
    );
}

#[test]
fn owner_removal_destroys_unit_aura() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 1000, 5000));
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);

    harness
        .engine()
        .remove_application(application, RemoveMode::EnemySpell)
        .unwrap();
    assert!(harness.world.aura(aura).is_none());
    assert!(!harness.unit(TARGET).has_aura_type(AuraType::PeriodicDamage));
    assert_eq!(
        harness.engine().remove_aura(aura, RemoveMode::Default),
        Err(WorldError::AuraNotFound(aura))
    );
}

#[test]
fn area_aura_survives_losing_a_target() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 1000, 5000));
    let (aura, _) = harness.cast(
        AuraCreateInfo::new(spell, CASTER)
            .with_caster(CASTER)
            .with_kind(AuraKind::Area),
        CASTER,
    );
    let on_target = harness.engine().apply_aura(aura, TARGET).unwrap();

    harness
        .engine()
        .remove_application(on_target, RemoveMode::Default)
        .unwrap();
    let state = harness.world.aura(aura).unwrap();
    assert_eq!(state.applications().len(), 1);
    assert!(harness.unit(TARGET).applied_auras().is_empty());
}

#[test]
fn stack_to_zero_removes_aura() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 1000, 5000).with_max_stack(3));
    let (aura, _) = harness.cast(
        AuraCreateInfo::new(spell, TARGET)
            .with_caster(CASTER)
            .with_stack_amount(2),
        TARGET,
    );

    assert_eq!(harness.engine().mod_stack_amount(aura, -1, false), Ok(false));
    assert_eq!(harness.world.aura(aura).unwrap().stack_amount(), 1);
    assert_eq!(harness.engine().mod_stack_amount(aura, -1, false), Ok(true));
    assert!(harness.world.aura(aura).is_none());
}

#[test]
fn refresh_resets_duration_and_ticks() {
    let mut harness = Harness::new();
    let spell = harness.spell(dot(100, 10, 1000, 5000));
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);
    harness.engine().update(2500);

    harness.engine().mod_stack_amount(aura, 0, true).unwrap();
    let state = harness.world.aura(aura).unwrap();
    assert_eq!(state.duration(), 5000);
    let effect = state.effect(0).unwrap();
    assert_eq!(effect.ticks_done(), 0);
    assert_eq!(effect.periodic_timer(), 0);
}

#[test]
fn refresh_rolls_pending_tick_into_new_duration() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        dot(100, 10, 1000, 3000).with_attributes(SpellAttributes::DONT_RESET_PERIODIC_TIMER),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET).with_caster(CASTER), TARGET);
    harness.engine().update(2500);
    assert_eq!(harness.world.effect(effect0(aura)).unwrap().ticks_done(), 2);

    harness.engine().mod_stack_amount(aura, 0, true).unwrap();
    let state = harness.world.aura(aura).unwrap();
    assert_eq!(state.max_duration(), 3500);
    assert_eq!(state.duration(), 3500);
    assert_eq!(state.effect(0).unwrap().periodic_timer(), 500);

    harness.engine().update_effect(effect0(aura), 500);
    assert_eq!(harness.world.effect(effect0(aura)).unwrap().ticks_done(), 1);
}

#[test]
fn charges_only_apply_to_charge_auras() {
    let mut harness = Harness::new();
    let plain = harness.spell(dot(100, 10, 1000, 5000));
    let charged = harness.spell(
        dot(101, 10, 1000, 5000).with_proc(aura_core::ProcFlags::TAKE_MELEE_HIT, 2),
    );
    let (plain, _) = harness.cast(AuraCreateInfo::new(plain, TARGET), TARGET);
    let (charged, _) = harness.cast(AuraCreateInfo::new(charged, TARGET), TARGET);

    assert_eq!(harness.engine().mod_charges(plain, -1), Ok(false));
    assert_eq!(harness.engine().mod_charges(charged, -1), Ok(false));
    assert_eq!(harness.world.aura(charged).unwrap().charges(), 1);
    assert_eq!(harness.engine().mod_charges(charged, -1), Ok(true));
    assert!(harness.world.aura(charged).is_none());
}

#[test]
fn spent_charges_expire_the_aura() {
    #[derive(Clone, Default)]
    struct RemoveModeLog(Arc<Mutex<Vec<RemoveMode>>>);

    impl AuraScript for RemoveModeLog {
        fn on_effect_remove(
            &self,
            engine: &mut AuraEngine<'_>,
            _effect: EffectHandle,
            application: ApplicationId,
            mode: HandleMode,
        ) -> HookOutcome {
            if mode == HandleMode::REAL
                && let Some(app) = engine.world().application(application)
            {
                self.0.lock().unwrap().push(app.remove_mode);
            }
            HookOutcome::Continue
        }
    }

    let mut harness = Harness::new();
    let spell = harness.spell(
        dot(100, 10, 1000, 5000).with_proc(aura_core::ProcFlags::TAKE_MELEE_HIT, 1),
    );
    let log = RemoveModeLog::default();
    let (aura, _) = harness.cast(
        AuraCreateInfo::new(spell, TARGET).with_script(log.clone()),
        TARGET,
    );

    assert_eq!(harness.engine().mod_charges(aura, -1), Ok(true));
    assert!(harness.world.aura(aura).is_none());
    assert_eq!(*log.0.lock().unwrap(), vec![RemoveMode::Expire]);
}

#[test]
fn crowd_control_flag_survives_while_another_source_holds() {
    let mut harness = Harness::new();
    let root = harness.spell(
        single_effect_spell(100, SpellEffectInfo::new(AuraType::ModRoot)).with_duration(5000),
    );
    let root2 = harness.spell(
        single_effect_spell(101, SpellEffectInfo::new(AuraType::ModRoot2)).with_duration(5000),
    );
    let (first, _) = harness.cast(AuraCreateInfo::new(root, TARGET).with_caster(CASTER), TARGET);
    let (second, _) =
        harness.cast(AuraCreateInfo::new(root2, TARGET).with_caster(CASTER), TARGET);

    harness.engine().remove_aura(first, RemoveMode::Default).unwrap();
    assert!(harness.unit(TARGET).state.contains(UnitState::ROOTED));
    harness.engine().remove_aura(second, RemoveMode::Default).unwrap();
    assert!(!harness.unit(TARGET).state.contains(UnitState::ROOTED));
}

#[test]
fn health_modifier_round_trips() {
    let mut harness = Harness::new();
    let spell = harness.spell(
        single_effect_spell(
            100,
            SpellEffectInfo::new(AuraType::ModIncreaseHealth).with_base_points(200),
        )
        .with_duration(5000),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, TARGET), TARGET);
    assert_eq!(harness.unit(TARGET).health.maximum, 1200);
    assert_eq!(harness.unit(TARGET).health.current, 1200);

    harness.engine().remove_aura(aura, RemoveMode::Default).unwrap();
    assert_eq!(harness.unit(TARGET).health.maximum, 1000);
    assert_eq!(harness.unit(TARGET).health.current, 1000);
}

#[test]
fn mount_resolves_capability_and_resends() {
    let mut harness = Harness::new();
    harness.content.mount_types.insert(SpellId(100), 3);
    harness.content.mount_displays.insert(3, 9001);
    let spell = harness.spell(
        single_effect_spell(100, SpellEffectInfo::new(AuraType::Mounted)).with_duration(-1),
    );
    let (aura, _) = harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);
    assert_eq!(harness.amount(effect0(aura)), 9001);
    assert_eq!(harness.unit(CASTER).mount_display, Some(9001));

    harness.world.outbox_mut().drain_client();
    harness.engine().send_for_client(CASTER);
    assert_eq!(
        harness.world.outbox().client(),
        &[ClientUpdate::Mount {
            target: CASTER,
            display: Some(9001)
        }]
    );

    harness.engine().remove_aura(aura, RemoveMode::Default).unwrap();
    assert_eq!(harness.unit(CASTER).mount_display, None);
}

fn form_spell(id: u32, form: i32) -> aura_core::SpellInfo {
    single_effect_spell(
        id,
        SpellEffectInfo::new(AuraType::ModShapeshift).with_misc(form, 0),
    )
    .with_duration(-1)
}

fn harness_with_forms() -> Harness {
    let mut harness = Harness::new();
    for (id, display) in [(1, Some(10)), (2, None)] {
        harness
            .content
            .forms
            .insert(id, ShapeshiftForm { id, display });
    }
    harness
}

#[test]
fn new_form_replaces_previous_one() {
    let mut harness = harness_with_forms();
    let bear = harness.spell(form_spell(100, 1));
    let cat = harness.spell(form_spell(101, 2));

    let (bear, _) = harness.cast(AuraCreateInfo::new(bear, CASTER).with_caster(CASTER), CASTER);
    assert_eq!(harness.unit(CASTER).shapeshift_form, Some(1));
    let (cat, _) = harness.cast(AuraCreateInfo::new(cat, CASTER).with_caster(CASTER), CASTER);

    assert!(harness.world.aura(bear).is_none());
    assert_eq!(harness.unit(CASTER).shapeshift_form, Some(2));

    harness.engine().remove_aura(cat, RemoveMode::Default).unwrap();
    assert_eq!(harness.unit(CASTER).shapeshift_form, None);
}

#[test]
fn unknown_form_is_skipped() {
    let mut harness = harness_with_forms();
    let spell = harness.spell(form_spell(100, 99));
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);

    assert!(harness.world.aura(aura).is_some());
    assert!(!harness.world.is_removed(application));
    assert_eq!(harness.unit(CASTER).shapeshift_form, None);
}

#[test]
fn target_that_cannot_shapeshift_drops_the_form() {
    let mut harness = harness_with_forms();
    harness.world.unit_mut(CASTER).unwrap().flags |= UnitFlags::CANNOT_SHAPESHIFT;
    let spell = harness.spell(form_spell(100, 1));
    let (aura, application) =
        harness.cast(AuraCreateInfo::new(spell, CASTER).with_caster(CASTER), CASTER);

    assert!(harness.world.application(application).is_none());
    assert!(harness.world.aura(aura).is_none());
    assert_eq!(harness.unit(CASTER).shapeshift_form, None);
}
