//! Per-aura script extension points.
//!
//! Scripts are attached to an aura at creation and invoked at named points of
//! the amount, periodic, apply/remove and proc flows. Value hooks may rewrite
//! the value being computed; event hooks may veto the default behavior.
//!
//! Hooks run in attachment order over a snapshot of the aura's script list,
//! so a hook that removes the aura (or attaches further scripts) does not
//! disturb the current chain.

use std::sync::Arc;

use crate::engine::AuraEngine;
use crate::handler::HandleMode;
use crate::proc::ProcEventInfo;
use crate::spell::SpellModifier;
use crate::state::{ApplicationId, AuraWorld, EffectHandle};

/// Tri-state result of a script hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HookOutcome<T = ()> {
    /// Keep the default behavior.
    #[default]
    Continue,
    /// Suppress the default behavior. For value hooks: keep the value
    /// computed so far and skip the remaining scripts.
    Veto,
    /// Replace the value being computed.
    Rewrite(T),
}

impl<T> HookOutcome<T> {
    pub fn is_veto(&self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Amount and recalculation flag passed through `calc_amount`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountCalc {
    pub amount: i32,
    pub can_be_recalculated: bool,
}

/// Periodic flag and period passed through `calc_periodic`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicCalc {
    pub is_periodic: bool,
    pub period: u32,
}

/// Extension points of one aura.
///
/// Every hook defaults to [`HookOutcome::Continue`] (or a no-op), so a script
/// only implements the points it cares about.
#[allow(unused_variables)]
pub trait AuraScript: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        "unnamed"
    }

    fn calc_amount(
        &self,
        world: &AuraWorld,
        effect: EffectHandle,
        calc: AmountCalc,
    ) -> HookOutcome<AmountCalc> {
        HookOutcome::Continue
    }

    fn calc_periodic(
        &self,
        world: &AuraWorld,
        effect: EffectHandle,
        calc: PeriodicCalc,
    ) -> HookOutcome<PeriodicCalc> {
        HookOutcome::Continue
    }

    fn calc_spell_mod(
        &self,
        world: &AuraWorld,
        effect: EffectHandle,
        modifier: Option<&SpellModifier>,
    ) -> HookOutcome<Option<SpellModifier>> {
        HookOutcome::Continue
    }

    fn on_effect_apply(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        mode: HandleMode,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    fn after_effect_apply(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        mode: HandleMode,
    ) {
    }

    fn on_effect_remove(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        mode: HandleMode,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    fn after_effect_remove(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        mode: HandleMode,
    ) {
    }

    fn on_effect_periodic(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    /// A veto rejects the proc before any per-type gate runs.
    fn check_effect_proc(
        &self,
        world: &AuraWorld,
        effect: EffectHandle,
        application: ApplicationId,
        event: &ProcEventInfo,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    fn on_effect_proc(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        event: &ProcEventInfo,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    fn after_effect_proc(
        &self,
        engine: &mut AuraEngine<'_>,
        effect: EffectHandle,
        application: ApplicationId,
        event: &ProcEventInfo,
    ) {
    }
}

/// Threads a value through every script's rewrite hook.
///
/// A veto keeps the value computed so far and ends the chain.
pub(crate) fn rewrite_chain<T>(
    scripts: &[Arc<dyn AuraScript>],
    initial: T,
    mut hook: impl FnMut(&dyn AuraScript, &T) -> HookOutcome<T>,
) -> T {
    let mut value = initial;
    for script in scripts {
        match hook(script.as_ref(), &value) {
            HookOutcome::Continue => {}
            HookOutcome::Rewrite(next) => value = next,
            HookOutcome::Veto => {
                tracing::trace!(script = script.name(), "value hook vetoed the chain");
                break;
            }
        }
    }
    value
}

/// Runs an event hook on every script and reports whether any vetoed.
///
/// All scripts run even after a veto so each observes the event.
pub(crate) fn any_veto(
    scripts: &[Arc<dyn AuraScript>],
    mut hook: impl FnMut(&dyn AuraScript) -> HookOutcome,
) -> bool {
    scripts
        .iter()
        .fold(false, |prevented, script| hook(script.as_ref()).is_veto() || prevented)
}
