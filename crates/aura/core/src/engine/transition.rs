//! Apply/remove transitions of one effect on one application.
//!
//! ```text
//! handle_effect:  register (REAL) → spell mod (CHANGE_AMOUNT_MASK)
//!                 → before hooks → default handler → after hooks
//! change_amount:  snapshot apps → remove pass → commit amount
//!                 → apply pass on apps still in force
//! ```

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::handler::{HandleMode, HandlerContext};
use crate::script::any_veto;
use crate::state::{ApplicationId, EffectHandle, UnitId};

use super::AuraEngine;

/// Guard threaded through one spell-modifier recalculation cascade.
///
/// Holds the effects whose recalculation is in progress. An effect already
/// on the path is never re-entered, which breaks modifier cycles, and the
/// nesting depth is bounded by `EngineConfig::max_recalc_depth`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcCascade {
    path: BTreeSet<EffectHandle>,
}

impl RecalcCascade {
    /// A cascade started by `origin`, which will not be recalculated by it.
    pub fn rooted_at(origin: EffectHandle) -> Self {
        let mut cascade = Self::default();
        cascade.path.insert(origin);
        cascade
    }

    pub fn is_active(&self, effect: EffectHandle) -> bool {
        self.path.contains(&effect)
    }

    /// Number of nested recalculations below the origin.
    pub fn depth(&self) -> u32 {
        (self.path.len() as u32).saturating_sub(1)
    }

    /// Pushes `effect` onto the path.
    ///
    /// Returns false if the effect is already on it or the depth bound is
    /// reached.
    pub(crate) fn enter(&mut self, effect: EffectHandle, max_depth: u32) -> bool {
        if self.depth() >= max_depth || self.path.contains(&effect) {
            return false;
        }
        self.path.insert(effect);
        true
    }

    pub(crate) fn leave(&mut self, effect: EffectHandle) {
        self.path.remove(&effect);
    }
}

impl AuraEngine<'_> {
    /// Runs one apply or remove transition of `effect` on `application`.
    ///
    /// # Panics
    ///
    /// Panics if `mode` is not one of [`HandleMode::CANONICAL`].
    pub fn handle_effect(
        &mut self,
        application: ApplicationId,
        effect: EffectHandle,
        mode: HandleMode,
        apply: bool,
    ) {
        let mut cascade = RecalcCascade::rooted_at(effect);
        self.handle_effect_in(application, effect, mode, apply, &mut cascade);
    }

    pub(crate) fn handle_effect_in(
        &mut self,
        application: ApplicationId,
        effect: EffectHandle,
        mode: HandleMode,
        apply: bool,
        cascade: &mut RecalcCascade,
    ) {
        assert!(
            mode.is_canonical(),
            "illegal handle mode {mode:?} for effect {effect}"
        );

        let Some(target) = self.world.application(application).map(|app| app.target) else {
            return;
        };
        let Some(aura_type) = self.world.effect(effect).map(|e| e.aura_type()) else {
            return;
        };
        trace!(%effect, %application, ?mode, apply, "handle effect");

        if mode.contains(HandleMode::REAL) {
            self.world.register_effect(target, effect, apply);
        }

        if mode.intersects(HandleMode::CHANGE_AMOUNT_MASK) {
            self.apply_spell_mod(effect, target, apply, cascade);
        }

        let scripts = self.scripts_of(effect.aura);
        let prevented = if apply {
            any_veto(&scripts, |script| {
                script.on_effect_apply(self, effect, application, mode)
            })
        } else {
            any_veto(&scripts, |script| {
                script.on_effect_remove(self, effect, application, mode)
            })
        };

        if apply && (prevented || self.world.is_removed(application)) {
            debug!(%effect, %application, prevented, "apply stopped before default handler");
            return;
        }

        if !prevented {
            let handler = self.env.handlers().get(aura_type);
            if mode.triggers(handler.mask()) {
                handler.handle(
                    self,
                    HandlerContext {
                        effect,
                        application,
                        target,
                        mode,
                        apply,
                    },
                );
            }
        }

        if apply && self.world.is_removed(application) {
            return;
        }

        for script in &scripts {
            if apply {
                script.after_effect_apply(self, effect, application, mode);
            } else {
                script.after_effect_remove(self, effect, application, mode);
            }
        }
    }

    /// Replaces the effect's amount and re-runs its handlers.
    ///
    /// Handlers see `CHANGE_AMOUNT` when the value differs and `REAPPLY` when
    /// `reapply` is set. Every handler of the apply pass observes the new
    /// amount. With `mark`, the effect stops following recalculations.
    pub fn change_amount(&mut self, effect: EffectHandle, new_amount: i32, mark: bool, reapply: bool) {
        let mut cascade = RecalcCascade::rooted_at(effect);
        self.change_amount_in(effect, new_amount, mark, reapply, &mut cascade);
    }

    pub(crate) fn change_amount_in(
        &mut self,
        effect: EffectHandle,
        new_amount: i32,
        mark: bool,
        reapply: bool,
        cascade: &mut RecalcCascade,
    ) {
        let Some(old_amount) = self.world.effect(effect).map(|e| e.amount()) else {
            return;
        };

        let mut mode = HandleMode::empty();
        if new_amount != old_amount {
            mode |= HandleMode::CHANGE_AMOUNT;
        }
        if reapply {
            mode |= HandleMode::REAPPLY;
        }
        if mode.is_empty() {
            return;
        }

        let applications = self.world.effect_applications(effect);

        for &application in &applications {
            let Some(app) = self.world.application(application) else {
                continue;
            };
            if !app.has_effect(effect.index) {
                continue;
            }
            let target = app.target;
            self.world.register_effect(target, effect, false);
            self.handle_effect_in(application, effect, mode, false, cascade);
            // A leaving application is not re-applied, so this pass is its
            // final unapply of the slot.
            if let Some(app) = self.world.application_mut(application)
                && app.has_remove_mode()
            {
                app.effect_mask &= !(1u8 << effect.index);
            }
        }

        if mode.contains(HandleMode::CHANGE_AMOUNT) {
            if let Some(slot) = self.world.effect_mut(effect) {
                slot.amount = new_amount;
                if mark {
                    slot.can_be_recalculated = false;
                }
            }
            debug!(%effect, old_amount, new_amount, "amount changed");
            self.calculate_spell_mod(effect);
        }

        for &application in &applications {
            if self.world.is_removed(application) {
                continue;
            }
            if let Some(target) = self.world.application(application).map(|app| app.target) {
                self.world.register_effect(target, effect, true);
            }
            self.handle_effect_in(application, effect, mode, true, cascade);
        }
    }

    /// Recomputes the amount of a recalculable effect and pushes it through
    /// [`change_amount`](Self::change_amount).
    pub fn recalculate_amount(&mut self, effect: EffectHandle) {
        let mut cascade = RecalcCascade::rooted_at(effect);
        self.recalculate_amount_in(effect, &mut cascade);
    }

    pub(crate) fn recalculate_amount_in(&mut self, effect: EffectHandle, cascade: &mut RecalcCascade) {
        let Some(recalculable) = self.world.effect(effect).map(|e| e.can_be_recalculated()) else {
            return;
        };
        if !recalculable {
            return;
        }
        let amount = self.calculate_amount(effect);
        self.change_amount_in(effect, amount, false, false, cascade);
    }

    /// Pushes (or pulls) the effect's modifier on a player target and
    /// recalculates the passive auras it affects.
    pub(crate) fn apply_spell_mod(
        &mut self,
        effect: EffectHandle,
        target: UnitId,
        apply: bool,
        cascade: &mut RecalcCascade,
    ) {
        let Some(modifier) = self.world.effect(effect).and_then(|e| e.spell_mod().cloned()) else {
            return;
        };
        let Some(unit) = self.world.unit_mut(target) else {
            return;
        };
        if !unit.is_player() {
            return;
        }
        if apply {
            unit.spell_mods.add(modifier.clone());
        } else {
            unit.spell_mods.remove(effect);
        }

        if self
            .world
            .aura(effect.aura)
            .is_none_or(|aura| aura.is_using_charges())
        {
            return;
        }

        let recalc_mask = modifier.op.recalculate_effect_mask();
        if recalc_mask == 0 {
            return;
        }

        let candidates: Vec<EffectHandle> = self
            .world
            .unit_applications(target)
            .into_iter()
            .filter_map(|app_id| self.world.application(app_id))
            .filter(|app| !app.has_remove_mode())
            .filter_map(|app| self.world.aura(app.aura).map(|aura| (app, aura)))
            .filter(|(_, aura)| {
                aura.caster() == Some(target)
                    && (aura.is_passive() || aura.is_permanent())
                    && aura.spell().is_affected_by(&modifier)
            })
            .flat_map(|(app, aura)| {
                app.effect_indices()
                    .filter(move |index| recalc_mask & (1u8 << index) != 0)
                    .map(move |index| EffectHandle::new(aura.id(), index))
            })
            .collect();

        let max_depth = self.env.config().max_recalc_depth;
        for candidate in candidates {
            if cascade.is_active(candidate) {
                continue;
            }
            if !cascade.enter(candidate, max_depth) {
                warn!(
                    origin = %effect,
                    %candidate,
                    depth = cascade.depth(),
                    "spell modifier cascade reached its depth bound"
                );
                continue;
            }
            self.recalculate_amount_in(candidate, cascade);
            cascade.leave(candidate);
        }
    }
}
