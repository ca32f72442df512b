//! Closed enumeration of effect behavior tags.

/// Behavior tag of an aura effect.
///
/// The tag selects the default handler in [`crate::handler::HandlerTable`]
/// and drives the per-type branches of amount calculation and proc gating.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u16)]
pub enum AuraType {
    // ========================================================================
    // Generic
    // ========================================================================
    /// No default behavior; scripts attach meaning.
    #[default]
    Dummy,

    // ========================================================================
    // Periodic
    // ========================================================================
    PeriodicDamage,
    PeriodicHeal,
    PeriodicEnergize,
    PeriodicLeech,
    PeriodicTriggerSpell,
    PeriodicDummy,

    // ========================================================================
    // Crowd Control
    // ========================================================================
    ModConfuse,
    ModFear,
    ModStun,
    ModRoot,
    ModRoot2,
    Transform,

    // ========================================================================
    // Absorbs
    // ========================================================================
    SchoolAbsorb,
    ManaShield,

    // ========================================================================
    // Stats & Skills
    // ========================================================================
    ModStat,
    ModIncreaseHealth,
    ModSkill,

    // ========================================================================
    // Spell Modifiers
    // ========================================================================
    AddFlatModifier,
    AddPctModifier,
    AddFlatModifierBySpellLabel,
    AddPctModifierBySpellLabel,

    // ========================================================================
    // Procs
    // ========================================================================
    ProcTriggerSpell,
    ProcTriggerSpellWithValue,
    ProcTriggerDamage,

    // ========================================================================
    // Proc-gated Modifiers
    // ========================================================================
    MechanicImmunity,
    ModMechanicResistance,
    ModPowerCostSchool,
    ModPowerCostSchoolPct,
    ReflectSpellsSchool,
    ModSpellCritChance,
    ModCastingSpeedNotStack,
    ModSchoolMaskDamageFromCaster,
    ModSpellDamageFromCaster,

    // ========================================================================
    // Appearance & Misc
    // ========================================================================
    Mounted,
    ModShapeshift,
    ShowConfirmationPromptWithDifficulty,
}

impl AuraType {
    /// Index of this tag in the handler table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true if effects of this type tick on a timer.
    pub const fn is_periodic(self) -> bool {
        matches!(
            self,
            Self::PeriodicDamage
                | Self::PeriodicHeal
                | Self::PeriodicEnergize
                | Self::PeriodicLeech
                | Self::PeriodicTriggerSpell
                | Self::PeriodicDummy
        )
    }

    /// Returns true for crowd-control effects that break on damage.
    pub const fn is_crowd_control(self) -> bool {
        matches!(
            self,
            Self::ModConfuse
                | Self::ModFear
                | Self::ModStun
                | Self::ModRoot
                | Self::ModRoot2
                | Self::Transform
        )
    }

    /// Returns true for effects that contribute a spell modifier.
    pub const fn is_spell_modifier(self) -> bool {
        matches!(
            self,
            Self::AddFlatModifier
                | Self::AddPctModifier
                | Self::AddFlatModifierBySpellLabel
                | Self::AddPctModifierBySpellLabel
        )
    }
}
