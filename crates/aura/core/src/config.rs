/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Upper bound on nested amount recalculations triggered by one spell
    /// modifier change.
    pub max_recalc_depth: u32,

    /// Percentage of the target's maximum health used as the damage threshold
    /// for crowd-control effects that break on damage.
    pub cc_break_health_pct: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of effect slots per spell (and therefore per aura).
    pub const MAX_EFFECTS: usize = 3;
    /// Hard cap on an aura's stack amount.
    pub const MAX_STACKS: u8 = 255;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RECALC_DEPTH: u32 = 16;
    pub const DEFAULT_CC_BREAK_HEALTH_PCT: u32 = 10;

    pub fn new() -> Self {
        Self {
            max_recalc_depth: Self::DEFAULT_MAX_RECALC_DEPTH,
            cc_break_health_pct: Self::DEFAULT_CC_BREAK_HEALTH_PCT,
        }
    }

    pub fn with_max_recalc_depth(mut self, depth: u32) -> Self {
        self.max_recalc_depth = depth;
        self
    }

    pub fn with_cc_break_health_pct(mut self, pct: u32) -> Self {
        self.cc_break_health_pct = pct;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
