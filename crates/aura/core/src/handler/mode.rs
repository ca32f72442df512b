//! Handler mode bitmask.
//!
//! Every default handler call carries a mode describing *why* it runs. Each
//! handler declares the composite mask it cares about and is skipped when the
//! call's mode does not intersect it.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HandleMode: u8 {
        /// The effect is really being applied to or removed from the target.
        const REAL            = 0x01;
        /// State must be propagated to observing clients.
        const SEND_FOR_CLIENT = 0x02;
        /// The effect amount changed.
        const CHANGE_AMOUNT   = 0x04;
        /// The aura is being refreshed by a restack.
        const REAPPLY         = 0x08;
        /// A stat recompute pass is running.
        const STAT            = 0x10;
        /// A skill recompute pass is running.
        const SKILL           = 0x20;

        const SEND_FOR_CLIENT_MASK =
            Self::SEND_FOR_CLIENT.bits() | Self::REAL.bits();
        const CHANGE_AMOUNT_MASK =
            Self::CHANGE_AMOUNT.bits() | Self::REAL.bits();
        const CHANGE_AMOUNT_SEND_FOR_CLIENT_MASK =
            Self::CHANGE_AMOUNT.bits() | Self::SEND_FOR_CLIENT.bits() | Self::REAL.bits();
        const REAL_OR_REAPPLY_MASK =
            Self::REAPPLY.bits() | Self::REAL.bits();
    }
}

impl HandleMode {
    /// Combinations a handler call may legally carry.
    pub const CANONICAL: [HandleMode; 7] = [
        Self::REAL,
        Self::SEND_FOR_CLIENT,
        Self::CHANGE_AMOUNT,
        Self::STAT,
        Self::SKILL,
        Self::REAPPLY,
        Self::CHANGE_AMOUNT.union(Self::REAPPLY),
    ];

    pub fn is_canonical(self) -> bool {
        Self::CANONICAL.contains(&self)
    }

    /// Returns true if a handler declaring `mask` must run for this mode.
    pub fn triggers(self, mask: HandleMode) -> bool {
        self.intersects(mask)
    }
}
