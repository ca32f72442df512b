use std::sync::Arc;

use crate::spell::SpellInfo;
use crate::state::SpellId;

/// Read-only catalog of spell definitions.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<Arc<SpellInfo>>;
}
