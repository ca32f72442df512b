use std::collections::BTreeMap;
use std::sync::Arc;

use crate::spell::SpellInfo;
use crate::state::SpellId;

use super::SpellOracle;

/// In-memory spell catalog.
#[derive(Clone, Debug, Default)]
pub struct SpellBook {
    spells: BTreeMap<SpellId, Arc<SpellInfo>>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the shared handle.
    pub fn insert(&mut self, spell: SpellInfo) -> Arc<SpellInfo> {
        let spell = Arc::new(spell);
        self.spells.insert(spell.id, Arc::clone(&spell));
        spell
    }

    pub fn with_spell(mut self, spell: SpellInfo) -> Self {
        self.insert(spell);
        self
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpellInfo>> {
        self.spells.values()
    }
}

impl FromIterator<SpellInfo> for SpellBook {
    fn from_iter<T: IntoIterator<Item = SpellInfo>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |book, spell| book.with_spell(spell))
    }
}

impl SpellOracle for SpellBook {
    fn spell(&self, id: SpellId) -> Option<Arc<SpellInfo>> {
        self.spells.get(&id).cloned()
    }
}
