//! Spell catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use aura_core::{SpellBook, SpellInfo};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<SpellInfo>,
}

/// Loader for spell catalogs from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpellBook> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a catalog, rejecting duplicate spell ids and effects that
    /// trigger a spell missing from the catalog.
    pub fn parse(content: &str) -> LoadResult<SpellBook> {
        let catalog: SpellCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut ids = BTreeSet::new();
        for spell in &catalog.spells {
            if !ids.insert(spell.id) {
                anyhow::bail!("Duplicate spell {} in catalog", spell.id);
            }
        }
        for spell in &catalog.spells {
            for trigger in spell.effects.iter().filter_map(|effect| effect.trigger_spell) {
                if !ids.contains(&trigger) {
                    anyhow::bail!("Spell {} triggers unknown spell {}", spell.id, trigger);
                }
            }
        }

        tracing::debug!(spells = catalog.spells.len(), "spell catalog loaded");
        Ok(catalog.spells.into_iter().collect())
    }
}
