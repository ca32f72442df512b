//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use aura_core::{EngineConfig, SpellBook};

use crate::bundle::{ContentBundle, ContentTables};
use crate::loaders::{ConfigLoader, ContentTablesLoader, LoadResult, SpellLoader};

/// Content factory that loads all aura content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells.ron
/// └── tables.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the spell catalog from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellBook> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load mount and shapeshift tables from `tables.ron`.
    pub fn load_tables(&self) -> LoadResult<ContentTables> {
        ContentTablesLoader::load(&self.data_dir.join("tables.ron"))
    }

    /// Load spells and tables into one oracle bundle.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let spells = self.load_spells()?;
        let tables = self.load_tables()?;
        Ok(ContentBundle::new(spells, tables))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
