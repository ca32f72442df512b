//! Engine configuration loader.

use std::path::Path;

use aura_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to the [`EngineConfig`] defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
