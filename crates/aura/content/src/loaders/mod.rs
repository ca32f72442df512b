//! Content loaders for reading aura data from files.
//!
//! This module provides loaders that convert RON/TOML files into the
//! oracle implementations in [`crate::bundle`].

pub mod config;
pub mod factory;
pub mod spells;
pub mod tables;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use spells::SpellLoader;
pub use tables::ContentTablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
