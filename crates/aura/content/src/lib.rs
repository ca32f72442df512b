//! Data-driven aura content and loaders.
//!
//! This crate houses the static tables the aura engine consults through its
//! oracles and provides loaders for RON/TOML data files:
//! - Spell catalogs (data-driven via RON)
//! - Mount capabilities and shapeshift forms (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Content is consumed by the engine through [`aura_core::SpellOracle`] and
//! [`aura_core::ContentOracle`] and never appears in aura state.

pub mod bundle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::{ContentBundle, ContentTables, MountCapability};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ContentTablesLoader, LoadResult, SpellLoader};
