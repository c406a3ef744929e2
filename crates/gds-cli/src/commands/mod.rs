//! Command implementations for gds

pub mod decode;
pub mod inspect;
pub mod run;

pub use decode::decode;
pub use inspect::inspect;
pub use run::run;

use std::path::Path;

use anyhow::{Context, Result};
use gds_catalog::DefinitionCatalog;
use gds_core::{DocNode, LookupStore};
use tracing::debug;

use crate::config::MergedConfig;

/// Load every lookup file in order; later files override earlier keys
pub fn load_lookup(config: &MergedConfig) -> Result<LookupStore> {
    let mut store = LookupStore::new();
    for path in &config.lookup {
        let file = LookupStore::from_file(path)
            .with_context(|| format!("Failed to load lookup file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded lookup file");
        store.merge(file);
    }
    if let Some(dir) = &config.lut_dir {
        store = store.with_lut_dir(dir.clone());
    }
    Ok(store)
}

/// Parse a definition tree and build its catalog
pub fn load_catalog(definition: &Path, lookup: &LookupStore) -> Result<DefinitionCatalog> {
    let root = DocNode::from_file(definition)
        .with_context(|| format!("Failed to read definition: {}", definition.display()))?;
    DefinitionCatalog::build(&root, lookup)
        .with_context(|| format!("Rejected definition: {}", definition.display()))
}
