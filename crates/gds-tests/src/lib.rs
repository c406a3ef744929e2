//! Integration tests for the GDS definition pipeline
//!
//! Tests load a definition tree, lookup store and scripted ECU responses
//! from `fixtures/`, build the catalog and run guided procedures end to end.
//!
//! # Test Structure
//!
//! - `catalog_test.rs` - catalog construction and telemetry decoding
//! - `procedure_test.rs` - guided procedure runs over scripted responses

use std::path::PathBuf;

use gds_catalog::DefinitionCatalog;
use gds_core::{DocNode, LookupStore, MockTransport};

/// Path of a file under `fixtures/`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Lookup store from `fixtures/lookup.yaml` with `fixtures/lut` for symbol tables
pub fn lookup() -> LookupStore {
    LookupStore::from_file(fixture_path("lookup.yaml"))
        .unwrap()
        .with_lut_dir(fixture_path("lut"))
}

/// The engine ECU definition tree
pub fn engine_tree() -> DocNode {
    DocNode::from_file(fixture_path("engine.yaml")).unwrap()
}

/// Catalog of the engine ECU
pub fn engine_catalog() -> DefinitionCatalog {
    DefinitionCatalog::build(&engine_tree(), &lookup()).unwrap()
}

/// Transport answering from `fixtures/responses.yaml`
pub fn scripted_transport() -> MockTransport {
    let script = std::fs::read_to_string(fixture_path("responses.yaml")).unwrap();
    MockTransport::from_script(&script).unwrap()
}
