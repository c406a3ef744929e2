//! gds-catalog - normalized capability catalog of a GDS ECU definition
//!
//! Consumes one parsed definition tree plus a [`gds_core::LookupService`]
//! and produces a [`DefinitionCatalog`]: communication setup, telemetry
//! registers, actuation tests, trouble-code functions and guided procedures.
//!
//! Sections are built in document-independent order: communication first
//! (a definition whose protocol cannot be identified is rejected), then
//! current data, actuation tests, trouble codes and procedures. A broken
//! entity in one section never blocks the others.

mod actuation;
mod builder;
mod catalog;
mod comm;
mod current_data;
mod dtc;
pub mod error;
mod procedure;

pub use catalog::DefinitionCatalog;
pub use error::{CatalogError, CatalogIssue, CatalogResult, IssueKind, Section};

#[cfg(test)]
mod tests;
