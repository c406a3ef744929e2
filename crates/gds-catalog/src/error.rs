//! Catalog errors and per-entity issues

use std::fmt;

use gds_core::ProtocolError;
use serde::Serialize;
use thiserror::Error;

/// Result type for catalog construction
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures that reject a whole ECU definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A section every definition must have is absent
    #[error("ECU {system_id}: missing section '{section}'")]
    MissingSection {
        system_id: String,
        section: &'static str,
    },

    /// The bus protocol cannot be identified, so no request can be framed
    #[error("ECU {system_id}: {source}")]
    Protocol {
        system_id: String,
        #[source]
        source: ProtocolError,
    },
}

/// Section of the definition an issue was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Communication,
    CurrentData,
    ActuationTest,
    Dtc,
    Procedure,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Communication => "communication",
            Section::CurrentData => "current data",
            Section::ActuationTest => "actuation test",
            Section::Dtc => "dtc",
            Section::Procedure => "procedure",
        };
        f.write_str(s)
    }
}

/// How an issue affected the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The entity was left out of the catalog
    Skipped,
    /// The entity was kept with a default or blank value
    Degraded,
}

/// A non-fatal problem found while building the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogIssue {
    pub section: Section,
    pub kind: IssueKind,
    /// Identifies the entity, e.g. `index 12`
    pub entity: String,
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IssueKind::Skipped => "skipped",
            IssueKind::Degraded => "degraded",
        };
        write!(
            f,
            "[{}] {} {}: {}",
            self.section, kind, self.entity, self.message
        )
    }
}
