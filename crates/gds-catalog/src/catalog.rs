//! The normalized capability catalog of one ECU

use std::collections::BTreeMap;

use gds_core::{
    ActuationTestNode, CommunicationSetup, CurrentDataNode, DocNode, DtcFunction, LookupService,
    Procedure,
};
use serde::Serialize;
use tracing::info;

use crate::builder::Builder;
use crate::error::{CatalogIssue, CatalogResult};

/// Everything an ECU definition says about talking to the ECU
///
/// Built once per definition and never mutated afterwards; interpreter runs
/// borrow it read-only.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionCatalog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    /// Last-modified date of the definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub communication: CommunicationSetup,
    /// Telemetry registers keyed by position
    pub current_data: BTreeMap<u32, CurrentDataNode>,
    pub actuation_tests: Vec<ActuationTestNode>,
    pub dtc_functions: Vec<DtcFunction>,
    pub procedures: Vec<Procedure>,
    /// Entities skipped or degraded while building
    pub issues: Vec<CatalogIssue>,
}

impl DefinitionCatalog {
    /// Build the catalog from a parsed definition tree
    ///
    /// Fails only when the communication setup is unusable; every other
    /// problem is recorded in [`DefinitionCatalog::issues`].
    pub fn build<L: LookupService>(root: &DocNode, lookup: &L) -> CatalogResult<Self> {
        let system_id = root.attr("systemid").map(String::from);
        let label = system_id.clone().unwrap_or_else(|| "<unknown>".to_string());

        let mut builder = Builder::new(lookup);
        let communication = builder.communication(root, &label)?;
        let current_data = builder.current_data(root);
        let actuation_tests = builder.actuation_tests(root);
        let dtc_functions = builder.dtc_functions(root);
        let procedures = builder.procedures(root);

        info!(
            system_id = %label,
            protocol = %communication.protocol,
            current_data = current_data.len(),
            actuation_tests = actuation_tests.len(),
            dtc_functions = dtc_functions.len(),
            procedures = procedures.len(),
            issues = builder.issues.len(),
            "Loaded ECU definition"
        );

        Ok(Self {
            system_id,
            date: root.attr("date").map(String::from),
            communication,
            current_data,
            actuation_tests,
            dtc_functions,
            procedures,
            issues: builder.issues,
        })
    }

    /// Telemetry registers in position order
    pub fn current_data_ordered(&self) -> impl Iterator<Item = &CurrentDataNode> {
        self.current_data.values()
    }

    pub fn current_data_at(&self, position: u32) -> Option<&CurrentDataNode> {
        self.current_data.get(&position)
    }

    /// Procedure by its document index
    pub fn procedure(&self, index: u32) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.index == Some(index))
    }
}
