//! Telemetry registers (`currentdata/currentdatanode`)

use std::collections::BTreeMap;

use gds_conv::{resolve, ConversionParams, SymbolTableSource};
use gds_core::{CurrentDataNode, DocNode, LookupService};
use tracing::debug;

use crate::builder::{entity_label, Builder};
use crate::error::{IssueKind, Section};

impl<'a, L: LookupService> Builder<'a, L> {
    /// Build every telemetry node, keyed by position
    ///
    /// Later nodes overwrite earlier ones at the same position.
    pub(crate) fn current_data(&mut self, root: &DocNode) -> BTreeMap<u32, CurrentDataNode> {
        let mut nodes = BTreeMap::new();
        for node in root.find_all("currentdata/currentdatanode") {
            if let Some(data_node) = self.current_data_node(node) {
                if let Some(previous) = nodes.insert(data_node.position, data_node) {
                    debug!(
                        position = previous.position,
                        replaced = ?previous.index,
                        "Telemetry position declared twice, keeping the later node"
                    );
                }
            }
        }
        nodes
    }

    fn current_data_node(&mut self, node: &DocNode) -> Option<CurrentDataNode> {
        const SECTION: Section = Section::CurrentData;
        let entity = entity_label(node);

        let position = match node.decimal_attr::<u32>("realpos") {
            Ok(Some(position)) => position,
            Ok(None) => {
                self.issue(SECTION, IssueKind::Skipped, &entity, "missing realpos");
                return None;
            }
            Err(e) => {
                self.issue(SECTION, IssueKind::Skipped, &entity, e.to_string());
                return None;
            }
        };

        let Some(rule) = node.first_child("convrule") else {
            self.issue(SECTION, IssueKind::Skipped, &entity, "missing convrule");
            return None;
        };
        let kind = match rule.decimal_attr::<u32>("convtype") {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                self.issue(SECTION, IssueKind::Skipped, &entity, "missing convtype");
                return None;
            }
            Err(e) => {
                self.issue(SECTION, IssueKind::Skipped, &entity, e.to_string());
                return None;
            }
        };
        let params = ConversionParams::new(
            rule.raw_attr("A"),
            rule.raw_attr("B"),
            rule.raw_attr("C"),
            rule.raw_attr("D"),
        );
        let symbols: &dyn SymbolTableSource = self.lookup;
        let resolved = match resolve(kind, &params, Some(symbols)) {
            Ok(resolved) => resolved,
            Err(e) => {
                self.issue(SECTION, IssueKind::Skipped, &entity, e.to_string());
                return None;
            }
        };
        for warning in &resolved.warnings {
            self.issue(SECTION, IssueKind::Degraded, &entity, warning.to_string());
        }

        let index = self.optional(SECTION, &entity, node.decimal_attr("index"));
        let response_start_position = self.optional(SECTION, &entity, node.decimal_attr("startpos"));
        let size = self.optional(SECTION, &entity, node.decimal_attr("datasize"));
        let min_value = self.optional(SECTION, &entity, node.hex_attr("minvalue"));
        let max_value = self.optional(SECTION, &entity, node.hex_attr("maxvalue"));
        let unit_key = self.optional(SECTION, &entity, node.decimal_attr("unit"));
        let decimal_points = self.optional(SECTION, &entity, node.decimal_attr("floatrange"));

        Some(CurrentDataNode {
            index,
            name: self.collection(node, "index", "currentdata"),
            request_payload: node.attr("requestcode").unwrap_or_default().to_string(),
            response_prefix: node.attr("response").unwrap_or_default().to_string(),
            response_start_position,
            position,
            size,
            data_type: node.attr("datatype").map(String::from),
            min_value,
            max_value,
            unit_key,
            unit: self.message(node, "unit", "unit"),
            decimal_points,
            conversion: resolved.conversion,
        })
    }
}
