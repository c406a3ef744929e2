//! Guided procedures (`addfunction`)

use std::collections::BTreeMap;

use gds_core::{
    BytePattern, ComparisonCode, DocNode, Keystring, LookupService, Procedure, ProcedureStep,
    ResponseRule,
};

use crate::builder::Builder;
use crate::error::{IssueKind, Section};

const SECTION: Section = Section::Procedure;

impl<'a, L: LookupService> Builder<'a, L> {
    pub(crate) fn procedures(&mut self, root: &DocNode) -> Vec<Procedure> {
        root.children_named("addfunction")
            .map(|node| self.procedure(node))
            .collect()
    }

    fn procedure(&mut self, node: &DocNode) -> Procedure {
        let entity = match node.attr("fuctionindex") {
            Some(index) => format!("function {}", index),
            None => "function without index".to_string(),
        };

        let mut steps = BTreeMap::new();
        for step_node in node.children_named("step") {
            if let Some(step) = self.step(&entity, step_node) {
                let step_no = step.step_no;
                if steps.insert(step_no, step).is_some() {
                    self.issue(
                        SECTION,
                        IssueKind::Degraded,
                        &entity,
                        format!("step {} declared twice, keeping the later one", step_no),
                    );
                }
            }
        }

        Procedure {
            index: self.optional(SECTION, &entity, node.decimal_attr("fuctionindex")),
            name: self.message(node, "fuctionindex", "index"),
            description: self.message(node, "fuctiondesc", "fuctiondesc"),
            steps: steps.into_values().collect(),
        }
    }

    fn step(&mut self, procedure: &str, node: &DocNode) -> Option<ProcedureStep> {
        let step_no = match node.decimal_attr::<u32>("stepno") {
            Ok(Some(step_no)) if step_no > 0 => step_no,
            Ok(_) => {
                self.issue(SECTION, IssueKind::Skipped, procedure, "step without stepno");
                return None;
            }
            Err(e) => {
                self.issue(SECTION, IssueKind::Skipped, procedure, e.to_string());
                return None;
            }
        };
        let entity = format!("{} step {}", procedure, step_no);

        let message_node = node.first_child("message");
        let message_index = message_node
            .and_then(|m| self.optional(SECTION, &entity, m.decimal_attr("messageindex")))
            .unwrap_or(0);
        let message = match (message_index, message_node) {
            (0, _) | (_, None) => None,
            (_, Some(m)) => Some(self.message(m, "messageindex", "messageindex")),
        };

        let keystrings = node
            .children_named("keystring")
            .map(|k| Keystring {
                label: k.attr("filename").unwrap_or_default().to_string(),
                jump_step: self.optional(SECTION, &entity, k.decimal_attr("jumpstep")),
                selection_type: self
                    .optional(SECTION, &entity, k.decimal_attr("type"))
                    .unwrap_or(0),
            })
            .collect();

        let mut rules = Vec::new();
        if let Some(m) = message_node {
            for request in m.children_named("request") {
                let payload = request
                    .attr("request")
                    .or_else(|| request.attr("requestcode"))
                    .unwrap_or_default();
                for response in &request.children {
                    if let Some(rule) = self.response_rule(&entity, payload, response) {
                        rules.push(rule);
                    }
                }
            }
        }

        Some(ProcedureStep {
            step_no,
            description: self.message(node, "stepdesc", "stepdesc"),
            message_index,
            message,
            keystrings,
            rules,
        })
    }

    fn response_rule(
        &mut self,
        entity: &str,
        payload: &str,
        node: &DocNode,
    ) -> Option<ResponseRule> {
        let data_size = match node.decimal_attr::<usize>("datasize") {
            Ok(Some(size)) => size,
            Ok(None) => {
                self.issue(SECTION, IssueKind::Skipped, entity, "response without datasize");
                return None;
            }
            Err(e) => {
                self.issue(SECTION, IssueKind::Skipped, entity, e.to_string());
                return None;
            }
        };
        let response_format =
            match BytePattern::parse(node.attr("responsevalue").unwrap_or_default()) {
                Ok(format) => format,
                Err(e) => {
                    self.issue(SECTION, IssueKind::Skipped, entity, e.to_string());
                    return None;
                }
            };
        let start_position = self
            .optional(SECTION, entity, node.decimal_attr("startposition"))
            .unwrap_or(0);

        let mut codes = Vec::new();
        for comcode in node.children_named("comcode") {
            let code = self.optional(SECTION, entity, comcode.hex_attr("code"));
            let jump_step = self.optional(SECTION, entity, comcode.decimal_attr("jumpstep"));
            match (code, jump_step) {
                (Some(code), Some(jump_step)) => codes.push(ComparisonCode {
                    code,
                    compare_equal: comcode.attr("compare") == Some("1"),
                    jump_step,
                }),
                _ => self.issue(
                    SECTION,
                    IssueKind::Skipped,
                    entity,
                    "comparison code without code or jumpstep",
                ),
            }
        }

        Some(ResponseRule {
            request_payload: payload.to_string(),
            response_format,
            data_size,
            start_position,
            codes,
        })
    }
}
