//! Actuation tests (`actuationtest/actuationtestnode`)

use gds_core::{ActuationTestNode, DocNode, LookupService, RequestNode};

use crate::builder::{entity_label, request_node, Builder};
use crate::error::Section;

const COLLECTION: &str = "actuationtest";

impl<'a, L: LookupService> Builder<'a, L> {
    pub(crate) fn actuation_tests(&mut self, root: &DocNode) -> Vec<ActuationTestNode> {
        root.find_all("actuationtest/actuationtestnode")
            .into_iter()
            .map(|node| self.actuation_test(node))
            .collect()
    }

    fn actuation_test(&mut self, node: &DocNode) -> ActuationTestNode {
        let entity = entity_label(node);
        ActuationTestNode {
            index: self.optional(Section::ActuationTest, &entity, node.decimal_attr("index")),
            name: self.collection(node, "index", COLLECTION),
            start_condition: self.collection(node, "actuationtestcondition", COLLECTION),
            stop_condition: self.collection(node, "stopcondition", COLLECTION),
            request_condition: self.collection(node, "requestcondition", COLLECTION),
            time: self.optional(
                Section::ActuationTest,
                &entity,
                node.decimal_attr("actuationtesttime"),
            ),
            request_time: self.optional(
                Section::ActuationTest,
                &entity,
                node.decimal_attr("requesttime"),
            ),
            start_request: phase_request(node, "starttest"),
            stop_request: phase_request(node, "stoptest"),
            end_request: phase_request(node, "endtest"),
        }
    }
}

/// First request under a phase element, absent when the phase is omitted
fn phase_request(node: &DocNode, phase: &str) -> Option<RequestNode> {
    node.first_child(phase)
        .and_then(|phase| phase.children.first())
        .map(request_node)
}
