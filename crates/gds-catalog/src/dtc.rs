//! Trouble code functions (`dtc`)

use gds_core::field;
use gds_core::{DocNode, Dtc, DtcFunction, LookupService};

use crate::builder::{entity_label, request_node, Builder};
use crate::error::Section;

impl<'a, L: LookupService> Builder<'a, L> {
    pub(crate) fn dtc_functions(&mut self, root: &DocNode) -> Vec<DtcFunction> {
        root.children_named("dtc")
            .map(|node| self.dtc_function(node))
            .collect()
    }

    fn dtc_function(&mut self, node: &DocNode) -> DtcFunction {
        let requests = node
            .find_all("requestcodetree/requestnode")
            .into_iter()
            .map(request_node)
            .collect();

        let dtcs = node
            .children_named("dtcitemtree")
            .map(|item| self.dtc(item))
            .collect();

        DtcFunction { requests, dtcs }
    }

    fn dtc(&mut self, item: &DocNode) -> Dtc {
        let entity = entity_label(item);
        Dtc {
            header: item.attr("header").map(String::from),
            index: self.optional(Section::Dtc, &entity, item.decimal_attr("index")),
            mask: self.optional(Section::Dtc, &entity, item.hex_attr("mask")),
            freeze_index: item
                .first_child("freezeindex")
                .and_then(|freeze| field::or_absent(freeze.decimal_attr("index"))),
        }
    }
}
