//! Communication setup (`commset`)

use gds_core::{CommunicationSetup, DocNode, LookupService, Protocol, SupportedFunction};
use tracing::debug;

use crate::builder::{request_node, Builder};
use crate::error::{CatalogError, CatalogResult, IssueKind, Section};

impl<'a, L: LookupService> Builder<'a, L> {
    pub(crate) fn communication(
        &mut self,
        root: &DocNode,
        system_id: &str,
    ) -> CatalogResult<CommunicationSetup> {
        let commset = root
            .first_child("commset")
            .ok_or_else(|| CatalogError::MissingSection {
                system_id: system_id.to_string(),
                section: "commset",
            })?;

        let protocol =
            Protocol::parse(commset.raw_attr("protocolid")).map_err(|source| {
                CatalogError::Protocol {
                    system_id: system_id.to_string(),
                    source,
                }
            })?;

        let entity = "commset";
        let tx_id = self
            .optional(Section::Communication, entity, commset.hex_attr("testerid"))
            .and_then(|id| self.address(entity, "testerid", id));
        let rx_id = self
            .optional(Section::Communication, entity, commset.hex_attr("moduleid"))
            .and_then(|id| self.address(entity, "moduleid", id));
        let rx_id = match rx_id {
            Some(id) => id,
            None => {
                self.issue(
                    Section::Communication,
                    IssueKind::Degraded,
                    entity,
                    "no usable moduleid, addressing module 0x0",
                );
                0
            }
        };

        let supported_functions = commset
            .first_child("funcsupport")
            .map(|list| {
                list.children
                    .iter()
                    .map(|function| SupportedFunction {
                        index: self.optional(
                            Section::Communication,
                            "funcsupport",
                            function.decimal_attr("index"),
                        ),
                        description: self.message(function, "index", "index"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let start_requests = commset
            .find_all("startcomm/requestnode")
            .into_iter()
            .filter(|node| node.attr("request").is_some())
            .map(request_node)
            .collect();

        let setup = CommunicationSetup {
            tx_id,
            rx_id,
            vss_channel: commset.attr("vsschannel").map(String::from),
            protocol,
            supported_functions,
            start_requests,
        };
        debug!(%setup, "Communication setup");
        Ok(setup)
    }

    fn address(&mut self, entity: &str, field: &str, id: u64) -> Option<u32> {
        match u32::try_from(id) {
            Ok(id) => Some(id),
            Err(_) => {
                self.issue(
                    Section::Communication,
                    IssueKind::Degraded,
                    entity,
                    format!("{} {:#x} does not fit a bus address", field, id),
                );
                None
            }
        }
    }
}
