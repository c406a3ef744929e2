//! Shared state while walking one definition tree

use gds_core::field;
use gds_core::{DocNode, FieldError, LookupService, RequestNode};
use tracing::warn;

use crate::error::{CatalogIssue, IssueKind, Section};

pub(crate) struct Builder<'a, L: LookupService> {
    pub(crate) lookup: &'a L,
    pub(crate) issues: Vec<CatalogIssue>,
}

impl<'a, L: LookupService> Builder<'a, L> {
    pub(crate) fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            issues: Vec::new(),
        }
    }

    /// Record a problem and log it
    pub(crate) fn issue(
        &mut self,
        section: Section,
        kind: IssueKind,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) {
        let issue = CatalogIssue {
            section,
            kind,
            entity: entity.into(),
            message: message.into(),
        };
        warn!(%issue, "Definition issue");
        self.issues.push(issue);
    }

    /// Read an optional field; malformed values become absent and are reported
    pub(crate) fn optional<T>(
        &mut self,
        section: Section,
        entity: &str,
        result: Result<Option<T>, FieldError>,
    ) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.issue(section, IssueKind::Degraded, entity, e.to_string());
                None
            }
        }
    }

    /// Message text for the key held by `attribute` of `node`
    pub(crate) fn message(&self, node: &DocNode, attribute: &str, message_attribute: &str) -> String {
        node.attr(attribute)
            .map(|key| self.lookup.resolve_message(key, message_attribute))
            .unwrap_or_default()
    }

    /// Collection text for the key held by `attribute` of `node`
    pub(crate) fn collection(&self, node: &DocNode, attribute: &str, collection: &str) -> String {
        node.attr(attribute)
            .map(|key| self.lookup.resolve_collection_entry(key, collection))
            .unwrap_or_default()
    }
}

/// Read a `request`/`response` element
pub(crate) fn request_node(node: &DocNode) -> RequestNode {
    RequestNode {
        request_payload: node.attr("request").unwrap_or_default().to_string(),
        response_prefix: node.attr("response").unwrap_or_default().to_string(),
        index: field::or_absent(node.decimal_attr("index")),
    }
}

/// Human-readable entity label from an `index` attribute
pub(crate) fn entity_label(node: &DocNode) -> String {
    match node.attr("index") {
        Some(index) => format!("index {}", index),
        None => format!("<{}> without index", node.tag),
    }
}
