//! Inspect command - summarize an ECU definition

use std::path::Path;

use anyhow::Result;
use gds_catalog::DefinitionCatalog;
use gds_core::RequestNode;

use crate::output::{
    or_dash, ActuationRow, CurrentDataRow, DtcRow, IssueRow, OutputContext, ProcedureRow,
};

pub fn inspect(catalog: &DefinitionCatalog, definition: &Path, ctx: &OutputContext) -> Result<()> {
    if ctx.is_json() {
        return ctx.json(catalog);
    }

    let comm = &catalog.communication;
    ctx.print_kv(&[
        ("Definition", definition.display().to_string()),
        ("System", or_dash(catalog.system_id.as_deref())),
        ("Date", or_dash(catalog.date.as_deref())),
        (
            "Protocol",
            format!("{} ({:#x})", comm.protocol, comm.protocol.code()),
        ),
        ("Tester ID", or_dash(comm.tx_id.map(|id| format!("{:#x}", id)))),
        ("Module ID", format!("{:#x}", comm.rx_id)),
        ("VSS channel", or_dash(comm.vss_channel.as_deref())),
        (
            "Start requests",
            comm.start_requests
                .iter()
                .map(|r| r.request_payload.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
    ]);

    ctx.heading("Supported functions");
    for function in &comm.supported_functions {
        ctx.info(&format!(
            "  {} {}",
            or_dash(function.index),
            function.description
        ));
    }

    ctx.heading("Current data");
    let rows: Vec<CurrentDataRow> = catalog
        .current_data_ordered()
        .map(|node| CurrentDataRow {
            position: node.position,
            index: or_dash(node.index),
            name: node.name.clone(),
            request: node.request_payload.clone(),
            size: or_dash(node.size),
            equation: node.conversion.equation(),
            unit: if node.has_unit() {
                node.unit.clone()
            } else {
                String::new()
            },
        })
        .collect();
    ctx.table(&rows);

    ctx.heading("Actuation tests");
    let rows: Vec<ActuationRow> = catalog
        .actuation_tests
        .iter()
        .map(|test| ActuationRow {
            index: or_dash(test.index),
            name: test.name.clone(),
            condition: test.start_condition.clone(),
            start: request_text(test.start_request.as_ref()),
            stop: request_text(test.stop_request.as_ref()),
            end: request_text(test.end_request.as_ref()),
        })
        .collect();
    ctx.table(&rows);

    ctx.heading("Trouble code functions");
    let rows: Vec<DtcRow> = catalog
        .dtc_functions
        .iter()
        .enumerate()
        .map(|(i, function)| DtcRow {
            number: i + 1,
            requests: function
                .requests
                .iter()
                .map(|r| r.request_payload.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            codes: function.dtcs.len(),
            with_freeze_frame: function
                .dtcs
                .iter()
                .filter(|dtc| dtc.freeze_index.is_some())
                .count(),
        })
        .collect();
    ctx.table(&rows);

    ctx.heading("Procedures");
    let rows: Vec<ProcedureRow> = catalog
        .procedures
        .iter()
        .map(|procedure| ProcedureRow {
            index: or_dash(procedure.index),
            name: procedure.name.clone(),
            steps: procedure.steps.len(),
            description: procedure.description.clone(),
        })
        .collect();
    ctx.table(&rows);

    if !catalog.issues.is_empty() {
        ctx.heading("Issues");
        let rows: Vec<IssueRow> = catalog
            .issues
            .iter()
            .map(|issue| IssueRow {
                section: issue.section.to_string(),
                kind: format!("{:?}", issue.kind),
                entity: issue.entity.clone(),
                message: issue.message.clone(),
            })
            .collect();
        ctx.table(&rows);
        ctx.warn(&format!("{} definition issue(s)", catalog.issues.len()));
    }

    Ok(())
}

fn request_text(request: Option<&RequestNode>) -> String {
    or_dash(request.map(|r| r.request_payload.as_str()))
}
