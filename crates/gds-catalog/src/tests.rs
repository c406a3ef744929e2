use gds_conv::Conversion;
use gds_core::{DocNode, LookupStore, Protocol, RequestNode};
use pretty_assertions::assert_eq;

use crate::{CatalogError, DefinitionCatalog, IssueKind, Section};

fn lookup() -> LookupStore {
    let mut store = LookupStore::new();
    store.insert_message("index", "1", "Current Data");
    store.insert_message("index", "2", "Actuation Test");
    store.insert_message("index", "40", "Fuel pump check");
    store.insert_message("fuctiondesc", "41", "Checks the fuel pump relay");
    store.insert_message("stepdesc", "100", "Turn ignition ON");
    store.insert_message("stepdesc", "101", "Is the pump audible?");
    store.insert_message("messageindex", "7", "Listen near the tank.\\nPress a key.");
    store.insert_message("unit", "12", "°C");
    store.insert_collection_entry("currentdata", "3", "Coolant Temperature");
    store.insert_collection_entry("currentdata", "4", "Fan State");
    store.insert_collection_entry("actuationtest", "9", "Radiator Fan");
    store.insert_collection_entry("actuationtest", "90", "Engine stopped");
    store.insert_symbol_table("55", vec!["OFF".to_string(), "ON".to_string()]);
    store
}

fn commset() -> DocNode {
    DocNode::new("commset")
        .with_attr("protocolid", "05")
        .with_attr("testerid", "7E0")
        .with_attr("moduleid", "7E8")
        .with_attr("vsschannel", "1")
        .with_child(
            DocNode::new("funcsupport")
                .with_child(DocNode::new("function").with_attr("index", "1"))
                .with_child(DocNode::new("function").with_attr("index", "2")),
        )
        .with_child(
            DocNode::new("startcomm")
                .with_child(
                    DocNode::new("requestnode")
                        .with_attr("request", "10 81")
                        .with_attr("response", "50 81"),
                )
                .with_child(
                    DocNode::new("requestnode")
                        .with_attr("request", "")
                        .with_attr("response", ""),
                ),
        )
}

fn data_node(index: &str, position: &str, rule: DocNode) -> DocNode {
    DocNode::new("currentdatanode")
        .with_attr("index", index)
        .with_attr("requestcode", "21 01")
        .with_attr("response", "61 01")
        .with_attr("startpos", "2")
        .with_attr("realpos", position)
        .with_attr("datasize", "1")
        .with_attr("minvalue", "00")
        .with_attr("maxvalue", "FF")
        .with_attr("unit", "12")
        .with_attr("floatrange", "1")
        .with_child(rule)
}

fn linear_rule(a: &str, b: &str) -> DocNode {
    DocNode::new("convrule")
        .with_attr("convtype", "1")
        .with_attr("A", a)
        .with_attr("B", b)
}

fn ecu(children: Vec<DocNode>) -> DocNode {
    DocNode::new("ecu")
        .with_attr("systemid", "ENG01")
        .with_attr("date", "2006-03-01")
        .with_child(commset())
        .with_children(children)
}

#[test]
fn test_communication_setup() {
    let catalog = DefinitionCatalog::build(&ecu(vec![]), &lookup()).unwrap();
    let comm = &catalog.communication;

    assert_eq!(catalog.system_id.as_deref(), Some("ENG01"));
    assert_eq!(catalog.date.as_deref(), Some("2006-03-01"));
    assert_eq!(comm.protocol, Protocol::Can);
    assert_eq!(comm.tx_id, Some(0x7E0));
    assert_eq!(comm.rx_id, 0x7E8);
    assert_eq!(comm.vss_channel.as_deref(), Some("1"));
    let functions: Vec<_> = comm
        .supported_functions
        .iter()
        .map(|f| (f.index, f.description.as_str()))
        .collect();
    assert_eq!(
        functions,
        vec![(Some(1), "Current Data"), (Some(2), "Actuation Test")]
    );
    assert_eq!(comm.start_requests, vec![RequestNode::new("10 81", "50 81")]);
    assert!(catalog.issues.is_empty());
}

#[test]
fn test_unknown_protocol_rejects_definition() {
    let mut root = ecu(vec![]);
    root.children[0] = commset().with_attr("protocolid", "07");
    let err = DefinitionCatalog::build(&root, &lookup()).unwrap_err();
    assert!(matches!(err, CatalogError::Protocol { ref system_id, .. } if system_id == "ENG01"));
}

#[test]
fn test_missing_commset_rejects_definition() {
    let root = DocNode::new("ecu").with_attr("systemid", "ENG01");
    assert_eq!(
        DefinitionCatalog::build(&root, &lookup()).unwrap_err(),
        CatalogError::MissingSection {
            system_id: "ENG01".to_string(),
            section: "commset"
        }
    );
}

#[test]
fn test_malformed_addresses_degrade() {
    let mut root = ecu(vec![]);
    root.children[0] = commset()
        .with_attr("testerid", "zz")
        .with_attr("moduleid", "");
    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    assert_eq!(catalog.communication.tx_id, None);
    assert_eq!(catalog.communication.rx_id, 0);
    assert_eq!(catalog.issues.len(), 2);
    assert!(catalog
        .issues
        .iter()
        .all(|i| i.section == Section::Communication && i.kind == IssueKind::Degraded));
}

#[test]
fn test_current_data_nodes() {
    let bitfield = DocNode::new("convrule")
        .with_attr("convtype", "3")
        .with_attr("A", "55")
        .with_attr("C", "4")
        .with_attr("D", "F0");
    let root = ecu(vec![DocNode::new("currentdata")
        .with_child(data_node("3", "1", linear_rule("0.75", "48")))
        .with_child(data_node("4", "0", bitfield))]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let names: Vec<_> = catalog
        .current_data_ordered()
        .map(|n| (n.position, n.name.as_str()))
        .collect();
    assert_eq!(names, vec![(0, "Fan State"), (1, "Coolant Temperature")]);

    let coolant = catalog.current_data_at(1).unwrap();
    assert_eq!(coolant.index, Some(3));
    assert_eq!(coolant.unit, "°C");
    assert_eq!(coolant.unit_key, Some(12));
    assert_eq!(coolant.response_start_position, Some(2));
    assert_eq!(coolant.max_value, Some(0xFF));
    assert_eq!(coolant.decimal_points, Some(1));
    assert_eq!(
        coolant.conversion,
        Conversion::Linear {
            factor: 0.75,
            offset: -48.0
        }
    );
    assert_eq!(coolant.display(&[0x61, 0x01, 0x00, 0xA0]).as_deref(), Some("72.0"));

    let fan = catalog.current_data_at(0).unwrap();
    assert_eq!(fan.conversion.equation(), "((X & 0xf0) >> 4) -> [OFF|ON]");
    assert!(catalog.issues.is_empty());
}

#[test]
fn test_failed_conversion_skips_only_that_node() {
    let unknown = DocNode::new("convrule").with_attr("convtype", "9");
    let no_factor = DocNode::new("convrule").with_attr("convtype", "2");
    let root = ecu(vec![DocNode::new("currentdata")
        .with_child(data_node("3", "0", unknown))
        .with_child(data_node("4", "1", no_factor))
        .with_child(data_node("5", "2", linear_rule("1", "")))]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    assert_eq!(catalog.current_data.keys().copied().collect::<Vec<_>>(), vec![2]);
    let skipped: Vec<_> = catalog
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::Skipped)
        .map(|i| i.entity.as_str())
        .collect();
    assert_eq!(skipped, vec!["index 3", "index 4"]);
}

#[test]
fn test_missing_symbol_table_degrades() {
    let bitfield = DocNode::new("convrule")
        .with_attr("convtype", "3")
        .with_attr("A", "999")
        .with_attr("D", "03");
    let root = ecu(vec![
        DocNode::new("currentdata").with_child(data_node("4", "0", bitfield))
    ]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let fan = catalog.current_data_at(0).unwrap();
    assert_eq!(fan.conversion.format(0x01, None), "");
    assert_eq!(catalog.issues.len(), 1);
    assert_eq!(catalog.issues[0].kind, IssueKind::Degraded);
}

#[test]
fn test_duplicate_position_last_write_wins() {
    let root = ecu(vec![DocNode::new("currentdata")
        .with_child(data_node("3", "5", linear_rule("1", "")))
        .with_child(data_node("4", "2", linear_rule("1", "")))
        .with_child(data_node("9", "5", linear_rule("2", "")))]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let order: Vec<_> = catalog
        .current_data_ordered()
        .map(|n| (n.position, n.index))
        .collect();
    assert_eq!(order, vec![(2, Some(4)), (5, Some(9))]);
}

#[test]
fn test_malformed_optional_fields_become_absent() {
    let node = data_node("3", "0", linear_rule("1", ""))
        .with_attr("floatrange", "two")
        .with_attr("minvalue", "");
    let root = ecu(vec![DocNode::new("currentdata").with_child(node)]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let data = catalog.current_data_at(0).unwrap();
    assert_eq!(data.decimal_points, None);
    assert_eq!(data.min_value, None);
    assert_eq!(catalog.issues.len(), 1);
}

#[test]
fn test_actuation_tests_with_missing_phase() {
    let node = DocNode::new("actuationtestnode")
        .with_attr("index", "9")
        .with_attr("actuationtestcondition", "90")
        .with_attr("actuationtesttime", "10")
        .with_child(DocNode::new("starttest").with_child(
            DocNode::new("requestnode")
                .with_attr("request", "30 11 07")
                .with_attr("response", "70 11"),
        ))
        .with_child(DocNode::new("endtest").with_child(
            DocNode::new("requestnode")
                .with_attr("request", "30 11 00")
                .with_attr("response", "70 11"),
        ));
    let root = ecu(vec![DocNode::new("actuationtest").with_child(node)]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let test = &catalog.actuation_tests[0];
    assert_eq!(test.name, "Radiator Fan");
    assert_eq!(test.start_condition, "Engine stopped");
    assert_eq!(test.stop_condition, "");
    assert_eq!(test.time, Some(10));
    assert_eq!(test.request_time, None);
    assert_eq!(
        test.start_request,
        Some(RequestNode::new("30 11 07", "70 11"))
    );
    assert_eq!(test.stop_request, None);
    assert!(test.end_request.is_some());
}

#[test]
fn test_dtc_functions() {
    let dtc = DocNode::new("dtc")
        .with_child(
            DocNode::new("requestcodetree").with_child(
                DocNode::new("requestnode")
                    .with_attr("request", "18 00 FF 00")
                    .with_attr("response", "58")
                    .with_attr("index", "1"),
            ),
        )
        .with_child(
            DocNode::new("dtcitemtree")
                .with_attr("header", "P")
                .with_attr("index", "301")
                .with_attr("mask", "0x0301")
                .with_child(DocNode::new("freezeindex").with_attr("index", "4")),
        )
        .with_child(
            DocNode::new("dtcitemtree")
                .with_attr("header", "P")
                .with_attr("index", "302"),
        );
    let root = ecu(vec![dtc]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let function = &catalog.dtc_functions[0];
    assert_eq!(function.requests[0].index, Some(1));
    assert_eq!(function.dtcs.len(), 2);
    assert_eq!(function.dtcs[0].mask, Some(0x0301));
    assert_eq!(function.dtcs[0].freeze_index, Some(4));
    assert_eq!(function.dtcs[1].freeze_index, None);
}

#[test]
fn test_procedures() {
    let step2 = DocNode::new("step")
        .with_attr("stepno", "2")
        .with_attr("stepdesc", "101")
        .with_child(
            DocNode::new("message")
                .with_attr("messageindex", "7")
                .with_child(
                    DocNode::new("request").with_attr("request", "30 11 07").with_child(
                        DocNode::new("response")
                            .with_attr("responsevalue", "70 11")
                            .with_attr("datasize", "1")
                            .with_attr("startposition", "2")
                            .with_child(
                                DocNode::new("comcode")
                                    .with_attr("code", "01")
                                    .with_attr("compare", "1")
                                    .with_attr("jumpstep", "0"),
                            )
                            .with_child(
                                DocNode::new("comcode")
                                    .with_attr("code", "01")
                                    .with_attr("compare", "0"),
                            ),
                    ),
                ),
        );
    let step1 = DocNode::new("step")
        .with_attr("stepno", "1")
        .with_attr("stepdesc", "100")
        .with_child(DocNode::new("message").with_attr("messageindex", "0"))
        .with_child(
            DocNode::new("keystring")
                .with_attr("filename", "Yes")
                .with_attr("type", "1")
                .with_attr("jumpstep", "2"),
        )
        .with_child(
            DocNode::new("keystring")
                .with_attr("filename", "No")
                .with_attr("type", "1"),
        );
    // Steps arrive out of order and are sorted by step number
    let function = DocNode::new("addfunction")
        .with_attr("fuctionindex", "40")
        .with_attr("fuctiondesc", "41")
        .with_child(step2)
        .with_child(step1);
    let root = ecu(vec![function]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let procedure = catalog.procedure(40).unwrap();
    assert_eq!(procedure.name, "Fuel pump check");
    assert_eq!(procedure.description, "Checks the fuel pump relay");
    assert_eq!(
        procedure.steps.iter().map(|s| s.step_no).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let first = procedure.step(1).unwrap();
    assert_eq!(first.description, "Turn ignition ON");
    assert_eq!(first.message, None);
    assert!(first.awaits_selection());
    assert_eq!(first.keystrings[0].jump_step, Some(2));
    assert_eq!(first.keystrings[1].jump_step, None);

    let second = procedure.step(2).unwrap();
    assert_eq!(
        second.message_lines(),
        vec!["Listen near the tank.", "Press a key."]
    );
    assert_eq!(second.rules.len(), 1);
    let rule = &second.rules[0];
    assert_eq!(rule.request_payload, "30 11 07");
    assert_eq!(rule.response_format.to_string(), "70 11");
    assert!(rule.response_format.matches_prefix(&[0x70, 0x11, 0x01]));
    assert_eq!(rule.start_position, 2);
    // The comparison without a jump step is dropped and reported
    assert_eq!(rule.codes.len(), 1);
    assert!(rule.codes[0].compare_equal);
    assert_eq!(catalog.issues.len(), 1);
    assert_eq!(catalog.issues[0].section, Section::Procedure);
}

#[test]
fn test_malformed_response_format_skips_rule() {
    let step = DocNode::new("step")
        .with_attr("stepno", "1")
        .with_attr("stepdesc", "100")
        .with_child(
            DocNode::new("message").with_child(
                DocNode::new("request").with_attr("request", "30 11 07").with_child(
                    DocNode::new("response")
                        .with_attr("responsevalue", "7G 11")
                        .with_attr("datasize", "1")
                        .with_child(
                            DocNode::new("comcode")
                                .with_attr("code", "01")
                                .with_attr("compare", "1")
                                .with_attr("jumpstep", "0"),
                        ),
                ),
            ),
        );
    let function = DocNode::new("addfunction")
        .with_attr("fuctionindex", "40")
        .with_child(step);
    let root = ecu(vec![function]);

    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let step = catalog.procedure(40).unwrap().step(1).unwrap();
    assert!(step.rules.is_empty());
    assert_eq!(catalog.issues.len(), 1);
    assert_eq!(catalog.issues[0].kind, IssueKind::Skipped);
    assert!(catalog.issues[0].message.contains("7G"));
}

#[test]
fn test_catalog_serializes() {
    let root = ecu(vec![
        DocNode::new("currentdata").with_child(data_node("3", "1", linear_rule("1", "40")))
    ]);
    let catalog = DefinitionCatalog::build(&root, &lookup()).unwrap();
    let json = serde_json::to_value(&catalog).unwrap();
    assert_eq!(json["communication"]["protocol"], "can");
    assert_eq!(json["current_data"]["1"]["conversion"]["kind"], "linear");
    assert_eq!(json["current_data"]["1"]["conversion"]["offset"], -40.0);
}
