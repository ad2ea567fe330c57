//! End-to-end checks across the crate's public surface: document → graph →
//! snapshot JSON → graph → document, plus a short editing session.

use dialog::edit;
use dialog::graph::Position;
use dialog::{Document, NodeId, Snapshot, build, reconstruct, validate};
use serde_json::Value;

const FIXTURE: &str = include_str!("fixtures/dialogs.json");

fn fixture() -> Document {
    Document::from_json(FIXTURE).expect("fixture parses")
}

fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).expect("fixture is json")
}

fn to_value(doc: &Document) -> Value {
    serde_json::to_value(doc).expect("document serializes")
}

#[test]
fn document_survives_graph_round_trip() {
    let doc = fixture();
    let graph = build(&doc).expect("build");
    let exported = reconstruct(&graph, doc.replace).expect("export");
    assert_eq!(to_value(&exported), fixture_value());
}

#[test]
fn document_survives_snapshot_json() {
    let doc = fixture();
    let graph = build(&doc).expect("build");
    let text = serde_json::to_string(&Snapshot::from_graph(&graph, doc.replace)).expect("snapshot json");

    let snapshot: Snapshot = serde_json::from_str(&text).expect("snapshot parses");
    let decoded = snapshot.into_graph().expect("decode");
    assert!(validate(&decoded).is_empty());

    let exported = reconstruct(&decoded, snapshot.replace).expect("export");
    assert_eq!(to_value(&exported), fixture_value());
}

#[test]
fn whole_numbers_stay_integers() {
    let graph = build(&fixture()).expect("build");
    let text = serde_json::to_string(&reconstruct(&graph, Some(true)).expect("export")).expect("json");
    assert!(text.contains(r#""duration":3,"#));
    assert!(text.contains(r#""duration":2.5,"#));
    assert!(!text.contains("3.0"));
}

#[test]
fn start_is_laid_out_first() {
    let graph = build(&fixture()).expect("build");
    let start = graph.start_node().expect("start");
    assert_eq!(start.id, NodeId::line("greeting"));
    assert!(graph.nodes.iter().all(|node| node.position.x >= start.position.x));
    let far = graph.node(&NodeId::line("jobDetails")).expect("jobDetails");
    assert!(far.position.x > start.position.x);
}

#[test]
fn editing_session_exports_the_edited_dialog() {
    let doc = fixture();
    let mut graph = build(&doc).expect("build");
    let first_choice = NodeId::choice_set("firstChoice");

    graph = edit::rename(&graph, &NodeId::line("askJob"), "offerJob").expect("rename");
    graph = edit::remove_choice(&graph, &first_choice, 1).expect("remove row");
    graph = edit::add_line(&graph, "thanks", Position::new(0.0, 900.0)).expect("add line");
    graph = edit::connect(&graph, &NodeId::line("jobDetails"), None, &NodeId::line("thanks")).expect("connect");
    assert!(validate(&graph).is_empty());

    let exported = reconstruct(&graph, doc.replace).expect("export");
    assert_eq!(exported.choice_sets["firstChoice"].len(), 1);
    assert_eq!(exported.choice_sets["firstChoice"][0].triggers, "offerJob");
    assert!(exported.lines.contains_key("offerJob"));
    assert!(!exported.lines.contains_key("askJob"));
    // The removed row was the only way to reach `pause`.
    assert!(!exported.lines.contains_key("pause"));
    assert!(exported.lines.contains_key("thanks"));
    assert_eq!(exported.replace, Some(true));
}

#[test]
fn invalid_snapshot_is_reported_before_export() {
    let graph = build(&fixture()).expect("build");
    let mut snapshot = Snapshot::from_graph(&graph, None);
    let greeting = snapshot.nodes.iter_mut().find(|node| node.id == "npcLine-greeting").expect("greeting");
    greeting.data.insert("duration".into(), Value::String(String::new()));
    let jobs = snapshot.nodes.iter_mut().find(|node| node.id == "playerChoice-jobChoice").expect("jobChoice");
    jobs.data["choices"][1]["text"] = Value::String(" ".into());

    let decoded = snapshot.into_graph().expect("decode");
    assert_eq!(
        validate(&decoded),
        vec![
            "NPC line \"greeting\": duration must be a number".to_owned(),
            "Player choice \"jobChoice\": choice 2 text is empty".to_owned(),
        ]
    );
}
