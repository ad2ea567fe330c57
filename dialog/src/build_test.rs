#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::graph::{Payload, Port, Position};

fn sample() -> Document {
    serde_json::from_value(json!({
        "start": "intro",
        "npcLines": {
            "intro": { "text": "Hi.", "duration": 2, "triggers": "menu" },
            "yes": { "duration": 1, "media": "yes.ogg", "triggers": ["outro", "menu"] },
            "no": { "duration": 1 },
            "outro": { "duration": 4, "camera": { "name": "Cam", "keepPossessed": true } }
        },
        "playerChoices": {
            "menu": [
                { "text": "Yes", "triggers": "yes" },
                { "text": "No", "triggers": "no" }
            ]
        }
    }))
    .expect("sample document")
}

#[test]
fn one_node_per_entry_with_prefixed_ids() {
    let graph = build(&sample()).expect("build");
    let ids: Vec<String> = graph.nodes.iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, ["npcLine-intro", "npcLine-yes", "npcLine-no", "npcLine-outro", "playerChoice-menu"]);
}

#[test]
fn exactly_one_start_node() {
    let graph = build(&sample()).expect("build");
    let starts: Vec<&Node> = graph.nodes.iter().filter(|n| n.is_start).collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].id, NodeId::line("intro"));
}

#[test]
fn line_payload_is_copied_verbatim() {
    let graph = build(&sample()).expect("build");
    let Payload::Line(intro) = &graph.nodes[0].payload else {
        panic!("expected line payload");
    };
    assert_eq!(intro.text.as_deref(), Some("Hi."));
    assert_eq!(intro.duration, 2.0);
    assert!(intro.media.is_none());

    let Payload::Line(outro) = &graph.nodes[3].payload else {
        panic!("expected line payload");
    };
    assert_eq!(outro.camera.as_ref().map(|c| c.keep_possessed), Some(true));
}

#[test]
fn single_trigger_resolves_to_choice_set() {
    let graph = build(&sample()).expect("build");
    let edge = graph.edges.iter().find(|e| e.source == NodeId::line("intro")).expect("intro edge");
    assert_eq!(edge.target, NodeId::choice_set("menu"));
    assert_eq!(edge.id, "edge-npcLine-intro-to-menu");
}

#[test]
fn trigger_lists_carry_ordinals_in_order() {
    let graph = build(&sample()).expect("build");
    let edges: Vec<&Edge> = graph.edges.iter().filter(|e| e.source == NodeId::line("yes")).collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].target, NodeId::line("outro"));
    assert_eq!(edges[0].port, Port::Trigger(Some(0)));
    assert_eq!(edges[1].target, NodeId::choice_set("menu"));
    assert_eq!(edges[1].port, Port::Trigger(Some(1)));
    assert_eq!(edges[1].id, "edge-npcLine-yes-to-menu-1");
}

#[test]
fn choice_rows_become_indexed_edges() {
    let graph = build(&sample()).expect("build");
    let menu = graph.node(&NodeId::choice_set("menu")).expect("menu node");
    let Payload::ChoiceSet(set) = &menu.payload else {
        panic!("expected choice set payload");
    };
    let texts: Vec<&str> = set.choices.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["Yes", "No"]);

    let edges: Vec<&Edge> = graph.edges.iter().filter(|e| e.source == menu.id).collect();
    assert_eq!(edges[0].port, Port::Choice(0));
    assert_eq!(edges[0].target, NodeId::line("yes"));
    assert_eq!(edges[1].port, Port::Choice(1));
    assert_eq!(edges[1].target, NodeId::line("no"));
}

#[test]
fn positions_follow_tree_layout() {
    let graph = build(&sample()).expect("build");
    let at = |id: NodeId| graph.node(&id).expect("node").position;
    assert_eq!(at(NodeId::line("intro")), Position::new(0.0, 0.0));
    assert_eq!(at(NodeId::choice_set("menu")), Position::new(500.0, 0.0));
    assert_eq!(at(NodeId::line("yes")), Position::new(1000.0, -150.0));
    assert_eq!(at(NodeId::line("no")), Position::new(1000.0, 150.0));
    assert_eq!(at(NodeId::line("outro")), Position::new(1500.0, 0.0));
}

#[test]
fn orphans_land_in_trailing_column() {
    let mut doc = sample();
    doc.lines.insert("scratch".into(), crate::doc::Line::with_duration(1.0));
    let graph = build(&doc).expect("build");
    let scratch = graph.node(&NodeId::line("scratch")).expect("scratch");
    assert_eq!(scratch.position.x, 2000.0);
}

#[test]
fn choice_set_can_be_the_start() {
    let mut doc = sample();
    doc.start = "menu".into();
    let graph = build(&doc).expect("build");
    assert!(graph.node(&NodeId::choice_set("menu")).expect("menu").is_start);
    assert!(!graph.node(&NodeId::line("intro")).expect("intro").is_start);
}

#[test]
fn unknown_start_is_malformed() {
    let mut doc = sample();
    doc.start = "nowhere".into();
    assert_eq!(build(&doc), Err(DialogError::MalformedDocument("nowhere".into())));
}

#[test]
fn unknown_trigger_label_falls_back_to_line_id() {
    let doc = sample();
    assert_eq!(resolve_target(&doc, "menu"), NodeId::choice_set("menu"));
    assert_eq!(resolve_target(&doc, "ghost"), NodeId::line("ghost"));
}
