use super::*;
use crate::graph::{ChoiceRow, Edge, LinePayload, Node};
use crate::id::NodeId;

fn npc_line(label: &str, is_start: bool, duration: f64) -> Node {
    Node::line(label, LinePayload::with_duration(duration)).starting(is_start)
}

fn player_choice(label: &str, texts: &[&str]) -> Node {
    Node::choice_set(label, texts.iter().map(|text| ChoiceRow { text: (*text).to_owned() }).collect())
}

fn edge_npc_to_choice(from: &str, to: &str) -> Edge {
    Edge::trigger(NodeId::line(from), NodeId::choice_set(to), 0, false)
}

fn edge_choice(from: &str, index: usize, to: &str) -> Edge {
    Edge::choice(NodeId::choice_set(from), index, NodeId::line(to))
}

#[test]
fn valid_graph_has_no_errors() {
    let graph = Graph::new(
        vec![
            npc_line("intro", true, 3.0),
            player_choice("menu", &["Option A", "Option B"]),
            npc_line("responseA", false, 2.0),
            npc_line("responseB", false, 2.0),
        ],
        vec![
            edge_npc_to_choice("intro", "menu"),
            edge_choice("menu", 0, "responseA"),
            edge_choice("menu", 1, "responseB"),
        ],
    );
    assert_eq!(validate(&graph), Vec::<String>::new());
}

#[test]
fn missing_start_node_short_circuits() {
    let graph = Graph::new(vec![npc_line("intro", false, f64::NAN)], Vec::new());
    assert_eq!(validate(&graph), vec!["No start node found".to_owned()]);
}

#[test]
fn nan_duration_is_reported() {
    let graph = Graph::new(vec![npc_line("intro", true, f64::NAN)], Vec::new());
    assert!(validate(&graph).contains(&"NPC line \"intro\": duration must be a number".to_owned()));
}

#[test]
fn infinite_duration_is_reported() {
    let graph = Graph::new(vec![npc_line("intro", true, f64::INFINITY)], Vec::new());
    assert_eq!(validate(&graph), vec!["NPC line \"intro\": duration must be a number".to_owned()]);
}

#[test]
fn empty_choice_text_is_reported() {
    let graph = Graph::new(
        vec![npc_line("intro", true, 2.0), player_choice("menu", &["   "])],
        vec![edge_npc_to_choice("intro", "menu"), edge_choice("menu", 0, "intro")],
    );
    assert_eq!(validate(&graph), vec!["Player choice \"menu\": choice 1 text is empty".to_owned()]);
}

#[test]
fn unconnected_choice_is_reported_by_position() {
    let graph = Graph::new(
        vec![npc_line("intro", true, 2.0), player_choice("menu", &["Go", "Stay"]), npc_line("next", false, 2.0)],
        vec![edge_npc_to_choice("intro", "menu"), edge_choice("menu", 0, "next")],
    );
    let errors = validate(&graph);
    assert!(errors.contains(&"Player choice \"menu\": choice 2 is not connected".to_owned()));
    assert!(!errors.contains(&"Player choice \"menu\": choice 1 is not connected".to_owned()));
}

#[test]
fn a_choice_can_report_both_problems() {
    let graph = Graph::new(
        vec![npc_line("intro", true, 2.0), player_choice("menu", &[""])],
        vec![edge_npc_to_choice("intro", "menu")],
    );
    assert_eq!(
        validate(&graph),
        vec![
            "Player choice \"menu\": choice 1 text is empty".to_owned(),
            "Player choice \"menu\": choice 1 is not connected".to_owned(),
        ]
    );
}

#[test]
fn orphaned_node_is_not_reported() {
    let graph = Graph::new(vec![npc_line("intro", true, 2.0), npc_line("orphan", false, f64::NAN)], Vec::new());
    assert_eq!(validate(&graph), Vec::<String>::new());
}

#[test]
fn orphaned_choice_set_is_not_reported() {
    let graph = Graph::new(vec![npc_line("intro", true, 2.0), player_choice("loose", &["", ""])], Vec::new());
    assert!(validate(&graph).is_empty());
}

#[test]
fn unconnected_start_marker_is_reported() {
    let graph = Graph::new(vec![Node::start_marker("marker", None).starting(true)], Vec::new());
    assert_eq!(validate(&graph), vec!["Start marker is not connected".to_owned()]);
}

#[test]
fn start_marker_scopes_reachability() {
    let graph = Graph::new(
        vec![Node::start_marker("marker", None).starting(true), npc_line("intro", false, f64::NAN)],
        vec![Edge::start(NodeId::start_marker("marker"), NodeId::line("intro"))],
    );
    assert_eq!(validate(&graph), vec!["NPC line \"intro\": duration must be a number".to_owned()]);
}
