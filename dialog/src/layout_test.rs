#![allow(clippy::float_cmp)]

use super::*;
use crate::graph::{LinePayload, Node};

fn ids(labels: &[&str]) -> Vec<NodeId> {
    labels.iter().map(|label| NodeId::line(*label)).collect()
}

fn edge(from: &str, to: &str) -> Edge {
    Edge::trigger(NodeId::line(from), NodeId::line(to), 0, false)
}

#[test]
fn start_sits_at_origin() {
    let positions = tree_layout(&ids(&["a"]), &[], &NodeId::line("a"), Spacing::default());
    assert_eq!(positions[&NodeId::line("a")], Position::new(0.0, 0.0));
}

#[test]
fn levels_are_columns_and_rows_are_centered() {
    let nodes = ids(&["a", "b", "c", "d"]);
    let edges = [edge("a", "b"), edge("a", "c"), edge("a", "d")];
    let positions = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing::default());

    assert_eq!(positions[&NodeId::line("b")], Position::new(500.0, -300.0));
    assert_eq!(positions[&NodeId::line("c")], Position::new(500.0, 0.0));
    assert_eq!(positions[&NodeId::line("d")], Position::new(500.0, 300.0));
}

#[test]
fn shallowest_level_wins() {
    // a -> b -> c and a -> c: c belongs to level 1, not 2.
    let nodes = ids(&["a", "b", "c"]);
    let edges = [edge("a", "b"), edge("b", "c"), edge("a", "c")];
    let positions = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing::default());
    assert_eq!(positions[&NodeId::line("c")].x, 500.0);
    assert_eq!(positions[&NodeId::line("b")].x, 500.0);
    // Discovery order: b before c.
    assert!(positions[&NodeId::line("b")].y < positions[&NodeId::line("c")].y);
}

#[test]
fn unreachable_nodes_share_one_trailing_column() {
    let nodes = ids(&["a", "b", "x", "y"]);
    // x -> y would put y one level deeper if unreachable depths were spread.
    let edges = [edge("a", "b"), edge("x", "y")];
    let positions = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing::default());
    assert_eq!(positions[&NodeId::line("x")].x, 1000.0);
    assert_eq!(positions[&NodeId::line("y")].x, 1000.0);
    assert_eq!(positions[&NodeId::line("x")].y, -150.0);
    assert_eq!(positions[&NodeId::line("y")].y, 150.0);
}

#[test]
fn unknown_start_puts_everything_in_column_one() {
    let nodes = ids(&["a", "b"]);
    let positions = tree_layout(&nodes, &[edge("a", "b")], &NodeId::line("missing"), Spacing::default());
    assert_eq!(positions.len(), 2);
    assert!(positions.values().all(|p| p.x == 500.0));
}

#[test]
fn dangling_targets_get_no_position() {
    let nodes = ids(&["a"]);
    let positions = tree_layout(&nodes, &[edge("a", "ghost")], &NodeId::line("a"), Spacing::default());
    assert_eq!(positions.len(), 1);
}

#[test]
fn layout_is_deterministic() {
    let nodes = ids(&["a", "b", "c", "d", "e"]);
    let edges = [edge("a", "c"), edge("a", "b"), edge("c", "d"), edge("e", "a")];
    let first = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing::default());
    let second = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing::default());
    assert_eq!(first, second);
}

#[test]
fn custom_spacing_is_applied() {
    let nodes = ids(&["a", "b", "c"]);
    let edges = [edge("a", "b"), edge("a", "c")];
    let positions = tree_layout(&nodes, &edges, &NodeId::line("a"), Spacing { x: 100.0, y: 40.0 });
    assert_eq!(positions[&NodeId::line("b")], Position::new(100.0, -20.0));
    assert_eq!(positions[&NodeId::line("c")], Position::new(100.0, 20.0));
}

#[test]
fn relayout_moves_nodes_into_place() {
    let graph = Graph::new(
        vec![
            Node::line("a", LinePayload::with_duration(1.0)).starting(true).at(Position::new(42.0, 42.0)),
            Node::line("b", LinePayload::with_duration(1.0)).at(Position::new(-7.0, 3.0)),
        ],
        vec![edge("a", "b")],
    );
    let laid_out = relayout(&graph, Spacing::default()).expect("relayout");
    assert_eq!(laid_out.nodes[0].position, Position::new(0.0, 0.0));
    assert_eq!(laid_out.nodes[1].position, Position::new(500.0, 0.0));
    assert_eq!(laid_out.edges, graph.edges);
}

#[test]
fn relayout_requires_a_start_node() {
    let graph = Graph::new(vec![Node::line("a", LinePayload::with_duration(1.0))], Vec::new());
    assert_eq!(relayout(&graph, Spacing::default()), Err(DialogError::NoStartNode));
}
