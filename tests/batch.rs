//! Tests for batch adoption and release when nodes are dropped on the canvas.
mod common;
use common::*;
use flow_editor::canvas::batch::{ContainmentResolver, Transition};
use flow_editor::canvas::geometry::ContainmentMode;
use flow_editor::canvas::layout::NodeLayout;
use flow_editor::workflow::{Node, NodeType, Position};
use kurbo::Point;
use pretty_assertions::assert_eq;

fn drop_once(dropped: &Node, nodes: &[Node]) -> Vec<Node> {
    let layout = NodeLayout::new(nodes);
    ContainmentResolver::new(&layout).evaluate_drop(dropped, nodes)
}

#[test]
fn test_unmeasured_node_dropped_in_batch_is_adopted() {
    let nodes = vec![
        batch("c", 100.0, 100.0, 200.0, 200.0),
        Node::new("n", NodeType::Reader, 150.0, 150.0),
    ];

    let result = drop_once(&nodes[1], &nodes);
    let n = node(&result, "n");

    assert_eq!(n.parent_id.as_deref(), Some("c"));
    assert_eq!(n.position, Position { x: 50.0, y: 50.0 });
    assert_eq!(node(&result, "c"), &nodes[0]);
}

#[test]
fn test_node_dragged_out_of_batch_is_released_at_drag_location() {
    let nodes = vec![
        batch("c", 100.0, 100.0, 200.0, 200.0),
        transformer("n", 50.0, 50.0).with_parent("c"),
    ];
    // Dragged to absolute (500,500): (400,400) in the batch's frame
    let mut dropped = nodes[1].clone();
    dropped.position = Position { x: 400.0, y: 400.0 };

    let layout = NodeLayout::new(&nodes).with_drag("n", Point::new(400.0, 400.0));
    let resolver = ContainmentResolver::new(&layout);

    assert_eq!(
        resolver.resolve(&dropped, &nodes),
        Some(Transition::Release {
            container_id: "c".to_string(),
            position: Position { x: 500.0, y: 500.0 },
        })
    );

    let result = resolver.evaluate_drop(&dropped, &nodes);
    let n = node(&result, "n");
    assert_eq!(n.parent_id, None);
    assert_eq!(n.position, Position { x: 500.0, y: 500.0 });
}

#[test]
fn test_adoption_preserves_absolute_position() {
    let container = batch("c", 100.0, 100.0, 200.0, 200.0);
    for (x, y) in [(100.0, 100.0), (150.0, 210.0), (260.0, 260.0)] {
        let nodes = vec![container.clone(), transformer("n", x, y)];
        let result = drop_once(&nodes[1], &nodes);
        let n = node(&result, "n");

        assert_eq!(n.parent_id.as_deref(), Some("c"), "drop at ({x},{y})");
        assert_eq!(n.position, Position { x: x - 100.0, y: y - 100.0 });
    }
}

#[test]
fn test_drop_is_idempotent() {
    let workflow = create_canvas_workflow();
    let mut nodes = workflow.nodes;
    nodes.push(transformer("late", 120.0, 130.0));

    let once = drop_once(node(&nodes, "late"), &nodes);
    let twice = drop_once(node(&once, "late"), &once);
    assert_eq!(once, twice);

    let untouched = drop_once(node(&nodes, "outside"), &nodes);
    assert_eq!(untouched, nodes);
}

#[test]
fn test_batch_without_measured_size_is_never_a_target() {
    let mut unmeasured = Node::new("c", NodeType::Batch, 100.0, 100.0);
    unmeasured.measured = Some(flow_editor::workflow::Measured {
        width: Some(200.0),
        height: None,
    });

    // Geometrically inside, but the batch has no committed layout
    let nodes = vec![unmeasured.clone(), transformer("n", 150.0, 150.0)];
    assert_eq!(drop_once(&nodes[1], &nodes), nodes);

    // Attached and far away: still not released
    let attached = vec![unmeasured, transformer("n", 900.0, 900.0).with_parent("c")];
    assert_eq!(drop_once(&attached[1], &attached), attached);
}

#[test]
fn test_detached_node_outside_every_batch_is_unchanged() {
    let nodes = create_canvas_workflow().nodes;
    let layout = NodeLayout::new(&nodes);
    let resolver = ContainmentResolver::new(&layout);

    assert_eq!(resolver.resolve(node(&nodes, "outside"), &nodes), None);
    assert_eq!(resolver.evaluate_drop(node(&nodes, "outside"), &nodes), nodes);
}

#[test]
fn test_node_still_inside_its_batch_stays_attached() {
    let nodes = create_canvas_workflow().nodes;
    assert_eq!(drop_once(node(&nodes, "inside"), &nodes), nodes);
}

#[test]
fn test_overlapping_batches_last_one_wins() {
    let nodes = vec![
        batch("first", 0.0, 0.0, 300.0, 300.0),
        batch("second", 100.0, 100.0, 300.0, 300.0),
        transformer("n", 150.0, 150.0),
    ];

    let result = drop_once(&nodes[2], &nodes);
    let n = node(&result, "n");
    assert_eq!(n.parent_id.as_deref(), Some("second"));
    assert_eq!(n.position, Position { x: 50.0, y: 50.0 });
}

#[test]
fn test_moving_between_batches_reparents_in_one_drop() {
    let nodes = vec![
        batch("from", 0.0, 0.0, 100.0, 100.0),
        batch("to", 500.0, 500.0, 200.0, 200.0),
        transformer("n", 10.0, 10.0).with_parent("from"),
    ];
    let mut dropped = nodes[2].clone();
    dropped.position = Position { x: 550.0, y: 550.0 };

    let layout = NodeLayout::new(&nodes).with_drag("n", Point::new(550.0, 550.0));
    let transition = ContainmentResolver::new(&layout).resolve(&dropped, &nodes);

    assert_eq!(
        transition,
        Some(Transition::Reparent {
            from: "from".to_string(),
            to: "to".to_string(),
            position: Position { x: 50.0, y: 50.0 },
        })
    );
}

#[test]
fn test_nested_batch_uses_absolute_container_position() {
    let nodes = vec![
        batch("outer", 0.0, 0.0, 500.0, 500.0),
        batch("inner", 100.0, 100.0, 200.0, 200.0).with_parent("outer"),
        transformer("n", 150.0, 150.0),
    ];

    let result = drop_once(&nodes[2], &nodes);
    let n = node(&result, "n");
    assert_eq!(n.parent_id.as_deref(), Some("inner"));
    assert_eq!(n.position, Position { x: 50.0, y: 50.0 });
}

#[test]
fn test_partial_mode_adopts_straddling_node() {
    let nodes = vec![
        batch("c", 100.0, 100.0, 200.0, 200.0),
        transformer("n", 280.0, 150.0),
    ];
    let layout = NodeLayout::new(&nodes);

    let full = ContainmentResolver::new(&layout);
    assert_eq!(full.resolve(&nodes[1], &nodes), None);

    let partial = ContainmentResolver::new(&layout).with_mode(ContainmentMode::Partial);
    assert_eq!(
        partial.resolve(&nodes[1], &nodes).and_then(|t| t.parent_id().map(str::to_string)),
        Some("c".to_string())
    );
}

#[test]
fn test_update_function_receives_next_snapshot() {
    let nodes = vec![
        Node::new("w", NodeType::Writer, 900.0, 0.0),
        batch("c", 100.0, 100.0, 200.0, 200.0),
        transformer("n", 150.0, 150.0),
    ];
    let layout = NodeLayout::new(&nodes);
    let mut published = None;

    ContainmentResolver::new(&layout).handle_node_drop_in_batch(&nodes[2], &nodes, |next| {
        published = Some(next)
    });

    let published = published.expect("update function should be called");
    let ids: Vec<&str> = published.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["w", "c", "n"]);
    assert_eq!(published[0], nodes[0]);
    assert_eq!(published[2].parent_id.as_deref(), Some("c"));
}
