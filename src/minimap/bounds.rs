use eframe::egui::{Vec2, vec2};

use crate::geometry::Rectangle;
use crate::host::{NodeGraph, NodeInfo};

/// Margin a frame keeps around its children, in node-space units.
pub const FRAME_PADDING: f32 = 30.0;

// Guards against parent cycles in a malformed host graph.
const MAX_FRAME_DEPTH: usize = 100;

/// Box a node visually occupies in node space.
///
/// Frames are drawn around their children, so a frame with children uses the
/// union of its children's visual boxes grown by [`FRAME_PADDING`]. An empty
/// frame has nothing to derive a position from and falls back to its stored
/// anchor and size, which can misplace it.
pub fn node_visual_box<G: NodeGraph + ?Sized>(node: &NodeInfo, graph: &G) -> Rectangle {
    visual_box_at_depth(node, graph, 0)
}

pub fn node_visual_location<G: NodeGraph + ?Sized>(node: &NodeInfo, graph: &G) -> Vec2 {
    node_visual_box(node, graph).min
}

fn visual_box_at_depth<G: NodeGraph + ?Sized>(
    node: &NodeInfo,
    graph: &G,
    depth: usize,
) -> Rectangle {
    if node.is_frame() && depth < MAX_FRAME_DEPTH {
        let children = graph
            .children(&node.name)
            .map(|child| visual_box_at_depth(child, graph, depth + 1))
            .reduce(|acc, child| acc.union(&child));

        if let Some(children) = children {
            let padding = vec2(FRAME_PADDING, FRAME_PADDING);
            return Rectangle::new(children.true_min() - padding, children.true_max() + padding);
        }
    }

    Rectangle::from_min_size(node.location, node.size())
}

/// Union of every node's visual box. An empty graph yields a zero rectangle.
pub fn compute_node_area<G: NodeGraph + ?Sized>(graph: &G) -> Rectangle {
    graph
        .nodes()
        .iter()
        .map(|node| node_visual_box(node, graph))
        .reduce(|acc, node_box| acc.union(&node_box))
        .unwrap_or(Rectangle::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{GraphSnapshot, NodeKind};

    fn frame(name: &str, location: Vec2) -> NodeInfo {
        let mut node = NodeInfo::new(name, location, vec2(80.0, 60.0));
        node.kind = NodeKind::Frame;
        node
    }

    fn child(name: &str, parent: &str, location: Vec2) -> NodeInfo {
        let mut node = NodeInfo::new(name, location, vec2(100.0, 50.0));
        node.parent = Some(parent.to_owned());
        node
    }

    #[test]
    fn empty_frame_falls_back_to_anchor() {
        let graph = GraphSnapshot::new("g", vec![frame("Frame", vec2(400.0, -20.0))]);
        let node = graph.node("Frame").expect("frame exists");
        assert_eq!(node_visual_location(node, &graph), vec2(400.0, -20.0));
        assert_eq!(
            node_visual_box(node, &graph),
            Rectangle::new(vec2(400.0, -20.0), vec2(480.0, 40.0))
        );
    }

    #[test]
    fn frame_wraps_children_with_padding() {
        let graph = GraphSnapshot::new(
            "g",
            vec![
                frame("Frame", vec2(9000.0, 9000.0)),
                child("A", "Frame", vec2(0.0, 0.0)),
                child("B", "Frame", vec2(200.0, 100.0)),
            ],
        );
        let node = graph.node("Frame").expect("frame exists");
        assert_eq!(
            node_visual_box(node, &graph),
            Rectangle::new(vec2(-30.0, -30.0), vec2(330.0, 180.0))
        );
    }

    #[test]
    fn nested_frames_resolve_recursively() {
        let mut inner = frame("Inner", vec2(5000.0, 5000.0));
        inner.parent = Some("Outer".to_owned());
        let graph = GraphSnapshot::new(
            "g",
            vec![
                frame("Outer", Vec2::ZERO),
                inner,
                child("Leaf", "Inner", vec2(100.0, 100.0)),
            ],
        );
        let outer = graph.node("Outer").expect("outer exists");
        assert_eq!(node_visual_location(outer, &graph), vec2(40.0, 40.0));
    }

    #[test]
    fn parent_cycle_terminates() {
        let mut a = frame("A", Vec2::ZERO);
        a.parent = Some("B".to_owned());
        let mut b = frame("B", vec2(10.0, 10.0));
        b.parent = Some("A".to_owned());
        let graph = GraphSnapshot::new("g", vec![a, b]);
        let area = compute_node_area(&graph);
        assert!(area.size().x.is_finite());
    }

    #[test]
    fn node_area_unions_all_nodes() {
        let graph = GraphSnapshot::new(
            "g",
            vec![
                NodeInfo::new("A", vec2(-100.0, 0.0), vec2(50.0, 50.0)),
                NodeInfo::new("B", vec2(200.0, 300.0), vec2(40.0, 20.0)),
            ],
        );
        assert_eq!(
            compute_node_area(&graph),
            Rectangle::new(vec2(-100.0, 0.0), vec2(240.0, 320.0))
        );
    }

    #[test]
    fn empty_graph_has_zero_area() {
        let graph = GraphSnapshot::new("g", Vec::new());
        assert_eq!(compute_node_area(&graph), Rectangle::ZERO);
    }
}
