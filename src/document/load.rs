use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use eframe::egui::vec2;
use node_minimap::config::Color;
use node_minimap::host::{GraphSnapshot, NodeInfo, NodeKind};
use tracing::warn;

use super::parse::{RawDocument, RawNode, RawNodeKind, parse_document};
use super::workspace::Workspace;

pub fn load_workspace(path: &Path) -> Result<Workspace> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read node document {}", path.display()))?;
    let document = parse_document(&raw)
        .with_context(|| format!("failed to parse node document {}", path.display()))?;
    build_workspace(document)
}

pub(super) fn build_workspace(document: RawDocument) -> Result<Workspace> {
    let mut workspace = Workspace::new(document.root.clone());
    let mut group_links = Vec::new();

    for raw_graph in document.graphs {
        if workspace.contains(&raw_graph.key) {
            return Err(anyhow!("graph {} is defined twice", raw_graph.key));
        }

        let mut seen = HashSet::with_capacity(raw_graph.nodes.len());
        let mut nodes = Vec::with_capacity(raw_graph.nodes.len());
        for raw_node in raw_graph.nodes {
            if !seen.insert(raw_node.name.clone()) {
                return Err(anyhow!(
                    "node {} appears twice in graph {}",
                    raw_node.name,
                    raw_graph.key
                ));
            }
            if let Some(target) = &raw_node.group {
                group_links.push((raw_graph.key.clone(), raw_node.name.clone(), target.clone()));
            }
            nodes.push(node_from_raw(raw_node));
        }

        for node in &mut nodes {
            if let Some(parent) = &node.parent
                && !seen.contains(parent)
            {
                warn!(
                    graph = %raw_graph.key,
                    node = %node.name,
                    %parent,
                    "dropping unknown parent frame"
                );
                node.parent = None;
            }
        }

        workspace.insert_graph(GraphSnapshot::new(raw_graph.key, nodes));
    }

    if !workspace.contains(&document.root) {
        return Err(anyhow!("root graph {} is not defined", document.root));
    }

    for (graph, node, target) in group_links {
        if workspace.contains(&target) {
            workspace.link_group(&graph, &node, target);
        } else {
            warn!(%graph, %node, %target, "group points at a missing graph");
        }
    }

    Ok(workspace)
}

fn node_from_raw(raw: RawNode) -> NodeInfo {
    let mut node = NodeInfo::new(
        raw.name,
        vec2(raw.location[0], raw.location[1]),
        vec2(raw.width, raw.height),
    );
    node.type_name = raw.type_name;
    node.output_types = raw.outputs;
    node.kind = match raw.kind {
        RawNodeKind::Regular => NodeKind::Regular,
        RawNodeKind::Frame => NodeKind::Frame,
        RawNodeKind::Reroute => NodeKind::Reroute,
        RawNodeKind::Group => NodeKind::Group,
        RawNodeKind::GroupInput => NodeKind::GroupInput,
        RawNodeKind::GroupOutput => NodeKind::GroupOutput,
    };
    if let Some([r, g, b]) = raw.color {
        node.color = Color::rgb(r, g, b);
        node.use_custom_color = true;
    }
    node.parent = raw.parent;
    node.label = raw.label;
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_minimap::host::NodeGraph;

    fn build(json: &str) -> Result<Workspace> {
        build_workspace(parse_document(json)?)
    }

    #[test]
    fn builds_graphs_and_group_links() {
        let workspace = build(
            r#"{"root": "tree", "graphs": [
                {"key": "tree", "nodes": [
                    {"name": "Group", "kind": "group", "group": "tree/Group"},
                    {"name": "Tint", "color": [1.0, 0.0, 0.0]}
                ]},
                {"key": "tree/Group", "nodes": [{"name": "In", "kind": "group_input"}]}
            ]}"#,
        )
        .expect("valid workspace");
        assert_eq!(workspace.graph_count(), 2);
        assert_eq!(workspace.group_target("tree", "Group"), Some("tree/Group"));
        let tint = workspace.node("tree", "Tint").expect("node exists");
        assert!(tint.use_custom_color);
        assert_eq!(workspace.graph("tree/Group").map(|graph| graph.nodes().len()), Some(1));
    }

    #[test]
    fn missing_root_is_an_error() {
        let error = build(r#"{"root": "nope", "graphs": [{"key": "tree"}]}"#)
            .expect_err("root must exist");
        assert!(error.to_string().contains("nope"));
    }

    #[test]
    fn duplicate_node_names_are_rejected() {
        let json = r#"{"root": "t", "graphs": [{"key": "t", "nodes": [
            {"name": "A"}, {"name": "A"}
        ]}]}"#;
        assert!(build(json).is_err());
    }

    #[test]
    fn unknown_parent_is_dropped() {
        let json = r#"{"root": "t", "graphs": [{"key": "t", "nodes": [
            {"name": "A", "parent": "Ghost"}
        ]}]}"#;
        let workspace = build(json).expect("valid workspace");
        assert_eq!(workspace.node("t", "A").and_then(|node| node.parent.clone()), None);
    }
}
