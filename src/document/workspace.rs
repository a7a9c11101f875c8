use std::collections::{HashMap, HashSet};

use node_minimap::host::{GraphProvider, GraphSnapshot, NodeGraph, RegionInfo};

/// Every graph of a loaded document plus the group links between them.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub root: String,
    graphs: HashMap<String, GraphSnapshot>,
    // (graph key, group node name) -> key of the graph the group opens.
    groups: HashMap<(String, String), String>,
}

impl Workspace {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn insert_graph(&mut self, graph: GraphSnapshot) {
        self.graphs.insert(graph.key().to_owned(), graph);
    }

    pub fn link_group(&mut self, graph: &str, node: &str, target: impl Into<String>) {
        self.groups
            .insert((graph.to_owned(), node.to_owned()), target.into());
    }

    pub fn graph(&self, key: &str) -> Option<&GraphSnapshot> {
        self.graphs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.graphs.contains_key(key)
    }

    pub fn group_target(&self, graph: &str, node: &str) -> Option<&str> {
        self.groups
            .get(&(graph.to_owned(), node.to_owned()))
            .map(String::as_str)
            .filter(|target| self.graphs.contains_key(*target))
    }

    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    pub fn node_count(&self) -> usize {
        self.graphs.values().map(|graph| graph.nodes().len()).sum()
    }

    /// Marks `name` as the only selected node of `graph`.
    pub fn select(&mut self, graph: &str, name: Option<&str>) {
        let Some(graph) = self.graphs.get_mut(graph) else {
            return;
        };
        let names: Vec<String> = graph.nodes().iter().map(|node| node.name.clone()).collect();
        for node_name in names {
            if let Some(node) = graph.node_mut(&node_name) {
                node.selected = Some(node_name.as_str()) == name;
            }
        }
    }

    /// Moves a node. Frames carry everything parented to them, transitively.
    pub fn move_node(&mut self, graph: &str, name: &str, delta: eframe::egui::Vec2) {
        let Some(graph) = self.graphs.get_mut(graph) else {
            return;
        };

        let mut pending = vec![name.to_owned()];
        let mut moved = HashSet::new();
        while let Some(current) = pending.pop() {
            if !moved.insert(current.clone()) {
                continue;
            }
            pending.extend(graph.children(&current).map(|child| child.name.clone()));
            if let Some(node) = graph.node_mut(&current) {
                node.location += delta;
            }
        }
    }
}

#[cfg(test)]
impl Workspace {
    pub(super) fn node(&self, graph: &str, name: &str) -> Option<&node_minimap::host::NodeInfo> {
        self.graphs.get(graph)?.node(name)
    }
}

impl GraphProvider for Workspace {
    type Graph = GraphSnapshot;

    fn active_graph(&self, region: &RegionInfo) -> Option<&GraphSnapshot> {
        self.graphs.get(region.graph.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;
    use node_minimap::host::{NodeInfo, NodeKind};

    fn workspace() -> Workspace {
        let mut frame = NodeInfo::new("Frame", vec2(0.0, 0.0), vec2(200.0, 200.0));
        frame.kind = NodeKind::Frame;
        let mut inner = NodeInfo::new("Inner", vec2(20.0, 20.0), vec2(100.0, 100.0));
        inner.kind = NodeKind::Frame;
        inner.parent = Some("Frame".to_owned());
        let mut leaf = NodeInfo::new("Leaf", vec2(30.0, 30.0), vec2(50.0, 50.0));
        leaf.parent = Some("Inner".to_owned());
        let loose = NodeInfo::new("Loose", vec2(500.0, 0.0), vec2(50.0, 50.0));

        let mut workspace = Workspace::new("tree");
        workspace.insert_graph(GraphSnapshot::new("tree", vec![frame, inner, leaf, loose]));
        workspace
    }

    #[test]
    fn moving_a_frame_carries_nested_children() {
        let mut workspace = workspace();
        workspace.move_node("tree", "Frame", vec2(10.0, -5.0));

        let location = |name: &str| workspace.node("tree", name).map(|node| node.location);
        assert_eq!(location("Frame"), Some(vec2(10.0, -5.0)));
        assert_eq!(location("Inner"), Some(vec2(30.0, 15.0)));
        assert_eq!(location("Leaf"), Some(vec2(40.0, 25.0)));
        assert_eq!(location("Loose"), Some(vec2(500.0, 0.0)));
    }

    #[test]
    fn select_keeps_a_single_selection() {
        let mut workspace = workspace();
        workspace.select("tree", Some("Leaf"));
        workspace.select("tree", Some("Loose"));

        let selected: Vec<_> = workspace
            .graph("tree")
            .map(|graph| {
                graph
                    .nodes()
                    .iter()
                    .filter(|node| node.selected)
                    .map(|node| node.name.as_str())
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(selected, ["Loose"]);
    }

    #[test]
    fn provider_resolves_region_graph() {
        let workspace = workspace();
        let region = RegionInfo {
            graph: Some("tree".to_owned()),
            ..RegionInfo::default()
        };
        assert!(workspace.active_graph(&region).is_some());
        assert!(workspace.active_graph(&RegionInfo::default()).is_none());
    }
}
