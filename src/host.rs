//! Contracts the minimap consumes from the host editor.
//!
//! Everything here is read through lookups by key. The cache stores names,
//! never references, because the host is free to rebuild its graph objects
//! between ticks (undo, reload, group switches).

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::config::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Regular,
    Frame,
    Reroute,
    Group,
    GroupInput,
    GroupOutput,
}

/// One node as the host exposes it for the current tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
    pub name: String,
    /// Top-left anchor in node space. Frames store an anchor that does not
    /// necessarily match where they are drawn.
    pub location: Vec2,
    pub width: f32,
    pub height: f32,
    /// Declared type identifier, e.g. `GeometryNodeMeshCube`.
    pub type_name: String,
    pub output_types: Vec<String>,
    pub kind: NodeKind,
    pub color: Color,
    pub use_custom_color: bool,
    pub parent: Option<String>,
    pub selected: bool,
    pub label: String,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, location: Vec2, size: Vec2) -> Self {
        Self {
            name: name.into(),
            location,
            width: size.x,
            height: size.y,
            color: Color::rgb(0.5, 0.5, 0.5),
            ..Self::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn is_frame(&self) -> bool {
        self.kind == NodeKind::Frame
    }

    pub fn is_reroute(&self) -> bool {
        self.kind == NodeKind::Reroute
    }

    /// Text shown for the node: the label when set, the name otherwise.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

pub trait NodeGraph {
    /// Stable identity of the graph, used to detect the user switching
    /// which graph (or group) a region is editing.
    fn key(&self) -> &str;

    /// All nodes in host order.
    fn nodes(&self) -> &[NodeInfo];

    fn node(&self, name: &str) -> Option<&NodeInfo> {
        self.nodes().iter().find(|node| node.name == name)
    }

    fn children<'a>(&'a self, frame: &'a str) -> Box<dyn Iterator<Item = &'a NodeInfo> + 'a> {
        Box::new(
            self.nodes()
                .iter()
                .filter(move |node| node.parent.as_deref() == Some(frame)),
        )
    }

    fn has_children(&self, frame: &str) -> bool {
        self.children(frame).next().is_some()
    }
}

pub trait GraphProvider {
    type Graph: NodeGraph;

    /// The graph currently edited in `region`, resolved to the innermost
    /// group being edited. `None` when the region has no graph or the graph
    /// is temporarily unavailable.
    fn active_graph(&self, region: &RegionInfo) -> Option<&Self::Graph>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionKind {
    #[default]
    NodeEditor,
    Other,
}

/// One open editor region as reported by the host for this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionInfo {
    /// Stable per-region identity. Valid across ticks, not across reloads.
    pub key: String,
    pub kind: RegionKind,
    pub width: f32,
    pub height: f32,
    pub sidebar_width: f32,
    pub graph: Option<String>,
    pub show_context_path: bool,
}

impl RegionInfo {
    /// Drawable size: content width minus the side panel, full height.
    pub fn content_size(&self) -> Vec2 {
        vec2((self.width - self.sidebar_width).max(0.0), self.height)
    }

    pub fn is_node_editor(&self) -> bool {
        self.kind == RegionKind::NodeEditor
    }
}

/// Owned graph with a name index, usable directly as a [`NodeGraph`].
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
    key: String,
    nodes: Vec<NodeInfo>,
    index_by_name: HashMap<String, usize>,
}

impl GraphSnapshot {
    pub fn new(key: impl Into<String>, nodes: Vec<NodeInfo>) -> Self {
        let index_by_name = Self::build_index(&nodes);
        Self {
            key: key.into(),
            nodes,
            index_by_name,
        }
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut NodeInfo> {
        let index = *self.index_by_name.get(name)?;
        self.nodes.get_mut(index)
    }

    pub fn push(&mut self, node: NodeInfo) {
        self.index_by_name
            .insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub fn remove(&mut self, name: &str) -> Option<NodeInfo> {
        let index = self.index_by_name.remove(name)?;
        let removed = self.nodes.remove(index);
        self.index_by_name = Self::build_index(&self.nodes);
        Some(removed)
    }

    fn build_index(nodes: &[NodeInfo]) -> HashMap<String, usize> {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.name.clone(), index))
            .collect()
    }
}

impl NodeGraph for GraphSnapshot {
    fn key(&self) -> &str {
        &self.key
    }

    fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    fn node(&self, name: &str) -> Option<&NodeInfo> {
        self.index_by_name
            .get(name)
            .and_then(|index| self.nodes.get(*index))
    }
}
