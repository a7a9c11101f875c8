use eframe::egui::{Vec2, pos2};
use tracing::trace;

use crate::config::{Color, MinimapConfig};
use crate::geometry::Rectangle;
use crate::host::{NodeGraph, NodeInfo};

use super::UpdateContext;
use super::bounds::node_visual_box;
use super::color::{NodeCategory, classify, node_color};
use super::draw::{QuadBatch, Rasterizer};
use super::label::{LabelLayout, layout_label};
use super::mapping::Mapping;

/// What an [`NodeCacheEntry::update`] found different from the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeChange {
    /// Position, size or frame membership changed; the area bounds are stale.
    pub moved: bool,
    /// Color inputs changed and the draw color was re-derived in place.
    pub recolored: bool,
}

impl NodeChange {
    pub fn any(self) -> bool {
        self.moved || self.recolored
    }
}

/// Whether a node shows up on the minimap at all. Every condition must hold.
pub fn can_draw(
    is_reroute: bool,
    is_frame: bool,
    has_parent: bool,
    has_children: bool,
    config: &MinimapConfig,
) -> bool {
    let kind_allowed = !is_reroute;
    let level_allowed = !(config.only_top_level && has_parent);
    let frame_allowed = !is_frame || has_children || config.show_empty_frames;
    let non_frame_allowed = is_frame || config.show_non_frames;
    kind_allowed && level_allowed && frame_allowed && non_frame_allowed
}

/// Derived minimap state for one node in one area. Holds the node's name,
/// never the node itself.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeCacheEntry {
    name: String,
    location: Vec2,
    width: f32,
    height: f32,
    color: Color,
    use_custom_color: bool,
    category: Option<NodeCategory>,
    parent: Option<String>,
    is_frame: bool,
    is_reroute: bool,
    has_children: bool,
    selected: bool,
    label_text: String,

    rect: Rectangle,
    draw_color: Color,
    can_draw: bool,
    // False while the rect comes from a mapping that predates this node.
    placed: bool,
    label: Option<LabelLayout>,
    batch: QuadBatch,
}

impl NodeCacheEntry {
    pub fn create<G: NodeGraph + ?Sized>(
        node: &NodeInfo,
        graph: &G,
        mapping: &Mapping,
        ctx: UpdateContext<'_>,
    ) -> Self {
        let mut entry = Self {
            name: node.name.clone(),
            location: node.location,
            width: node.width,
            height: node.height,
            color: node.color,
            use_custom_color: node.use_custom_color,
            category: classify(node),
            parent: node.parent.clone(),
            is_frame: node.is_frame(),
            is_reroute: node.is_reroute(),
            has_children: node.is_frame() && graph.has_children(&node.name),
            selected: node.selected,
            label_text: node.display_label().to_owned(),
            rect: Rectangle::ZERO,
            draw_color: Color::default(),
            can_draw: false,
            placed: false,
            label: None,
            batch: QuadBatch::new(),
        };
        entry.update_color(ctx.config);
        entry.recompute_geometry(node, graph, mapping, ctx);
        entry
    }

    /// Diffs the live node against the snapshot.
    ///
    /// Geometry changes only update the snapshot and are reported through
    /// [`NodeChange::moved`]; the owning area recomputes every entry's rect on
    /// its next bounds pass. Color and label changes are applied right away.
    pub fn update<G: NodeGraph + ?Sized>(
        &mut self,
        node: &NodeInfo,
        graph: &G,
        ctx: UpdateContext<'_>,
    ) -> NodeChange {
        let mut change = NodeChange::default();

        let is_frame = node.is_frame();
        let has_children = is_frame && graph.has_children(&node.name);
        if self.location != node.location
            || self.width != node.width
            || self.height != node.height
            || self.parent != node.parent
            || self.is_frame != is_frame
            || self.is_reroute != node.is_reroute()
            || self.has_children != has_children
        {
            self.location = node.location;
            self.width = node.width;
            self.height = node.height;
            self.parent.clone_from(&node.parent);
            self.is_frame = is_frame;
            self.is_reroute = node.is_reroute();
            self.has_children = has_children;
            change.moved = true;
        }

        let category = classify(node);
        if self.use_custom_color != node.use_custom_color
            || self.color != node.color
            || self.category != category
        {
            self.use_custom_color = node.use_custom_color;
            self.color = node.color;
            self.category = category;
            self.update_color(ctx.config);
            change.recolored = true;
        }

        if self.label_text != node.display_label() {
            self.label_text = node.display_label().to_owned();
            self.relayout_label(ctx);
        }

        self.selected = node.selected;
        change
    }

    pub fn recompute_geometry<G: NodeGraph + ?Sized>(
        &mut self,
        node: &NodeInfo,
        graph: &G,
        mapping: &Mapping,
        ctx: UpdateContext<'_>,
    ) {
        self.rect = mapping.map_rect(&node_visual_box(node, graph));
        self.can_draw = can_draw(
            self.is_reroute,
            self.is_frame,
            self.parent.is_some(),
            self.has_children,
            ctx.config,
        );
        self.batch = QuadBatch::from_rect(&self.rect);
        self.placed = true;
        self.relayout_label(ctx);
        trace!(node = %self.name, rect = ?self.rect, can_draw = self.can_draw, "node geometry");
    }

    /// Keeps the entry off the minimap until the next [`Self::recompute_geometry`].
    pub fn defer_placement(&mut self) {
        self.placed = false;
    }

    pub fn update_color(&mut self, config: &MinimapConfig) {
        let custom = self.use_custom_color.then_some(self.color);
        self.draw_color = node_color(custom, self.category, config);
    }

    fn relayout_label(&mut self, ctx: UpdateContext<'_>) {
        self.label = if self.wants_label(ctx.config) {
            layout_label(&self.label_text, &self.rect, ctx.config, ctx.text)
        } else {
            None
        };
    }

    // A frame whose children are hidden would show a lone label floating in
    // an otherwise empty box.
    fn wants_label(&self, config: &MinimapConfig) -> bool {
        let children_hidden =
            self.has_children && (config.only_top_level || !config.show_non_frames);
        self.is_frame && self.can_draw && config.show_labels && !children_hidden
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Vec2 {
        self.location
    }

    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    pub fn draw_color(&self) -> Color {
        self.draw_color
    }

    pub fn can_draw(&self) -> bool {
        self.can_draw
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn is_frame(&self) -> bool {
        self.is_frame
    }

    pub fn is_reroute(&self) -> bool {
        self.is_reroute
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn category(&self) -> Option<NodeCategory> {
        self.category
    }

    pub fn label(&self) -> Option<&LabelLayout> {
        self.label.as_ref()
    }

    pub fn batch(&self) -> &QuadBatch {
        &self.batch
    }

    pub fn draw(&self, raster: &mut dyn Rasterizer, line_width: f32, config: &MinimapConfig) {
        if !self.can_draw || !self.placed {
            return;
        }
        raster.fill_quads(&self.batch, self.draw_color);
        if self.selected {
            raster.stroke_quads(&self.batch, config.view_outline_color, line_width);
        }
    }

    pub fn draw_label(&self, raster: &mut dyn Rasterizer, config: &MinimapConfig) {
        let Some(label) = self.label.as_ref().filter(|_| self.placed) else {
            return;
        };
        for line in &label.lines {
            raster.text(
                pos2(line.pos.x, line.pos.y),
                &line.text,
                label.font_size,
                config.text_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{GraphSnapshot, NodeKind};
    use crate::minimap::draw::DrawList;
    use crate::minimap::label::FixedAdvance;
    use eframe::egui::vec2;

    fn identity_mapping() -> Mapping {
        let area = Rectangle::new(Vec2::ZERO, vec2(1000.0, 1000.0));
        Mapping::new(area, area)
    }

    fn graph() -> GraphSnapshot {
        let mut frame = NodeInfo::new("Frame", Vec2::ZERO, vec2(10.0, 10.0));
        frame.kind = NodeKind::Frame;
        frame.label = "Lighting".to_owned();
        let mut math = NodeInfo::new("Math", vec2(100.0, 100.0), vec2(140.0, 100.0));
        math.type_name = "ShaderNodeMath".to_owned();
        math.parent = Some("Frame".to_owned());
        let mut reroute = NodeInfo::new("Reroute", vec2(400.0, 400.0), vec2(16.0, 16.0));
        reroute.kind = NodeKind::Reroute;
        GraphSnapshot::new("tree", vec![frame, math, reroute])
    }

    fn entry(graph: &GraphSnapshot, name: &str, config: &MinimapConfig) -> NodeCacheEntry {
        let text = FixedAdvance::default();
        let node = graph.node(name).expect("node exists");
        NodeCacheEntry::create(node, graph, &identity_mapping(), UpdateContext::new(config, &text))
    }

    #[test]
    fn eligibility_requires_every_condition() {
        let config = MinimapConfig::default();
        assert!(can_draw(false, false, false, false, &config));
        assert!(!can_draw(true, false, false, false, &config));
        assert!(can_draw(false, true, false, false, &config));

        let hide_empty = MinimapConfig {
            show_empty_frames: false,
            ..MinimapConfig::default()
        };
        assert!(!can_draw(false, true, false, false, &hide_empty));
        assert!(can_draw(false, true, false, true, &hide_empty));

        let frames_only = MinimapConfig {
            show_non_frames: false,
            ..MinimapConfig::default()
        };
        assert!(!can_draw(false, false, false, false, &frames_only));
    }

    #[test]
    fn reroute_is_never_drawn() {
        let config = MinimapConfig {
            only_top_level: false,
            show_non_frames: true,
            show_empty_frames: true,
            ..MinimapConfig::default()
        };
        for is_frame in [false, true] {
            for has_parent in [false, true] {
                for has_children in [false, true] {
                    assert!(!can_draw(true, is_frame, has_parent, has_children, &config));
                }
            }
        }
        let graph = graph();
        assert!(!entry(&graph, "Reroute", &config).can_draw());
    }

    #[test]
    fn create_maps_frame_around_children() {
        let config = MinimapConfig::default();
        let graph = graph();
        let frame = entry(&graph, "Frame", &config);
        assert_eq!(
            *frame.rect(),
            Rectangle::new(vec2(70.0, 70.0), vec2(270.0, 230.0))
        );
        assert_eq!(frame.category(), Some(NodeCategory::Frame));
        let label = frame.label().expect("frame is labeled");
        assert_eq!(label.lines[0].text, "Lighting");
    }

    #[test]
    fn label_hidden_when_children_are_hidden() {
        let config = MinimapConfig {
            only_top_level: true,
            ..MinimapConfig::default()
        };
        let graph = graph();
        assert!(entry(&graph, "Frame", &config).label().is_none());
        assert!(!entry(&graph, "Math", &config).can_draw());
    }

    #[test]
    fn move_is_reported_without_touching_rect() {
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        let mut graph = graph();
        let mut math = entry(&graph, "Math", &config);
        let before = *math.rect();

        if let Some(node) = graph.node_mut("Math") {
            node.location += vec2(50.0, 0.0);
        }
        let node = graph.node("Math").expect("node exists");
        let change = math.update(node, &graph, UpdateContext::new(&config, &text));
        assert!(change.moved);
        assert!(!change.recolored);
        assert_eq!(*math.rect(), before);
        assert_eq!(math.location(), vec2(150.0, 100.0));

        let again = math.update(node, &graph, UpdateContext::new(&config, &text));
        assert!(!again.any());
    }

    #[test]
    fn color_change_applies_immediately() {
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        let mut graph = graph();
        let mut math = entry(&graph, "Math", &config);
        assert_eq!(math.draw_color(), config.palette.converter);

        if let Some(node) = graph.node_mut("Math") {
            node.use_custom_color = true;
            node.color = Color::rgba(1.0, 0.0, 0.0, 0.3);
        }
        let node = graph.node("Math").expect("node exists");
        let change = math.update(node, &graph, UpdateContext::new(&config, &text));
        assert!(change.recolored);
        assert!(!change.moved);
        assert_eq!(math.draw_color(), Color::rgba(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn selected_nodes_get_an_outline() {
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        let mut graph = graph();
        let mut math = entry(&graph, "Math", &config);
        if let Some(node) = graph.node_mut("Math") {
            node.selected = true;
        }
        let node = graph.node("Math").expect("node exists");
        math.update(node, &graph, UpdateContext::new(&config, &text));

        let mut list = DrawList::new();
        math.draw(&mut list, 1.0, &config);
        assert_eq!(list.commands.len(), 2);
    }

    #[test]
    fn frames_only_mode_drops_the_frame_label() {
        let config = MinimapConfig {
            show_non_frames: false,
            ..MinimapConfig::default()
        };
        let graph = graph();
        let frame = entry(&graph, "Frame", &config);
        assert!(frame.can_draw());
        assert!(frame.label().is_none());
        assert!(!entry(&graph, "Math", &config).can_draw());

        let mut empty_frame = NodeInfo::new("Empty", vec2(600.0, 0.0), vec2(80.0, 60.0));
        empty_frame.kind = NodeKind::Frame;
        empty_frame.label = "Notes".to_owned();
        let graph = GraphSnapshot::new("tree", vec![empty_frame]);
        let empty = entry(&graph, "Empty", &config);
        assert_eq!(empty.label().map(|label| label.lines[0].text.as_str()), Some("Notes"));
    }

    #[test]
    fn renamed_frame_is_relaid_out_in_the_same_update() {
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        let mut graph = graph();
        let mut frame = entry(&graph, "Frame", &config);
        let before = *frame.rect();

        if let Some(node) = graph.node_mut("Frame") {
            node.label = "Shadows".to_owned();
        }
        let node = graph.node("Frame").expect("node exists");
        let change = frame.update(node, &graph, UpdateContext::new(&config, &text));
        assert!(!change.any());
        assert_eq!(*frame.rect(), before);
        let label = frame.label().expect("frame is labeled");
        assert_eq!(label.lines[0].text, "Shadows");
    }

    #[test]
    fn deferred_entry_draws_nothing_until_remapped() {
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        let graph = graph();
        let mut frame = entry(&graph, "Frame", &config);
        frame.defer_placement();
        assert!(!frame.is_placed());

        let mut list = DrawList::new();
        frame.draw(&mut list, 1.0, &config);
        frame.draw_label(&mut list, &config);
        assert!(list.commands.is_empty());

        let node = graph.node("Frame").expect("node exists");
        let ctx = UpdateContext::new(&config, &text);
        frame.recompute_geometry(node, &graph, &identity_mapping(), ctx);
        assert!(frame.is_placed());
        frame.draw(&mut list, 1.0, &config);
        frame.draw_label(&mut list, &config);
        assert_eq!(list.commands.len(), 2);
    }
}
