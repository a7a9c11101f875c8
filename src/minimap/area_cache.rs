use std::collections::HashSet;
use std::mem;

use eframe::egui::Vec2;
use tracing::debug;

use crate::config::MinimapConfig;
use crate::geometry::Rectangle;
use crate::host::{NodeGraph, RegionInfo};

use super::UpdateContext;
use super::bounds::compute_node_area;
use super::draw::{
    QuadBatch, Rasterizer, draw_background, draw_outline, draw_view_box, outline_width,
};
use super::mapping::{Mapping, compute_map_area};
use super::node_cache::NodeCacheEntry;

#[derive(Clone, Debug)]
pub struct AreaCacheEntry {
    region_key: String,
    region_size: Vec2,
    show_context_path: bool,
    graph_key: String,
    mapping: Mapping,
    nodes: Vec<NodeCacheEntry>,
    tag_update: bool,
    map_batch: QuadBatch,
    bounds_revision: u64,
}

impl AreaCacheEntry {
    pub fn create<G: NodeGraph + ?Sized>(
        region: &RegionInfo,
        graph: &G,
        ctx: UpdateContext<'_>,
    ) -> Self {
        let mut area = Self {
            region_key: region.key.clone(),
            region_size: region.content_size(),
            show_context_path: region.show_context_path,
            graph_key: graph.key().to_owned(),
            mapping: Mapping::default(),
            nodes: Vec::new(),
            tag_update: false,
            map_batch: QuadBatch::new(),
            bounds_revision: 0,
        };
        area.recompute_bounds(region, graph, ctx);
        area.nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeCacheEntry::create(node, graph, &area.mapping, ctx))
            .collect();
        debug!(
            region = %area.region_key,
            graph = %area.graph_key,
            nodes = area.nodes.len(),
            "created minimap area"
        );
        area
    }

    /// One tick for this region.
    ///
    /// Dirty marks raised by node updates in this call are only consumed by
    /// the next call, so a moved node shows up in the bounds one tick later.
    /// Graph switches, region resizes and marks raised between ticks are
    /// handled in the same call.
    pub fn update<G: NodeGraph + ?Sized>(
        &mut self,
        region: &RegionInfo,
        graph: &G,
        ctx: UpdateContext<'_>,
    ) {
        let pending = mem::take(&mut self.tag_update);
        let mut force = pending;

        if self.graph_key != graph.key() {
            debug!(
                region = %self.region_key,
                from = %self.graph_key,
                to = %graph.key(),
                "graph switched, rebuilding minimap area"
            );
            self.graph_key = graph.key().to_owned();
            self.nodes.clear();
            force = true;
        }

        self.reconcile_membership(graph, ctx);

        // Mark phase: only record which entries moved.
        let mut moved = false;
        for entry in &mut self.nodes {
            let Some(node) = graph.node(entry.name()) else {
                continue;
            };
            moved |= entry.update(node, graph, ctx).moved;
        }
        if moved {
            self.tag_update = true;
        }

        // Recompute phase.
        let resized = self.region_size != region.content_size()
            || self.show_context_path != region.show_context_path;
        if force || resized {
            if resized {
                debug!(
                    region = %self.region_key,
                    size = ?region.content_size(),
                    "region resized"
                );
            }
            self.recompute_bounds(region, graph, ctx);
            for entry in &mut self.nodes {
                let Some(node) = graph.node(entry.name()) else {
                    continue;
                };
                entry.recompute_geometry(node, graph, &self.mapping, ctx);
            }
        }
    }

    /// Drops entries whose node is gone and, when the counts disagree, adds
    /// entries for nodes the cache has not seen yet. New entries stay hidden
    /// until the next bounds pass places them.
    fn reconcile_membership<G: NodeGraph + ?Sized>(
        &mut self,
        graph: &G,
        ctx: UpdateContext<'_>,
    ) {
        let before = self.nodes.len();
        self.nodes.retain(|entry| graph.node(entry.name()).is_some());
        let removed = before - self.nodes.len();

        let live = graph.nodes();
        let mut added = 0;
        if live.len() != self.nodes.len() {
            let known: HashSet<String> = self
                .nodes
                .iter()
                .map(|entry| entry.name().to_owned())
                .collect();
            for node in live.iter().filter(|node| !known.contains(&node.name)) {
                let mut entry = NodeCacheEntry::create(node, graph, &self.mapping, ctx);
                entry.defer_placement();
                self.nodes.push(entry);
                added += 1;
            }
        }

        if removed > 0 || added > 0 {
            debug!(
                region = %self.region_key,
                added,
                removed,
                total = self.nodes.len(),
                "minimap membership changed"
            );
            self.tag_update = true;
        }
    }

    fn recompute_bounds<G: NodeGraph + ?Sized>(
        &mut self,
        region: &RegionInfo,
        graph: &G,
        ctx: UpdateContext<'_>,
    ) {
        self.region_size = region.content_size();
        self.show_context_path = region.show_context_path;

        let node_area = compute_node_area(graph);
        let map_area = compute_map_area(
            self.region_size,
            self.show_context_path,
            &node_area,
            ctx.config,
        );
        self.mapping = Mapping::new(node_area, map_area);
        self.map_batch = QuadBatch::from_rect(&map_area);
        self.bounds_revision += 1;
        debug!(
            region = %self.region_key,
            revision = self.bounds_revision,
            node_area = ?node_area,
            map_area = ?map_area,
            "recomputed minimap bounds"
        );
    }

    /// Emits background, frames, nodes, labels, outline and view box, in
    /// that order. `view_area` is the region's visible rect in node space.
    pub fn draw(
        &self,
        raster: &mut dyn Rasterizer,
        config: &MinimapConfig,
        view_area: Option<&Rectangle>,
    ) {
        let line_width = outline_width(&self.mapping.map_area, config);
        draw_background(raster, &self.map_batch, config);

        for entry in self.nodes.iter().filter(|entry| entry.is_frame()) {
            entry.draw(raster, line_width, config);
        }
        for entry in self.nodes.iter().filter(|entry| !entry.is_frame()) {
            entry.draw(raster, line_width, config);
        }
        for entry in &self.nodes {
            entry.draw_label(raster, config);
        }

        draw_outline(raster, &self.map_batch, line_width, config);
        if let Some(view_area) = view_area {
            let view_box = self.mapping.view_box(view_area);
            draw_view_box(raster, &view_box, line_width, config);
        }
    }

    pub fn refresh_colors(&mut self, config: &MinimapConfig) {
        for entry in &mut self.nodes {
            entry.update_color(config);
        }
    }

    pub fn mark_dirty(&mut self) {
        self.tag_update = true;
    }

    pub fn tag_update(&self) -> bool {
        self.tag_update
    }

    pub fn bounds_revision(&self) -> u64 {
        self.bounds_revision
    }

    pub fn region_key(&self) -> &str {
        &self.region_key
    }

    pub fn graph_key(&self) -> &str {
        &self.graph_key
    }

    pub fn region_size(&self) -> Vec2 {
        self.region_size
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn node_area(&self) -> &Rectangle {
        &self.mapping.node_area
    }

    pub fn map_area(&self) -> &Rectangle {
        &self.mapping.map_area
    }

    pub fn scale(&self) -> Vec2 {
        self.mapping.scale
    }

    pub fn nodes(&self) -> &[NodeCacheEntry] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeCacheEntry> {
        self.nodes.iter().find(|entry| entry.name() == name)
    }
}
