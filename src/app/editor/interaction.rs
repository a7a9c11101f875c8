use eframe::egui::{self, PointerButton, Pos2, Rect, Ui, pos2};
use node_minimap::geometry::Rectangle;
use node_minimap::host::{NodeGraph, NodeInfo};
use node_minimap::minimap::{MinimapHit, node_visual_box};
use tracing::debug;

use super::super::painter::{screen_to_world, world_to_screen};
use super::super::{DragTarget, EditorRegion, ViewModel};

impl EditorRegion {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Part of the region not covered by the sidebar.
    pub(in crate::app) fn content_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(
            rect.min,
            pos2((rect.right() - self.sidebar_width()).max(rect.left()), rect.bottom()),
        )
    }

    /// Visible node-space rectangle of the content area.
    pub(in crate::app) fn view_area(&self, rect: Rect) -> Rectangle {
        let content = self.content_rect(rect);
        Rectangle::new(
            screen_to_world(rect, self.pan, self.zoom, content.min),
            screen_to_world(rect, self.pan, self.zoom, content.max),
        )
    }

    pub(in crate::app) fn center_on(&mut self, rect: Rect, world: egui::Vec2) {
        let content = self.content_rect(rect);
        self.pan = content.center() - rect.center() - world * self.zoom;
    }

    pub(in crate::app) fn fit_view(&mut self, rect: Rect, node_area: &Rectangle) {
        let content = self.content_rect(rect);
        let size = node_area.size().abs();
        let zoom = if size.x > 0.0 && size.y > 0.0 {
            (content.width() / size.x).min(content.height() / size.y) * 0.85
        } else {
            1.0
        };
        self.zoom = zoom.clamp(0.05, 6.0);
        self.center_on(rect, node_area.center());
    }

    pub(in crate::app) fn node_screen_rect<G: NodeGraph + ?Sized>(
        &self,
        rect: Rect,
        node: &NodeInfo,
        graph: &G,
    ) -> Rect {
        let world = node_visual_box(node, graph);
        Rect::from_min_max(
            world_to_screen(rect, self.pan, self.zoom, world.true_min()),
            world_to_screen(rect, self.pan, self.zoom, world.true_max()),
        )
    }

    /// Topmost node under `pointer`: regular nodes over frames, later nodes
    /// over earlier ones.
    pub(in crate::app) fn node_at<G: NodeGraph + ?Sized>(
        &self,
        rect: Rect,
        graph: &G,
        pointer: Pos2,
    ) -> Option<String> {
        let nodes = graph.nodes();
        nodes
            .iter()
            .rev()
            .filter(|node| !node.is_frame())
            .chain(nodes.iter().rev().filter(|node| node.is_frame()))
            .find(|node| self.node_screen_rect(rect, node, graph).contains(pointer))
            .map(|node| node.name.clone())
    }
}

impl ViewModel {
    /// Editor and minimap input for one region, resolved against the
    /// minimap geometry cached on the previous tick.
    pub(in crate::app) fn handle_region_input(
        &mut self,
        ui: &Ui,
        index: usize,
        rect: Rect,
        response: &egui::Response,
    ) {
        let Self {
            workspace,
            config,
            minimap,
            regions,
            ..
        } = self;
        let Some(region) = regions.get_mut(index) else {
            return;
        };

        region.handle_zoom(ui, rect, response);
        region.handle_pan(response);

        let Some(graph_key) = region.graph_key().map(str::to_owned) else {
            return;
        };
        let area = if config.enabled {
            minimap.area(&region.key)
        } else {
            None
        };
        let minimap_hit = |pos: Pos2| {
            area.map_or(MinimapHit::Outside, |area| area.hit_test(pos - rect.min))
        };
        let pointer = response.interact_pointer_pos();

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            region.drag = if minimap_hit(pos) != MinimapHit::Outside {
                Some(DragTarget::Minimap)
            } else {
                workspace
                    .graph(&graph_key)
                    .and_then(|graph| region.node_at(rect, graph, pos))
                    .map(DragTarget::Node)
            };
            if let Some(DragTarget::Node(name)) = &region.drag {
                workspace.select(&graph_key, Some(name));
            }
        }

        if response.dragged_by(PointerButton::Primary) {
            let delta = response.drag_delta();
            match &region.drag {
                Some(DragTarget::Node(name)) => {
                    workspace.move_node(&graph_key, name, delta / region.zoom);
                }
                Some(DragTarget::Minimap) => {
                    if let Some(area) = area {
                        region.pan -= area.map_delta_to_node(delta) * region.zoom;
                    }
                }
                None => {}
            }
        }

        if response.drag_stopped() {
            region.drag = None;
        }

        if response.double_clicked_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            if minimap_hit(pos) == MinimapHit::Outside {
                let target = workspace
                    .graph(&graph_key)
                    .and_then(|graph| region.node_at(rect, graph, pos))
                    .and_then(|name| workspace.group_target(&graph_key, &name))
                    .map(str::to_owned);
                if let Some(target) = target {
                    debug!(region = %region.key, group = %target, "entering group");
                    region.enter_group(&target);
                }
            } else if let Some(area) = area {
                region.fit_view(rect, area.node_area());
            }
        } else if response.clicked_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            match minimap_hit(pos) {
                MinimapHit::Node(name) if config.zoom_to_nodes => {
                    let center = workspace.graph(&graph_key).and_then(|graph| {
                        graph
                            .node(&name)
                            .map(|node| node_visual_box(node, graph).center())
                    });
                    if let Some(center) = center {
                        region.center_on(rect, center);
                    }
                    workspace.select(&graph_key, Some(&name));
                }
                MinimapHit::Node(_) | MinimapHit::Background => {
                    if let Some(area) = area {
                        region.center_on(rect, area.map_to_node(pos - rect.min));
                    }
                }
                MinimapHit::Outside => {
                    let hit = workspace
                        .graph(&graph_key)
                        .and_then(|graph| region.node_at(rect, graph, pos));
                    workspace.select(&graph_key, hit.as_deref());
                }
            }
        }
    }

    /// Applies view requests that need the region's rect: the initial fit
    /// and jumps requested from the search box.
    pub(in crate::app) fn apply_pending_view(&mut self, index: usize, rect: Rect) {
        let Some(region) = self.regions.get_mut(index) else {
            return;
        };
        let Some(graph_key) = region.graph_key().map(str::to_owned) else {
            return;
        };
        let Some(graph) = self.workspace.graph(&graph_key) else {
            return;
        };

        if region.needs_fit {
            region.needs_fit = false;
            region.fit_view(rect, &node_minimap::minimap::compute_node_area(graph));
        }

        let Some(name) = region.pending_focus.take() else {
            return;
        };
        let Some(node) = graph.node(&name) else {
            return;
        };
        region.center_on(rect, node_visual_box(node, graph).center());
        self.workspace.select(&graph_key, Some(&name));
    }
}
