use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui, pos2, vec2};
use node_minimap::config::MinimapConfig;
use node_minimap::host::{GraphSnapshot, NodeGraph, NodeInfo, RegionInfo};
use node_minimap::minimap::{AreaCacheEntry, UpdateContext, classify, node_color};

use super::super::painter::{EguiRasterizer, EguiText, draw_background};
use super::super::{EditorRegion, ViewModel};

const NODE_BODY: Color32 = Color32::from_rgb(48, 48, 48);
const SELECTED: Color32 = Color32::from_rgb(255, 160, 40);

impl ViewModel {
    pub(in crate::app) fn draw_editors(&mut self, ui: &mut Ui) {
        let (full, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());

        let rects = split_rects(full, if self.split_view { 2 } else { 1 });
        let infos: Vec<RegionInfo> = self
            .regions
            .iter()
            .zip(&rects)
            .map(|(region, rect)| region.info(*rect))
            .collect();

        let text = EguiText::new(ui.painter().clone());
        if self.config.enabled {
            self.minimap
                .update(&infos, &self.workspace, UpdateContext::new(&self.config, &text));
        } else if !self.minimap.is_empty() {
            self.minimap.clear();
        }

        for (index, (rect, info)) in rects.iter().zip(&infos).enumerate() {
            self.draw_region(ui, index, *rect, info, &text);
        }
    }

    fn draw_region(
        &mut self,
        ui: &Ui,
        index: usize,
        rect: Rect,
        info: &RegionInfo,
        text: &EguiText,
    ) {
        let response = ui.interact(
            rect,
            ui.id().with(("editor-region", index)),
            Sense::click_and_drag(),
        );
        self.handle_region_input(ui, index, rect, &response);
        self.apply_pending_view(index, rect);

        let Some(region) = self.regions.get(index) else {
            return;
        };
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, region.pan, region.zoom);

        if let Some(graph) = region.graph_key().and_then(|key| self.workspace.graph(key)) {
            draw_graph(&painter, rect, region, graph, &self.config);
        }

        if self.config.enabled
            && let Some(area) =
                self.minimap
                    .update_area(info, &self.workspace, UpdateContext::new(&self.config, text))
        {
            let mut raster = EguiRasterizer::new(&painter, rect.min);
            area.draw(&mut raster, &self.config, Some(&region.view_area(rect)));
        }

        if region.show_context_path {
            draw_context_path(&painter, rect, &region.path);
        }
        if region.sidebar_open {
            let selected = region
                .graph_key()
                .and_then(|key| self.workspace.graph(key))
                .and_then(|graph| graph.nodes().iter().find(|node| node.selected));
            draw_sidebar(&painter, rect, region, selected, self.minimap.area(&region.key));
        }
        if index > 0 {
            painter.line_segment(
                [rect.left_top(), rect.left_bottom()],
                Stroke::new(2.0, Color32::from_gray(15)),
            );
        }
    }
}

fn split_rects(full: Rect, count: usize) -> Vec<Rect> {
    if count < 2 {
        return vec![full];
    }
    let width = full.width() / count as f32;
    (0..count)
        .map(|index| {
            let left = full.left() + width * index as f32;
            Rect::from_min_max(pos2(left, full.top()), pos2(left + width, full.bottom()))
        })
        .collect()
}

fn draw_graph(
    painter: &Painter,
    rect: Rect,
    region: &EditorRegion,
    graph: &GraphSnapshot,
    config: &MinimapConfig,
) {
    let zoom = region.zoom;
    let show_text = zoom >= 0.35;
    let font = FontId::proportional((12.0 * zoom).clamp(6.0, 20.0));

    for frame in graph.nodes().iter().filter(|node| node.is_frame()) {
        let screen = region.node_screen_rect(rect, frame, graph);
        let fill = node_fill(frame, config).gamma_multiply(0.45);
        painter.rect_filled(screen, 4.0, fill);
        outline(painter, screen, frame_stroke(frame));
        if show_text {
            painter.text(
                screen.left_top() + vec2(8.0, 6.0),
                Align2::LEFT_TOP,
                frame.display_label(),
                FontId::proportional((14.0 * zoom).clamp(7.0, 24.0)),
                Color32::from_gray(210),
            );
        }
    }

    for node in graph.nodes().iter().filter(|node| !node.is_frame()) {
        let screen = region.node_screen_rect(rect, node, graph);
        if node.is_reroute() {
            let color = if node.selected {
                SELECTED
            } else {
                Color32::from_gray(160)
            };
            painter.circle_filled(screen.center(), (5.0 * zoom).max(2.0), color);
            continue;
        }

        painter.rect_filled(screen, 4.0, NODE_BODY);
        let header_height = (20.0 * zoom).min(screen.height());
        let header = Rect::from_min_size(screen.min, vec2(screen.width(), header_height));
        painter.rect_filled(header, 4.0, node_fill(node, config));
        outline(painter, screen, frame_stroke(node));
        if show_text {
            painter.text(
                pos2(header.left() + 6.0 * zoom, header.center().y),
                Align2::LEFT_CENTER,
                node.display_label(),
                font.clone(),
                Color32::from_gray(230),
            );
        }
    }
}

fn node_fill(node: &NodeInfo, config: &MinimapConfig) -> Color32 {
    let custom = node.use_custom_color.then_some(node.color);
    node_color(custom, classify(node), config)
        .with_alpha(1.0)
        .to_color32()
}

fn frame_stroke(node: &NodeInfo) -> Stroke {
    if node.selected {
        Stroke::new(2.0, SELECTED)
    } else {
        Stroke::new(1.0, Color32::from_gray(20))
    }
}

fn outline(painter: &Painter, rect: Rect, stroke: Stroke) {
    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
    painter.line_segment([rect.right_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_bottom(), rect.left_bottom()], stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], stroke);
}

fn draw_context_path(painter: &Painter, rect: Rect, path: &[String]) {
    let text = path
        .iter()
        .map(|key| key.rsplit('/').next().unwrap_or(key))
        .collect::<Vec<_>>()
        .join("  >  ");
    painter.text(
        rect.left_top() + vec2(12.0, 10.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        Color32::from_gray(200),
    );
}

fn draw_sidebar(
    painter: &Painter,
    rect: Rect,
    region: &EditorRegion,
    selected: Option<&NodeInfo>,
    area: Option<&AreaCacheEntry>,
) {
    let panel = Rect::from_min_max(pos2(region.content_rect(rect).right(), rect.top()), rect.max);
    painter.rect_filled(panel, 0.0, Color32::from_rgb(40, 40, 40));

    let mut lines = vec![("Node".to_owned(), true)];
    match selected {
        Some(node) => {
            lines.push((node.display_label().to_owned(), false));
            lines.push((format!("type: {}", node.type_name), false));
            lines.push((
                format!("location: {:.0}, {:.0}", node.location.x, node.location.y),
                false,
            ));
            lines.push((format!("size: {:.0} x {:.0}", node.width, node.height), false));
            if let Some(parent) = &node.parent {
                lines.push((format!("frame: {parent}"), false));
            }
            if let Some(entry) = area.and_then(|area| area.node(&node.name)) {
                let min = entry.rect().true_min();
                let max = entry.rect().true_max();
                lines.push((
                    format!("minimap: {:.0},{:.0} .. {:.0},{:.0}", min.x, min.y, max.x, max.y),
                    false,
                ));
                lines.push((format!("drawn: {}", entry.can_draw()), false));
                if let Some(category) = entry.category() {
                    lines.push((format!("category: {category:?}"), false));
                }
            }
        }
        None => lines.push(("nothing selected".to_owned(), false)),
    }

    lines.push((String::new(), false));
    lines.push(("Minimap".to_owned(), true));
    match area {
        Some(area) => {
            let size = area.node_area().size();
            let scale = area.scale();
            lines.push((format!("graph: {}", area.graph_key()), false));
            lines.push((format!("nodes: {}", area.nodes().len()), false));
            lines.push((format!("node area: {:.0} x {:.0}", size.x.abs(), size.y.abs()), false));
            lines.push((format!("scale: {:.3}, {:.3}", scale.x, scale.y), false));
            lines.push((format!("bounds revision: {}", area.bounds_revision()), false));
        }
        None => lines.push(("not cached".to_owned(), false)),
    }

    let mut cursor = panel.left_top() + vec2(12.0, 12.0);
    for (line, heading) in lines {
        let (size, color) = if heading {
            (14.0, Color32::from_gray(235))
        } else {
            (12.0, Color32::from_gray(185))
        };
        let galley = painter.layout_no_wrap(line, FontId::proportional(size), color);
        let height = galley.size().y;
        painter.galley(cursor, galley, color);
        cursor.y += height + 4.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_view_halves_the_central_rect() {
        let full = Rect::from_min_max(pos2(0.0, 20.0), pos2(1000.0, 620.0));
        let rects = split_rects(full, 2);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].max, pos2(500.0, 620.0));
        assert_eq!(rects[1].min, pos2(500.0, 20.0));
        assert_eq!(split_rects(full, 1), vec![full]);
    }
}
