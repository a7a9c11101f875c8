use eframe::egui::Pos2;

use crate::config::{Color, MinimapConfig};
use crate::geometry::Rectangle;

/// Prepared quad geometry, rebuilt only when the owning cache recomputes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadBatch {
    quads: Vec<[Pos2; 4]>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: &Rectangle) -> Self {
        let mut batch = Self::new();
        batch.push(rect);
        batch
    }

    pub fn push(&mut self, rect: &Rectangle) {
        self.quads.push(rect.coords());
    }

    pub fn quads(&self) -> &[[Pos2; 4]] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

/// Drawing backend for the minimap. All coordinates are in minimap space,
/// i.e. region pixels from the region's top-left corner.
pub trait Rasterizer {
    fn fill_quads(&mut self, batch: &QuadBatch, color: Color);
    fn stroke_quads(&mut self, batch: &QuadBatch, color: Color, width: f32);
    /// `pos` is the top-left corner of the text.
    fn text(&mut self, pos: Pos2, text: &str, font_size: f32, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill {
        quads: Vec<[Pos2; 4]>,
        color: Color,
    },
    Stroke {
        quads: Vec<[Pos2; 4]>,
        color: Color,
        width: f32,
    },
    Text {
        pos: Pos2,
        text: String,
        font_size: f32,
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> impl Iterator<Item = (&[[Pos2; 4]], Color)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Fill { quads, color } => Some((quads.as_slice(), *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Rasterizer for DrawList {
    fn fill_quads(&mut self, batch: &QuadBatch, color: Color) {
        self.commands.push(DrawCommand::Fill {
            quads: batch.quads().to_vec(),
            color,
        });
    }

    fn stroke_quads(&mut self, batch: &QuadBatch, color: Color, width: f32) {
        self.commands.push(DrawCommand::Stroke {
            quads: batch.quads().to_vec(),
            color,
            width,
        });
    }

    fn text(&mut self, pos: Pos2, text: &str, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_owned(),
            font_size,
            color,
        });
    }
}

pub fn outline_width(map_area: &Rectangle, config: &MinimapConfig) -> f32 {
    map_area.size().x.abs() / 250.0 * config.line_width
}

pub(crate) fn draw_outline(
    raster: &mut dyn Rasterizer,
    map_batch: &QuadBatch,
    line_width: f32,
    config: &MinimapConfig,
) {
    raster.stroke_quads(map_batch, config.outline_color, line_width);
}

pub(crate) fn draw_background(
    raster: &mut dyn Rasterizer,
    map_batch: &QuadBatch,
    config: &MinimapConfig,
) {
    raster.fill_quads(map_batch, config.background_color);
}

pub(crate) fn draw_view_box(
    raster: &mut dyn Rasterizer,
    view_box: &Rectangle,
    line_width: f32,
    config: &MinimapConfig,
) {
    let size = view_box.size();
    if size.x == 0.0 && size.y == 0.0 {
        return;
    }
    raster.stroke_quads(
        &QuadBatch::from_rect(view_box),
        config.view_outline_color,
        line_width,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn batch_keeps_corner_order() {
        let batch = QuadBatch::from_rect(&Rectangle::new(vec2(1.0, 2.0), vec2(3.0, 4.0)));
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.quads()[0],
            [pos2(1.0, 2.0), pos2(3.0, 2.0), pos2(3.0, 4.0), pos2(1.0, 4.0)]
        );
    }

    #[test]
    fn outline_scales_with_map_width() {
        let config = MinimapConfig {
            line_width: 2.0,
            ..MinimapConfig::default()
        };
        let map = Rectangle::new(vec2(0.0, 0.0), vec2(125.0, 40.0));
        assert_eq!(outline_width(&map, &config), 1.0);
    }

    #[test]
    fn collapsed_view_box_is_skipped() {
        let mut list = DrawList::new();
        let config = MinimapConfig::default();
        let collapsed = Rectangle::new(vec2(5.0, 5.0), vec2(5.0, 5.0));
        draw_view_box(&mut list, &collapsed, 1.0, &config);
        assert!(list.commands.is_empty());
    }
}
