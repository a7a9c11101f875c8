use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use node_minimap::config::Color;
use node_minimap::minimap::{QuadBatch, Rasterizer, TextMeasure};

/// Draws minimap batches with an egui painter. Minimap coordinates are
/// region-local, `origin` is the region's top-left corner on screen.
pub(super) struct EguiRasterizer<'a> {
    painter: &'a Painter,
    origin: Vec2,
}

impl<'a> EguiRasterizer<'a> {
    pub(super) fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin: origin.to_vec2(),
        }
    }

    fn quad_on_screen(&self, quad: &[Pos2; 4]) -> [Pos2; 4] {
        quad.map(|point| point + self.origin)
    }
}

impl Rasterizer for EguiRasterizer<'_> {
    fn fill_quads(&mut self, batch: &QuadBatch, color: Color) {
        let fill = color.to_color32();
        for quad in batch.quads() {
            let points = self.quad_on_screen(quad);
            self.painter
                .rect_filled(Rect::from_points(&points), 0.0, fill);
        }
    }

    fn stroke_quads(&mut self, batch: &QuadBatch, color: Color, width: f32) {
        let stroke = Stroke::new(width, color.to_color32());
        for quad in batch.quads() {
            let [a, b, c, d] = self.quad_on_screen(quad);
            self.painter.line_segment([a, b], stroke);
            self.painter.line_segment([b, c], stroke);
            self.painter.line_segment([c, d], stroke);
            self.painter.line_segment([d, a], stroke);
        }
    }

    fn text(&mut self, pos: Pos2, text: &str, font_size: f32, color: Color) {
        self.painter.text(
            pos + self.origin,
            Align2::LEFT_TOP,
            text,
            FontId::proportional(font_size),
            color.to_color32(),
        );
    }
}

/// Text metrics from egui's font atlas.
pub(super) struct EguiText {
    painter: Painter,
}

impl EguiText {
    pub(super) fn new(painter: Painter) -> Self {
        Self { painter }
    }
}

impl TextMeasure for EguiText {
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(font_size), Color32::WHITE)
            .size()
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(29, 29, 29));

    let step = (40.0 * zoom.clamp(0.5, 2.0)).max(16.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(70, 70, 70, 90));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
