use eframe::egui::{Vec2, vec2};

use crate::config::MinimapConfig;
use crate::geometry::{Rectangle, vec_divide, vec_lerp, vec_multiply};

/// Extra top offset keeping a top-left minimap clear of the breadcrumb overlay.
const CONTEXT_PATH_CLEARANCE: f32 = 30.0;

/// Normalized position of `pos` inside `node_area`. A zero sized axis maps to 0.
pub fn pos_to_fac(pos: Vec2, node_area: &Rectangle) -> Vec2 {
    vec_divide(pos - node_area.min, node_area.size())
}

pub fn node_area_to_map_area(pos: Vec2, node_area: &Rectangle, map_area: &Rectangle) -> Vec2 {
    vec_lerp(pos_to_fac(pos, node_area), map_area.min, map_area.max)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mapping {
    pub node_area: Rectangle,
    pub map_area: Rectangle,
    pub scale: Vec2,
}

impl Mapping {
    pub fn new(node_area: Rectangle, map_area: Rectangle) -> Self {
        let scale = vec_divide(map_area.size(), node_area.size());
        Self {
            node_area,
            map_area,
            scale,
        }
    }

    pub fn map_point(&self, pos: Vec2) -> Vec2 {
        node_area_to_map_area(pos, &self.node_area, &self.map_area)
    }

    /// Sizes only scale; there is no translation term.
    pub fn map_size(&self, size: Vec2) -> Vec2 {
        vec_multiply(size, self.scale)
    }

    pub fn map_rect(&self, rect: &Rectangle) -> Rectangle {
        let min = self.map_point(rect.min);
        Rectangle::new(min, min + self.map_size(rect.size()))
    }

    /// The host's visible node-space rectangle as a box cropped to the map.
    pub fn view_box(&self, view_area: &Rectangle) -> Rectangle {
        let mut view_box = Rectangle::new(
            self.map_point(view_area.min),
            self.map_point(view_area.max),
        );
        view_box.crop(&self.map_area);
        view_box
    }

    pub fn map_delta_to_node(&self, delta: Vec2) -> Vec2 {
        vec_divide(delta, self.scale)
    }
}

/// Footprint of the minimap in region pixels, origin at the region's top-left
/// corner with y growing downward.
pub fn compute_map_area(
    region_size: Vec2,
    show_context_path: bool,
    node_area: &Rectangle,
    config: &MinimapConfig,
) -> Rectangle {
    let side = (region_size.x * config.size)
        .max(config.min_size)
        .min(config.max_size);

    let node_size = node_area.size();
    let aspect = if node_size.x == 0.0 {
        1.0
    } else {
        (node_size.y / node_size.x).abs()
    };
    let size = vec2(side, side * aspect);

    let mut padding = config.offset();
    let corner = config.anchor_corner;
    if !corner.is_bottom() && corner.is_left() && show_context_path {
        padding.y += CONTEXT_PATH_CLEARANCE;
    }

    let (min_y, max_y) = if corner.is_bottom() {
        let max_y = region_size.y - padding.y;
        (max_y - size.y, max_y)
    } else {
        (padding.y, padding.y + size.y)
    };

    let (min_x, max_x) = if corner.is_left() {
        (padding.x, padding.x + size.x)
    } else {
        let max_x = region_size.x - padding.x;
        (max_x - size.x, max_x)
    };

    Rectangle::new(vec2(min_x, min_y), vec2(max_x, max_y))
}
