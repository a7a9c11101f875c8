//! Incremental minimap cache.
//!
//! Per redraw tick the host calls [`MinimapCache::update`] once with the open
//! regions, then [`MinimapCache::update_area`] for each region it is about to
//! draw, then draws the returned [`AreaCacheEntry`] through a [`Rasterizer`].
//! Node entries diff themselves against the live graph; a moved node marks
//! its area dirty and the area recomputes its bounds on the following tick.

mod area_cache;
mod bounds;
mod color;
mod draw;
mod interaction;
mod label;
mod mapping;
mod node_cache;
mod registry;

pub use area_cache::AreaCacheEntry;
pub use bounds::{FRAME_PADDING, compute_node_area, node_visual_box, node_visual_location};
pub use color::{CATEGORY_RULES, CategoryRule, NodeCategory, RulePredicate, classify, node_color};
pub use draw::{DrawCommand, DrawList, QuadBatch, Rasterizer, outline_width};
pub use interaction::MinimapHit;
pub use label::{FixedAdvance, LabelLayout, LabelLine, TextMeasure, layout_label};
pub use mapping::{Mapping, compute_map_area, node_area_to_map_area, pos_to_fac};
pub use node_cache::{NodeCacheEntry, NodeChange, can_draw};
pub use registry::{Invalidate, MinimapCache};

use crate::config::MinimapConfig;

#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub config: &'a MinimapConfig,
    pub text: &'a dyn TextMeasure,
}

impl<'a> UpdateContext<'a> {
    pub fn new(config: &'a MinimapConfig, text: &'a dyn TextMeasure) -> Self {
        Self { config, text }
    }
}
