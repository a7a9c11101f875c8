use eframe::egui::Vec2;

use super::area_cache::AreaCacheEntry;

/// What a pointer position on the region resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MinimapHit {
    Outside,
    Background,
    Node(String),
}

impl AreaCacheEntry {
    /// `pos` is in region pixels, the same space as the map area.
    pub fn hit_test(&self, pos: Vec2) -> MinimapHit {
        if !self.map_area().contains(pos) {
            return MinimapHit::Outside;
        }
        match self.node_at(pos) {
            Some(name) => MinimapHit::Node(name.to_owned()),
            None => MinimapHit::Background,
        }
    }

    /// Top-level node under `pos`. Nodes are drawn over frames and later
    /// entries over earlier ones, so the search runs in reverse draw order.
    pub fn node_at(&self, pos: Vec2) -> Option<&str> {
        let candidates = || {
            self.nodes()
                .iter()
                .rev()
                .filter(|entry| {
                    entry.can_draw() && entry.is_placed() && entry.parent().is_none()
                })
        };
        candidates()
            .filter(|entry| !entry.is_frame())
            .chain(candidates().filter(|entry| entry.is_frame()))
            .find(|entry| entry.rect().contains(pos))
            .map(|entry| entry.name())
    }

    pub fn map_delta_to_node(&self, delta: Vec2) -> Vec2 {
        self.mapping().map_delta_to_node(delta)
    }

    /// Node-space point under a minimap position, for click-to-pan.
    pub fn map_to_node(&self, pos: Vec2) -> Vec2 {
        let mapping = self.mapping();
        mapping.node_area.min + mapping.map_delta_to_node(pos - mapping.map_area.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinimapConfig;
    use crate::host::{GraphSnapshot, NodeInfo, NodeKind, RegionInfo};
    use crate::minimap::UpdateContext;
    use crate::minimap::label::FixedAdvance;
    use eframe::egui::vec2;

    // Node area (0,0)-(400,200) lands on (940,660)-(1180,780): scale 0.6.
    fn area() -> AreaCacheEntry {
        let mut frame = NodeInfo::new("Frame", vec2(5000.0, 5000.0), vec2(10.0, 10.0));
        frame.kind = NodeKind::Frame;
        let mut inside = NodeInfo::new("Inside", vec2(30.0, 30.0), vec2(100.0, 100.0));
        inside.parent = Some("Frame".to_owned());
        let loose = NodeInfo::new("Loose", vec2(300.0, 100.0), vec2(100.0, 100.0));
        let graph = GraphSnapshot::new("tree", vec![frame, inside, loose]);
        let region = RegionInfo {
            key: "editor".to_owned(),
            width: 1200.0,
            height: 800.0,
            ..RegionInfo::default()
        };
        let config = MinimapConfig::default();
        let text = FixedAdvance::default();
        AreaCacheEntry::create(&region, &graph, UpdateContext::new(&config, &text))
    }

    #[test]
    fn hit_test_classifies_pointer() {
        let area = area();
        assert_eq!(area.hit_test(vec2(10.0, 10.0)), MinimapHit::Outside);
        assert_eq!(area.hit_test(vec2(1170.0, 670.0)), MinimapHit::Background);
        assert_eq!(
            area.hit_test(vec2(1150.0, 750.0)),
            MinimapHit::Node("Loose".to_owned())
        );
    }

    #[test]
    fn nested_nodes_resolve_to_their_frame() {
        let area = area();
        // Inside the child's rect, which is not top-level.
        assert_eq!(area.node_at(vec2(990.0, 710.0)), Some("Frame"));
    }

    #[test]
    fn drag_delta_scales_back_to_node_space() {
        let area = area();
        let delta = area.map_delta_to_node(vec2(6.0, -3.0));
        assert!((delta.x - 10.0).abs() < 1e-4);
        assert!((delta.y + 5.0).abs() < 1e-4);
        let point = area.map_to_node(vec2(1000.0, 720.0));
        assert!((point.x - 100.0).abs() < 1e-3);
        assert!((point.y - 100.0).abs() < 1e-3);
    }
}
