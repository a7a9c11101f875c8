use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::MinimapConfig;
use crate::host::{GraphProvider, NodeGraph, RegionInfo};

use super::UpdateContext;
use super::area_cache::AreaCacheEntry;

/// What a settings change invalidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalidate {
    /// Layout settings: every area recomputes its bounds on the next tick.
    Geometry,
    /// Color settings: colors are re-derived now, geometry next tick.
    Colors,
}

#[derive(Debug, Default)]
pub struct MinimapCache {
    areas: HashMap<String, AreaCacheEntry>,
}

impl MinimapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle pass: creates areas for newly eligible regions and drops
    /// areas whose region is gone or no longer eligible. Existing areas are
    /// left untouched.
    pub fn update<P: GraphProvider>(
        &mut self,
        regions: &[RegionInfo],
        provider: &P,
        ctx: UpdateContext<'_>,
    ) {
        let mut eligible = HashSet::new();
        for region in regions {
            if !region.is_node_editor() || region.graph.is_none() {
                continue;
            }
            let Some(graph) = provider.active_graph(region) else {
                // Keep what we had; the graph may be back next tick.
                if self.areas.contains_key(&region.key) {
                    eligible.insert(region.key.as_str());
                }
                continue;
            };
            if graph.nodes().is_empty() && !self.areas.contains_key(&region.key) {
                continue;
            }
            eligible.insert(region.key.as_str());
            if !self.areas.contains_key(&region.key) {
                self.areas
                    .insert(region.key.clone(), AreaCacheEntry::create(region, graph, ctx));
            }
        }

        self.areas.retain(|key, _| {
            let keep = eligible.contains(key.as_str());
            if !keep {
                debug!(region = %key, "dropped minimap area");
            }
            keep
        });
    }

    /// Per-area tick. Returns `None` when the region has no cache entry.
    /// If the provider cannot resolve the graph, the previous geometry is
    /// kept and returned unchanged.
    pub fn update_area<P: GraphProvider>(
        &mut self,
        region: &RegionInfo,
        provider: &P,
        ctx: UpdateContext<'_>,
    ) -> Option<&AreaCacheEntry> {
        let area = self.areas.get_mut(&region.key)?;
        if let Some(graph) = provider.active_graph(region) {
            area.update(region, graph, ctx);
        }
        Some(area)
    }

    /// Full tick: lifecycle pass, then every live area in region order.
    pub fn tick<P: GraphProvider>(
        &mut self,
        regions: &[RegionInfo],
        provider: &P,
        ctx: UpdateContext<'_>,
    ) {
        self.update(regions, provider, ctx);
        for region in regions {
            self.update_area(region, provider, ctx);
        }
    }

    pub fn invalidate(&mut self, what: Invalidate, config: &MinimapConfig) {
        for area in self.areas.values_mut() {
            if what == Invalidate::Colors {
                area.refresh_colors(config);
            }
            area.mark_dirty();
        }
    }

    pub fn area(&self, region_key: &str) -> Option<&AreaCacheEntry> {
        self.areas.get(region_key)
    }

    pub fn area_mut(&mut self, region_key: &str) -> Option<&mut AreaCacheEntry> {
        self.areas.get_mut(region_key)
    }

    pub fn areas(&self) -> impl Iterator<Item = &AreaCacheEntry> {
        self.areas.values()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn clear(&mut self) {
        self.areas.clear();
    }
}
