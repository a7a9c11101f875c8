//! Incrementally cached minimap overlay for node graph editors.
//!
//! The host feeds regions and graphs through the traits in [`host`], the
//! [`minimap::MinimapCache`] keeps per-region and per-node derived geometry,
//! and a [`minimap::Rasterizer`] turns it into pixels.

pub mod config;
pub mod geometry;
pub mod host;
pub mod minimap;
