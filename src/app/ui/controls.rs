use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use node_minimap::config::{AnchorCorner, Color, NodePalette};
use node_minimap::host::NodeGraph;
use node_minimap::minimap::Invalidate;
use tracing::debug;

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;
const SEARCH_RESULT_LIMIT: usize = 12;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn slider_key_step(range: &RangeInclusive<f32>) -> f32 {
    ((range.end() - range.start()) / 200.0).max(0.0005)
}

/// Arrow keys nudge a focused slider, faster the longer they are held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    range: &RangeInclusive<f32>,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * slider_key_step(range) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(*range.start(), *range.end());
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    let response = ui
        .add(
            egui::Slider::new(value, range.clone())
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }
    let changed = response.changed();
    changed | apply_slider_arrow_acceleration(ui, &response, value, &range)
}

fn color_row(ui: &mut Ui, color: &mut Color, text: &str) -> bool {
    ui.horizontal(|ui| {
        let changed = ui.color_edit_button_rgba_unmultiplied(&mut color.0).changed();
        ui.label(text);
        changed
    })
    .inner
}

fn palette_rows(palette: &mut NodePalette) -> [(&'static str, &mut Color); 12] {
    [
        ("Converter", &mut palette.converter),
        ("Geometry", &mut palette.geometry),
        ("Vector", &mut palette.vector),
        ("Shader", &mut palette.shader),
        ("Texture", &mut palette.texture),
        ("Color", &mut palette.color),
        ("Attribute", &mut palette.attribute),
        ("Input", &mut palette.input),
        ("Output", &mut palette.output),
        ("Group socket", &mut palette.group_socket),
        ("Group", &mut palette.group),
        ("Frame", &mut palette.frame),
    ]
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Minimap");
        ui.separator();
        ui.add_space(4.0);

        ui.checkbox(&mut self.config.enabled, "Show minimap (M)")
            .on_hover_text("Draw the overview in every node editor.");

        let mut geometry = false;
        let mut colors = false;
        let config = &mut self.config;

        ui.collapsing("General", |ui| {
            geometry |= ui
                .checkbox(&mut config.only_top_level, "Only top-level nodes")
                .on_hover_text("Hide everything that sits inside a frame.")
                .changed();
            geometry |= ui
                .checkbox(&mut config.show_non_frames, "Show non-frame nodes")
                .changed();
            geometry |= ui
                .checkbox(&mut config.show_empty_frames, "Show empty frames")
                .changed();
            ui.checkbox(&mut config.zoom_to_nodes, "Click zooms to nodes")
                .on_hover_text("Clicking a node on the minimap centers the editor on it.");
        });

        ui.collapsing("Shape", |ui| {
            egui::ComboBox::from_label("Corner")
                .selected_text(config.anchor_corner.label())
                .show_ui(ui, |ui| {
                    for corner in AnchorCorner::ALL {
                        geometry |= ui
                            .selectable_value(&mut config.anchor_corner, corner, corner.label())
                            .changed();
                    }
                });
            geometry |= slider(
                ui,
                &mut config.size,
                0.0..=1.0,
                "Size",
                "Fraction of the editor width the minimap takes up.",
            );
            geometry |= slider(
                ui,
                &mut config.min_size,
                50.0..=800.0,
                "Min size",
                "Smallest width in pixels.",
            );
            geometry |= slider(
                ui,
                &mut config.max_size,
                50.0..=800.0,
                "Max size",
                "Largest width in pixels.",
            );
            if config.min_size > config.max_size {
                config.max_size = config.min_size;
            }
            geometry |= slider(
                ui,
                &mut config.offset[0],
                0.0..=200.0,
                "Offset X",
                "Gap to the side edge.",
            );
            geometry |= slider(
                ui,
                &mut config.offset[1],
                0.0..=200.0,
                "Offset Y",
                "Gap to the top or bottom edge.",
            );
        });

        ui.collapsing("Look", |ui| {
            slider(
                ui,
                &mut config.line_width,
                0.0..=5.0,
                "Line width",
                "Outline width at a 250px wide minimap.",
            );
            color_row(ui, &mut config.outline_color, "Outline");
            color_row(ui, &mut config.view_outline_color, "View outline");
            color_row(ui, &mut config.background_color, "Background");
            colors |= slider(
                ui,
                &mut config.node_transparency,
                0.0..=1.0,
                "Node opacity",
                "Alpha applied to every node fill.",
            );
            colors |= ui
                .checkbox(&mut config.use_node_colors, "Color by category")
                .changed();
            colors |= color_row(ui, &mut config.node_color, "Flat node color");
            colors |= color_row(ui, &mut config.fallback_color, "Uncategorized");
            ui.collapsing("Category palette", |ui| {
                for (name, color) in palette_rows(&mut config.palette) {
                    colors |= color_row(ui, color, name);
                }
            });
        });

        ui.collapsing("Labels", |ui| {
            geometry |= ui.checkbox(&mut config.show_labels, "Frame labels").changed();
            geometry |= ui.checkbox(&mut config.text_wrap, "Wrap label text").changed();
            color_row(ui, &mut config.text_color, "Text");
            geometry |= slider(
                ui,
                &mut config.min_frame_size,
                0.0..=100.0,
                "Min frame size",
                "Frames smaller than this on the minimap get no label.",
            );
            geometry |= slider(
                ui,
                &mut config.min_font_size,
                1.0..=24.0,
                "Min font size",
                "Labels never shrink below this.",
            );
            geometry |= slider(
                ui,
                &mut config.label_font_size,
                4.0..=48.0,
                "Font size",
                "Starting label size.",
            );
        });

        if colors {
            debug!("minimap colors changed");
            self.minimap.invalidate(Invalidate::Colors, &self.config);
        } else if geometry {
            debug!("minimap layout settings changed");
            self.minimap.invalidate(Invalidate::Geometry, &self.config);
        }

        ui.separator();
        self.draw_region_controls(ui);
        ui.separator();
        self.draw_search(ui);
    }

    fn draw_region_controls(&mut self, ui: &mut Ui) {
        ui.heading("Editors");
        ui.checkbox(&mut self.split_view, "Split view")
            .on_hover_text("Show a second editor; each keeps its own minimap.");

        let visible = if self.split_view { 2 } else { 1 };
        for region in self.regions.iter_mut().take(visible) {
            let key = region.key.clone();
            ui.push_id(&key, |ui| {
                ui.label(egui::RichText::new(key.as_str()).strong());
                ui.horizontal_wrapped(|ui| {
                    ui.checkbox(&mut region.sidebar_open, "Sidebar");
                    ui.checkbox(&mut region.show_context_path, "Breadcrumbs");
                });
                ui.horizontal(|ui| {
                    if ui.button("View all").clicked() {
                        region.needs_fit = true;
                    }
                    let exit =
                        ui.add_enabled(region.path.len() > 1, egui::Button::new("Exit group"));
                    if exit.clicked() {
                        region.exit_group();
                    }
                });
            });
        }
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Jump to node")
            .on_hover_text("Fuzzy search in the left editor's graph.");
        ui.text_edit_singleline(&mut self.search);

        let query = self.search.trim();
        if query.is_empty() {
            return;
        }
        let Some(graph) = self
            .regions
            .first()
            .and_then(|region| region.graph_key())
            .and_then(|key| self.workspace.graph(key))
        else {
            return;
        };

        let matcher = SkimMatcherV2::default();
        let mut hits: Vec<(i64, &str, &str)> = graph
            .nodes()
            .iter()
            .filter_map(|node| {
                let score = fuzzy_match_score(&matcher, node.display_label(), query)
                    .max(fuzzy_match_score(&matcher, &node.name, query))?;
                Some((score, node.name.as_str(), node.display_label()))
            })
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        hits.truncate(SEARCH_RESULT_LIMIT);

        let mut jump = None;
        for (_, name, label) in &hits {
            let text = if name == label {
                (*name).to_owned()
            } else {
                format!("{label}  ({name})")
            };
            if ui.button(text).clicked() {
                jump = Some((*name).to_owned());
            }
        }
        if hits.is_empty() {
            ui.weak("no matches");
        }

        if let Some(name) = jump
            && let Some(region) = self.regions.first_mut()
        {
            debug!(node = %name, region = %region.key, "jumping to node");
            region.pending_focus = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_acceleration_ramps_up_and_caps() {
        assert_eq!(slider_key_accel_multiplier(0.0), 1.0);
        assert!(slider_key_accel_multiplier(0.5) > slider_key_accel_multiplier(0.1));
        assert_eq!(slider_key_accel_multiplier(60.0), SLIDER_KEY_ACCEL_MAX);
    }

    #[test]
    fn fuzzy_search_falls_back_to_lowercase() {
        let matcher = SkimMatcherV2::default();
        assert!(fuzzy_match_score(&matcher, "Principled BSDF", "bsdf").is_some());
        assert!(fuzzy_match_score(&matcher, "Mix", "zzz").is_none());
    }
}
