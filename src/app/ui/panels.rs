use eframe::egui::{self, Align, Context, Key, Layout};
use node_minimap::config::MinimapConfig;
use node_minimap::minimap::{AreaCacheEntry, MinimapCache};
use tracing::info;

use crate::document::Workspace;

use super::super::{EditorRegion, ViewModel};

impl ViewModel {
    pub(in crate::app) const REGION_KEYS: [&'static str; 2] = ["editor-left", "editor-right"];

    pub(in crate::app) fn new(workspace: Workspace, config: MinimapConfig) -> Self {
        let regions = Self::REGION_KEYS
            .iter()
            .map(|key| EditorRegion::new(key, &workspace.root))
            .collect();

        Self {
            workspace,
            config,
            minimap: MinimapCache::new(),
            regions,
            split_view: false,
            search: String::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("node-minimap");
                    ui.separator();
                    ui.label(format!("root: {}", self.workspace.root));
                    ui.label(format!("graphs: {}", self.workspace.graph_count()));
                    ui.label(format!("nodes: {}", self.workspace.node_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload document"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("cached minimaps: {}", self.minimap.len()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_controls(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_editors(ui));

        // A moved node only reaches the minimap bounds one tick later.
        if self.minimap.areas().any(AreaCacheEntry::tag_update) {
            ctx.request_repaint();
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (toggle, view_all) =
            ctx.input(|input| (input.key_pressed(Key::M), input.key_pressed(Key::Home)));
        if toggle {
            self.config.enabled = !self.config.enabled;
            info!(enabled = self.config.enabled, "minimap toggled");
        }
        if view_all {
            for region in &mut self.regions {
                region.needs_fit = true;
            }
        }
    }
}
