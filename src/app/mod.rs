use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use node_minimap::config::MinimapConfig;
use node_minimap::host::{RegionInfo, RegionKind};
use node_minimap::minimap::MinimapCache;
use tracing::{info, warn};

use crate::document::{Workspace, load_workspace, sample_workspace};

mod editor;
mod painter;
mod ui;

pub struct NodeMinimapApp {
    graph_path: Option<PathBuf>,
    config: MinimapConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<Workspace, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Workspace, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    workspace: Workspace,
    config: MinimapConfig,
    minimap: MinimapCache,
    regions: Vec<EditorRegion>,
    split_view: bool,
    search: String,
}

/// One editor pane. Only its key and the innermost graph key are shared with
/// the minimap cache; everything else is view state.
struct EditorRegion {
    key: String,
    /// Graph keys from the root graph down to the group being edited.
    path: Vec<String>,
    pan: Vec2,
    zoom: f32,
    sidebar_open: bool,
    show_context_path: bool,
    drag: Option<DragTarget>,
    needs_fit: bool,
    pending_focus: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum DragTarget {
    Node(String),
    Minimap,
}

impl EditorRegion {
    const SIDEBAR_WIDTH: f32 = 240.0;

    fn new(key: &str, root: &str) -> Self {
        Self {
            key: key.to_owned(),
            path: vec![root.to_owned()],
            pan: Vec2::ZERO,
            zoom: 1.0,
            sidebar_open: false,
            show_context_path: true,
            drag: None,
            needs_fit: true,
            pending_focus: None,
        }
    }

    fn graph_key(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    fn sidebar_width(&self) -> f32 {
        if self.sidebar_open {
            Self::SIDEBAR_WIDTH
        } else {
            0.0
        }
    }

    fn info(&self, rect: egui::Rect) -> RegionInfo {
        RegionInfo {
            key: self.key.clone(),
            kind: RegionKind::NodeEditor,
            width: rect.width(),
            height: rect.height(),
            sidebar_width: self.sidebar_width(),
            graph: self.graph_key().map(str::to_owned),
            show_context_path: self.show_context_path,
        }
    }

    fn enter_group(&mut self, target: &str) {
        self.path.push(target.to_owned());
        self.drag = None;
        self.needs_fit = true;
    }

    fn exit_group(&mut self) {
        if self.path.len() > 1 {
            self.path.pop();
            self.drag = None;
            self.needs_fit = true;
        }
    }
}

impl NodeMinimapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: Option<PathBuf>,
        config: MinimapConfig,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: Option<PathBuf>) -> Receiver<Result<Workspace, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match &graph_path {
                Some(path) => load_workspace(path).map_err(|error| format!("{error:#}")),
                None => Ok(sample_workspace()),
            };
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }

    fn ready(&self, workspace: Workspace) -> AppState {
        info!(
            graphs = workspace.graph_count(),
            nodes = workspace.node_count(),
            root = %workspace.root,
            "node document loaded"
        );
        AppState::Ready(Box::new(ViewModel::new(workspace, self.config.clone())))
    }
}

impl eframe::App for NodeMinimapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading node document...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load node document");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);
                // Settings survive a reload.
                self.config.clone_from(&model.config);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.graph_path.clone());
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(workspace) => self.ready(workspace),
                Err(error) => {
                    warn!(%error, "node document failed to load");
                    AppState::Error(error)
                }
            };
        }
    }
}
