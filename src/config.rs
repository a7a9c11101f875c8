use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui::{Color32, Vec2, vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::minimap::NodeCategory;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid minimap config: {0}")]
    Invalid(String),
}

/// Straight (non-premultiplied) RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn alpha(self) -> f32 {
        self.0[3]
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b, a] = self.0.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8);
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorCorner {
    BottomLeft,
    #[default]
    BottomRight,
    TopLeft,
    TopRight,
}

impl AnchorCorner {
    pub const ALL: [Self; 4] = [
        Self::BottomLeft,
        Self::BottomRight,
        Self::TopLeft,
        Self::TopRight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::BottomLeft => "Bottom-left",
            Self::BottomRight => "Bottom-right",
            Self::TopLeft => "Top-left",
            Self::TopRight => "Top-right",
        }
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::BottomLeft | Self::TopLeft)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePalette {
    pub converter: Color,
    pub geometry: Color,
    pub vector: Color,
    pub shader: Color,
    pub texture: Color,
    pub color: Color,
    pub attribute: Color,
    pub input: Color,
    pub output: Color,
    pub group_socket: Color,
    pub group: Color,
    pub frame: Color,
}

impl NodePalette {
    pub fn get(&self, category: NodeCategory) -> Color {
        match category {
            NodeCategory::Converter => self.converter,
            NodeCategory::Geometry => self.geometry,
            NodeCategory::Vector => self.vector,
            NodeCategory::Shader => self.shader,
            NodeCategory::Texture => self.texture,
            NodeCategory::Color => self.color,
            NodeCategory::Attribute => self.attribute,
            NodeCategory::Input => self.input,
            NodeCategory::Output => self.output,
            NodeCategory::GroupSocket => self.group_socket,
            NodeCategory::Group => self.group,
            NodeCategory::Frame => self.frame,
        }
    }
}

impl Default for NodePalette {
    fn default() -> Self {
        Self {
            converter: Color::rgb(0.14, 0.38, 0.51),
            geometry: Color::rgb(0.0, 0.84, 0.64),
            vector: Color::rgb(0.24, 0.24, 0.51),
            shader: Color::rgb(0.14, 0.71, 0.14),
            texture: Color::rgb(0.47, 0.27, 0.11),
            color: Color::rgb(0.42, 0.42, 0.08),
            attribute: Color::rgb(0.0, 0.08, 0.40),
            input: Color::rgb(0.80, 0.24, 0.30),
            output: Color::rgb(0.30, 0.0, 0.09),
            group_socket: Color::rgb(0.25, 0.05, 0.12),
            group: Color::rgb(0.23, 0.40, 0.04),
            frame: Color::rgb(0.16, 0.16, 0.16),
        }
    }
}

/// Read-only minimap settings, owned and persisted by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub enabled: bool,

    // general
    pub only_top_level: bool,
    pub show_non_frames: bool,
    pub show_empty_frames: bool,
    pub zoom_to_nodes: bool,

    // shape
    pub anchor_corner: AnchorCorner,
    /// Fraction of the region width the minimap takes up.
    pub size: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub offset: [f32; 2],

    // look
    pub line_width: f32,
    pub outline_color: Color,
    pub view_outline_color: Color,
    pub background_color: Color,
    pub node_transparency: f32,
    pub use_node_colors: bool,
    pub node_color: Color,
    pub fallback_color: Color,
    pub palette: NodePalette,

    // labels
    pub show_labels: bool,
    pub text_wrap: bool,
    pub text_color: Color,
    pub min_frame_size: f32,
    pub min_font_size: f32,
    pub label_font_size: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            only_top_level: false,
            show_non_frames: true,
            show_empty_frames: true,
            zoom_to_nodes: true,
            anchor_corner: AnchorCorner::BottomRight,
            size: 0.2,
            min_size: 200.0,
            max_size: 250.0,
            offset: [20.0, 20.0],
            line_width: 1.0,
            outline_color: Color::rgba(0.45, 0.45, 0.45, 1.0),
            view_outline_color: Color::rgba(0.8, 0.8, 0.8, 1.0),
            background_color: Color::rgba(0.2, 0.2, 0.2, 0.8),
            node_transparency: 1.0,
            use_node_colors: true,
            node_color: Color::rgba(0.35, 0.35, 0.35, 1.0),
            fallback_color: Color::rgb(0.5, 0.5, 0.5),
            palette: NodePalette::default(),
            show_labels: true,
            text_wrap: true,
            text_color: Color::rgba(0.9, 0.9, 0.9, 1.0),
            min_frame_size: 20.0,
            min_font_size: 6.0,
            label_font_size: 12.0,
        }
    }
}

impl MinimapConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size > self.max_size {
            return Err(ConfigError::Invalid(format!(
                "min_size ({}) is larger than max_size ({})",
                self.min_size, self.max_size
            )));
        }
        if !(0.0..=1.0).contains(&self.size) {
            return Err(ConfigError::Invalid(format!(
                "size factor {} is outside 0..=1",
                self.size
            )));
        }
        if !(0.0..=1.0).contains(&self.node_transparency) {
            return Err(ConfigError::Invalid(format!(
                "node_transparency {} is outside 0..=1",
                self.node_transparency
            )));
        }
        if self.line_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "line_width {} is negative",
                self.line_width
            )));
        }
        if self.min_font_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_font_size {} must be positive",
                self.min_font_size
            )));
        }
        Ok(())
    }

    pub fn offset(&self) -> Vec2 {
        vec2(self.offset[0], self.offset[1])
    }
}
