use eframe::egui::{Vec2, vec2};

use crate::config::MinimapConfig;
use crate::geometry::Rectangle;

/// Measures rendered text. Implemented by the host with its font backend.
pub trait TextMeasure {
    /// Size of `text` laid out on a single line at `font_size`.
    fn measure(&self, text: &str, font_size: f32) -> Vec2;
}

/// Monospace approximation: every char advances `advance * font_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.0,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        vec2(
            text.chars().count() as f32 * self.advance * font_size,
            self.line_height * font_size,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
    pub text: String,
    /// Top-left corner of the line in minimap space.
    pub pos: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    pub font_size: f32,
    pub lines: Vec<LabelLine>,
    pub size: Vec2,
}

/// Returns `None` when the label is empty or cannot fit the frame even at
/// `min_font_size`.
pub fn layout_label(
    text: &str,
    frame_rect: &Rectangle,
    config: &MinimapConfig,
    measure: &dyn TextMeasure,
) -> Option<LabelLayout> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let min = frame_rect.true_min();
    let max = frame_rect.true_max();
    let frame_size = max - min;
    if frame_size.x < config.min_frame_size || frame_size.y < config.min_frame_size {
        return None;
    }

    // Wrapped labels only need their longest word to fit on a line.
    let base_size = config.label_font_size;
    let widest = if config.text_wrap {
        text.split_whitespace()
            .map(|word| measure.measure(word, base_size))
            .fold(Vec2::ZERO, |acc, size| acc.max(size))
    } else {
        measure.measure(text, base_size)
    };
    let mut font_size = if widest.x > frame_size.x && widest.x > 0.0 {
        base_size * frame_size.x / widest.x
    } else {
        base_size
    };

    let mut lines = wrap_lines(text, frame_size.x, font_size, config.text_wrap, measure);
    let block = block_size(&lines, font_size, measure);

    if block.x > frame_size.x || block.y > frame_size.y {
        let fac_x = if block.x > 0.0 { (frame_size.x / block.x).min(1.0) } else { 1.0 };
        let fac_y = if block.y > 0.0 { (frame_size.y / block.y).min(1.0) } else { 1.0 };
        font_size *= fac_x.min(fac_y);
    }

    if font_size < config.min_font_size {
        font_size = config.min_font_size;
        lines = wrap_lines(text, frame_size.x, font_size, config.text_wrap, measure);
        let block = block_size(&lines, font_size, measure);
        if block.x > frame_size.x || block.y > frame_size.y {
            return None;
        }
    }

    let size = block_size(&lines, font_size, measure);
    let center_x = min.x + frame_size.x / 2.0;
    let mut cursor_y = min.y;
    let lines = lines
        .into_iter()
        .map(|line| {
            let line_size = measure.measure(&line, font_size);
            let pos = vec2(center_x - line_size.x / 2.0, cursor_y);
            cursor_y += line_size.y;
            LabelLine { text: line, pos }
        })
        .collect();

    Some(LabelLayout {
        font_size,
        lines,
        size,
    })
}

/// Greedy word packing. A word that alone exceeds the width still gets its
/// own line; the shrink step takes care of it.
fn wrap_lines(
    text: &str,
    max_width: f32,
    font_size: f32,
    wrap: bool,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    if !wrap {
        return vec![text.to_owned()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, font_size).x > max_width {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn block_size(lines: &[String], font_size: f32, measure: &dyn TextMeasure) -> Vec2 {
    lines.iter().fold(Vec2::ZERO, |acc, line| {
        let size = measure.measure(line, font_size);
        vec2(acc.x.max(size.x), acc.y + size.y)
    })
}
