use eframe::egui::{Pos2, Vec2, pos2, vec2};

/// Axis aligned box stored as two corners.
///
/// The corners are not required to be ordered: callers may build a rectangle
/// with `min.x > max.x` (node boxes grow in whatever direction the host's axes
/// point). Use [`Rectangle::true_min`] / [`Rectangle::true_max`] when ordering
/// matters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rectangle {
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min, min + size)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        self.min + vec_divide(self.max - self.min, vec2(2.0, 2.0))
    }

    pub fn true_min(&self) -> Vec2 {
        vec_min(self.min, self.max)
    }

    pub fn true_max(&self) -> Vec2 {
        vec_max(self.min, self.max)
    }

    /// Corners for drawing, always in the order
    /// `(min.x, min.y)`, `(max.x, min.y)`, `(max.x, max.y)`, `(min.x, max.y)`.
    pub fn coords(&self) -> [Pos2; 4] {
        [
            pos2(self.min.x, self.min.y),
            pos2(self.max.x, self.min.y),
            pos2(self.max.x, self.max.y),
            pos2(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.true_min();
        let max = self.true_max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Clamps both corners into the ordered extent of `other`.
    pub fn crop(&mut self, other: &Rectangle) {
        let low = other.true_min();
        let high = other.true_max();
        self.min = vec_min(vec_max(self.min, low), high);
        self.max = vec_min(vec_max(self.max, low), high);
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::new(
            vec_min(self.true_min(), other.true_min()),
            vec_max(self.true_max(), other.true_max()),
        )
    }
}

pub fn lerp(fac: f32, a: f32, b: f32) -> f32 {
    (fac * b) + ((1.0 - fac) * a)
}

pub fn vec_lerp(fac: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    vec2(lerp(fac.x, a.x, b.x), lerp(fac.y, a.y, b.y))
}

/// Elementwise division where a zero divisor yields zero instead of inf/NaN.
pub fn vec_divide(a: Vec2, b: Vec2) -> Vec2 {
    fn safe_div(n: f32, d: f32) -> f32 {
        if d == 0.0 { 0.0 } else { n / d }
    }
    vec2(safe_div(a.x, b.x), safe_div(a.y, b.y))
}

pub fn vec_multiply(a: Vec2, b: Vec2) -> Vec2 {
    vec2(a.x * b.x, a.y * b.y)
}

pub fn vec_min(a: Vec2, b: Vec2) -> Vec2 {
    vec2(a.x.min(b.x), a.y.min(b.y))
}

pub fn vec_max(a: Vec2, b: Vec2) -> Vec2 {
    vec2(a.x.max(b.x), a.y.max(b.y))
}
