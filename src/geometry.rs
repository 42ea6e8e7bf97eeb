use std::f32::consts::TAU;

pub use emath::{Vec2, vec2};

use crate::error::LayoutError;

/// Stand-in for a zero distance so force terms never divide by zero.
pub const DISTANCE_EPSILON: f32 = 1e-3;

/// Ring placement of a node relative to the focus center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    pub radius: f32,
    pub angle: f32,
}

impl Polar {
    pub fn to_point(self, center: Vec2) -> Vec2 {
        center + Vec2::angled(self.angle) * self.radius
    }
}

/// Rectangular layout area. Positions live in `[margin, dim - margin]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, LayoutError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    pub fn diagonal(self) -> f32 {
        vec2(self.width, self.height).length()
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn clamp(self, point: Vec2, margin: f32) -> Vec2 {
        clamp_to_bounds(point, self.width, self.height, margin)
    }

    pub fn contains(self, point: Vec2, margin: f32) -> bool {
        point.is_finite() && self.clamp(point, margin) == point
    }
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let distance = (a - b).length();
    if distance > 0.0 {
        distance
    } else {
        DISTANCE_EPSILON
    }
}

/// Clamps into the inset rectangle. Non-finite coordinates land on the axis midpoint.
pub fn clamp_to_bounds(point: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    vec2(
        clamp_axis(point.x, width, margin),
        clamp_axis(point.y, height, margin),
    )
}

fn clamp_axis(value: f32, extent: f32, margin: f32) -> f32 {
    let low = margin;
    let high = extent - margin;
    if low > high || value.is_nan() {
        return extent * 0.5;
    }
    value.clamp(low, high)
}

/// Deterministic unit vector for a pair of coincident nodes.
pub(crate) fn pair_direction(a: usize, b: usize) -> Vec2 {
    Vec2::angled(((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU)
}
