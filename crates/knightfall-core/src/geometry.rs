use serde::{Deserialize, Serialize};

/// Axis-aligned box with a top-left origin. Screen convention: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same box moved to a new top-left corner.
    pub fn at(&self, x: f32, y: f32) -> Self {
        Self { x, y, ..*self }
    }

    /// Horizontal extents overlap (strictly; touching edges do not count).
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }

    /// Vertical extents overlap (strictly).
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.bottom() > other.top() && self.top() < other.bottom()
    }

    /// Box-vs-box overlap. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Distance between the centers of two boxes.
pub fn center_distance(a: &Aabb, b: &Aabb) -> f32 {
    distance(a.center(), b.center())
}

/// Box-vs-circle proximity test.
///
/// The box is treated as a circle of radius `half width` around its center,
/// so the test passes when the center distance is below the sum of radii.
pub fn circle_touches_box(bounds: &Aabb, cx: f32, cy: f32, radius: f32) -> bool {
    distance(bounds.center(), (cx, cy)) < bounds.width / 2.0 + radius
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
/// (or are too close for a meaningful direction).
pub fn direction(from: (f32, f32), to: (f32, f32)) -> Option<(f32, f32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len < 1e-6 {
        return None;
    }
    Some((dx / len, dy / len))
}
