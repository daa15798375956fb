//! Minimal geometry for hit-testing pointer interactions against the control.

use serde::{Deserialize, Serialize};

/// A pointer position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Edges are inclusive.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// The rendered footprint of the control: trigger plus, while open, the menu.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Boundary {
    pub trigger: Option<Rect>,
    pub menu: Option<Rect>,
}

impl Boundary {
    /// Whether the host has reported any rendered rect yet.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.trigger.is_some() || self.menu.is_some()
    }

    /// Whether `point` lies inside any rendered part of the control.
    ///
    /// An unknown layout contains nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.trigger.is_some_and(|r| r.contains(point))
            || self.menu.is_some_and(|r| r.contains(point))
    }
}
