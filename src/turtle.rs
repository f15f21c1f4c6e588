//! Turtle 2D Path Builder
//!
//! Drives a cursor over the plane with relative commands and records what it
//! draws into a `Path`.
//! - `rotate`: turn the heading (radians, additive, never wrapped)
//! - `move_by`: step along the heading, drawing when the pen is down
//! - `move_to`: relocate without drawing

use crate::path::{Path, Point};

/// Stateful drawing cursor
#[derive(Debug, Clone)]
pub struct Turtle {
    position: Point,
    heading: f64,
    pen_down: bool,
    path: Path,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// Turtle at the origin, heading along +X, pen down, nothing drawn
    pub fn new() -> Self {
        Self {
            position: Point::ORIGIN,
            heading: 0.0,
            pen_down: true,
            path: Path::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Current heading in radians
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> Path {
        self.path
    }

    /// Start a new sub-path at `point` without drawing
    pub fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
        self.position = point;
    }

    /// Turn the heading by `angle` radians
    pub fn rotate(&mut self, angle: f64) {
        self.heading += angle;
    }

    /// Step `distance` along the heading
    ///
    /// # Arguments
    /// * `distance` - Step length; negative values move backwards without turning
    ///
    /// With the pen down a segment is appended to the current sub-path,
    /// otherwise a new sub-path is started at the target.
    pub fn move_by(&mut self, distance: f64) {
        let target = Point::new(
            self.position.x + self.heading.cos() * distance,
            self.position.y + self.heading.sin() * distance,
        );

        if self.pen_down {
            if self.path.is_empty() {
                self.path.move_to(self.position);
            }
            self.path.line_to(target);
        } else {
            self.path.move_to(target);
        }

        self.position = target;
    }

    pub fn set_pen_down(&mut self, down: bool) {
        self.pen_down = down;
    }
}
