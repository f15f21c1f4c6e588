//! Path geometry - points, sub-paths and their screen-space counterpart
//!
//! A `Path` is an ordered list of sub-paths. Each sub-path is a polyline;
//! a sub-path holding a single point is a pen-lift marker.

use serde::{Deserialize, Serialize};

/// A point in either virtual or screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A translation delta
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height, in screen units or virtual units depending on context
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle described by an origin corner and a size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Smallest rectangle containing every point, `None` for an empty iterator
    pub fn bounding<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::new(min, Size::new(max.x - min.x, max.y - min.y)))
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }
}

/// Append-only list of polylines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    subpaths: Vec<Vec<Point>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sub-path at `point` without drawing
    pub fn move_to(&mut self, point: Point) {
        self.subpaths.push(vec![point]);
    }

    /// Extend the current sub-path with a straight line to `point`.
    /// Opens a sub-path at `point` when there is none yet.
    pub fn line_to(&mut self, point: Point) {
        match self.subpaths.last_mut() {
            Some(current) => current.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    /// Last point of the current sub-path
    pub fn current_point(&self) -> Option<Point> {
        self.subpaths.last().and_then(|s| s.last()).copied()
    }

    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Every drawn line segment, in emission order
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.subpaths.iter().flat_map(|s| {
            s.windows(2).map(|w| Segment {
                from: w[0],
                to: w[1],
            })
        })
    }

    pub fn segment_count(&self) -> usize {
        self.subpaths
            .iter()
            .map(|s| s.len().saturating_sub(1))
            .sum()
    }

    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(Vec::len).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.subpaths.iter().flatten().copied()
    }

    /// Bounding box of the drawn geometry; pen-lift markers are ignored
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(
            self.subpaths
                .iter()
                .filter(|s| s.len() > 1)
                .flatten()
                .copied(),
        )
    }

    /// Apply `f` to every point, keeping the sub-path structure
    pub fn map_points<F: FnMut(Point) -> Point>(&self, mut f: F) -> Path {
        Path {
            subpaths: self
                .subpaths
                .iter()
                .map(|s| s.iter().map(|&p| f(p)).collect())
                .collect(),
        }
    }
}

/// A path placed in screen space, ready to be stroked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPath {
    pub viewport: Size,
    pub path: Path,
}
