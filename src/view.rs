//! View Transform - virtual plane <-> screen rectangle
//!
//! X and Y are mapped independently:
//!   screen_x = mid_x + (x - center_x) * scale_x
//!   screen_y = mid_y - (y - center_y) * scale_y
//! Virtual Y grows upward, screen Y grows downward.

use crate::error::{FractalError, Result};
use crate::path::{Path, Point, Rect, ScreenPath, Size};

/// Smallest scale either axis may reach
pub const MIN_SCALE: f64 = 1e-6;

pub const DEFAULT_SCALE: f64 = 60.0;

/// Scale and translation state of a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale_x: f64,
    scale_y: f64,
    center_x: f64,
    center_y: f64,
    viewport: Size,
}

/// Largest viewport side, in screen units, a view may be built with
pub const MAX_VIEWPORT_SIDE: f64 = 16384.0;

/// Both sides must be finite, positive and at most `MAX_VIEWPORT_SIDE`
pub fn check_viewport(viewport: Size) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_VIEWPORT_SIDE;
    if !valid(viewport.width) || !valid(viewport.height) {
        return Err(FractalError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.clamp(MIN_SCALE, f64::MAX)
    }
}

impl ViewTransform {
    /// View with the default scale of 60 and the origin centered
    pub fn new(viewport: Size) -> Self {
        Self {
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            center_x: 0.0,
            center_y: 0.0,
            viewport,
        }
    }

    /// Like `new`, but rejects empty, non-finite or oversized viewports
    pub fn try_new(viewport: Size) -> Result<Self> {
        check_viewport(viewport)?;
        Ok(Self::new(viewport))
    }

    /// Checked `set_viewport`; the view is left unchanged on error
    pub fn try_set_viewport(&mut self, viewport: Size) -> Result<()> {
        check_viewport(viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.set_scale(scale_x, scale_y);
        self
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.set_center(center);
        self
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Set both scales, clamped to `MIN_SCALE`
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = clamp_scale(scale_x);
        self.scale_y = clamp_scale(scale_y);
    }

    pub fn set_center(&mut self, center: Point) {
        self.center_x = center.x;
        self.center_y = center.y;
    }

    /// Move the view center by a virtual-space delta
    pub fn translate_center(&mut self, dx: f64, dy: f64) {
        self.center_x += dx;
        self.center_y += dy;
    }

    fn mid(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    pub fn virtual_to_screen(&self, point: Point) -> Point {
        let mid = self.mid();
        Point::new(
            mid.x + (point.x - self.center_x) * self.scale_x,
            mid.y - (point.y - self.center_y) * self.scale_y,
        )
    }

    pub fn screen_to_virtual(&self, point: Point) -> Point {
        let mid = self.mid();
        Point::new(
            (point.x - mid.x) / self.scale_x + self.center_x,
            (mid.y - point.y) / self.scale_y + self.center_y,
        )
    }

    /// Viewport size measured in virtual units
    pub fn visible_size(&self) -> Size {
        Size::new(
            self.viewport.width / self.scale_x,
            self.viewport.height / self.scale_y,
        )
    }

    /// Virtual region on screen
    ///
    /// The origin is the virtual point under screen (0, 0), the top-left
    /// corner, so the region extends toward +X and -Y from it.
    pub fn visible_region(&self) -> Rect {
        Rect::new(self.screen_to_virtual(Point::ORIGIN), self.visible_size())
    }

    /// Rescale while the virtual point under `anchor` stays under `anchor`
    ///
    /// # Arguments
    /// * `factor_x`, `factor_y` - Multipliers per axis; 1 leaves an axis alone
    /// * `anchor` - Fixed point in screen coordinates
    ///
    /// Non-positive or non-finite factors leave their axis unchanged.
    pub fn scale_about_point(&mut self, factor_x: f64, factor_y: f64, anchor: Point) {
        let mid = self.mid();

        if let Some(new_scale) = self.scaled(self.scale_x, factor_x, "x") {
            let distance = mid.x - anchor.x;
            self.center_x += distance / new_scale - distance / self.scale_x;
            self.scale_x = new_scale;
        }

        if let Some(new_scale) = self.scaled(self.scale_y, factor_y, "y") {
            let distance = mid.y - anchor.y;
            self.center_y -= distance / new_scale - distance / self.scale_y;
            self.scale_y = new_scale;
        }

        tracing::debug!(
            "Scaled by ({}, {}) at ({}, {}): scale=({}, {}), center=({}, {})",
            factor_x,
            factor_y,
            anchor.x,
            anchor.y,
            self.scale_x,
            self.scale_y,
            self.center_x,
            self.center_y
        );
    }

    /// New clamped scale for one axis, `None` when the factor is unusable
    fn scaled(&self, scale: f64, factor: f64, axis: &str) -> Option<f64> {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::warn!("Ignoring {} scale factor {}", axis, factor);
            return None;
        }
        Some(clamp_scale(scale * factor))
    }

    /// Put the virtual origin back in the middle of the screen
    pub fn reset_origin(&mut self) {
        self.center_x = 0.0;
        self.center_y = 0.0;
    }

    /// Make both axes use the mean of the two scales
    pub fn equalize_axes(&mut self) {
        let scale = (self.scale_x + self.scale_y) / 2.0;
        self.scale_x = scale;
        self.scale_y = scale;
    }
}

/// Place a turtle-space path on screen
///
/// Turtle space is Y-down, so each point `(x, y)` is mapped through
/// `virtual_to_screen(x, -y)`.
pub fn transform_path(path: &Path, view: &ViewTransform) -> ScreenPath {
    ScreenPath {
        viewport: view.viewport(),
        path: path.map_points(|p| view.virtual_to_screen(Point::new(p.x, -p.y))),
    }
}
