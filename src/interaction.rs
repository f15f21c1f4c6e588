//! Gesture handling for pan, pinch and double-tap
//!
//! Each gesture kind is a plain struct the host fills in and a handler on
//! `InteractionController` that applies it to a `ViewTransform`. Handlers
//! consume the gesture's accumulated delta (translation back to zero, pinch
//! scale back to 1) so a delta is never applied twice. No gesture excludes
//! another; the host may deliver them interleaved.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::path::{Point, Vector};
use crate::view::ViewTransform;

/// Finger angle above which a pinch counts as vertical
pub const VERTICAL_PINCH_ANGLE: f64 = PI / 14.0 * 6.0;

/// Finger angle below which a pinch counts as horizontal
pub const HORIZONTAL_PINCH_ANGLE: f64 = PI / 14.0;

/// Which axes and behaviours respond to gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionFlags {
    pub x_scalable: bool,
    pub y_scalable: bool,
    /// A horizontal pinch scales X alone
    pub x_only_scalable: bool,
    /// A vertical pinch scales Y alone
    pub y_only_scalable: bool,
    pub x_translatable: bool,
    pub y_translatable: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            x_scalable: true,
            y_scalable: true,
            x_only_scalable: true,
            y_only_scalable: true,
            x_translatable: true,
            y_translatable: true,
        }
    }
}

/// Lifecycle phase of a continuous gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Only these phases carry a delta to apply
    pub fn carries_delta(self) -> bool {
        matches!(self, GesturePhase::Changed | GesturePhase::Ended)
    }
}

/// One-finger drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanGesture {
    pub phase: GesturePhase,
    /// Screen-space translation since the last time it was consumed
    #[serde(default)]
    pub translation: Vector,
}

impl PanGesture {
    pub fn new(phase: GesturePhase, translation: Vector) -> Self {
        Self { phase, translation }
    }
}

/// Two-finger pinch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinchGesture {
    pub phase: GesturePhase,
    /// Scale ratio since the last time it was consumed
    pub scale: f64,
    /// Screen point between the fingers
    pub centroid: Point,
    /// Individual touch locations; the first two give the finger angle
    #[serde(default)]
    pub touches: Vec<Point>,
}

impl PinchGesture {
    pub fn new(phase: GesturePhase, scale: f64, centroid: Point) -> Self {
        Self {
            phase,
            scale,
            centroid,
            touches: Vec::new(),
        }
    }

    pub fn with_touches(mut self, first: Point, second: Point) -> Self {
        self.touches = vec![first, second];
        self
    }

    /// Angle of the line through the first two touches against the
    /// horizontal, in `[0, π/2]`. Defaults to π/4 (no dominant axis).
    pub fn finger_angle(&self) -> f64 {
        match self.touches.as_slice() {
            [first, second, ..] => {
                let dx = (second.x - first.x).abs();
                let dy = (second.y - first.y).abs();
                if dx == 0.0 && dy == 0.0 {
                    PI / 4.0
                } else {
                    dy.atan2(dx)
                }
            }
            _ => PI / 4.0,
        }
    }
}

/// Discrete tap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapGesture {
    pub phase: GesturePhase,
    pub location: Point,
    #[serde(default = "default_taps")]
    pub taps: u32,
}

fn default_taps() -> u32 {
    2
}

impl TapGesture {
    pub fn double(phase: GesturePhase, location: Point) -> Self {
        Self {
            phase,
            location,
            taps: 2,
        }
    }
}

/// Applies gestures to a view according to `InteractionFlags`
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionController {
    flags: InteractionFlags,
}

impl InteractionController {
    pub fn new(flags: InteractionFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> &InteractionFlags {
        &self.flags
    }

    pub fn set_flags(&mut self, flags: InteractionFlags) {
        self.flags = flags;
    }

    /// Scale about `anchor`, leaving axes that are not scalable untouched
    pub fn scale_at(&self, view: &mut ViewTransform, factor_x: f64, factor_y: f64, anchor: Point) {
        let factor_x = if self.flags.x_scalable { factor_x } else { 1.0 };
        let factor_y = if self.flags.y_scalable { factor_y } else { 1.0 };
        view.scale_about_point(factor_x, factor_y, anchor);
    }

    /// Move the center opposite to the drag. Returns whether the view changed.
    pub fn handle_pan(&self, view: &mut ViewTransform, pan: &mut PanGesture) -> bool {
        if !pan.phase.carries_delta() {
            return false;
        }

        let dx = if self.flags.x_translatable {
            -pan.translation.x / view.scale_x()
        } else {
            0.0
        };
        let dy = if self.flags.y_translatable {
            pan.translation.y / view.scale_y()
        } else {
            0.0
        };
        view.translate_center(dx, dy);
        tracing::debug!(
            "Pan {:?} by ({}, {}) -> center {:?}",
            pan.phase,
            pan.translation.x,
            pan.translation.y,
            view.center()
        );

        pan.translation = Vector::ZERO;
        true
    }

    /// Zoom about the pinch centroid, locking an axis for near-horizontal or
    /// near-vertical finger placement. Returns whether the view changed.
    pub fn handle_pinch(&self, view: &mut ViewTransform, pinch: &mut PinchGesture) -> bool {
        if !pinch.phase.carries_delta() {
            return false;
        }

        let angle = pinch.finger_angle();
        let factor_x = if self.flags.y_only_scalable && angle > VERTICAL_PINCH_ANGLE {
            1.0
        } else {
            pinch.scale
        };
        let factor_y = if self.flags.x_only_scalable && angle < HORIZONTAL_PINCH_ANGLE {
            1.0
        } else {
            pinch.scale
        };
        tracing::debug!(
            "Pinch {:?}: scale={}, angle={:.3}, factors=({}, {})",
            pinch.phase,
            pinch.scale,
            angle,
            factor_x,
            factor_y
        );

        self.scale_at(view, factor_x, factor_y, pinch.centroid);

        pinch.scale = 1.0;
        true
    }

    /// Zoom 2x about the tap location. Returns whether the view changed.
    pub fn handle_double_tap(&self, view: &mut ViewTransform, tap: &TapGesture) -> bool {
        if tap.phase != GesturePhase::Ended || tap.taps != 2 {
            return false;
        }

        tracing::debug!("Double tap at ({}, {})", tap.location.x, tap.location.y);
        self.scale_at(view, 2.0, 2.0, tap.location);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Size;
    use approx::assert_abs_diff_eq;

    fn view() -> ViewTransform {
        ViewTransform::new(Size::new(800.0, 600.0))
    }

    fn mid() -> Point {
        Point::new(400.0, 300.0)
    }

    #[test]
    fn test_pan_moves_center_and_resets_translation() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pan = PanGesture::new(GesturePhase::Changed, Vector::new(60.0, 120.0));

        assert!(controller.handle_pan(&mut v, &mut pan));
        assert_abs_diff_eq!(v.center().x, -1.0);
        assert_abs_diff_eq!(v.center().y, 2.0);
        assert_eq!(pan.translation, Vector::ZERO);

        // Delta was consumed; a repeat report does nothing more
        controller.handle_pan(&mut v, &mut pan);
        assert_abs_diff_eq!(v.center().x, -1.0);
        assert_abs_diff_eq!(v.center().y, 2.0);
    }

    #[test]
    fn test_pan_keeps_content_under_finger() {
        let controller = InteractionController::default();
        let mut v = view().with_scale(25.0, 75.0);
        let grabbed = Point::new(123.0, 456.0);
        let pinned = v.screen_to_virtual(grabbed);

        let mut pan = PanGesture::new(GesturePhase::Ended, Vector::new(-40.0, 17.0));
        controller.handle_pan(&mut v, &mut pan);

        let screen = v.virtual_to_screen(pinned);
        assert_abs_diff_eq!(screen.x, 83.0, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, 473.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pan_ignores_other_phases() {
        let controller = InteractionController::default();
        for phase in [
            GesturePhase::Possible,
            GesturePhase::Began,
            GesturePhase::Cancelled,
            GesturePhase::Failed,
        ] {
            let mut v = view();
            let mut pan = PanGesture::new(phase, Vector::new(10.0, 10.0));
            assert!(!controller.handle_pan(&mut v, &mut pan));
            assert_eq!(v, view());
            assert_eq!(pan.translation, Vector::new(10.0, 10.0));
        }
    }

    #[test]
    fn test_pan_respects_translation_flags() {
        let controller = InteractionController::new(InteractionFlags {
            x_translatable: false,
            ..Default::default()
        });
        let mut v = view();
        let mut pan = PanGesture::new(GesturePhase::Changed, Vector::new(60.0, 60.0));
        controller.handle_pan(&mut v, &mut pan);

        assert_eq!(v.center().x, 0.0);
        assert_abs_diff_eq!(v.center().y, 1.0);
    }

    #[test]
    fn test_diagonal_pinch_scales_both_axes() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Changed, 1.5, mid())
            .with_touches(Point::new(300.0, 200.0), Point::new(500.0, 400.0));

        assert!(controller.handle_pinch(&mut v, &mut pinch));
        assert_abs_diff_eq!(v.scale_x(), 90.0);
        assert_abs_diff_eq!(v.scale_y(), 90.0);
        assert_eq!(pinch.scale, 1.0);
    }

    #[test]
    fn test_horizontal_pinch_scales_x_only() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Changed, 2.0, mid())
            .with_touches(Point::new(200.0, 300.0), Point::new(600.0, 310.0));
        controller.handle_pinch(&mut v, &mut pinch);

        assert_abs_diff_eq!(v.scale_x(), 120.0);
        assert_abs_diff_eq!(v.scale_y(), 60.0);
    }

    #[test]
    fn test_vertical_pinch_scales_y_only() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Ended, 2.0, mid())
            .with_touches(Point::new(400.0, 100.0), Point::new(400.0, 500.0));
        controller.handle_pinch(&mut v, &mut pinch);

        assert_abs_diff_eq!(v.scale_x(), 60.0);
        assert_abs_diff_eq!(v.scale_y(), 120.0);
    }

    #[test]
    fn test_axis_lock_disabled_scales_both() {
        let controller = InteractionController::new(InteractionFlags {
            x_only_scalable: false,
            y_only_scalable: false,
            ..Default::default()
        });
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Changed, 2.0, mid())
            .with_touches(Point::new(400.0, 100.0), Point::new(400.0, 500.0));
        controller.handle_pinch(&mut v, &mut pinch);

        assert_abs_diff_eq!(v.scale_x(), 120.0);
        assert_abs_diff_eq!(v.scale_y(), 120.0);
    }

    #[test]
    fn test_single_touch_pinch_has_no_lock() {
        let pinch = PinchGesture::new(GesturePhase::Changed, 2.0, mid());
        assert_abs_diff_eq!(pinch.finger_angle(), PI / 4.0);

        let coincident = pinch.clone().with_touches(mid(), mid());
        assert_abs_diff_eq!(coincident.finger_angle(), PI / 4.0);
    }

    #[test]
    fn test_pinch_keeps_centroid_fixed() {
        let controller = InteractionController::default();
        let mut v = view().with_center(Point::new(3.0, -2.0));
        let centroid = Point::new(650.0, 120.0);
        let pinned = v.screen_to_virtual(centroid);

        let mut pinch = PinchGesture::new(GesturePhase::Changed, 0.8, centroid);
        controller.handle_pinch(&mut v, &mut pinch);

        let screen = v.virtual_to_screen(pinned);
        assert_abs_diff_eq!(screen.x, centroid.x, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, centroid.y, epsilon = 1e-9);
    }

    #[test]
    fn test_pinch_began_is_ignored() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Began, 3.0, mid());

        assert!(!controller.handle_pinch(&mut v, &mut pinch));
        assert_eq!(pinch.scale, 3.0);
        assert_eq!(v, view());
    }

    #[test]
    fn test_scale_flags_block_axis() {
        let controller = InteractionController::new(InteractionFlags {
            y_scalable: false,
            ..Default::default()
        });
        let mut v = view();
        let mut pinch = PinchGesture::new(GesturePhase::Changed, 2.0, Point::new(0.0, 0.0));
        controller.handle_pinch(&mut v, &mut pinch);

        assert_abs_diff_eq!(v.scale_x(), 120.0);
        assert_eq!(v.scale_y(), 60.0);
        assert_eq!(v.center().y, 0.0);
    }

    #[test]
    fn test_double_tap_zooms_at_location() {
        let controller = InteractionController::default();
        let mut v = view();
        let tap_at = Point::new(100.0, 500.0);
        let pinned = v.screen_to_virtual(tap_at);

        assert!(controller.handle_double_tap(&mut v, &TapGesture::double(GesturePhase::Ended, tap_at)));
        assert_eq!(v.scale_x(), 120.0);
        assert_eq!(v.scale_y(), 120.0);

        let screen = v.virtual_to_screen(pinned);
        assert_abs_diff_eq!(screen.x, tap_at.x, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, tap_at.y, epsilon = 1e-9);
    }

    #[test]
    fn test_tap_needs_ended_phase_and_two_taps() {
        let controller = InteractionController::default();
        let mut v = view();

        let began = TapGesture::double(GesturePhase::Began, mid());
        assert!(!controller.handle_double_tap(&mut v, &began));

        let single = TapGesture {
            taps: 1,
            ..TapGesture::double(GesturePhase::Ended, mid())
        };
        assert!(!controller.handle_double_tap(&mut v, &single));
        assert_eq!(v, view());
    }

    #[test]
    fn test_gestures_interleave() {
        let controller = InteractionController::default();
        let mut v = view();
        let mut pan = PanGesture::new(GesturePhase::Changed, Vector::new(30.0, 0.0));
        let mut pinch = PinchGesture::new(GesturePhase::Changed, 2.0, mid());

        controller.handle_pan(&mut v, &mut pan);
        controller.handle_pinch(&mut v, &mut pinch);
        pan.translation = Vector::new(30.0, 0.0);
        controller.handle_pan(&mut v, &mut pan);

        assert_abs_diff_eq!(v.center().x, -0.5 - 0.25);
        assert_abs_diff_eq!(v.scale_x(), 120.0);
    }
}
