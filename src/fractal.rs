//! Binary tree fractal
//!
//! Each branch is drawn, then two sub-branches grow from its tip at
//! `angle_left` and `angle_right`, each `length_factor` times shorter.
//! The turtle retreats to the branch base with the pen up so siblings
//! start from the same point.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{FractalError, Result};
use crate::path::{Path, Point};
use crate::turtle::Turtle;

/// Segment count doubles per level, so depth is capped
pub const MAX_DEPTH: u32 = 20;

/// Shape parameters for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParameters {
    /// Length of the trunk
    pub initial_length: f64,
    /// Each level's branches are this factor times their parent
    pub length_factor: f64,
    /// Turn from the parent heading to the left branch, radians
    pub angle_left: f64,
    /// Turn from the parent heading to the right branch, radians
    pub angle_right: f64,
    pub depth: u32,
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            initial_length: 1.0,
            length_factor: 0.6,
            angle_left: -PI / 4.0,
            angle_right: PI / 4.0,
            depth: 10,
        }
    }
}

impl FractalParameters {
    pub fn validate(&self) -> Result<()> {
        if self.depth > MAX_DEPTH {
            return Err(FractalError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }

        let fields = [
            ("initial_length", self.initial_length),
            ("length_factor", self.length_factor),
            ("angle_left", self.angle_left),
            ("angle_right", self.angle_right),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(FractalError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Depth actually used when building, never above `MAX_DEPTH`
    pub fn effective_depth(&self) -> u32 {
        self.depth.min(MAX_DEPTH)
    }
}

/// Build the tree in turtle space
///
/// The turtle starts at the origin turned by -π/2, so the trunk runs along -Y
/// (up on a Y-down screen).
pub fn build_fractal_path(params: &FractalParameters) -> Path {
    let depth = params.effective_depth();
    if depth != params.depth {
        tracing::warn!("Depth {} clamped to {}", params.depth, depth);
    }

    let path = grow_tree(params, depth).into_path();
    tracing::debug!(
        "Built fractal: depth={}, {} segments, {} sub-paths",
        depth,
        path.segment_count(),
        path.subpaths().len()
    );
    path
}

/// Run the full traversal and hand back the turtle in its final state
pub(crate) fn grow_tree(params: &FractalParameters, depth: u32) -> Turtle {
    let mut turtle = Turtle::new();
    turtle.move_to(Point::ORIGIN);
    turtle.rotate(-PI / 2.0);

    branch(&mut turtle, params, params.initial_length, depth);
    turtle
}

fn branch(turtle: &mut Turtle, params: &FractalParameters, length: f64, remaining_depth: u32) {
    if remaining_depth == 0 {
        return;
    }

    let child_length = length * params.length_factor;

    turtle.move_by(length);
    turtle.rotate(params.angle_left);
    branch(turtle, params, child_length, remaining_depth - 1);
    turtle.rotate(params.angle_right - params.angle_left);
    branch(turtle, params, child_length, remaining_depth - 1);
    turtle.rotate(-params.angle_right);

    turtle.set_pen_down(false);
    turtle.move_by(-length);
    turtle.set_pen_down(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params_with_depth(depth: u32) -> FractalParameters {
        FractalParameters {
            depth,
            ..Default::default()
        }
    }

    fn traverse(params: &FractalParameters) -> Turtle {
        grow_tree(params, params.effective_depth())
    }

    /// Branch invocations that reach the drawing step
    fn drawn_branches(depth: u32) -> usize {
        if depth == 0 {
            0
        } else {
            1 + 2 * drawn_branches(depth - 1)
        }
    }

    #[test]
    fn test_depth_zero_emits_nothing() {
        let path = build_fractal_path(&params_with_depth(0));
        assert_eq!(path.segment_count(), 0);
    }

    #[test]
    fn test_depth_one_emits_trunk() {
        let path = build_fractal_path(&params_with_depth(1));
        let segments: Vec<_> = path.segments().collect();

        assert_eq!(segments.len(), 1);
        assert_abs_diff_eq!(segments[0].length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(segments[0].to.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(segments[0].to.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_count_matches_recursion() {
        for depth in 0..=8 {
            let path = build_fractal_path(&params_with_depth(depth));
            assert_eq!(path.segment_count(), drawn_branches(depth), "depth {}", depth);
        }
    }

    #[test]
    fn test_turtle_returns_home() {
        for depth in [0, 1, 2, 5, 9] {
            let turtle = traverse(&params_with_depth(depth));
            assert_abs_diff_eq!(turtle.position().x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(turtle.position().y, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(turtle.heading(), -PI / 2.0, epsilon = 1e-9);
            assert!(turtle.is_pen_down());
        }
    }

    #[test]
    fn test_built_path_comes_from_closed_traversal() {
        for depth in [1, 4, 7] {
            let params = params_with_depth(depth);
            let turtle = traverse(&params);

            assert_eq!(turtle.path(), &build_fractal_path(&params));
            assert_abs_diff_eq!(turtle.position().x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(turtle.position().y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_depth_two_shape() {
        let params = params_with_depth(2);
        let path = build_fractal_path(&params);
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 3);

        // Trunk
        assert_abs_diff_eq!(segments[0].length(), 1.0, epsilon = 1e-12);

        // Branches leave the trunk tip at 45 degrees either side of vertical
        let tip = segments[0].to;
        let half = 0.6 * (PI / 4.0).sin();
        let expected = [(-half, -1.0 - half), (half, -1.0 - half)];
        for (segment, (ex, ey)) in segments[1..].iter().zip(expected) {
            assert_abs_diff_eq!(segment.length(), 0.6, epsilon = 1e-12);
            assert_abs_diff_eq!(segment.from.x, tip.x, epsilon = 1e-12);
            assert_abs_diff_eq!(segment.from.y, tip.y, epsilon = 1e-12);
            assert_abs_diff_eq!(segment.to.x, ex, epsilon = 1e-12);
            assert_abs_diff_eq!(segment.to.y, ey, epsilon = 1e-12);
        }

        let turtle = traverse(&params);
        assert_abs_diff_eq!(turtle.position().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(turtle.position().y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(turtle.heading(), -PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_excessive_depth_is_clamped() {
        let params = params_with_depth(u32::MAX);
        assert_eq!(params.effective_depth(), MAX_DEPTH);
        assert!(matches!(
            params.validate(),
            Err(FractalError::DepthTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let params = FractalParameters {
            length_factor: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(FractalError::InvalidParameter(_))
        ));
        assert!(FractalParameters::default().validate().is_ok());
    }
}
