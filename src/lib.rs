//! Fractal Tree - turtle-built binary tree with a pan/zoom view
//!
//! Data flow:
//! - `fractal::build_fractal_path` drives a `turtle::Turtle` into a `path::Path`
//! - `view::transform_path` places it on screen through a `view::ViewTransform`
//! - `interaction::InteractionController` turns gestures into view changes
//! - `render` strokes the screen path for the command-line host

pub mod config;
pub mod error;
pub mod fractal;
pub mod interaction;
pub mod logging;
pub mod path;
pub mod render;
pub mod replay;
pub mod turtle;
pub mod view;

pub use error::{FractalError, Result};
pub use fractal::{build_fractal_path, FractalParameters, MAX_DEPTH};
pub use interaction::{InteractionController, InteractionFlags};
pub use path::{Path, Point, ScreenPath};
pub use turtle::Turtle;
pub use view::{transform_path, ViewTransform};

/// Build the tree and place it on screen in one pass
pub fn render_pass(params: &FractalParameters, view: &ViewTransform) -> ScreenPath {
    transform_path(&build_fractal_path(params), view)
}
