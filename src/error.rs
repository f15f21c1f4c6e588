//! Error types for the host-facing surfaces (config, scripts, export)
//!
//! The geometry core is total and never returns these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FractalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: u32, max: u32 },
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, FractalError>;
