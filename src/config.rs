//! Configuration loader - YAML settings file + .env overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FractalError, Result};
use crate::fractal::FractalParameters;
use crate::interaction::{InteractionController, InteractionFlags};
use crate::path::{Point, Size};
use crate::render::RenderStyle;
use crate::view::{ViewTransform, DEFAULT_SCALE};

/// Initial view state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub scale_x: f64,
    pub scale_y: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Viewport width in screen units
    pub width: f64,
    /// Viewport height in screen units
    pub height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            center_x: 0.0,
            center_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ViewConfig {
    pub fn to_transform(&self) -> Result<ViewTransform> {
        Ok(ViewTransform::try_new(Size::new(self.width, self.height))?
            .with_scale(self.scale_x, self.scale_y)
            .with_center(Point::new(self.center_x, self.center_y)))
    }
}

/// Main configuration loaded from the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub interaction: InteractionFlags,
    pub fractal: FractalParameters,
    pub render: RenderStyle,
}

/// Settings loaded from the environment and .env
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub config_path: Option<PathBuf>,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.fractal.validate()?;
        self.view.to_transform()?;

        let scales = [("scale_x", self.view.scale_x), ("scale_y", self.view.scale_y)];
        for (name, value) in scales {
            if !value.is_finite() || value <= 0.0 {
                return Err(FractalError::InvalidParameter(format!(
                    "view.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !self.render.stroke_width.is_finite() || self.render.stroke_width <= 0.0 {
            return Err(FractalError::InvalidParameter(format!(
                "render.stroke_width must be positive, got {}",
                self.render.stroke_width
            )));
        }

        Ok(())
    }

    pub fn controller(&self) -> InteractionController {
        InteractionController::new(self.interaction)
    }
}

impl Environment {
    /// Load settings from .env and the process environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Environment {
            config_path: std::env::var("FRACTAL_TREE_CONFIG").ok().map(PathBuf::from),
            log_dir: std::env::var("FRACTAL_TREE_LOG_DIR")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
