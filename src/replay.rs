//! Gesture scripts
//!
//! A recorded or hand-written list of gesture events and view commands,
//! loaded from YAML or JSON and played back through the controller.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::interaction::{InteractionController, PanGesture, PinchGesture, TapGesture};
use crate::path::Size;
use crate::view::ViewTransform;

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    Pan(PanGesture),
    Pinch(PinchGesture),
    DoubleTap(TapGesture),
    ResetOrigin,
    EqualizeAxes,
    SetViewport { width: f64, height: f64 },
}

/// Ordered list of steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// Outcome of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    pub ignored: usize,
}

impl GestureScript {
    /// Load from a `.json` file, or YAML for any other extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let script: GestureScript = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        tracing::info!("Loaded {} script steps from {:?}", script.steps.len(), path);
        Ok(script)
    }

    /// Apply every step in order
    pub fn apply(&self, controller: &InteractionController, view: &mut ViewTransform) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for (index, step) in self.steps.iter().enumerate() {
            // Gesture structs are consumed by their handlers; work on copies
            let applied = match step.clone() {
                ScriptStep::Pan(mut pan) => controller.handle_pan(view, &mut pan),
                ScriptStep::Pinch(mut pinch) => controller.handle_pinch(view, &mut pinch),
                ScriptStep::DoubleTap(tap) => controller.handle_double_tap(view, &tap),
                ScriptStep::ResetOrigin => {
                    view.reset_origin();
                    true
                }
                ScriptStep::EqualizeAxes => {
                    view.equalize_axes();
                    true
                }
                ScriptStep::SetViewport { width, height } => {
                    match view.try_set_viewport(Size::new(width, height)) {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("Step {} rejected: {}", index, e);
                            false
                        }
                    }
                }
            };

            if applied {
                summary.applied += 1;
            } else {
                tracing::debug!("Step {} had no effect: {:?}", index, step);
                summary.ignored += 1;
            }
        }

        tracing::info!(
            "Replay finished: {} applied, {} ignored",
            summary.applied,
            summary.ignored
        );
        summary
    }
}
