use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrokeError};

/// Default Douglas-Peucker tolerance. Works well for brush thicknesses
/// between 10 and 25 pixels.
pub const DEFAULT_EPSILON: f64 = 1.5;

/// Largest padded grid, in cells, a workspace may be sized for.
pub const MAX_WORKSPACE_CELLS: usize = 1 << 24;

/// Tunables for a [`Pipeline`](crate::Pipeline) and the capacity of its workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(description = "Stroke tracing parameters")]
pub struct TraceConfig {
    #[schemars(description = "Widest image the workspace accepts, in pixels")]
    pub max_width: u32,
    #[schemars(description = "Tallest image the workspace accepts, in pixels")]
    pub max_height: u32,
    #[schemars(description = "Regions with this many pixels or fewer are discarded as noise")]
    pub noise_area: usize,
    #[schemars(description = "Holes whose traced boundary has this many pixels or fewer are ignored")]
    pub hole_noise_length: usize,
    #[schemars(description = "Douglas-Peucker tolerance in pixels")]
    pub epsilon: f64,
    #[schemars(description = "Zero every pixel whose alpha is not 255 before building the mask")]
    pub clear_partial_alpha: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_width: 420,
            max_height: 840,
            noise_area: 10,
            hole_noise_length: 8,
            epsilon: DEFAULT_EPSILON,
            clear_partial_alpha: false,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(StrokeError::InvalidConfig(format!(
                "workspace capacity must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        let cells = (self.max_width as usize)
            .checked_add(2)
            .zip((self.max_height as usize).checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h));
        if !cells.is_some_and(|cells| cells <= MAX_WORKSPACE_CELLS) {
            return Err(StrokeError::InvalidConfig(format!(
                "workspace capacity {}x{} exceeds {MAX_WORKSPACE_CELLS} padded cells",
                self.max_width, self.max_height
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(StrokeError::InvalidConfig(format!(
                "epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Get the JSON schema for the configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TraceConfig)
    }
}
