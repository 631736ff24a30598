use crate::{
    config::TraceConfig,
    error::Result,
    pipeline::Pipeline,
};

/// Builder for creating processing pipelines with a fluent API
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: TraceConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration (replaces everything set so far)
    pub fn config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    /// Largest image the pipeline will accept. The workspace is sized for it
    /// up front.
    pub fn max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.config.max_width = width;
        self.config.max_height = height;
        self
    }

    /// Discard regions with this many pixels or fewer
    pub fn noise_area(mut self, area: usize) -> Self {
        self.config.noise_area = area;
        self
    }

    /// Ignore holes whose traced boundary has this many pixels or fewer
    pub fn hole_noise_length(mut self, length: usize) -> Self {
        self.config.hole_noise_length = length;
        self
    }

    /// Douglas-Peucker tolerance in pixels
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Zero translucent pixels of the input before anything else
    pub fn clear_partial_alpha(mut self, enabled: bool) -> Self {
        self.config.clear_partial_alpha = enabled;
        self
    }

    /// Validate the configuration and allocate the workspace
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.config)
    }
}
