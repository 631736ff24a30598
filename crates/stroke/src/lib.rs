//! # Stroke Outline Extraction Library
//!
//! Turns a freehand stroke drawn into an RGBA image into simplified closed
//! polygons, ready to be used as vector geometry such as collision shapes.
//!
//! ## Core Features
//!
//! - **Fixed workspace**: every buffer is sized once from the configured
//!   maximum image size and reused across calls
//! - **Noise handling**: one-pixel spurs and tiny regions are removed before
//!   tracing
//! - **Hole Detection**: enclosed cavities are traced as separate,
//!   counter-clockwise contours
//! - **Streaming output**: polygons are handed to a [`PolygonSink`] as they
//!   are found
//! - **GeoJSON Support**: export to and import from standard GeoJSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stroke::Pipeline;
//!
//! let mut pipeline = Pipeline::builder().build()?;
//!
//! // The overlay is painted back into the image
//! let mut image = image::open("stroke.png")?.to_rgba8();
//! let outline = pipeline.process_image(&mut image)?;
//!
//! outline.save_geojson("stroke.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use stroke::{ContourKind, Pipeline, Point, PolygonCallback};
//!
//! let mut pipeline = Pipeline::builder().max_dimensions(32, 32).epsilon(1.0).build()?;
//! let mut rgba = vec![0u8; 32 * 32 * 4];
//! for y in 4..20 {
//!     for x in 4..28 {
//!         rgba[(y * 32 + x) * 4 + 3] = 255;
//!     }
//! }
//!
//! let mut outer = 0;
//! let mut sink = PolygonCallback(|kind: ContourKind, _points: &[Point]| {
//!     if kind == ContourKind::Outer {
//!         outer += 1;
//!     }
//! });
//! let summary = pipeline.process(&mut rgba, 32, 32, &mut sink)?;
//! assert_eq!(summary.lowest_row, Some(19));
//! assert_eq!(outer, 1);
//! # Ok::<(), stroke::StrokeError>(())
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod types;
pub mod mask;
pub mod workspace;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{StrokeError, Result};
pub use config::TraceConfig;
pub use types::{ContourKind, Point, Polygon, StrokeOutline, Winding};
pub use mask::{Cell, Mask};
pub use workspace::Workspace;
pub use traits::*;
pub use pipeline::{Pipeline, ScanSummary, builder::PipelineBuilder};
pub use io::*;

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn create_test_image() -> RgbaImage {
        let mut img = RgbaImage::new(100, 100);
        for y in 20..80 {
            for x in 20..80 {
                img.put_pixel(x, y, Rgba([30, 30, 30, 255]));
            }
        }
        img
    }

    #[test]
    fn test_pipeline_basic() {
        let mut pipeline = Pipeline::builder().build().expect("Should build");
        let mut image = create_test_image();

        let result = pipeline.process_image(&mut image).expect("Should process successfully");
        assert_eq!(result.polygons.len(), 1, "Should find exactly one shape");
        assert_eq!(result.image_width, 100);
        assert_eq!(result.image_height, 100);
        assert_eq!(result.lowest_row, Some(79));
    }

    #[test]
    fn test_pipeline_with_coarse_simplification() {
        let mut pipeline = Pipeline::builder().epsilon(4.0).build().expect("Should build");
        let mut image = create_test_image();

        let result = pipeline.process_image(&mut image).expect("Should process successfully");
        let polygon = &result.polygons[0];
        assert_eq!(polygon.points.len(), 4);
        assert_eq!(polygon.area(), 59.0 * 59.0);
    }

    #[test]
    fn test_geojson_export() {
        let mut pipeline = Pipeline::new(TraceConfig::default()).expect("Should build");
        let mut image = create_test_image();

        let result = pipeline.process_image(&mut image).expect("Should process successfully");
        let geojson = result.to_geojson().expect("Should create GeoJSON");
        assert_eq!(geojson.features.len(), 1);
    }

    #[test]
    fn test_debug_rendering() {
        let mut pipeline = Pipeline::builder().build().expect("Should build");
        let original = create_test_image();
        let mut image = original.clone();

        let result = pipeline.process_image(&mut image).expect("Should process successfully");
        let debug = draw_polygons(&original, &result.polygons);
        assert_eq!(*debug.get_pixel(20, 20), VERTEX_COLOR);
        assert_eq!(*debug.get_pixel(50, 20), OUTER_COLOR);
    }
}
