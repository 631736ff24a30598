//! Getting results out of the crate: GeoJSON export and debug rendering.

pub mod debug_image;
pub mod geojson;

pub use self::debug_image::*;
pub use self::geojson::*;
