use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stroke::{Pipeline, ScanSummary, StrokeError, StrokeOutline, TraceConfig, draw_polygons};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StrokeCliError {
    #[error(transparent)]
    Stroke(#[from] StrokeError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Input path {0:?} has no usable file name")]
    InvalidInputName(PathBuf),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Which files a run writes next to the GeoJSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OutputOptions {
    /// Write the image with the tracing overlay painted in
    pub overlay: bool,
    /// Write the dimmed image with polygons and vertices drawn over it
    pub debug_polygons: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            overlay: true,
            debug_polygons: false,
        }
    }
}

/// Configuration file layout: a `[trace]` and an `[output]` section, both
/// optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub trace: TraceConfig,
    pub output: OutputOptions,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, StrokeCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, StrokeCliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StrokeCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, StrokeCliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StrokeCliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(StrokeCliError::UnsupportedFileFormat),
        }
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, StrokeCliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert configuration to JSON string
    pub fn to_json(&self) -> Result<String, StrokeCliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RunConfig)
    }
}

/// Files written by [`trace_file`] and what the scan found.
#[derive(Debug, Clone)]
pub struct TraceReport {
    pub summary: ScanSummary,
    pub outline: StrokeOutline,
    pub geojson: PathBuf,
    pub overlay: Option<PathBuf>,
    pub debug: Option<PathBuf>,
}

/// Trace the stroke in the PNG at `input` and write the results into
/// `output_dir` as `<stem>.geojson`, `<stem>_overlay.png` and
/// `<stem>_debug.png`.
pub fn trace_file(input: &Path, output_dir: &Path, config: &RunConfig) -> Result<TraceReport, StrokeCliError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| StrokeCliError::InvalidInputName(input.to_path_buf()))?;

    let original = image::open(input)?.to_rgba8();
    let (width, height) = original.dimensions();
    debug!(?input, width, height, "loaded stroke image");

    let mut pipeline = Pipeline::new(config.trace.clone())?;
    let mut image = original.clone();
    let mut polygons = Vec::new();
    let summary = pipeline.process(&mut image, width, height, &mut polygons)?;
    let outline = StrokeOutline {
        polygons,
        image_width: width,
        image_height: height,
        lowest_row: summary.lowest_row,
    };

    fs::create_dir_all(output_dir)?;

    let geojson = output_dir.join(format!("{stem}.geojson"));
    outline.save_geojson(&geojson)?;
    info!("Wrote {} polygons to {:?}", outline.polygons.len(), geojson);

    let overlay = if config.output.overlay {
        let path = output_dir.join(format!("{stem}_overlay.png"));
        image.save(&path)?;
        info!("Wrote overlay to {:?}", path);
        Some(path)
    } else {
        None
    };

    let debug = if config.output.debug_polygons {
        let path = output_dir.join(format!("{stem}_debug.png"));
        draw_polygons(&original, &outline.polygons).save(&path)?;
        info!("Wrote polygon debug view to {:?}", path);
        Some(path)
    } else {
        None
    };

    Ok(TraceReport {
        summary,
        outline,
        geojson,
        overlay,
        debug,
    })
}
