pub mod builder;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    algorithms::{
        clear_partial_alpha, contour_polygon, erase_spurs, flood_fill, paint_overlay,
        trace_boundary, undo_trace,
    },
    config::TraceConfig,
    error::Result,
    mask::{Cell, Mask},
    traits::PolygonSink,
    types::{winding_of, ContourKind, Point, StrokeOutline, Winding},
    workspace::Workspace,
};

/// What one processing call did besides emitting polygons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Outer contours emitted
    pub outer: usize,
    /// Hole contours emitted
    pub holes: usize,
    /// Regions erased as noise or because they could not be traced
    pub discarded_regions: usize,
    /// Cells removed by spur erasure
    pub spur_cells: usize,
    /// Lowest image row still holding ink
    pub lowest_row: Option<u32>,
}

impl ScanSummary {
    pub fn polygons(&self) -> usize {
        self.outer + self.holes
    }
}

/// Stroke-to-polygon pipeline owning a preallocated workspace.
///
/// One pipeline processes one image at a time; `process` takes `&mut self`.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: TraceConfig,
    workspace: Workspace,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Validate `config` and allocate a workspace for its largest image.
    pub fn new(config: TraceConfig) -> Result<Self> {
        config.validate()?;
        let workspace = Workspace::new(&config);
        Ok(Self { config, workspace })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Cell states left by the last call.
    pub fn mask(&self) -> &Mask {
        &self.workspace.mask
    }

    /// Trace every stroke region in `rgba`, handing each polygon to `sink` as
    /// soon as it is found, then paint the overlay back into `rgba`.
    ///
    /// Dimension and buffer errors are returned before `rgba` or the
    /// workspace is touched.
    #[instrument(skip_all, fields(width = width, height = height))]
    pub fn process<S>(&mut self, rgba: &mut [u8], width: u32, height: u32, sink: &mut S) -> Result<ScanSummary>
    where
        S: PolygonSink + ?Sized,
    {
        let Self { config, workspace: ws } = self;
        ws.reset();
        ws.mask.load_rgba(rgba, width, height)?;
        if config.clear_partial_alpha {
            let cleared = clear_partial_alpha(rgba);
            debug!(cleared, "cleared translucent pixels");
        }

        let mut summary = ScanSummary {
            spur_cells: erase_spurs(&mut ws.mask, &mut ws.stack),
            ..Default::default()
        };

        let (w, h, stride) = (ws.mask.width(), ws.mask.height(), ws.mask.stride());
        for y in 1..=h {
            for i in (y * stride + 1)..=(y * stride + w) {
                match ws.mask.get(i) {
                    Cell::Foreground => scan_region(ws, config, i, sink, &mut summary),
                    Cell::Visited if ws.mask.get(i + stride) == Cell::Background => {
                        scan_hole(ws, config, i, sink, &mut summary)
                    }
                    _ => {}
                }
            }
        }

        summary.lowest_row = ws.mask.lowest_row();
        paint_overlay(&ws.mask, rgba);

        debug!(
            outer = summary.outer,
            holes = summary.holes,
            discarded = summary.discarded_regions,
            spur_cells = summary.spur_cells,
            "stroke processed"
        );
        Ok(summary)
    }

    /// Process an `image` buffer in place and collect the result.
    pub fn process_image(&mut self, image: &mut RgbaImage) -> Result<StrokeOutline> {
        let (width, height) = image.dimensions();
        let mut polygons = Vec::new();
        let summary = self.process(&mut **image, width, height, &mut polygons)?;
        Ok(StrokeOutline {
            polygons,
            image_width: width,
            image_height: height,
            lowest_row: summary.lowest_row,
        })
    }
}

/// `start` is the first cell of a fresh region in scan order, so it lies on
/// the region's top edge.
fn scan_region<S>(ws: &mut Workspace, config: &TraceConfig, start: usize, sink: &mut S, summary: &mut ScanSummary)
where
    S: PolygonSink + ?Sized,
{
    let area = flood_fill(&mut ws.mask, start, Cell::Foreground, Cell::Visited, &mut ws.stack);
    if area <= config.noise_area {
        flood_fill(&mut ws.mask, start, Cell::Visited, Cell::Background, &mut ws.stack);
        summary.discarded_regions += 1;
        debug!(area, at = ?ws.mask.coords(start), "discarded noise region");
        return;
    }

    let outcome = trace_boundary(&mut ws.mask, start, Winding::Clockwise, &mut ws.stack, ws.limits.max_revisits);
    if outcome.is_closed() && assemble(ws, config) {
        emit(&mut ws.points, ContourKind::Outer, sink);
        summary.outer += 1;
        return;
    }

    undo_trace(&mut ws.mask, &ws.stack);
    flood_fill(&mut ws.mask, start, Cell::Visited, Cell::Background, &mut ws.stack);
    summary.discarded_regions += 1;
    debug!(area, ?outcome, at = ?ws.mask.coords(start), "discarded untraceable region");
}

/// `start` sits directly above the top-left cell of an enclosed cavity.
/// A failed hole trace keeps its marks so the cavity is not retried.
fn scan_hole<S>(ws: &mut Workspace, config: &TraceConfig, start: usize, sink: &mut S, summary: &mut ScanSummary)
where
    S: PolygonSink + ?Sized,
{
    let outcome = trace_boundary(
        &mut ws.mask,
        start,
        Winding::CounterClockwise,
        &mut ws.stack,
        ws.limits.max_revisits,
    );
    let length = ws.stack.len();
    if outcome.is_closed() && length > config.hole_noise_length && assemble(ws, config) {
        emit(&mut ws.points, ContourKind::Hole, sink);
        summary.holes += 1;
    } else {
        debug!(length, ?outcome, at = ?ws.mask.coords(start), "ignored hole");
    }
}

/// Turn the closed path on the work stack into a polygon in `ws.points`.
/// False when it degenerates.
fn assemble(ws: &mut Workspace, config: &TraceConfig) -> bool {
    let stride = ws.mask.stride();
    contour_polygon(
        ws.stack.as_slice(),
        stride,
        &mut ws.points,
        &mut ws.simplifier,
        config.epsilon,
        ws.limits.max_points,
    )
    .is_some()
        && winding_of(&ws.points).is_some()
}

/// Move the points out of the padded frame, orient them for `kind` and hand
/// them to the sink.
fn emit<S>(points: &mut [Point], kind: ContourKind, sink: &mut S)
where
    S: PolygonSink + ?Sized,
{
    for p in points.iter_mut() {
        p.x -= 1;
        p.y -= 1;
    }
    if winding_of(points) != Some(kind.winding()) {
        points.reverse();
    }
    debug!(%kind, vertices = points.len(), "polygon found");
    sink.polygon_found(kind, points);
}
