use crate::types::{ContourKind, Point, Polygon};

/// Consumer of polygons as the pipeline finds them.
///
/// Points are in image coordinates and already oriented for their kind
/// (outer contours clockwise, holes counter-clockwise). The slice borrows the
/// pipeline's scratch buffer, so copy it if it has to outlive the call.
pub trait PolygonSink {
    fn polygon_found(&mut self, kind: ContourKind, points: &[Point]);
}

/// Collect every polygon.
impl PolygonSink for Vec<Polygon> {
    fn polygon_found(&mut self, kind: ContourKind, points: &[Point]) {
        self.push(Polygon::new(kind, points.to_vec()));
    }
}

/// Adapter turning a closure into a [`PolygonSink`].
///
/// ```
/// use stroke::{ContourKind, PolygonCallback, PolygonSink, Point};
///
/// let mut vertices = 0;
/// let mut sink = PolygonCallback(|_kind: ContourKind, points: &[Point]| vertices += points.len());
/// sink.polygon_found(ContourKind::Outer, &[Point::new(0, 0), Point::new(4, 0), Point::new(4, 4)]);
/// drop(sink);
/// assert_eq!(vertices, 3);
/// ```
pub struct PolygonCallback<F>(pub F);

impl<F> PolygonSink for PolygonCallback<F>
where
    F: FnMut(ContourKind, &[Point]),
{
    fn polygon_found(&mut self, kind: ContourKind, points: &[Point]) {
        (self.0)(kind, points)
    }
}

/// Counts polygons without keeping them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolygonCounter {
    pub outer: usize,
    pub holes: usize,
}

impl PolygonSink for PolygonCounter {
    fn polygon_found(&mut self, kind: ContourKind, _points: &[Point]) {
        match kind {
            ContourKind::Outer => self.outer += 1,
            ContourKind::Hole => self.holes += 1,
        }
    }
}
