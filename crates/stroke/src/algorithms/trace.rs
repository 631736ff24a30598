//! Wall-following boundary tracer.
//!
//! The tracer walks 4-connected edge cells of a `Visited` region, marking each
//! one `Traced` and recording it on the path stack. Neighbors are probed
//! starting from the side of the current heading given by the winding
//! (left for clockwise, right for counter-clockwise), so the walk hugs the
//! region's wall. Where thin structure leaves no fresh edge cell, the tracer
//! backs up through cells it already traced, a bounded number of steps in a
//! row, until it finds fresh cells again or arrives back at the start.
//!
//! ```text
//!   . . . . . .      . . . . . .
//!   . # # . . .      . . # # . .
//!   . # # # # .      . . # # . .
//!   . . . # # .      . # # . . .
//!   . . . . . .      . # # . . .
//! ```
//!
//! Both shapes above force the tracer to step back through traced cells once
//! it reaches the far end.

use strum::Display;
use tracing::trace;

use crate::{
    algorithms::simplification::Simplifier,
    mask::{Cell, Heading, Mask},
    types::{Point, Winding},
    workspace::WorkStack,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TraceAbort {
    /// Too many consecutive steps through already traced cells
    RevisitLimit,
    /// The path filled the work stack
    PathLimit,
    /// No fresh or traced neighbor to step to
    DeadEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Back at the start. `revisits` counts the steps taken through traced
    /// cells, not including the final step onto the start.
    Closed { revisits: usize },
    Aborted(TraceAbort),
}

impl TraceOutcome {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// Tracer position between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub cell: usize,
    /// Direction of the move that entered `cell`
    pub heading: Heading,
    pub winding: Winding,
}

impl Cursor {
    /// Traces start on the topmost-leftmost cell of their boundary, as if
    /// entered moving right.
    pub fn new(cell: usize, winding: Winding) -> Self {
        Self { cell, heading: Heading::Right, winding }
    }

    /// Neighbor directions in the order they are probed.
    pub fn search_order(&self) -> [Heading; 4] {
        let sign = self.winding.sign();
        let first = self.heading.rotate(-sign);
        [first, first.rotate(sign), first.rotate(2 * sign), first.rotate(3 * sign)]
    }

    /// First neighbor, in search order, that `accept` takes.
    pub fn probe(&self, mask: &Mask, accept: impl Fn(&Mask, usize) -> bool) -> Option<(usize, Heading)> {
        self.search_order()
            .into_iter()
            .map(|heading| (mask.neighbor(self.cell, heading), heading))
            .find(|&(i, _)| accept(mask, i))
    }

    pub fn advance(&mut self, cell: usize, heading: Heading) {
        self.cell = cell;
        self.heading = heading;
    }
}

/// A `Visited` cell with at least one `Background` cell among its 8 neighbors.
#[inline]
pub fn is_new_edge(mask: &Mask, i: usize) -> bool {
    mask.get(i) == Cell::Visited && mask.touches_background8(i)
}

#[inline]
fn is_traced(mask: &Mask, i: usize) -> bool {
    mask.get(i) == Cell::Traced
}

/// Follow the boundary through `start`, recording every step on `path`.
///
/// `start` must be a `Visited` cell on the region's boundary. Whatever the
/// outcome, `path` holds every cell the trace marked so it can be undone.
pub fn trace_boundary(
    mask: &mut Mask,
    start: usize,
    winding: Winding,
    path: &mut WorkStack,
    max_revisits: usize,
) -> TraceOutcome {
    path.clear();
    mask.set(start, Cell::Traced);
    path.push(start);

    let mut cursor = Cursor::new(start, winding);
    let mut consecutive = 0;
    let mut revisits = 0;

    loop {
        if let Some((next, heading)) = cursor.probe(mask, is_new_edge) {
            if path.is_full() {
                return abort(TraceAbort::PathLimit, path);
            }
            consecutive = 0;
            mask.set(next, Cell::Traced);
            path.push(next);
            cursor.advance(next, heading);
            continue;
        }

        if consecutive >= max_revisits {
            return abort(TraceAbort::RevisitLimit, path);
        }
        if path.is_full() {
            return abort(TraceAbort::PathLimit, path);
        }
        let Some((next, heading)) = cursor.probe(mask, is_traced) else {
            return abort(TraceAbort::DeadEnd, path);
        };
        if next == start {
            return TraceOutcome::Closed { revisits };
        }
        consecutive += 1;
        revisits += 1;
        path.push(next);
        cursor.advance(next, heading);
    }
}

fn abort(reason: TraceAbort, path: &WorkStack) -> TraceOutcome {
    trace!(%reason, path_len = path.len(), "boundary trace aborted");
    TraceOutcome::Aborted(reason)
}

/// Return every cell on `path` to `Visited`.
pub fn undo_trace(mask: &mut Mask, path: &WorkStack) {
    for &i in path.as_slice().iter().rev() {
        mask.set(i, Cell::Visited);
    }
}

/// Collect the cells of a closed path where it turns, in padded coordinates.
/// A cell is dropped when its predecessor and successor share its column, or
/// share its row.
pub fn extract_corners(path: &[usize], stride: usize, points: &mut Vec<Point>) {
    points.clear();
    let n = path.len();
    let at = |k: usize| {
        let i = path[k];
        Point::new((i % stride) as i32, (i / stride) as i32)
    };
    for k in 0..n {
        let prev = at((k + n - 1) % n);
        let cur = at(k);
        let next = at((k + 1) % n);
        if (cur.x != prev.x || cur.x != next.x) && (cur.y != prev.y || cur.y != next.y) {
            points.push(cur);
        }
    }
}

/// Reduce a closed trace path to a simplified polygon left in `points`
/// (padded coordinates, closing edge implicit). Returns the vertex count, or
/// `None` when the contour is degenerate or too long.
pub fn contour_polygon(
    path: &[usize],
    stride: usize,
    points: &mut Vec<Point>,
    simplifier: &mut Simplifier,
    epsilon: f64,
    max_points: usize,
) -> Option<usize> {
    if path.len() < 3 || path.len() >= max_points {
        return None;
    }
    extract_corners(path, stride, points);
    if points.len() < 3 {
        return None;
    }

    // Repeat the first corner so the simplifier, which never drops the ends
    // of its range, closes the loop; the copy is dropped afterwards.
    points.push(points[0]);
    let end = points.len() - 1;
    let kept = simplifier.simplify_range(points, 0, end, epsilon);
    points.truncate(kept - 1);

    (points.len() >= 3).then_some(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::fill::flood_fill, types::winding_of};

    /// Mask with every ink cell already `Visited`, ready for tracing.
    fn visited(rows: &[&str]) -> (Mask, WorkStack) {
        let mut mask = Mask::from_rows(rows);
        let mut stack = WorkStack::with_capacity(mask.len());
        let seeds: Vec<usize> = mask.interior().collect();
        for i in seeds {
            if mask.get(i) == Cell::Foreground {
                flood_fill(&mut mask, i, Cell::Foreground, Cell::Visited, &mut stack);
            }
        }
        (mask, stack)
    }

    fn coords(mask: &Mask, path: &WorkStack) -> Vec<(usize, usize)> {
        path.as_slice().iter().map(|&i| mask.coords(i)).collect()
    }

    #[test]
    fn search_order_follows_winding() {
        let cw = Cursor::new(0, Winding::Clockwise);
        assert_eq!(cw.search_order(), [Heading::Up, Heading::Right, Heading::Down, Heading::Left]);
        let ccw = Cursor::new(0, Winding::CounterClockwise);
        assert_eq!(ccw.search_order(), [Heading::Down, Heading::Right, Heading::Up, Heading::Left]);
    }

    #[test]
    fn square_traces_clockwise_without_revisits() {
        let (mut mask, mut path) = visited(&["###", "###", "###"]);
        let start = mask.index(1, 1);
        let outcome = trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        assert_eq!(outcome, TraceOutcome::Closed { revisits: 0 });
        assert_eq!(
            coords(&mask, &path),
            vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2)]
        );
        // the center never touches background
        assert_eq!(mask.get(mask.index(2, 2)), Cell::Visited);

        let mut corners = Vec::new();
        extract_corners(path.as_slice(), mask.stride(), &mut corners);
        assert_eq!(
            corners,
            vec![Point::new(1, 1), Point::new(3, 1), Point::new(3, 3), Point::new(1, 3)]
        );
        assert_eq!(winding_of(&corners), Some(Winding::Clockwise));
    }

    #[test]
    fn dead_end_backs_up_through_traced_cells() {
        let (mut mask, mut path) = visited(&["##..", "####", "..##"]);
        let start = mask.index(1, 1);
        let outcome = trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        assert_eq!(outcome, TraceOutcome::Closed { revisits: 2 });
        assert_eq!(path.len(), 10);
        assert_eq!(mask.count(Cell::Visited), 0);
    }

    #[test]
    fn revisit_limit_aborts_and_undo_restores() {
        let (mut mask, mut path) = visited(&["##..", "####", "..##"]);
        let start = mask.index(1, 1);
        let outcome = trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 1);
        assert_eq!(outcome, TraceOutcome::Aborted(TraceAbort::RevisitLimit));
        assert!(mask.count(Cell::Traced) > 0);

        undo_trace(&mut mask, &path);
        assert_eq!(mask.count(Cell::Traced), 0);
        assert_eq!(mask.count(Cell::Visited), 8);
    }

    #[test]
    fn lone_cell_is_a_dead_end() {
        let (mut mask, mut path) = visited(&["...", ".#.", "..."]);
        let start = mask.index(2, 2);
        let outcome = trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        assert_eq!(outcome, TraceOutcome::Aborted(TraceAbort::DeadEnd));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn full_stack_aborts() {
        let (mut mask, _) = visited(&["###", "###", "###"]);
        let mut path = WorkStack::with_capacity(4);
        let start = mask.index(1, 1);
        let outcome = trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        assert_eq!(outcome, TraceOutcome::Aborted(TraceAbort::PathLimit));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn hole_traces_inner_wall() {
        let (mut mask, mut path) = visited(&[
            "#########",
            "#########",
            "#########",
            "###...###",
            "###...###",
            "###...###",
            "#########",
            "#########",
            "#########",
        ]);
        let corner = mask.index(1, 1);
        let outer = trace_boundary(&mut mask, corner, Winding::Clockwise, &mut path, 10);
        assert_eq!(outer, TraceOutcome::Closed { revisits: 0 });
        assert_eq!(path.len(), 32);

        // topmost-leftmost cell sitting directly above the hole
        let start = mask.index(4, 3);
        let outcome = trace_boundary(&mut mask, start, Winding::CounterClockwise, &mut path, 10);
        assert_eq!(outcome, TraceOutcome::Closed { revisits: 0 });
        // the ring of 16 cells around the 3x3 hole
        assert_eq!(path.len(), 16);
        assert!(path.as_slice().iter().all(|&i| {
            let (x, y) = mask.coords(i);
            (3..=7).contains(&x) && (3..=7).contains(&y)
        }));
    }

    #[test]
    fn contour_polygon_closes_and_simplifies() {
        let (mut mask, mut path) = visited(&[
            "######",
            "######",
            "######",
            "######",
            "######",
        ]);
        let start = mask.index(1, 1);
        trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        let mut points = Vec::new();
        let mut simplifier = Simplifier::default();
        let n = contour_polygon(path.as_slice(), mask.stride(), &mut points, &mut simplifier, 1.5, 1000);
        assert_eq!(n, Some(4));
        assert_eq!(
            points,
            vec![Point::new(1, 1), Point::new(6, 1), Point::new(6, 5), Point::new(1, 5)]
        );
    }

    #[test]
    fn contour_polygon_rejects_tiny_square() {
        // 3x3 corners sit within epsilon of the closing chords
        let (mut mask, mut path) = visited(&["###", "###", "###"]);
        let start = mask.index(1, 1);
        trace_boundary(&mut mask, start, Winding::Clockwise, &mut path, 10);
        let mut points = Vec::new();
        let mut simplifier = Simplifier::default();
        let n = contour_polygon(path.as_slice(), mask.stride(), &mut points, &mut simplifier, 1.5, 1000);
        assert_eq!(n, None);
    }

    #[test]
    fn contour_polygon_rejects_overlong_path() {
        let path = [5usize, 6, 7, 12, 11, 10];
        let mut points = Vec::new();
        let mut simplifier = Simplifier::default();
        assert_eq!(contour_polygon(&path, 5, &mut points, &mut simplifier, 1.5, 6), None);
    }
}
