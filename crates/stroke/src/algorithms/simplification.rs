use crate::types::Point;

/// Distance from `p` to the segment `a`-`b`. The projection is clamped to the
/// segment, and a degenerate segment measures the distance to `a`.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (cx, cy) = (b.x as f64 - ax, b.y as f64 - ay);

    let len_sq = cx * cx + cy * cy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * cx + (py - ay) * cy) / len_sq).clamp(0.0, 1.0)
    };

    let (dx, dy) = (px - (ax + t * cx), py - (ay + t * cy));
    (dx * dx + dy * dy).sqrt()
}

/// Douglas-Peucker simplifier with reusable scratch space.
///
/// Ranges waiting to be split live on an explicit stack rather than the call
/// stack, so staircase contours thousands of points long cannot overflow it.
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    ranges: Vec<(usize, usize)>,
    keep: Vec<bool>,
}

impl Simplifier {
    pub fn with_capacity(points: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(points),
            keep: Vec::with_capacity(points),
        }
    }

    /// Simplify `points[start..=end]` in place. The kept points are moved to
    /// `start..start + n` and `n` is returned. `points[start]` and
    /// `points[end]` are always kept; points past `end` are untouched.
    ///
    /// An `epsilon` of zero or less keeps every point.
    pub fn simplify_range(&mut self, points: &mut [Point], start: usize, end: usize, epsilon: f64) -> usize {
        debug_assert!(start <= end && end < points.len());
        let span = end - start;
        if span <= 1 || epsilon <= 0.0 {
            return span + 1;
        }

        self.keep.clear();
        self.keep.resize(span + 1, false);
        self.keep[0] = true;
        self.keep[span] = true;

        self.ranges.clear();
        self.ranges.push((start, end));
        while let Some((a, b)) = self.ranges.pop() {
            if b - a <= 1 {
                continue;
            }
            let (pa, pb) = (points[a], points[b]);
            let mut max_d = 0.0;
            let mut max_i = a;
            for (i, &p) in points.iter().enumerate().take(b).skip(a + 1) {
                let d = perpendicular_distance(p, pa, pb);
                if d > max_d {
                    max_d = d;
                    max_i = i;
                }
            }
            if max_d > epsilon {
                self.keep[max_i - start] = true;
                self.ranges.push((max_i, b));
                self.ranges.push((a, max_i));
            }
        }

        let mut kept = 0;
        for k in 0..=span {
            if self.keep[k] {
                points[start + kept] = points[start + k];
                kept += 1;
            }
        }
        kept
    }

    /// Simplify a whole path, keeping its first and last points.
    pub fn simplify(&mut self, points: &mut Vec<Point>, epsilon: f64) {
        if points.len() < 3 {
            return;
        }
        let end = points.len() - 1;
        let kept = self.simplify_range(points, 0, end, epsilon);
        points.truncate(kept);
    }
}

/// One-off simplification of an open path.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    let mut out = points.to_vec();
    Simplifier::with_capacity(points.len()).simplify(&mut out, epsilon);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Straightforward recursive Douglas-Peucker that splices the two halves.
    fn reference(points: &[Point], epsilon: f64) -> Vec<Point> {
        if points.len() <= 2 {
            return points.to_vec();
        }
        let (first, last) = (points[0], points[points.len() - 1]);
        let (mut max_d, mut max_i) = (0.0, 0);
        for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
            let d = perpendicular_distance(p, first, last);
            if d > max_d {
                max_d = d;
                max_i = i;
            }
        }
        if max_d > epsilon {
            let mut left = reference(&points[..=max_i], epsilon);
            left.pop();
            left.extend(reference(&points[max_i..], epsilon));
            left
        } else {
            vec![first, last]
        }
    }

    fn staircase(n: i32) -> Vec<Point> {
        (0..n).map(|i| Point::new(i / 2 + (i % 2), i / 2)).collect()
    }

    fn wobbly(seed: u64, n: usize) -> Vec<Point> {
        let mut state = seed;
        (0..n)
            .map(|i| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                Point::new(i as i32 * 2, (state % 9) as i32 - 4)
            })
            .collect()
    }

    fn is_subsequence(sub: &[Point], full: &[Point]) -> bool {
        let mut it = full.iter();
        sub.iter().all(|p| it.any(|q| q == p))
    }

    #[test]
    fn distance_projects_onto_segment() {
        let d = perpendicular_distance(Point::new(2, 3), Point::new(0, 0), Point::new(4, 0));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn distance_clamps_past_segment_end() {
        let d = perpendicular_distance(Point::new(7, 4), Point::new(0, 0), Point::new(4, 0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn distance_to_degenerate_segment() {
        let d = perpendicular_distance(Point::new(3, 4), Point::new(0, 0), Point::new(0, 0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn short_ranges_are_untouched() {
        assert_eq!(simplify(&pts(&[(0, 0), (5, 5)]), 1.0), pts(&[(0, 0), (5, 5)]));
        assert!(simplify(&[], 1.0).is_empty());
    }

    #[test]
    fn collinear_run_collapses() {
        let line = pts(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        assert_eq!(simplify(&line, 1.5), pts(&[(0, 0), (4, 0)]));
    }

    #[test]
    fn keeps_a_sharp_corner() {
        let path = pts(&[(0, 0), (5, 0), (10, 0), (10, 5), (10, 10)]);
        assert_eq!(simplify(&path, 1.5), pts(&[(0, 0), (10, 0), (10, 10)]));
    }

    #[test]
    fn closed_square_keeps_its_corners() {
        let ring = pts(&[(1, 1), (20, 1), (20, 20), (1, 20), (1, 1)]);
        assert_eq!(simplify(&ring, 1.5), ring);
    }

    #[test]
    fn zero_epsilon_keeps_everything() {
        let path = wobbly(17, 40);
        assert_eq!(simplify(&path, 0.0), path);
        let line = pts(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(simplify(&line, 0.0), line);
    }

    #[test]
    fn infinite_epsilon_keeps_endpoints() {
        let path = wobbly(5, 40);
        let out = simplify(&path, f64::INFINITY);
        assert_eq!(out, vec![path[0], path[39]]);
    }

    #[test]
    fn simplify_truncates_in_place() {
        let mut line = pts(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        Simplifier::default().simplify(&mut line, 1.5);
        assert_eq!(line, pts(&[(0, 0), (4, 0)]));

        let mut pair = pts(&[(0, 0), (9, 9)]);
        Simplifier::default().simplify(&mut pair, 1.5);
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn range_leaves_surrounding_points_alone() {
        let mut path = pts(&[(9, 9), (0, 0), (1, 0), (2, 0), (3, 0), (7, 7)]);
        let kept = Simplifier::default().simplify_range(&mut path, 1, 4, 1.0);
        assert_eq!(kept, 2);
        assert_eq!(&path[..3], &pts(&[(9, 9), (0, 0), (3, 0)])[..]);
        assert_eq!(path[5], Point::new(7, 7));
    }

    #[test]
    fn matches_recursive_reference() {
        let mut simplifier = Simplifier::with_capacity(64);
        for seed in 1..60u64 {
            let path = wobbly(seed * 31, 50);
            for epsilon in [0.5, 1.5, 3.0] {
                let mut out = path.clone();
                simplifier.simplify(&mut out, epsilon);
                let expected = reference(&path, epsilon);
                assert_eq!(out, expected, "seed {seed}, epsilon {epsilon}");
                assert!(out.len() <= path.len());
                assert_eq!(out.first(), path.first());
                assert_eq!(out.last(), path.last());
                assert!(is_subsequence(&out, &path));
            }
        }
    }

    #[test]
    fn long_staircase_keeps_endpoints() {
        let path = staircase(4_001);
        let out = simplify(&path, 0.4);
        assert!(out.len() > 2);
        assert_eq!(out.first(), path.first());
        assert_eq!(out.last(), path.last());
    }
}
