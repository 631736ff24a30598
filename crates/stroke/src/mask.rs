//! Padded cell grid shared by every stage of the tracer.
//!
//! The grid is one cell larger than the image on every side. The border is
//! always [`Cell::Background`], so the 8 neighbors of any interior cell can be
//! read without bounds checks.

use strum::Display;

use crate::error::{Result, StrokeError};

/// Per-pixel tracing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Background = 0,
    Foreground = 1,
    Visited = 2,
    Traced = 3,
}

impl Cell {
    /// Whether `self -> next` is a legal state change.
    pub fn can_become(self, next: Cell) -> bool {
        use Cell::*;
        self == next
            || matches!(
                (self, next),
                (Background, Foreground)
                    | (Foreground, Visited)
                    | (Foreground, Background)
                    | (Visited, Traced)
                    | (Visited, Background)
                    | (Traced, Visited)
            )
    }
}

/// Compass direction, numbered clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[repr(u8)]
pub enum Heading {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rotate by `steps` quarter turns; positive is clockwise.
    pub const fn rotate(self, steps: i8) -> Heading {
        Self::ALL[(self as i8 + steps).rem_euclid(4) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Mask {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    stride: usize,
    /// Offsets to the 4 compass neighbors, indexed by [`Heading`]
    offsets4: [isize; 4],
    /// Offsets to the 8 neighbors, clockwise from the top
    offsets8: [isize; 8],
    max_width: usize,
    max_height: usize,
}

impl Mask {
    /// Allocate a grid able to hold any image up to `max_width` x `max_height`.
    pub fn with_capacity(max_width: u32, max_height: u32) -> Self {
        let (max_width, max_height) = (max_width as usize, max_height as usize);
        let mut mask = Self {
            cells: Vec::with_capacity((max_width + 2) * (max_height + 2)),
            width: 0,
            height: 0,
            stride: 2,
            offsets4: [0; 4],
            offsets8: [0; 8],
            max_width,
            max_height,
        };
        mask.reset(0, 0);
        mask
    }

    /// Total cells the grid can ever hold.
    pub fn max_cells(&self) -> usize {
        (self.max_width + 2) * (self.max_height + 2)
    }

    /// Clear the grid to `Background` for an image of the given size.
    /// The caller checks the size against the capacity.
    fn reset(&mut self, width: usize, height: usize) {
        let stride = width + 2;
        let s = stride as isize;
        self.width = width;
        self.height = height;
        self.stride = stride;
        self.offsets4 = [-s, 1, s, -1];
        self.offsets8 = [-s, -s + 1, 1, s + 1, s, s - 1, -1, -s - 1];
        self.cells.clear();
        self.cells.resize(stride * (height + 2), Cell::Background);
    }

    /// Threshold an RGBA buffer into the grid: a pixel is `Foreground` iff its
    /// alpha is exactly 255.
    pub fn load_rgba(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        self.check_dimensions(width, height)?;
        let (w, h) = (width as usize, height as usize);
        let expected = w * h * 4;
        if rgba.len() != expected {
            return Err(StrokeError::BufferSize { expected, actual: rgba.len() });
        }

        self.reset(w, h);
        for (y, row) in rgba.chunks_exact(w * 4).enumerate() {
            let start = (y + 1) * self.stride + 1;
            for (cell, pixel) in self.cells[start..start + w].iter_mut().zip(row.chunks_exact(4)) {
                if pixel[3] == 255 {
                    *cell = Cell::Foreground;
                }
            }
        }
        Ok(())
    }

    /// Build a grid straight from rows of `#` (ink) and `.` (no ink).
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        assert!(rows.iter().all(|r| r.len() == width), "rows must all be {width} cells wide");
        let mut mask = Self::with_capacity(width as u32, height as u32);
        mask.reset(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.bytes().enumerate() {
                if c == b'#' {
                    let i = mask.index(x + 1, y + 1);
                    mask.cells[i] = Cell::Foreground;
                }
            }
        }
        mask
    }

    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(StrokeError::EmptyImage { width, height });
        }
        if width as usize > self.max_width || height as usize > self.max_height {
            return Err(StrokeError::DimensionsExceeded {
                width,
                height,
                max_width: self.max_width as u32,
                max_height: self.max_height as u32,
            });
        }
        Ok(())
    }

    /// Image width (without the border).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height (without the border).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of padded coordinates.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    /// Padded coordinates of a flat index.
    #[inline]
    pub fn coords(&self, i: usize) -> (usize, usize) {
        (i % self.stride, i / self.stride)
    }

    #[inline]
    pub fn get(&self, i: usize) -> Cell {
        self.cells[i]
    }

    #[inline]
    pub fn set(&mut self, i: usize, cell: Cell) {
        debug_assert!(
            self.cells[i].can_become(cell),
            "illegal cell transition {} -> {} at {:?}",
            self.cells[i],
            cell,
            self.coords(i)
        );
        self.cells[i] = cell;
    }

    #[inline]
    pub fn neighbor(&self, i: usize, heading: Heading) -> usize {
        i.wrapping_add_signed(self.offsets4[heading.index()])
    }

    /// The 4 compass neighbors of `i`.
    #[inline]
    pub fn neighbors4(&self, i: usize) -> [usize; 4] {
        self.offsets4.map(|o| i.wrapping_add_signed(o))
    }

    /// Whether any of the 8 neighbors of `i` is `Background`.
    #[inline]
    pub fn touches_background8(&self, i: usize) -> bool {
        self.offsets8
            .iter()
            .any(|&o| self.cells[i.wrapping_add_signed(o)] == Cell::Background)
    }

    /// Whether any of the 4 compass neighbors of `i` is `Background`.
    #[inline]
    pub fn touches_background4(&self, i: usize) -> bool {
        self.offsets4
            .iter()
            .any(|&o| self.cells[i.wrapping_add_signed(o)] == Cell::Background)
    }

    /// Flat indices of the interior cells, row-major.
    pub fn interior(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.height).flat_map(move |y| {
            let row = y * self.stride;
            (row + 1)..=(row + self.width)
        })
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Image row of the last cell that is not `Background`.
    pub fn lowest_row(&self) -> Option<u32> {
        self.cells
            .iter()
            .rposition(|&c| c != Cell::Background)
            .map(|i| (i / self.stride - 1) as u32)
    }

    /// True when every cell of the border ring is `Background`.
    pub fn border_is_clear(&self) -> bool {
        let last_row = (self.height + 1) * self.stride;
        let top_bottom = (0..self.stride).all(|x| {
            self.cells[x] == Cell::Background && self.cells[last_row + x] == Cell::Background
        });
        let sides = (1..=self.height).all(|y| {
            let row = y * self.stride;
            self.cells[row] == Cell::Background && self.cells[row + self.stride - 1] == Cell::Background
        });
        top_bottom && sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rgba_thresholds_alpha_and_pads() {
        let mut mask = Mask::with_capacity(4, 4);
        // 2x2 image, only the opaque pixels become ink
        let rgba = [
            0, 0, 0, 255, 9, 9, 9, 254, //
            1, 2, 3, 0, 7, 7, 7, 255,
        ];
        mask.load_rgba(&rgba, 2, 2).expect("Should load");
        assert_eq!(mask.stride(), 4);
        assert_eq!(mask.len(), 16);
        assert_eq!(mask.get(mask.index(1, 1)), Cell::Foreground);
        assert_eq!(mask.get(mask.index(2, 1)), Cell::Background);
        assert_eq!(mask.get(mask.index(1, 2)), Cell::Background);
        assert_eq!(mask.get(mask.index(2, 2)), Cell::Foreground);
        assert!(mask.border_is_clear());
    }

    #[test]
    fn load_rgba_rejects_oversized_image() {
        let mut mask = Mask::with_capacity(4, 4);
        let rgba = vec![255u8; 5 * 4 * 4];
        let err = mask.load_rgba(&rgba, 5, 4).unwrap_err();
        assert!(matches!(err, StrokeError::DimensionsExceeded { width: 5, .. }));
    }

    #[test]
    fn load_rgba_rejects_short_buffer() {
        let mut mask = Mask::with_capacity(4, 4);
        let err = mask.load_rgba(&[0u8; 12], 2, 2).unwrap_err();
        assert!(matches!(err, StrokeError::BufferSize { expected: 16, actual: 12 }));
    }

    #[test]
    fn reload_clears_previous_contents() {
        let mut mask = Mask::with_capacity(3, 3);
        mask.load_rgba(&[255u8; 36], 3, 3).expect("Should load");
        assert_eq!(mask.count(Cell::Foreground), 9);
        mask.load_rgba(&[0u8; 16], 2, 2).expect("Should load");
        assert_eq!(mask.count(Cell::Foreground), 0);
    }

    #[test]
    fn transition_table() {
        assert!(Cell::Background.can_become(Cell::Foreground));
        assert!(Cell::Visited.can_become(Cell::Traced));
        assert!(Cell::Traced.can_become(Cell::Visited));
        assert!(!Cell::Background.can_become(Cell::Traced));
        assert!(!Cell::Traced.can_become(Cell::Background));
        assert!(!Cell::Foreground.can_become(Cell::Traced));
    }

    #[test]
    fn heading_rotation_wraps() {
        assert_eq!(Heading::Up.rotate(-1), Heading::Left);
        assert_eq!(Heading::Left.rotate(1), Heading::Up);
        assert_eq!(Heading::Right.rotate(2), Heading::Left);
    }

    #[test]
    fn interior_is_row_major() {
        let mask = Mask::from_rows(&["..", ".."]);
        let cells: Vec<_> = mask.interior().map(|i| mask.coords(i)).collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    #[should_panic(expected = "rows must all be 3 cells wide")]
    fn ragged_rows_are_refused() {
        Mask::from_rows(&["...", ".#", "..."]);
    }

    #[test]
    fn lowest_row_is_in_image_coordinates() {
        let mask = Mask::from_rows(&["...", ".#.", "...", "..."]);
        assert_eq!(mask.lowest_row(), Some(1));
        assert_eq!(Mask::from_rows(&["..."]).lowest_row(), None);
    }
}
