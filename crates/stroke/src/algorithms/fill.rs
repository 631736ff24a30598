use crate::{
    mask::{Cell, Mask},
    workspace::WorkStack,
};

/// 4-connected scanline fill recoloring `from` cells to `to`, starting at
/// `seed`. The seed itself is recolored and counted. Returns the number of
/// cells recolored.
///
/// Cells are recolored as they are pushed, so the stack never holds more
/// entries than the region has cells.
pub fn flood_fill(mask: &mut Mask, seed: usize, from: Cell, to: Cell, stack: &mut WorkStack) -> usize {
    debug_assert!(from != Cell::Background, "filling background would leak into the border");
    debug_assert!(from != to);

    stack.clear();
    mask.set(seed, to);
    stack.push(seed);
    let mut area = 1;
    let stride = mask.stride();

    while let Some(i) = stack.pop() {
        area += claim(mask, stack, i - stride, from, to);
        area += claim(mask, stack, i + stride, from, to);

        // Walk the row in both directions, claiming the cells above and below
        // each step. The border stops both walks.
        for step in [-1isize, 1] {
            let mut j = i.wrapping_add_signed(step);
            while mask.get(j) == from {
                mask.set(j, to);
                area += 1;
                area += claim(mask, stack, j - stride, from, to);
                area += claim(mask, stack, j + stride, from, to);
                j = j.wrapping_add_signed(step);
            }
        }
    }

    area
}

#[inline]
fn claim(mask: &mut Mask, stack: &mut WorkStack, i: usize, from: Cell, to: Cell) -> usize {
    if mask.get(i) != from {
        return 0;
    }
    mask.set(i, to);
    stack.push(i);
    1
}
