use crate::{
    mask::{Cell, Mask},
    workspace::WorkStack,
};

/// A `Foreground` cell that is only one cell wide along some axis.
#[inline]
pub fn is_spur(mask: &Mask, i: usize) -> bool {
    if mask.get(i) != Cell::Foreground {
        return false;
    }
    let stride = mask.stride();
    let clear = |j: usize| mask.get(j) == Cell::Background;
    (clear(i - 1) && clear(i + 1)) || (clear(i - stride) && clear(i + stride))
}

/// Erase every one-cell-wide protrusion so the tracer never meets an
/// ambiguous neck. A single row-major scan seeds the erosion; each erased
/// cell re-examines its 4 neighbors, which may have just become spurs.
/// Returns the number of cells erased.
pub fn erase_spurs(mask: &mut Mask, stack: &mut WorkStack) -> usize {
    stack.clear();
    let mut erased = 0;

    let (width, height, stride) = (mask.width(), mask.height(), mask.stride());
    for y in 1..=height {
        for seed in (y * stride + 1)..=(y * stride + width) {
            if !is_spur(mask, seed) {
                continue;
            }
            mask.set(seed, Cell::Background);
            stack.push(seed);
            erased += 1;

            while let Some(i) = stack.pop() {
                for j in mask.neighbors4(i) {
                    if is_spur(mask, j) {
                        mask.set(j, Cell::Background);
                        stack.push(j);
                        erased += 1;
                    }
                }
            }
        }
    }

    erased
}
