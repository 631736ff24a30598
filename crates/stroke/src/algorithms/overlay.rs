use crate::mask::{Cell, Mask};

/// Write the tracing result back into the RGBA image the mask was built from.
///
/// Discarded pixels become fully transparent. Traced pixels on a true edge,
/// and traced interior pixels that look like the crossing of two longer traced
/// lines, are darkened to half intensity and made opaque. Everything else is
/// left as drawn.
pub fn paint_overlay(mask: &Mask, rgba: &mut [u8]) {
    let (width, height, stride) = (mask.width(), mask.height(), mask.stride());
    debug_assert_eq!(rgba.len(), width * height * 4);

    for (y, row) in rgba.chunks_exact_mut(width * 4).enumerate() {
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let j = (y + 1) * stride + x + 1;
            match mask.get(j) {
                Cell::Background => pixel.fill(0),
                Cell::Traced if mask.touches_background4(j) || is_crossing(mask, j, x, y) => {
                    pixel[0] >>= 1;
                    pixel[1] >>= 1;
                    pixel[2] >>= 1;
                    pixel[3] = 255;
                }
                _ => {}
            }
        }
    }
}

/// Two consecutive traced cells on one horizontal side and two on one
/// vertical side. `x`/`y` are image coordinates, used to stay inside the row
/// and column.
fn is_crossing(mask: &Mask, j: usize, x: usize, y: usize) -> bool {
    let traced = |i: usize| mask.get(i) == Cell::Traced;
    let s = mask.stride();
    let horizontal = (x > 1 && traced(j - 1) && traced(j - 2))
        || (x + 1 < mask.width() && traced(j + 1) && traced(j + 2));
    let vertical = (y > 1 && traced(j - s) && traced(j - 2 * s))
        || (y + 1 < mask.height() && traced(j + s) && traced(j + 2 * s));
    horizontal && vertical
}
