/// Zero all four channels of every pixel that is not fully opaque, so that
/// anything the mask builder rejects also disappears from the image.
/// Returns the number of pixels cleared.
pub fn clear_partial_alpha(rgba: &mut [u8]) -> usize {
    let mut cleared = 0;
    for pixel in rgba.chunks_exact_mut(4) {
        if pixel[3] != 255 {
            if pixel != [0, 0, 0, 0] {
                cleared += 1;
            }
            pixel.fill(0);
        }
    }
    cleared
}
