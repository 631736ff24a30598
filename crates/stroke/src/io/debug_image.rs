use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_line_segment_mut},
    rect::Rect,
};

use crate::types::{ContourKind, Polygon};

pub const OUTER_COLOR: Rgba<u8> = Rgba([0, 220, 90, 255]);
pub const HOLE_COLOR: Rgba<u8> = Rgba([240, 60, 60, 255]);
pub const VERTEX_COLOR: Rgba<u8> = Rgba([255, 230, 0, 255]);

/// Dim `image` and draw every polygon over it: edges in a color per kind,
/// vertices as 3x3 squares.
pub fn draw_polygons(image: &RgbaImage, polygons: &[Polygon]) -> RgbaImage {
    let mut canvas = RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        // translucent ink still shows up faintly against black
        let scale = |c: u8| ((c as u16 * a as u16) / (255 * 3)) as u8;
        Rgba([scale(r), scale(g), scale(b), 255])
    });

    for polygon in polygons {
        let color = match polygon.kind {
            ContourKind::Outer => OUTER_COLOR,
            ContourKind::Hole => HOLE_COLOR,
        };
        let points = &polygon.points;
        for (k, a) in points.iter().enumerate() {
            let b = points[(k + 1) % points.len()];
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                color,
            );
        }
    }

    // vertices last so edges never cover them
    for p in polygons.iter().flat_map(|polygon| &polygon.points) {
        draw_filled_rect_mut(&mut canvas, Rect::at(p.x - 1, p.y - 1).of_size(3, 3), VERTEX_COLOR);
    }

    canvas
}
