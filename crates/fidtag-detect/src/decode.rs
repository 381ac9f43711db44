//! Payload sampling inside a candidate quad.

use fidtag_core::{GrayImageView, Homography};
use nalgebra::Point2;

use crate::segment::otsu_threshold;

/// Raw payload read from one quad, before family matching.
pub(crate) struct QuadPayload {
    /// Observed payload bits (row-major from the MSB end, set bit = white).
    pub code: u64,
    /// Fraction of border cells classified black.
    pub border_score: f32,
}

/// Sample the cell grid of a quad and assemble its payload code.
///
/// Cells are read at their centers (3x3 means) through the homography that
/// maps the canonical cell grid onto the quad corners; the threshold is
/// estimated per quad from the samples themselves. Quads whose border ring
/// scores below `min_border_score` are rejected.
pub(crate) fn read_payload(
    gray: &GrayImageView<'_>,
    corners: &[Point2<f32>; 4],
    dim: usize,
    border: usize,
    min_border_score: f32,
) -> Option<QuadPayload> {
    let grid = dim + 2 * border;
    if dim * dim > 64 || grid == 0 {
        return None;
    }

    let g = grid as f32;
    let canonical = [
        Point2::new(0.0, 0.0),
        Point2::new(g, 0.0),
        Point2::new(g, g),
        Point2::new(0.0, g),
    ];
    let h = Homography::from_quad(&canonical, corners)?;

    let mut samples = Vec::with_capacity(grid * grid);
    for cy in 0..grid {
        for cx in 0..grid {
            let p = h.apply(Point2::new(cx as f32 + 0.5, cy as f32 + 0.5));
            samples.push(gray.mean_3x3(p.x, p.y));
        }
    }
    let thr = otsu_threshold(&samples);

    let mut border_black = 0u32;
    let mut border_total = 0u32;
    let mut code = 0u64;

    for cy in 0..grid {
        for cx in 0..grid {
            let black = samples[cy * grid + cx] < thr;
            let on_border =
                cx < border || cy < border || cx >= grid - border || cy >= grid - border;
            if on_border {
                border_total += 1;
                if black {
                    border_black += 1;
                }
            } else if !black {
                let idx = (cy - border) * dim + (cx - border);
                code |= 1 << (dim * dim - 1 - idx);
            }
        }
    }

    let border_score = if border_total > 0 {
        border_black as f32 / border_total as f32
    } else {
        1.0
    };
    if border_score < min_border_score {
        return None;
    }

    Some(QuadPayload { code, border_score })
}
