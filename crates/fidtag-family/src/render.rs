//! Tag rasterization.

use fidtag_core::GrayImage;

use crate::family::code_bit;
use crate::TagFamily;

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Rasterize one tag: a white margin, the black border ring, and the
/// payload cells, each `cell_px` pixels square.
///
/// Returns `None` when `id` is not in the family or `cell_px` is zero.
pub fn render_tag(
    family: &TagFamily,
    id: u32,
    cell_px: usize,
    margin_px: usize,
) -> Option<GrayImage> {
    let code = family.code(id)?;
    if cell_px == 0 {
        return None;
    }

    let grid = family.grid_dim();
    let side = grid * cell_px + 2 * margin_px;
    let mut img = GrayImage::filled(side, side, WHITE);

    for gy in 0..grid {
        for gx in 0..grid {
            let in_border = gx < family.border
                || gy < family.border
                || gx >= grid - family.border
                || gy >= grid - family.border;
            let value = if in_border {
                BLACK
            } else if code_bit(code, family.dim, gx - family.border, gy - family.border) {
                WHITE
            } else {
                BLACK
            };

            if value == WHITE {
                continue; // background is already white
            }
            let x0 = margin_px + gx * cell_px;
            let y0 = margin_px + gy * cell_px;
            for y in y0..y0 + cell_px {
                for x in x0..x0 + cell_px {
                    img.put(x, y, value);
                }
            }
        }
    }

    Some(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;

    #[test]
    fn renders_border_and_payload_cells() {
        let fam = builtins::tag16h5();
        let code = fam.code(3).unwrap();
        let img = render_tag(&fam, 3, 4, 8).expect("render");
        assert_eq!(img.width, 6 * 4 + 16);
        let v = img.as_view();

        // Margin is white, border ring is black.
        assert_eq!(v.get(0, 0), WHITE);
        assert_eq!(v.get(9, 9), BLACK);

        // Every payload cell center matches its code bit.
        for cy in 0..4 {
            for cx in 0..4 {
                let px = (8 + (1 + cx) * 4 + 2) as i32;
                let py = (8 + (1 + cy) * 4 + 2) as i32;
                let expected = if code_bit(code, 4, cx, cy) { WHITE } else { BLACK };
                assert_eq!(v.get(px, py), expected, "cell ({cx}, {cy})");
            }
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        let fam = builtins::tag16h5();
        assert!(render_tag(&fam, 30, 4, 0).is_none());
    }
}
