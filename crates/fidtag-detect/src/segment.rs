//! Intensity thresholding and dark-region extraction.

use fidtag_core::GrayImageView;

/// Otsu threshold over a set of intensity samples.
///
/// Degenerate histograms get special treatment: a constant input returns
/// that constant (so `v < thr` classifies nothing as dark), and a
/// two-level input returns the midpoint.
pub(crate) fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut hist = [0u32; 256];
    let mut min_v = 255u8;
    let mut max_v = 0u8;
    for &v in samples {
        hist[v as usize] += 1;
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }
    let occupied = hist.iter().filter(|&&h| h > 0).count();
    if occupied <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &h)| v as f64 * h as f64)
        .sum();

    let mut sum_bg = 0.0;
    let mut w_bg = 0.0;
    let mut best_var = -1.0;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_bg += h as f64;
        if w_bg < 1.0 {
            continue;
        }
        let w_fg = total - w_bg;
        if w_fg < 1.0 {
            break;
        }
        sum_bg += t as f64 * h as f64;

        let mean_bg = sum_bg / w_bg;
        let mean_fg = (sum_total - sum_bg) / w_fg;
        let var_between = w_bg * w_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// One 4-connected dark region.
pub(crate) struct DarkRegion {
    /// Total dark pixels in the region.
    pub area: usize,
    /// Region pixels with at least one non-dark 4-neighbor (image borders
    /// count as non-dark), in deterministic fill order.
    pub boundary: Vec<(i32, i32)>,
}

/// Extract 4-connected regions of pixels below `thr`, dropping regions
/// smaller than `min_area`.
pub(crate) fn dark_regions(
    gray: &GrayImageView<'_>,
    thr: u8,
    min_area: usize,
) -> Vec<DarkRegion> {
    let w = gray.width as i32;
    let h = gray.height as i32;
    let is_dark =
        |x: i32, y: i32| x >= 0 && y >= 0 && x < w && y < h && gray.get(x, y) < thr;

    let mut visited = vec![false; gray.width * gray.height];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for sy in 0..h {
        for sx in 0..w {
            let start = (sy * w + sx) as usize;
            if visited[start] || !is_dark(sx, sy) {
                continue;
            }

            let mut area = 0usize;
            let mut boundary = Vec::new();
            visited[start] = true;
            stack.push((sx, sy));

            while let Some((x, y)) = stack.pop() {
                area += 1;
                let mut interior = true;
                for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                    if !is_dark(nx, ny) {
                        interior = false;
                        continue;
                    }
                    let idx = (ny * w + nx) as usize;
                    if !visited[idx] {
                        visited[idx] = true;
                        stack.push((nx, ny));
                    }
                }
                if !interior {
                    boundary.push((x, y));
                }
            }

            if area >= min_area {
                regions.push(DarkRegion { area, boundary });
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use fidtag_core::GrayImage;

    #[test]
    fn otsu_splits_bimodal_samples() {
        let mut samples = vec![10u8; 50];
        samples.extend(vec![11u8; 10]);
        samples.extend(vec![200u8; 50]);
        samples.extend(vec![201u8; 10]);
        let t = otsu_threshold(&samples);
        assert!(t > 11 && t <= 200, "threshold {t} outside the gap");
    }

    #[test]
    fn otsu_degenerate_inputs() {
        assert_eq!(otsu_threshold(&[]), 127);
        assert_eq!(otsu_threshold(&[42; 16]), 42);
        // Two-level input: midpoint.
        assert_eq!(otsu_threshold(&[0, 0, 255, 255]), 127);
    }

    #[test]
    fn finds_separated_regions_with_boundaries() {
        let mut img = GrayImage::filled(20, 10, 255);
        for y in 2..5 {
            for x in 2..6 {
                img.put(x, y, 0);
            }
        }
        for y in 3..8 {
            for x in 10..17 {
                img.put(x, y, 0);
            }
        }

        let regions = dark_regions(&img.as_view(), 127, 1);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, 4 * 3);
        assert_eq!(regions[1].area, 7 * 5);
        // The 7x5 block has a 3x5 interior, everything else is boundary.
        assert_eq!(regions[1].boundary.len(), 7 * 5 - 5 * 3);
    }

    #[test]
    fn min_area_drops_specks() {
        let mut img = GrayImage::filled(8, 8, 255);
        img.put(3, 3, 0);
        assert!(dark_regions(&img.as_view(), 127, 2).is_empty());
    }

    #[test]
    fn uniform_image_has_no_regions() {
        let white = GrayImage::filled(16, 16, 255);
        let thr = otsu_threshold(&white.data);
        assert!(dark_regions(&white.as_view(), thr, 1).is_empty());

        let black = GrayImage::filled(16, 16, 0);
        let thr = otsu_threshold(&black.data);
        assert!(dark_regions(&black.as_view(), thr, 1).is_empty());
    }
}
